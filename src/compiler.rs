use crate::{
    error::CompileError,
    host::Expr,
    ident::{Allocator, Identifier},
    scope::ScopeChain,
    term::Term,
};

/// What the compiler does with a name that no enclosing lambda binds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FreeNames {
    /// Keep it as an opaque reference to a host-level constant
    /// (`Reference::Free`). It renders as its source name and is resolved by
    /// the host runtime after reverse compilation.
    #[default]
    Opaque,
    /// Fail with `CompileError::UnboundName`.
    Reject,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompileOptions {
    pub free_names: FreeNames,
}

impl CompileOptions {
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            free_names: FreeNames::Reject,
        }
    }
}

/// Result of a forward compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Compiled {
    pub term: Term,
    /// Number of identifiers allocated, i.e. the number of binders in `term`.
    pub identifiers: usize,
}

/// Forward compiler from host trees to lambda terms.
///
/// A compiler owns the scope chain and the identifier allocator for exactly
/// one top-level compilation: [`Compiler::compile`] consumes it, so indices
/// always start at 0 and no state leaks between terms.
pub struct Compiler {
    scope: ScopeChain<String, Identifier>,
    alloc: Allocator,
    options: CompileOptions,
}

impl Compiler {
    #[must_use]
    pub fn new(options: CompileOptions) -> Self {
        Self {
            scope: ScopeChain::new(),
            alloc: Allocator::new(),
            options,
        }
    }

    /// Compiles a host function literal into a term.
    ///
    /// Lambdas are curried (`(a, b) -> body` becomes `λa.(λb.(body))`) and
    /// calls are left-folded (`f(a, b)` becomes `f(a)(b)`). The root may also
    /// be a bare name or a call, giving an open term such as `SUCC(ZERO)`.
    ///
    /// # Errors
    /// - `Structural` if the tree holds a lambda without parameters, a
    ///   lambda repeating a parameter name, a call without arguments or an
    ///   integer literal
    /// - `Structural` for a free name spelled like a canonical identifier
    ///   (`x0`, `x1`, ...)
    /// - `UnboundName` for a free name when `FreeNames::Reject` is set
    pub fn compile(mut self, expr: &Expr) -> Result<Compiled, CompileError> {
        log::debug!("compiling {expr}");
        let term = self.compile_expr(expr)?;
        let identifiers = self.alloc.count();
        log::debug!("compiled to {term} ({identifiers} identifiers)");
        Ok(Compiled { term, identifiers })
    }

    fn compile_expr(&mut self, expr: &Expr) -> Result<Term, CompileError> {
        match expr {
            Expr::Lambda { params, body } => self.compile_lambda(params, body),
            Expr::Name(name) => self.compile_name(name),
            Expr::Call { callee, args } => self.compile_call(callee, args),
            Expr::Int(n) => Err(CompileError::structural(format!("integer literal {n}"))),
        }
    }

    fn compile_lambda(&mut self, params: &[String], body: &Expr) -> Result<Term, CompileError> {
        if params.is_empty() {
            return Err(CompileError::structural("lambda with no parameters"));
        }

        self.scope.enter();
        let mut binders = Vec::with_capacity(params.len());
        for (i, param) in params.iter().enumerate() {
            if params[..i].contains(param) {
                return Err(CompileError::structural(format!(
                    "lambda repeating parameter '{param}'"
                )));
            }
            let id = self.alloc.next();
            self.scope.define(param.clone(), id);
            binders.push(id);
        }
        let body = self.compile_expr(body)?;
        self.scope.exit()?;

        Ok(Term::curry(&binders, body))
    }

    fn compile_name(&self, name: &str) -> Result<Term, CompileError> {
        if self.options.free_names == FreeNames::Reject || self.scope.contains(name) {
            return self.scope.lookup(name).map(Term::var);
        }
        if Identifier::from_name(name).is_some() {
            // Would be captured by the binder of the same name once rendered
            // or reverse compiled.
            return Err(CompileError::structural(format!(
                "free name '{name}' that clashes with canonical identifier names"
            )));
        }
        log::warn!("'{name}' is not bound, keeping it as an opaque free name");
        Ok(Term::free(name))
    }

    fn compile_call(&mut self, callee: &Expr, args: &[Expr]) -> Result<Term, CompileError> {
        if args.is_empty() {
            return Err(CompileError::structural("call with no arguments"));
        }

        let mut term = self.compile_expr(callee)?;
        for arg in args {
            term = Term::app(term, self.compile_expr(arg)?);
        }
        Ok(term)
    }
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompileOptions::default())
    }
}

/// Compiles `expr` with a fresh compiler and default options.
///
/// # Errors
/// See [`Compiler::compile`].
pub fn compile(expr: &Expr) -> Result<Compiled, CompileError> {
    Compiler::default().compile(expr)
}

/// Compiles `expr` with a fresh compiler and the given options.
///
/// # Errors
/// See [`Compiler::compile`].
pub fn compile_with(expr: &Expr, options: CompileOptions) -> Result<Compiled, CompileError> {
    Compiler::new(options).compile(expr)
}
