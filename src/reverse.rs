use std::collections::HashSet;

use crate::{
    compiler::{self, Compiled},
    error::CompileError,
    host::Expr,
    ident::Identifier,
    lexer::is_identifier,
    term::{Reference, Term},
};

/// Reverse compiles a term into an executable host tree.
///
/// Each term node is replaced by its host counterpart and the rewrite then
/// continues into the children of the replacement:
///
/// - `Variable(x<i>)` becomes the name `x<i>`, a free name stays as is
/// - `Abstraction(x<i>, body)` becomes the one-parameter lambda `x<i> -> body`
/// - `Application(f, a)` becomes the one-argument call `f(a)`
///
/// The result is fully curried: every lambda has one parameter and every call
/// one argument.
///
/// # Errors
/// Returns `CompileError::InvariantViolation` if the term is not one the
/// forward compiler can produce: a variable not bound by an enclosing
/// abstraction, two abstractions binding the same identifier, or a free name
/// that is empty, is not a host identifier or would be captured by a binder.
///
/// # Examples
/// ```
/// use lambdac::{Identifier, Term, reverse};
///
/// let x0 = Identifier::new(0);
/// let tree = reverse(&Term::abs(x0, Term::var(x0))).unwrap();
/// assert_eq!(tree.to_string(), "x0 -> x0");
/// ```
pub fn reverse(term: &Term) -> Result<Expr, CompileError> {
    let mut rewriter = Rewriter::default();
    let expr = rewriter.rewrite(term)?;
    log::debug!("reverse compiled {term} to {expr}");
    Ok(expr)
}

/// Reverse compiles `term`, then compiles the host tree again with a fresh
/// compiler. The result renders identically to `term`.
///
/// # Errors
/// Any error from [`reverse`] or [`compiler::compile`].
pub fn reverse_then_recompile(term: &Term) -> Result<Compiled, CompileError> {
    compiler::compile(&reverse(term)?)
}

#[derive(Default)]
struct Rewriter {
    /// Binders enclosing the node being rewritten, innermost last.
    bound: Vec<Identifier>,
    /// Every binder met so far in this term.
    seen: HashSet<Identifier>,
}

impl Rewriter {
    fn rewrite(&mut self, term: &Term) -> Result<Expr, CompileError> {
        match term {
            Term::Variable(Reference::Bound(id)) => {
                if !self.bound.contains(id) {
                    return Err(CompileError::invariant(format!(
                        "{id} is not bound by an enclosing abstraction"
                    )));
                }
                Ok(Expr::Name(id.name()))
            }
            Term::Variable(Reference::Free(name)) => {
                if name.is_empty() {
                    return Err(CompileError::invariant("empty free name"));
                }
                if !is_identifier(name) {
                    return Err(CompileError::invariant(format!(
                        "free name '{name}' is not a host identifier"
                    )));
                }
                if let Some(id) = Identifier::from_name(name) {
                    if self.bound.contains(&id) {
                        return Err(CompileError::invariant(format!(
                            "free name '{name}' would be captured by its binder"
                        )));
                    }
                }
                Ok(Expr::Name(name.clone()))
            }
            Term::Abstraction(bound, body) => {
                if !self.seen.insert(*bound) {
                    return Err(CompileError::invariant(format!(
                        "{bound} is bound by more than one abstraction"
                    )));
                }
                self.bound.push(*bound);
                let body = self.rewrite(body);
                self.bound.pop();
                Ok(Expr::Lambda {
                    params: vec![bound.name()],
                    body: Box::new(body?),
                })
            }
            Term::Application(callee, argument) => Ok(Expr::Call {
                callee: Box::new(self.rewrite(callee)?),
                args: vec![self.rewrite(argument)?],
            }),
        }
    }
}
