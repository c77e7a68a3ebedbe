use crate::ident::Identifier;

/// Target of a [`Term::Variable`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Reference {
    /// An identifier bound by an enclosing abstraction.
    Bound(Identifier),
    /// A name left unresolved by the compiler: an opaque host-level constant
    /// that lives outside the pure term.
    Free(String),
}

/// Pure lambda calculus term.
///
/// - `Variable(Reference)`: a use of a bound identifier or an opaque free name
/// - `Abstraction(Identifier, Box<Term>)`: a one-parameter function (binder,
///   body)
/// - `Application(Box<Term>, Box<Term>)`: a one-argument call (callee,
///   argument)
///
/// Multi-parameter functions are chains of abstractions and multi-argument
/// calls are left-nested chains of applications. Every node owns its children
/// exclusively; terms are trees, never graphs.
///
/// # Examples
/// ```
/// use lambdac::{Identifier, Term};
///
/// let x0 = Identifier::new(0);
/// let id = Term::abs(x0, Term::var(x0));
/// assert_eq!(id.to_string(), "λx0.(x0)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    Variable(Reference),
    Abstraction(Identifier, Box<Term>),
    Application(Box<Term>, Box<Term>),
}

impl Term {
    #[must_use]
    pub const fn var(id: Identifier) -> Self {
        Self::Variable(Reference::Bound(id))
    }

    #[must_use]
    pub fn free(name: impl Into<String>) -> Self {
        Self::Variable(Reference::Free(name.into()))
    }

    #[must_use]
    pub fn abs(bound: Identifier, body: Self) -> Self {
        Self::Abstraction(bound, Box::new(body))
    }

    #[must_use]
    pub fn app(callee: Self, argument: Self) -> Self {
        Self::Application(Box::new(callee), Box::new(argument))
    }

    /// Wraps `body` in one abstraction per binder. The last binder ends up
    /// innermost, so `[a, b]` gives `λa.(λb.(body))`.
    #[must_use]
    pub fn curry(binders: &[Identifier], body: Self) -> Self {
        binders
            .iter()
            .rev()
            .fold(body, |body, &bound| Self::abs(bound, body))
    }

    /// Applies `callee` to each argument in turn, left to right, so `[a, b]`
    /// gives `callee(a)(b)`.
    #[must_use]
    pub fn apply(callee: Self, arguments: impl IntoIterator<Item = Self>) -> Self {
        arguments.into_iter().fold(callee, Self::app)
    }

    /// Distinct free names in order of first occurrence.
    #[must_use]
    pub fn free_names(&self) -> Vec<&str> {
        let mut names = Vec::new();
        self.collect_free_names(&mut names);
        names
    }

    fn collect_free_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Variable(Reference::Free(name)) => {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
            Self::Variable(Reference::Bound(_)) => {}
            Self::Abstraction(_, body) => body.collect_free_names(names),
            Self::Application(callee, argument) => {
                callee.collect_free_names(names);
                argument.collect_free_names(names);
            }
        }
    }

    /// True if the term mentions no opaque free names.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.free_names().is_empty()
    }

    /// Number of nodes in the term.
    #[must_use]
    pub fn size(&self) -> usize {
        match self {
            Self::Variable(_) => 1,
            Self::Abstraction(_, body) => 1 + body.size(),
            Self::Application(callee, argument) => 1 + callee.size() + argument.size(),
        }
    }
}
