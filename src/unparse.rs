use std::fmt::{self, Write};

use crate::term::{Reference, Term};

/// Renders a term in canonical notation.
///
/// - abstraction: `λ` binder `.(` body `)`
/// - application: callee `(` argument `)`
/// - variable: `x<index>`, or the bare name for an opaque free name
///
/// The output depends only on the term's shape and its identifier indices,
/// so alpha-equivalent terms compiled with fresh allocators render to the
/// same string.
///
/// # Examples
/// ```
/// use lambdac::{Identifier, Term, render};
///
/// let (x0, x1) = (Identifier::new(0), Identifier::new(1));
/// let term = Term::abs(x0, Term::abs(x1, Term::app(Term::var(x0), Term::var(x1))));
/// assert_eq!(render(&term), "λx0.(λx1.(x0(x1)))");
/// ```
#[must_use]
pub fn render(term: &Term) -> String {
    term.to_string()
}

fn write_term(out: &mut impl Write, term: &Term) -> fmt::Result {
    match term {
        Term::Variable(Reference::Bound(id)) => write!(out, "{id}"),
        Term::Variable(Reference::Free(name)) => out.write_str(name),
        Term::Abstraction(bound, body) => {
            write!(out, "λ{bound}.(")?;
            write_term(out, body)?;
            out.write_char(')')
        }
        Term::Application(callee, argument) => {
            write_term(out, callee)?;
            out.write_char('(')?;
            write_term(out, argument)?;
            out.write_char(')')
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_term(f, self)
    }
}
