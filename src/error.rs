use thiserror::Error;

/// Errors raised while translating between host trees and lambda terms.
///
/// Every variant is fatal to the compilation that raised it: no partial term
/// or tree is ever returned.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    /// The host tree contains a construct outside the accepted grammar.
    #[error("Structural error: unsupported {construct}")]
    Structural { construct: String },
    /// A name was looked up strictly and no frame binds it.
    #[error("Unbound name '{name}'")]
    UnboundName { name: String },
    /// `exit` was called while only the root frame remained.
    #[error("Cannot exit the root scope")]
    ScopeUnderflow,
    /// The reverse compiler met a term that the forward compiler can never
    /// produce.
    #[error("Invariant violation: {detail}")]
    InvariantViolation { detail: String },
}

impl CompileError {
    pub(crate) fn structural(construct: impl Into<String>) -> Self {
        Self::Structural {
            construct: construct.into(),
        }
    }

    pub(crate) fn invariant(detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            detail: detail.into(),
        }
    }
}
