use std::fmt;

/// A bound-variable identifier issued by an [`Allocator`].
///
/// The display name is derived from the allocation index alone (`x0`, `x1`,
/// ...), so two terms that differ only in their source names render
/// identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identifier {
    index: usize,
}

impl Identifier {
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self { index }
    }

    #[must_use]
    pub const fn index(self) -> usize {
        self.index
    }

    /// Canonical name of the identifier: `"x"` followed by its index.
    #[must_use]
    pub fn name(self) -> String {
        format!("x{}", self.index)
    }

    /// Inverse of [`Identifier::name`]: `"x12"` gives index 12.
    ///
    /// Leading zeros are rejected so that only names `name` can produce
    /// parse back.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let digits = name.strip_prefix('x')?;
        if digits.is_empty()
            || !digits.bytes().all(|b| b.is_ascii_digit())
            || (digits.len() > 1 && digits.starts_with('0'))
        {
            return None;
        }
        digits.parse().ok().map(Self::new)
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.index)
    }
}

/// Issues identifiers with strictly increasing indices, starting at 0.
///
/// One allocator lives for exactly one top-level compilation, so indices are
/// unique within a term and restart at 0 for the next one.
#[derive(Debug, Default)]
pub struct Allocator {
    next: usize,
}

impl Allocator {
    #[must_use]
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Allocates the next identifier.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Identifier {
        let id = Identifier::new(self.next);
        self.next += 1;
        log::trace!("allocated {id}");
        id
    }

    /// Number of identifiers issued so far.
    #[must_use]
    pub const fn count(&self) -> usize {
        self.next
    }
}
