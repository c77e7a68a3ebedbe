use std::{borrow::Borrow, collections::HashMap, fmt::Display, hash::Hash};

use crate::error::CompileError;

/// A stack of lexical binding frames, innermost last.
///
/// The root frame is created with the chain and can never be popped, so a
/// chain always holds at least one frame. Lookups walk from the innermost
/// frame outward and return the first binding found, which gives shadowing
/// for free: an inner `define` hides an outer binding until its frame exits.
///
/// # Examples
/// ```
/// use lambdac::scope::ScopeChain;
///
/// let mut scope = ScopeChain::new();
/// scope.define("x", 1);
/// scope.enter();
/// scope.define("x", 2);
/// assert_eq!(scope.lookup("x").unwrap(), 2);
/// scope.exit().unwrap();
/// assert_eq!(scope.lookup("x").unwrap(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct ScopeChain<K, V> {
    frames: Vec<HashMap<K, V>>,
}

impl<K: Eq + Hash, V: Clone> ScopeChain<K, V> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    /// Number of frames, root included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    /// Pushes a new empty frame.
    pub fn enter(&mut self) {
        self.frames.push(HashMap::new());
        log::trace!("scope enter (depth {})", self.frames.len());
    }

    /// Pops the innermost frame.
    ///
    /// # Errors
    /// Returns `CompileError::ScopeUnderflow` if only the root frame remains;
    /// the chain is left untouched in that case.
    pub fn exit(&mut self) -> Result<(), CompileError> {
        if self.frames.len() == 1 {
            return Err(CompileError::ScopeUnderflow);
        }
        self.frames.pop();
        log::trace!("scope exit (depth {})", self.frames.len());
        Ok(())
    }

    /// Binds `key` in the innermost frame, overwriting any binding that
    /// frame already holds. Outer frames are never touched.
    pub fn define(&mut self, key: K, value: V) {
        if let Some(frame) = self.frames.last_mut() {
            frame.insert(key, value);
        }
    }

    /// Resolves `key`, innermost frame first.
    ///
    /// # Errors
    /// Returns `CompileError::UnboundName` if no frame binds `key`.
    pub fn lookup<Q>(&self, key: &Q) -> Result<V, CompileError>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + Display + ?Sized,
    {
        self.find(key)
            .cloned()
            .ok_or_else(|| CompileError::UnboundName {
                name: key.to_string(),
            })
    }

    #[must_use]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.find(key).is_some()
    }

    /// Merges every frame outer to inner, inner bindings winning.
    ///
    /// For inspection only; the compiler always resolves through `lookup`.
    #[must_use]
    pub fn flatten(&self) -> HashMap<K, V>
    where
        K: Clone,
    {
        let mut env = HashMap::new();
        for frame in &self.frames {
            env.extend(frame.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        env
    }

    fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.frames.iter().rev().find_map(|frame| frame.get(key))
    }
}

impl<K: Eq + Hash, V: Clone> Default for ScopeChain<K, V> {
    fn default() -> Self {
        Self::new()
    }
}
