//! Engine registration
//!
//! A driver image links exactly one filesystem engine. The registry is the
//! slot that engine lives in; filesystem instances borrow it instead of
//! reaching for a global, and a second registration is refused.

use crate::error::{FsError, Result};
use crate::FsEngine;
use spin::Once;

/// Holds the single engine of a driver image
pub struct Registry<E: FsEngine> {
    engine: Once<E>,
}

impl<E: FsEngine> Registry<E> {
    /// Empty registry
    pub const fn new() -> Self {
        Self { engine: Once::new() }
    }

    /// Registry with `engine` already in place
    pub fn with_engine(engine: E) -> Self {
        let registry = Self::new();
        registry.engine.call_once(|| engine);
        registry
    }

    /// Register the engine
    ///
    /// Fails with [`FsError::AlreadyRegistered`] if one is present; the held
    /// engine is kept and `engine` is dropped.
    pub fn register(&self, engine: E) -> Result<()> {
        let mut stored = false;
        let held = self.engine.call_once(|| {
            stored = true;
            engine
        });
        if !stored {
            log::error!("register: refused, '{}' is already registered", held.name());
            return Err(FsError::AlreadyRegistered);
        }
        log::debug!("register: '{}' engine registered", held.name());
        Ok(())
    }

    /// The registered engine
    pub fn current(&self) -> Result<&E> {
        self.engine.get().ok_or(FsError::NotRegistered)
    }

    /// Whether an engine is registered
    pub fn is_registered(&self) -> bool {
        self.engine.is_completed()
    }
}

impl<E: FsEngine> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}
