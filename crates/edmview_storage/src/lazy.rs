//! Build-once slots for derived structures cached on a store.

use std::fmt;
use std::sync::{Mutex, OnceLock, PoisonError};

use edmview_foundation::Result;

/// A value computed on first request and published exactly once.
///
/// Builders are serialised by a lock so concurrent first callers never run
/// the build twice; readers never observe a partially built value. A failed
/// build publishes nothing and the next caller tries again.
pub(crate) struct BuildOnce<T> {
    slot: OnceLock<T>,
    building: Mutex<()>,
}

impl<T> BuildOnce<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: OnceLock::new(),
            building: Mutex::new(()),
        }
    }

    /// Returns the published value, if any.
    pub(crate) fn get(&self) -> Option<&T> {
        self.slot.get()
    }

    /// Returns the published value, building it with `build` if needed.
    pub(crate) fn get_or_try_build<F>(&self, build: F) -> Result<&T>
    where
        F: FnOnce() -> Result<T>,
    {
        if let Some(value) = self.slot.get() {
            return Ok(value);
        }
        // The lock guards no data, so a poisoned lock is still usable.
        let _guard = self.building.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(value) = self.slot.get() {
            return Ok(value);
        }
        let value = build()?;
        Ok(self.slot.get_or_init(|| value))
    }

    /// Drops the published value so the next request rebuilds it.
    pub(crate) fn reset(&mut self) {
        self.slot.take();
    }
}

impl<T> Default for BuildOnce<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for BuildOnce<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.slot.get().is_some() {
            "BuildOnce(built)"
        } else {
            "BuildOnce(pending)"
        })
    }
}
