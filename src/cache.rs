use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use parking_lot::Mutex;

use crate::key::ServiceKey;
use crate::resolve::{Object, ResolveError};

/// Store shared instances, building each of them at most once.
///
/// The lock only protects the map of cells: construction runs inside the cell, so that
/// concurrent requests for the same key wait for the first one while other keys proceed.
/// A failed construction leaves the cell empty and the next request tries again.
#[derive(Default)]
pub(crate) struct InstanceCache {
    cells: Mutex<HashMap<ServiceKey, Arc<OnceCell<Object>>>>,
}

impl InstanceCache {
    pub(crate) fn get_or_try_init(
        &self,
        key: &ServiceKey,
        init: impl FnOnce() -> Result<Object, ResolveError>,
    ) -> Result<Object, ResolveError> {
        // a failed init leaves an empty cell in the map, reused by the next attempt
        let cell = self.cells.lock().entry(key.clone()).or_default().clone();
        cell.get_or_try_init(init).cloned()
    }

    /// Number of instances built so far
    pub(crate) fn len(&self) -> usize {
        self.cells
            .lock()
            .values()
            .filter(|cell| cell.get().is_some())
            .count()
    }

    /// Release all instances
    pub(crate) fn clear(&self) {
        let cells = std::mem::take(&mut *self.cells.lock());
        drop(cells);
    }
}
