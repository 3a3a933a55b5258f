//! In-memory catalog store (useful for testing).

use std::sync::Mutex;

use super::{CatalogEntry, CatalogError, CatalogStore, StoreVersion};

#[derive(Default)]
struct Inner {
    entries: Option<Vec<CatalogEntry>>,
    revision: u64,
    fail_saves: bool,
}

/// Catalog store kept in process memory.
///
/// The version is a revision counter bumped on every save.
#[derive(Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `entries`.
    pub fn with_entries(entries: Vec<CatalogEntry>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                entries: Some(entries),
                revision: 1,
                fail_saves: false,
            }),
        }
    }

    /// Make subsequent saves fail with `StorageUnwritable`.
    pub fn set_fail_saves(&self, fail: bool) {
        self.lock().fail_saves = fail;
    }

    /// Overwrite the stored entries as if another writer had saved them.
    pub fn replace_externally(&self, entries: Vec<CatalogEntry>) {
        let mut inner = self.lock();
        inner.entries = Some(entries);
        inner.revision += 1;
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means a test panicked mid-operation.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl CatalogStore for InMemoryStore {
    fn load(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        Ok(self.lock().entries.clone().unwrap_or_default())
    }

    fn save(&self, entries: &[CatalogEntry]) -> Result<(), CatalogError> {
        let mut inner = self.lock();
        if inner.fail_saves {
            return Err(CatalogError::StorageUnwritable(
                "in-memory store configured to fail".to_string(),
            ));
        }
        inner.entries = Some(entries.to_vec());
        inner.revision += 1;
        Ok(())
    }

    fn version(&self) -> Result<StoreVersion, CatalogError> {
        let inner = self.lock();
        Ok(match inner.entries {
            Some(_) => StoreVersion::of(inner.revision.to_string()),
            None => StoreVersion::absent(),
        })
    }
}
