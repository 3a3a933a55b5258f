//! Anime catalog - the durable, title-sorted list of entries.
//!
//! The whole collection is loaded, mutated in memory and written back on
//! every change. [`Catalog`] serializes those read-modify-write cycles so a
//! mutation can never silently discard another one.

mod json_file;
mod memory;
mod store;
mod types;

pub use json_file::JsonFileStore;
pub use memory::InMemoryStore;
pub use store::{
    find_by_title, is_sorted, remove_by_title, sort_entries, upsert_by_title, CatalogStore,
};
pub use types::{CatalogEntry, CatalogError, StoreVersion};
pub(crate) use types::fold;

use std::sync::{Arc, Mutex};

use crate::metrics::CATALOG_SAVES;

/// Shared access point to the catalog.
///
/// Holds an exclusive lock around every load + mutate + save sequence and
/// checks the store version before writing, so a copy changed by another
/// process is reported as [`CatalogError::StorageConflict`] instead of being
/// overwritten.
pub struct Catalog {
    store: Arc<dyn CatalogStore>,
    lock: Mutex<()>,
}

impl Catalog {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self {
            store,
            lock: Mutex::new(()),
        }
    }

    /// Load the current collection.
    pub fn entries(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());
        self.store.load()
    }

    /// Run `f` over the loaded collection and persist the result.
    ///
    /// Nothing is written when `f` fails. The collection is re-sorted before
    /// every save.
    pub fn mutate<T, F>(&self, f: F) -> Result<T, CatalogError>
    where
        F: FnOnce(&mut Vec<CatalogEntry>) -> Result<T, CatalogError>,
    {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let loaded_version = self.store.version()?;
        let mut entries = self.store.load()?;

        let output = f(&mut entries)?;

        if self.store.version()? != loaded_version {
            CATALOG_SAVES.with_label_values(&["conflict"]).inc();
            tracing::warn!("Catalog changed on disk during mutation, refusing to overwrite");
            return Err(CatalogError::StorageConflict);
        }

        sort_entries(&mut entries);
        match self.store.save(&entries) {
            Ok(()) => {
                CATALOG_SAVES.with_label_values(&["ok"]).inc();
                Ok(output)
            }
            Err(e) => {
                CATALOG_SAVES.with_label_values(&["failed"]).inc();
                tracing::error!(error = %e, "Failed to save catalog");
                Err(e)
            }
        }
    }

    /// Insert or replace `entry` by title.
    ///
    /// Returns `true` if an existing entry was replaced.
    pub fn upsert(&self, entry: CatalogEntry) -> Result<bool, CatalogError> {
        self.mutate(|entries| Ok(upsert_by_title(entries, entry)))
    }

    /// Remove the entry with `title`.
    pub fn remove(&self, title: &str) -> Result<CatalogEntry, CatalogError> {
        self.mutate(|entries| remove_by_title(entries, title))
    }

    /// Look up a single entry by title.
    pub fn find(&self, title: &str) -> Result<Option<CatalogEntry>, CatalogError> {
        Ok(find_by_title(&self.entries()?, title).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog_with(store: Arc<InMemoryStore>) -> Catalog {
        Catalog::new(store as Arc<dyn CatalogStore>)
    }

    #[test]
    fn test_every_save_is_sorted() {
        let store = Arc::new(InMemoryStore::new());
        let catalog = catalog_with(Arc::clone(&store));

        for title in ["naruto", "Bleach", "Akira", "monster", "Берсерк", "атака"] {
            catalog.upsert(CatalogEntry::new(title)).unwrap();
            assert!(is_sorted(&store.load().unwrap()));
        }

        catalog.remove("Bleach").unwrap();
        assert!(is_sorted(&store.load().unwrap()));

        let mut edited = catalog.find("monster").unwrap().unwrap();
        edited.title = "Monster".to_string();
        catalog.upsert(edited).unwrap();
        assert!(is_sorted(&store.load().unwrap()));
        assert_eq!(store.load().unwrap().len(), 5);
    }

    #[test]
    fn test_unsorted_legacy_copy_gets_sorted_on_save() {
        let store = Arc::new(InMemoryStore::with_entries(vec![
            CatalogEntry::new("Zeta"),
            CatalogEntry::new("alpha"),
        ]));
        let catalog = catalog_with(Arc::clone(&store));

        catalog.upsert(CatalogEntry::new("Mid")).unwrap();

        let titles: Vec<_> = store.load().unwrap().into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["alpha", "Mid", "Zeta"]);
    }

    #[test]
    fn test_failed_mutation_writes_nothing() {
        let store = Arc::new(InMemoryStore::with_entries(vec![CatalogEntry::new("Akira")]));
        let catalog = catalog_with(Arc::clone(&store));
        let before = store.version().unwrap();

        let result = catalog.remove("Missing");

        assert!(matches!(result, Err(CatalogError::EntryNotFound(_))));
        assert_eq!(store.version().unwrap(), before);
        assert_eq!(store.load().unwrap(), vec![CatalogEntry::new("Akira")]);
    }

    #[test]
    fn test_conflict_when_changed_underneath() {
        let store = Arc::new(InMemoryStore::with_entries(vec![CatalogEntry::new("Akira")]));
        let catalog = catalog_with(Arc::clone(&store));

        let result = catalog.mutate(|entries| {
            store.replace_externally(vec![CatalogEntry::new("Other writer")]);
            entries.push(CatalogEntry::new("Mine"));
            Ok(())
        });

        assert!(matches!(result, Err(CatalogError::StorageConflict)));
        assert_eq!(store.load().unwrap(), vec![CatalogEntry::new("Other writer")]);
    }

    #[test]
    fn test_save_failure_is_reported() {
        let store = Arc::new(InMemoryStore::new());
        store.set_fail_saves(true);
        let catalog = catalog_with(Arc::clone(&store));

        assert!(matches!(
            catalog.upsert(CatalogEntry::new("Akira")),
            Err(CatalogError::StorageUnwritable(_))
        ));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_concurrent_mutations_do_not_lose_updates() {
        let store = Arc::new(InMemoryStore::new());
        let catalog = Arc::new(catalog_with(Arc::clone(&store)));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let catalog = Arc::clone(&catalog);
                std::thread::spawn(move || {
                    catalog
                        .upsert(CatalogEntry::new(format!("Title {}", i)))
                        .unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.load().unwrap().len(), 8);
    }
}
