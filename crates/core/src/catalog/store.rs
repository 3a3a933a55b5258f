//! Catalog storage trait and whole-collection operations.

use super::types::fold;
use super::{CatalogEntry, CatalogError, StoreVersion};

/// Trait for durable catalog storage.
///
/// Backends store the whole collection as a unit: there are no partial
/// updates.
pub trait CatalogStore: Send + Sync {
    /// Read the full collection. Returns an empty collection when nothing
    /// has been stored yet.
    fn load(&self) -> Result<Vec<CatalogEntry>, CatalogError>;

    /// Replace the durable copy with `entries`.
    fn save(&self, entries: &[CatalogEntry]) -> Result<(), CatalogError>;

    /// Stamp of the current durable copy.
    fn version(&self) -> Result<StoreVersion, CatalogError>;
}

/// Sort entries ascending by case-folded title.
///
/// The sort is stable so entries with equal keys keep their relative order.
pub fn sort_entries(entries: &mut [CatalogEntry]) {
    entries.sort_by_cached_key(CatalogEntry::sort_key);
}

/// Replace the entry whose title matches `entry.title` (ignoring case),
/// or append it if there is none.
///
/// Returns `true` when an existing entry was replaced.
pub fn upsert_by_title(entries: &mut Vec<CatalogEntry>, entry: CatalogEntry) -> bool {
    match entries.iter_mut().find(|e| e.title_matches(&entry.title)) {
        Some(existing) => {
            *existing = entry;
            true
        }
        None => {
            entries.push(entry);
            false
        }
    }
}

/// Remove the first entry whose title matches `title` (ignoring case).
pub fn remove_by_title(
    entries: &mut Vec<CatalogEntry>,
    title: &str,
) -> Result<CatalogEntry, CatalogError> {
    let position = entries
        .iter()
        .position(|e| e.title_matches(title))
        .ok_or_else(|| CatalogError::EntryNotFound(title.trim().to_string()))?;
    Ok(entries.remove(position))
}

/// Find an entry by title, ignoring case.
pub fn find_by_title<'a>(entries: &'a [CatalogEntry], title: &str) -> Option<&'a CatalogEntry> {
    let wanted = fold(title);
    entries.iter().find(|e| e.sort_key() == wanted)
}

/// Whether `entries` is ordered by case-folded title.
pub fn is_sorted(entries: &[CatalogEntry]) -> bool {
    entries
        .windows(2)
        .all(|pair| pair[0].sort_key() <= pair[1].sort_key())
}
