//! Types for the anime catalog.

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// One media item in the catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Title, unique within the catalog (case-insensitive).
    #[serde(deserialize_with = "de::string_or_null")]
    pub title: String,
    /// Link to the source post or content.
    #[serde(default, deserialize_with = "de::string_or_null")]
    pub link: String,
    /// Free-text description, possibly empty.
    #[serde(default, deserialize_with = "de::string_or_null")]
    pub description: String,
    /// Genre tags.
    #[serde(default, alias = "genre", deserialize_with = "de::string_list")]
    pub genres: Vec<String>,
    /// Voice actors / dubbing team tags.
    #[serde(default, alias = "voice", deserialize_with = "de::string_list")]
    pub voice_cast: Vec<String>,
    /// Season numbers in order of appearance.
    #[serde(default, alias = "season", deserialize_with = "de::number_list")]
    pub seasons: Vec<u32>,
    /// Released episode counts, one per "current/total" match.
    #[serde(default, alias = "episodes", deserialize_with = "de::number_list")]
    pub episode_counts: Vec<u32>,
    /// Four-digit air years.
    #[serde(default, alias = "year", deserialize_with = "de::number_list")]
    pub years: Vec<u32>,
    /// Ratings.
    #[serde(default, alias = "rating", deserialize_with = "de::number_list")]
    pub ratings: Vec<f64>,
}

impl CatalogEntry {
    /// Create an entry with only a title set.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Case-folded title used for ordering and lookups.
    pub fn sort_key(&self) -> String {
        fold(&self.title)
    }

    /// Whether this entry's title equals `title`, ignoring case.
    pub fn title_matches(&self, title: &str) -> bool {
        fold(&self.title) == fold(title)
    }
}

/// Case-fold a title for comparison.
pub(crate) fn fold(title: &str) -> String {
    title.trim().to_lowercase()
}

/// Opaque stamp of the durable catalog copy.
///
/// `None` means no durable copy exists yet.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StoreVersion(pub Option<String>);

impl StoreVersion {
    pub fn absent() -> Self {
        Self(None)
    }

    pub fn of(stamp: impl Into<String>) -> Self {
        Self(Some(stamp.into()))
    }
}

/// Errors for catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog storage is corrupt: {0}")]
    StorageCorrupt(String),

    #[error("Catalog storage is not writable: {0}")]
    StorageUnwritable(String),

    #[error("Catalog changed on disk since it was loaded")]
    StorageConflict,

    #[error("Entry not found: {0}")]
    EntryNotFound(String),
}

/// Deserializers accepting the single-valued shapes older catalog files used.
mod de {
    use super::*;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany<T> {
        Many(Vec<T>),
        One(T),
    }

    pub fn string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
    }

    /// A list of strings, a single comma-separated string, or null.
    pub fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<OneOrMany<String>>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(OneOrMany::Many(items)) => items,
            Some(OneOrMany::One(joined)) => joined
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(String::from)
                .collect(),
        })
    }

    /// A list of numbers, a single number, or null.
    pub fn number_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        Ok(match Option::<OneOrMany<T>>::deserialize(deserializer)? {
            None => Vec::new(),
            Some(OneOrMany::Many(items)) => items,
            Some(OneOrMany::One(item)) => vec![item],
        })
    }
}
