//! JSON file backed catalog store.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};

use super::{CatalogEntry, CatalogError, CatalogStore, StoreVersion};

/// Catalog stored as one pretty-printed JSON array.
///
/// Saves write a sibling temp file and rename it over the target, so readers
/// never observe a half-written document.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read raw bytes, `None` if the file does not exist.
    fn read_bytes(&self) -> Result<Option<Vec<u8>>, CatalogError> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(CatalogError::StorageCorrupt(format!(
                "failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "catalog".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_atomic(&self, bytes: &[u8]) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.temp_path();
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, &self.path)
    }
}

fn stamp(bytes: &[u8]) -> StoreVersion {
    StoreVersion::of(format!("{:x}", Sha256::digest(bytes)))
}

impl CatalogStore for JsonFileStore {
    fn load(&self) -> Result<Vec<CatalogEntry>, CatalogError> {
        let Some(bytes) = self.read_bytes()? else {
            return Ok(Vec::new());
        };

        serde_json::from_slice(&bytes).map_err(|e| {
            CatalogError::StorageCorrupt(format!("{}: {}", self.path.display(), e))
        })
    }

    fn save(&self, entries: &[CatalogEntry]) -> Result<(), CatalogError> {
        let bytes = serde_json::to_vec_pretty(entries)
            .map_err(|e| CatalogError::StorageUnwritable(e.to_string()))?;

        self.write_atomic(&bytes).map_err(|e| {
            CatalogError::StorageUnwritable(format!("{}: {}", self.path.display(), e))
        })?;

        tracing::debug!(
            path = %self.path.display(),
            entries = entries.len(),
            "Catalog written"
        );
        Ok(())
    }

    fn version(&self) -> Result<StoreVersion, CatalogError> {
        Ok(match self.read_bytes()? {
            Some(bytes) => stamp(&bytes),
            None => StoreVersion::absent(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn sample(title: &str) -> CatalogEntry {
        CatalogEntry {
            title: title.to_string(),
            link: format!("https://t.me/anihub/{}", title.len()),
            description: "Описание".to_string(),
            genres: vec!["Сёнэн".to_string()],
            voice_cast: vec!["AniDub".to_string(), "JAM".to_string()],
            seasons: vec![1, 2],
            episode_counts: vec![12],
            years: vec![2019],
            ratings: vec![8.7],
        }
    }

    #[test]
    fn test_legacy_document_with_null_title_loads() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("anime_list.json");
        fs::write(
            &path,
            r#"[{"title": "Ok"}, {"title": null, "link": null, "year": 2001, "season": null}]"#,
        )
        .unwrap();

        let entries = JsonFileStore::new(&path).load().unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "Ok");
        assert_eq!(entries[1].title, "");
        assert_eq!(entries[1].years, vec![2001]);
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("anime_list.json"));

        assert!(store.load().unwrap().is_empty());
        assert_eq!(store.version().unwrap(), StoreVersion::absent());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("anime_list.json"));
        let entries = vec![sample("Akira"), sample("Берсерк")];

        store.save(&entries).unwrap();
        assert_eq!(store.load().unwrap(), entries);
    }

    #[test]
    fn test_save_creates_parent_dirs_and_leaves_no_temp() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data").join("anime_list.json");
        let store = JsonFileStore::new(&path);

        store.save(&[sample("Akira")]).unwrap();

        assert!(path.exists());
        assert!(!dir.path().join("data").join("anime_list.json.tmp").exists());
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("anime_list.json");
        fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(CatalogError::StorageCorrupt(_))));
        // The corrupt document is left in place.
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }

    #[test]
    fn test_wrong_shape_is_corrupt() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("anime_list.json");
        fs::write(&path, r#"{"title": "not an array"}"#).unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(CatalogError::StorageCorrupt(_))));
    }

    #[test]
    fn test_version_changes_with_content() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("anime_list.json"));

        store.save(&[sample("Akira")]).unwrap();
        let first = store.version().unwrap();
        assert!(first.0.is_some());
        assert_eq!(store.version().unwrap(), first);

        store.save(&[sample("Akira"), sample("Monster")]).unwrap();
        assert_ne!(store.version().unwrap(), first);
    }

    #[test]
    fn test_unwritable_path() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file, not a directory").unwrap();

        let store = JsonFileStore::new(blocker.join("anime_list.json"));
        assert!(matches!(
            store.save(&[sample("Akira")]),
            Err(CatalogError::StorageUnwritable(_))
        ));
    }

    #[test]
    fn test_loads_legacy_document() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("anime_list.json");
        fs::write(
            &path,
            r#"[
  {
    "title": "Ванпанчмен",
    "link": "https://t.me/anihub/5",
    "season": null,
    "genre": "Комедия",
    "year": 2015,
    "episodes": 12,
    "description": "Сайтама"
  }
]"#,
        )
        .unwrap();

        let entries = JsonFileStore::new(&path).load().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].genres, vec!["Комедия"]);
        assert_eq!(entries[0].episode_counts, vec![12]);
        assert!(entries[0].seasons.is_empty());
    }
}
