//! Title search for the inline search front end.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::catalog::{fold, CatalogEntry};
use crate::metrics::SEARCH_REQUESTS;

/// Id of the "nothing found" placeholder.
pub const NOT_FOUND_ID: &str = "not_found";

/// One search hit, ready to be shown as an inline result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Stable per-title id.
    pub id: String,
    pub title: String,
    /// Short line under the title: years and genres.
    pub description: String,
    /// Message sent when the result is picked.
    pub card_text: String,
}

impl SearchResult {
    fn for_entry(entry: &CatalogEntry) -> Self {
        Self {
            id: result_id(&entry.title),
            title: entry.title.clone(),
            description: short_description(entry),
            card_text: card_text(entry),
        }
    }

    fn not_found() -> Self {
        Self {
            id: NOT_FOUND_ID.to_string(),
            title: "❌ Ничего не найдено".to_string(),
            description: "Попробуйте другой запрос".to_string(),
            card_text: "❌ Ничего не найдено".to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.id == NOT_FOUND_ID
    }
}

/// Case-insensitive substring search over titles, in catalog order.
///
/// A blank query yields nothing. A query with no hits yields a single
/// placeholder result.
pub fn search(entries: &[CatalogEntry], query: &str, max_results: usize) -> Vec<SearchResult> {
    let needle = fold(query);
    if needle.is_empty() {
        SEARCH_REQUESTS.with_label_values(&["empty_query"]).inc();
        return Vec::new();
    }

    let results: Vec<SearchResult> = entries
        .iter()
        .filter(|e| e.title.to_lowercase().contains(&needle))
        .take(max_results)
        .map(SearchResult::for_entry)
        .collect();

    if results.is_empty() {
        SEARCH_REQUESTS.with_label_values(&["miss"]).inc();
        vec![SearchResult::not_found()]
    } else {
        SEARCH_REQUESTS.with_label_values(&["hits"]).inc();
        results
    }
}

/// `"{years} | {genres}"`, with a dash for a missing part.
pub fn short_description(entry: &CatalogEntry) -> String {
    let years = entry
        .years
        .iter()
        .map(u32::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    let genres = entry.genres.join(", ");
    format!("{} | {}", or_dash(years), or_dash(genres))
}

/// Card posted into the chat for a picked result.
pub fn card_text(entry: &CatalogEntry) -> String {
    format!("🎬 {}\n👉 Ссылка: {}", entry.title, entry.link)
}

fn or_dash(value: String) -> String {
    if value.is_empty() {
        "—".to_string()
    } else {
        value
    }
}

fn result_id(title: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(fold(title).as_bytes()));
    digest[..32].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(title: &str, link: &str) -> CatalogEntry {
        let mut entry = CatalogEntry::new(title);
        entry.link = link.to_string();
        entry
    }

    fn catalog() -> Vec<CatalogEntry> {
        let mut berserk = entry("Берсерк", "https://t.me/anihub/3");
        berserk.years = vec![1997, 2016];
        berserk.genres = vec!["Фэнтези".to_string(), "Драма".to_string()];
        vec![
            berserk,
            entry("Naruto", "https://t.me/anihub/1"),
            entry("Naruto Shippuden", "https://t.me/anihub/2"),
        ]
    }

    #[test]
    fn test_unique_substring() {
        let results = search(&catalog(), "серк", 50);
        assert_eq!(results.len(), 1);
        let hit = &results[0];
        assert_eq!(hit.title, "Берсерк");
        assert!(hit.card_text.contains("Берсерк"));
        assert!(hit.card_text.contains("https://t.me/anihub/3"));
        assert_eq!(hit.description, "1997, 2016 | Фэнтези, Драма");
    }

    #[test]
    fn test_case_insensitive_in_store_order() {
        let results = search(&catalog(), "  NARUTO ", 50);
        let titles: Vec<_> = results.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Naruto", "Naruto Shippuden"]);
    }

    #[test]
    fn test_results_are_capped() {
        let results = search(&catalog(), "naruto", 1);
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].title, "Naruto");
    }

    #[test]
    fn test_no_match_returns_placeholder() {
        let results = search(&catalog(), "bleach", 50);
        assert_eq!(results.len(), 1);
        assert!(results[0].is_placeholder());
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        assert!(search(&catalog(), "", 50).is_empty());
        assert!(search(&catalog(), "   ", 50).is_empty());
    }

    #[test]
    fn test_only_title_is_matched() {
        let results = search(&catalog(), "фэнтези", 50);
        assert!(results[0].is_placeholder());
    }

    #[test]
    fn test_short_description_dashes() {
        assert_eq!(short_description(&entry("X", "")), "— | —");
    }

    #[test]
    fn test_ids_are_stable_and_distinct() {
        let a = search(&catalog(), "naruto", 50);
        let b = search(&catalog(), "naruto", 50);
        assert_eq!(a[0].id, b[0].id);
        assert_ne!(a[0].id, a[1].id);
        assert_eq!(a[0].id.len(), 32);
    }
}
