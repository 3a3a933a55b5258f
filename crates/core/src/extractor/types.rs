//! Types for feed-post extraction.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::catalog::CatalogEntry;

/// A post published on the source channel.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeedPost {
    /// Originating channel id.
    pub channel_id: i64,
    /// Public username of the channel, if it has one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel_username: Option<String>,
    /// Post sequence number within the channel.
    pub message_id: i64,
    /// Post body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    /// Caption of an attached photo or video.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
}

impl FeedPost {
    /// Body text, falling back to the caption. Blank text counts as absent.
    pub fn content(&self) -> Option<&str> {
        let present = |s: &&str| !s.trim().is_empty();
        self.text
            .as_deref()
            .filter(present)
            .or_else(|| self.caption.as_deref().filter(present))
    }
}

/// Numbers found on one season line, kept together.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeasonLine {
    pub season: Option<u32>,
    pub episodes: Option<u32>,
    pub total_episodes: Option<u32>,
    pub rating: Option<f64>,
    pub year: Option<u32>,
}

/// Fields recovered from a post. Every field is independently present or
/// absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedPost {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub voice_cast: Option<Vec<String>>,
    pub genres: Option<Vec<String>>,
    pub season_lines: Vec<SeasonLine>,
}

impl ExtractedPost {
    /// Build a catalog entry, using `untitled` when no title was found.
    ///
    /// The numeric lists are flattened from the season lines, each one
    /// keeping only the lines where its own pattern matched.
    pub fn into_entry(self, untitled: &str) -> CatalogEntry {
        let lines = &self.season_lines;
        CatalogEntry {
            title: self.title.unwrap_or_else(|| untitled.to_string()),
            link: self.link.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            genres: self.genres.unwrap_or_default(),
            voice_cast: self.voice_cast.unwrap_or_default(),
            seasons: lines.iter().filter_map(|l| l.season).collect(),
            episode_counts: lines.iter().filter_map(|l| l.episodes).collect(),
            years: lines.iter().filter_map(|l| l.year).collect(),
            ratings: lines.iter().filter_map(|l| l.rating).collect(),
        }
    }
}

/// Errors building an extractor from configuration.
#[derive(Debug, Error)]
pub enum ExtractorError {
    #[error("Invalid extractor pattern: {0}")]
    InvalidPattern(String),
}
