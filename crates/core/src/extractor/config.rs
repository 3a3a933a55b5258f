//! Marker configuration for feed-post extraction.

use serde::{Deserialize, Serialize};

/// Markers the channel uses to delimit fields in a post.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ExtractorConfig {
    /// Lines containing this glyph are banners, never titles.
    #[serde(default = "default_headline_marker")]
    pub headline_marker: String,
    /// Starts the description block.
    #[serde(default = "default_description_marker")]
    pub description_marker: String,
    /// Ends the description block; the next line lists the voice cast.
    #[serde(default = "default_cast_marker")]
    pub cast_marker: String,
    /// The next line lists genre tags.
    #[serde(default = "default_genre_marker")]
    pub genre_marker: String,
    /// Word marking season lines (matched case-insensitively).
    #[serde(default = "default_season_token")]
    pub season_token: String,
    /// Precedes the rating on a season line.
    #[serde(default = "default_rating_marker")]
    pub rating_marker: String,
    /// Prefix of cast, genre and year tags.
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,
    /// Title used when no title line is found.
    #[serde(default = "default_untitled")]
    pub untitled: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            headline_marker: default_headline_marker(),
            description_marker: default_description_marker(),
            cast_marker: default_cast_marker(),
            genre_marker: default_genre_marker(),
            season_token: default_season_token(),
            rating_marker: default_rating_marker(),
            tag_prefix: default_tag_prefix(),
            untitled: default_untitled(),
        }
    }
}

impl ExtractorConfig {
    /// Name of the first marker that is empty, if any.
    pub fn first_empty_marker(&self) -> Option<&'static str> {
        [
            ("headline_marker", &self.headline_marker),
            ("description_marker", &self.description_marker),
            ("cast_marker", &self.cast_marker),
            ("genre_marker", &self.genre_marker),
            ("season_token", &self.season_token),
            ("rating_marker", &self.rating_marker),
            ("tag_prefix", &self.tag_prefix),
            ("untitled", &self.untitled),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }
}

fn default_headline_marker() -> String {
    "🔥".to_string()
}

fn default_description_marker() -> String {
    "📖".to_string()
}

fn default_cast_marker() -> String {
    "🎙".to_string()
}

fn default_genre_marker() -> String {
    "🎭".to_string()
}

fn default_season_token() -> String {
    "сезон".to_string()
}

fn default_rating_marker() -> String {
    "⭐".to_string()
}

fn default_tag_prefix() -> String {
    "#".to_string()
}

fn default_untitled() -> String {
    "Без названия".to_string()
}
