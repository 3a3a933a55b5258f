//! Marker-driven field extraction.
//!
//! Each field is a separate best-effort scan over the post. A missing
//! pattern leaves its field empty; nothing here fails on malformed text.

use once_cell::sync::Lazy;
use regex_lite::Regex;

use super::{ExtractedPost, ExtractorConfig, ExtractorError, FeedPost, SeasonLine};

/// "current/total" episode counter.
static FRACTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+)\s*/\s*(\d+)").unwrap());

/// Extracts catalog fields from channel posts.
pub struct FieldExtractor {
    config: ExtractorConfig,
    /// Lowercased season token.
    season_token: String,
    season: Regex,
    rating: Regex,
    year: Regex,
}

impl FieldExtractor {
    pub fn new(config: ExtractorConfig) -> Result<Self, ExtractorError> {
        if let Some(name) = config.first_empty_marker() {
            return Err(ExtractorError::InvalidPattern(format!("{} is empty", name)));
        }

        let season_token = config.season_token.trim().to_lowercase();
        let season = compile(&format!(r"(\d+)\s*{}", regex_lite::escape(&season_token)))?;
        let rating = compile(&format!(
            r"{}\D{{0,2}}(\d+(?:[.,]\d+)?)",
            regex_lite::escape(&config.rating_marker.to_lowercase())
        ))?;
        let year = compile(&format!(
            r"{}(\d{{4}})\b",
            regex_lite::escape(&config.tag_prefix.to_lowercase())
        ))?;

        Ok(Self {
            config,
            season_token,
            season,
            rating,
            year,
        })
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Whether `text` carries any catalog marker at all.
    pub fn passes_gate(&self, text: &str) -> bool {
        text.contains(&self.config.description_marker)
            || text.contains(&self.config.cast_marker)
            || text.contains(&self.config.genre_marker)
            || text.to_lowercase().contains(&self.season_token)
    }

    /// Extract a post into a partial record.
    ///
    /// Returns `None` when the post has no content or fails the gate.
    pub fn extract_post(
        &self,
        post: &FeedPost,
        fallback_username: Option<&str>,
    ) -> Option<ExtractedPost> {
        let text = post.content()?;
        if !self.passes_gate(text) {
            return None;
        }

        let username = post.channel_username.as_deref().or(fallback_username);
        let mut extracted = self.extract(text);
        extracted.link = Some(post_link(username, post.channel_id, post.message_id));
        Some(extracted)
    }

    /// Run every field scan over `text`. Does not apply the gate.
    pub fn extract(&self, text: &str) -> ExtractedPost {
        ExtractedPost {
            title: self.title(text),
            link: None,
            description: self.description(text),
            voice_cast: self.tags_after(text, &self.config.cast_marker),
            genres: self.tags_after(text, &self.config.genre_marker),
            season_lines: self.season_lines(text),
        }
    }

    fn title(&self, text: &str) -> Option<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.contains(&self.config.headline_marker))
            .map(clean_title)
            .find(|title| !title.is_empty())
    }

    fn description(&self, text: &str) -> Option<String> {
        let marker = &self.config.description_marker;
        let rest = &text[text.find(marker.as_str())? + marker.len()..];
        let end = rest.find(&self.config.cast_marker)?;
        Some(rest[..end].trim().to_string())
    }

    /// Tags on the line right after the first line containing `marker`.
    fn tags_after(&self, text: &str, marker: &str) -> Option<Vec<String>> {
        let mut lines = text.lines();
        lines.by_ref().find(|line| line.contains(marker))?;

        let prefix = self.config.tag_prefix.as_str();
        let tags = lines
            .next()
            .unwrap_or_default()
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter_map(|token| token.strip_prefix(prefix))
            .filter(|tag| !tag.is_empty())
            .map(String::from)
            .collect();
        Some(tags)
    }

    fn season_lines(&self, text: &str) -> Vec<SeasonLine> {
        text.lines()
            .map(str::to_lowercase)
            .filter(|line| line.contains(&self.season_token))
            .map(|line| self.season_line(&line))
            .collect()
    }

    /// `line` is already lowercased, as are the patterns' markers.
    fn season_line(&self, line: &str) -> SeasonLine {
        let fraction = FRACTION.captures(line);
        SeasonLine {
            season: capture_number(&self.season, line),
            episodes: fraction
                .as_ref()
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().parse().ok()),
            total_episodes: fraction
                .as_ref()
                .and_then(|c| c.get(2))
                .and_then(|m| m.as_str().parse().ok()),
            rating: self
                .rating
                .captures(line)
                .and_then(|c| c.get(1))
                .and_then(|m| m.as_str().replace(',', ".").parse().ok()),
            year: capture_number(&self.year, line),
        }
    }
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new(ExtractorConfig::default()).expect("default markers are valid")
    }
}

fn compile(pattern: &str) -> Result<Regex, ExtractorError> {
    Regex::new(pattern).map_err(|e| ExtractorError::InvalidPattern(e.to_string()))
}

fn capture_number(re: &Regex, line: &str) -> Option<u32> {
    re.captures(line)?.get(1)?.as_str().parse().ok()
}

/// Keep word characters, whitespace and `. , ! ? -`; collapse whitespace.
fn clean_title(line: &str) -> String {
    let kept: String = line
        .chars()
        .filter(|&c| {
            c.is_alphanumeric()
                || c == '_'
                || c.is_whitespace()
                || matches!(c, '.' | ',' | '!' | '?' | '-')
        })
        .collect();
    kept.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Link to a channel post.
///
/// Public channels link by username; private ones through the `/c/` form
/// built from the channel id without its `-100` prefix.
pub fn post_link(username: Option<&str>, channel_id: i64, message_id: i64) -> String {
    match username.map(|u| u.trim().trim_start_matches('@')).filter(|u| !u.is_empty()) {
        Some(username) => format!("https://t.me/{}/{}", username, message_id),
        None => {
            let id = channel_id.to_string();
            let internal = id.strip_prefix("-100").unwrap_or(id.trim_start_matches('-'));
            format!("https://t.me/c/{}/{}", internal, message_id)
        }
    }
}
