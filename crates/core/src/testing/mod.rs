//! Testing utilities: a recording notifier and fixtures.
//!
//! Used by unit tests here and by the server's integration tests.

mod mock_notifier;

pub use mock_notifier::{RecordedNotification, RecordingNotifier};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::CatalogEntry;
    use crate::config::{load_config_from_str, Config};
    use crate::extractor::FeedPost;

    /// Operator id used by [`config`].
    pub const OPERATOR_ID: i64 = 1001;
    /// Feed channel used by [`config`].
    pub const CHANNEL_ID: i64 = -1001234567890;
    pub const CHANNEL_USERNAME: &str = "anihub";

    /// A post carrying every extractable field.
    pub const SAMPLE_POST: &str = "🔥 НОВИНКА 🔥
Магическая битва
📖 Юдзи Итадори вступает в тайный мир магов.
Сражения с проклятиями продолжаются.
🎙 Озвучка:
#AniLibria #JAM #Anidub
🎭 Жанры:
#сёнэн #фэнтези
2 сезон 12/24 ⭐️8.5 #2023";

    /// Minimal valid configuration for the fixture operator and channel.
    pub fn config() -> Config {
        let toml = format!(
            r#"
[operator]
id = {OPERATOR_ID}

[feed]
channel_id = {CHANNEL_ID}
channel_username = "{CHANNEL_USERNAME}"
"#
        );
        // The literal above always parses.
        load_config_from_str(&toml).unwrap_or_else(|e| panic!("fixture config: {e}"))
    }

    /// A post on the fixture channel.
    pub fn feed_post(message_id: i64, text: &str) -> FeedPost {
        FeedPost {
            channel_id: CHANNEL_ID,
            channel_username: Some(CHANNEL_USERNAME.to_string()),
            message_id,
            text: Some(text.to_string()),
            caption: None,
        }
    }

    /// Entry with a title, link, one genre and one year.
    pub fn entry(title: &str, year: u32, genre: &str) -> CatalogEntry {
        let mut entry = CatalogEntry::new(title);
        entry.link = format!("https://t.me/{}/{}", CHANNEL_USERNAME, year);
        entry.genres = vec![genre.to_string()];
        entry.years = vec![year];
        entry
    }
}
