//! Feed-post extraction - turns channel posts into catalog entries.
//!
//! Posts follow a loose emoji-delimited layout:
//!
//! ```text
//! 🔥 НОВИНКА 🔥                 <- headline banner, never a title
//! 🎬 Магическая битва           <- title (first other non-empty line)
//! 📖 Описание ...               <- description runs up to the cast marker
//! 🎙 Озвучка:
//! #AniLibria, #JAM              <- cast tags on the following line
//! 🎭 Жанры:
//! #сёнэн #фэнтези               <- genre tags on the following line
//! 2 сезон 12/24 ⭐️8.5 #2023     <- season line: season, episodes, rating, year
//! ```
//!
//! Posts without any marker are channel chatter and are skipped.

mod config;
mod parser;
mod types;

pub use config::ExtractorConfig;
pub use parser::{post_link, FieldExtractor};
pub use types::{ExtractedPost, ExtractorError, FeedPost, SeasonLine};
