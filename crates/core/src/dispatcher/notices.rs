//! Operator-facing notice texts.

use crate::catalog::CatalogEntry;
use crate::events::{Button, Prompt};
use crate::search::short_description;
use crate::wizard::CatalogChange;

pub fn welcome() -> Prompt {
    Prompt::text(
        "Привет! 👋\nЯ помогу найти аниме из каталога канала.\nНажми кнопку ниже и начни вводить название.",
    )
    .with_buttons(vec![vec![Button::search("🔍 Поиск аниме")]])
}

pub fn add_refused() -> Prompt {
    Prompt::text("⛔ Только админ может добавлять аниме.")
}

pub fn edit_refused() -> Prompt {
    Prompt::text("⛔ Только админ может редактировать аниме.")
}

pub fn delete_usage() -> Prompt {
    Prompt::text("Используй: /delete <название аниме>")
}

pub fn cancelled() -> Prompt {
    Prompt::text("Действие отменено.")
}

pub fn nothing_to_cancel() -> Prompt {
    Prompt::text("Нет активного действия.")
}

pub fn storage_failure(action: &str, err: &dyn std::fmt::Display) -> String {
    format!("⚠️ Не удалось {}: {}", action, err)
}

/// Notice sent after a feed post was stored.
pub fn ingested(entry: &CatalogEntry, replaced: bool) -> String {
    let head = if replaced {
        "♻️ Обновлено из канала"
    } else {
        "📥 Добавлено из канала"
    };
    format!(
        "{}: {}\n{}\n{}",
        head,
        entry.title,
        short_description(entry),
        entry.link
    )
}

/// Notice sent after a wizard or command change.
pub fn change(change: &CatalogChange) -> String {
    match change {
        CatalogChange::Added(entry) => format!("✅ Добавлено: {}", entry.title),
        CatalogChange::Replaced(entry) => format!("♻️ Перезаписано: {}", entry.title),
        CatalogChange::Updated { entry, field } => {
            format!("✏️ {}: изменено поле «{}»", entry.title, field.label())
        }
        CatalogChange::Deleted(entry) => format!("🗑 Удалено: {}", entry.title),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::EditableField;

    #[test]
    fn test_ingested_notice() {
        let mut entry = CatalogEntry::new("Берсерк");
        entry.link = "https://t.me/anihub/5".to_string();
        entry.years = vec![1997];
        let text = ingested(&entry, false);
        assert_eq!(
            text,
            "📥 Добавлено из канала: Берсерк\n1997 | —\nhttps://t.me/anihub/5"
        );
        assert!(ingested(&entry, true).starts_with("♻️"));
    }

    #[test]
    fn test_change_notice() {
        let entry = CatalogEntry::new("Naruto");
        let text = change(&CatalogChange::Updated {
            entry,
            field: EditableField::Genre,
        });
        assert_eq!(text, "✏️ Naruto: изменено поле «Жанр»");
    }
}
