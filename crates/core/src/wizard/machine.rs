//! Turn-by-turn add and edit flows.
//!
//! Each call consumes the operator's session and returns a [`Step`]: the
//! session to keep (if the flow goes on), the reply, and the catalog change
//! committed during the turn, if any.

use std::sync::Arc;

use tracing::{info, warn};

use super::field::{optional_number, split_strings, EditableField};
use super::types::{
    AddStep, CatalogChange, EditStep, WizardError, WizardMode, WizardSession, WizardState,
};
use crate::catalog::{Catalog, CatalogEntry, CatalogError};
use crate::events::{Button, Prompt};
use crate::metrics::WIZARD_TRANSITIONS;

/// Menu data for the delete action.
pub const DELETE_CHOICE: &str = "delete";
/// Menu data for the cancel action.
pub const CANCEL_CHOICE: &str = "cancel";

/// Outcome of one wizard turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    /// Session to keep for the next turn; `None` ends the flow.
    pub session: Option<WizardSession>,
    pub reply: Prompt,
    pub change: Option<CatalogChange>,
}

impl Step {
    fn stay(session: WizardSession, reply: Prompt) -> Self {
        Self {
            session: Some(session),
            reply,
            change: None,
        }
    }

    fn end(reply: Prompt) -> Self {
        Self {
            session: None,
            reply,
            change: None,
        }
    }

    fn with_change(mut self, change: CatalogChange) -> Self {
        self.change = Some(change);
        self
    }
}

/// Drives wizard sessions against the catalog.
pub struct Wizard {
    catalog: Arc<Catalog>,
}

impl Wizard {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    /// Open an add session.
    pub fn start_add(&self) -> Step {
        record(WizardMode::Add, "started");
        Step::stay(WizardSession::add(), Prompt::text("Введите название аниме:"))
    }

    /// Open an edit session, jumping to the menu when the title is given.
    pub fn start_edit(&self, title: Option<&str>) -> Step {
        record(WizardMode::Edit, "started");
        match title.map(str::trim).filter(|t| !t.is_empty()) {
            Some(title) => self.select_target(title),
            None => Step::stay(
                WizardSession::edit(),
                Prompt::text("Введите название аниме, которое нужно отредактировать:"),
            ),
        }
    }

    /// Feed one operator message into the session.
    pub fn advance(&self, session: WizardSession, input: &str) -> Step {
        match session.state {
            WizardState::Add(step) => self.advance_add(session, step, input),
            WizardState::Edit(EditStep::SelectTarget) => self.select_target(input.trim()),
            WizardState::Edit(EditStep::ChooseField) => self.choose(session, input),
            WizardState::Edit(EditStep::AwaitValue(field)) => {
                self.apply_value(session, field, input)
            }
        }
    }

    // ------------------------------------------------------------------
    // Add flow
    // ------------------------------------------------------------------

    fn advance_add(&self, mut session: WizardSession, step: AddStep, input: &str) -> Step {
        let draft = &mut session.draft;
        let (next, prompt) = match step {
            AddStep::Title => {
                let title = input.trim();
                if title.is_empty() {
                    record(WizardMode::Add, "invalid");
                    return Step::stay(
                        session,
                        Prompt::text("Название не может быть пустым. Введите название аниме:"),
                    );
                }
                draft.title = title.to_string();
                (AddStep::Link, "Введите ссылку на аниме:")
            }
            AddStep::Link => {
                draft.link = input.trim().to_string();
                (
                    AddStep::Season,
                    "Введите сезон (числом, если нет, оставьте пустым):",
                )
            }
            AddStep::Season => {
                draft.seasons = optional_number(input).into_iter().collect();
                (AddStep::Genre, "Введите жанр:")
            }
            AddStep::Genre => {
                draft.genres = split_strings(input);
                (AddStep::Year, "Введите год выпуска:")
            }
            AddStep::Year => {
                draft.years = optional_number(input).into_iter().collect();
                (
                    AddStep::Episodes,
                    "Введите количество серий (если неизвестно, оставьте пустым):",
                )
            }
            AddStep::Episodes => {
                draft.episode_counts = optional_number(input).into_iter().collect();
                (AddStep::Description, "Введите описание аниме:")
            }
            AddStep::Description => {
                draft.description = input.to_string();
                return self.commit_add(session);
            }
        };
        record(WizardMode::Add, "advanced");
        Step::stay(session.at(WizardState::Add(next)), Prompt::text(prompt))
    }

    fn commit_add(&self, session: WizardSession) -> Step {
        let entry = session.draft.clone();
        match self.catalog.upsert(entry.clone()) {
            Ok(replaced) => {
                record(WizardMode::Add, "committed");
                info!(title = %entry.title, replaced, "Catalog entry added");
                let reply = Prompt::text(format!(
                    "✅ Аниме «{}» успешно добавлено!",
                    entry.title
                ));
                let change = if replaced {
                    CatalogChange::Replaced(entry)
                } else {
                    CatalogChange::Added(entry)
                };
                Step::end(reply).with_change(change)
            }
            Err(e) => {
                record(WizardMode::Add, "failed");
                warn!(title = %entry.title, error = %e, "Failed to save new catalog entry");
                Step::stay(
                    session,
                    Prompt::text(format!(
                        "⚠️ Не удалось сохранить: {}. Отправьте описание ещё раз, чтобы повторить.",
                        e
                    )),
                )
            }
        }
    }

    // ------------------------------------------------------------------
    // Edit flow
    // ------------------------------------------------------------------

    fn select_target(&self, title: &str) -> Step {
        match self.catalog.find(title) {
            Ok(Some(entry)) => {
                record(WizardMode::Edit, "advanced");
                let menu = edit_menu(&entry, None);
                Step::stay(WizardSession::editing(entry), menu)
            }
            Ok(None) => {
                record(WizardMode::Edit, "not_found");
                Step::end(not_found(title))
            }
            Err(e) => {
                record(WizardMode::Edit, "failed");
                warn!(title, error = %e, "Failed to load catalog for edit");
                Step::end(Prompt::text(format!("⚠️ Не удалось открыть каталог: {}", e)))
            }
        }
    }

    fn choose(&self, session: WizardSession, input: &str) -> Step {
        let choice = input.trim().to_lowercase();
        if choice == DELETE_CHOICE || choice == "удалить" {
            return self.delete(session);
        }
        if choice == CANCEL_CHOICE || choice == "отмена" {
            record(WizardMode::Edit, "cancelled");
            return Step::end(Prompt::text("Редактирование завершено."));
        }
        match EditableField::from_choice(&choice) {
            Some(field) => {
                record(WizardMode::Edit, "advanced");
                let prompt = value_prompt(field, &session.draft);
                Step::stay(session.at(WizardState::Edit(EditStep::AwaitValue(field))), prompt)
            }
            None => {
                record(WizardMode::Edit, "invalid");
                let menu = edit_menu(&session.draft, Some("Выберите поле из списка."));
                Step::stay(session, menu)
            }
        }
    }

    fn apply_value(&self, session: WizardSession, field: EditableField, input: &str) -> Step {
        let value = match field.parse(input) {
            Ok(value) => value,
            Err(e) => {
                record(WizardMode::Edit, "invalid");
                return Step::stay(session, invalid_value_prompt(field, &e));
            }
        };

        let title = session
            .target_title
            .clone()
            .unwrap_or_else(|| session.draft.title.clone());

        // The draft may be stale; edit the stored entry.
        let saved = self.catalog.mutate(|entries| {
            let entry = entries
                .iter_mut()
                .find(|e| e.title_matches(&title))
                .ok_or_else(|| CatalogError::EntryNotFound(title.clone()))?;
            value.apply(entry);
            Ok(entry.clone())
        });

        match saved.map_err(WizardError::from) {
            Ok(updated) => {
                record(WizardMode::Edit, "committed");
                info!(title = %updated.title, field = %field, "Catalog entry updated");
                let notice = format!("✅ Поле «{}» обновлено.", field.label());
                let menu = edit_menu(&updated, Some(&notice));
                let next = WizardSession::editing(updated.clone());
                Step::stay(next, menu).with_change(CatalogChange::Updated {
                    entry: updated,
                    field,
                })
            }
            Err(WizardError::EntryNotFound(_)) => {
                record(WizardMode::Edit, "not_found");
                Step::end(not_found(&title))
            }
            Err(e) => {
                record(WizardMode::Edit, "failed");
                warn!(title = %title, field = %field, error = %e, "Failed to save edit");
                Step::stay(
                    session,
                    Prompt::text(format!(
                        "⚠️ Не удалось сохранить: {}. Отправьте значение ещё раз, чтобы повторить.",
                        e
                    )),
                )
            }
        }
    }

    fn delete(&self, session: WizardSession) -> Step {
        let title = session
            .target_title
            .clone()
            .unwrap_or_else(|| session.draft.title.clone());
        match self.catalog.remove(&title).map_err(WizardError::from) {
            Ok(entry) => {
                record(WizardMode::Edit, "deleted");
                info!(title = %entry.title, "Catalog entry deleted");
                Step::end(deleted(&entry.title)).with_change(CatalogChange::Deleted(entry))
            }
            Err(WizardError::EntryNotFound(_)) => {
                record(WizardMode::Edit, "not_found");
                Step::end(not_found(&title))
            }
            Err(e) => {
                record(WizardMode::Edit, "failed");
                warn!(title = %title, error = %e, "Failed to delete catalog entry");
                let menu = edit_menu(
                    &session.draft,
                    Some(&format!("⚠️ Не удалось удалить: {}", e)),
                );
                Step::stay(session, menu)
            }
        }
    }
}

/// Field menu for `entry`, listing current values, with an optional notice on top.
pub fn edit_menu(entry: &CatalogEntry, notice: Option<&str>) -> Prompt {
    let mut text = String::new();
    if let Some(notice) = notice {
        text.push_str(notice);
        text.push_str("\n\n");
    }
    text.push_str(&format!("✏️ Редактирование: {}\n\n", entry.title));
    for field in EditableField::ALL {
        text.push_str(&format!("{}: {}\n", field.label(), field.display(entry)));
    }
    text.push_str("\nВыберите поле для изменения:");

    let mut rows: Vec<Vec<Button>> = EditableField::ALL
        .chunks(2)
        .map(|pair| {
            pair.iter()
                .map(|f| Button::callback(f.label(), f.key()))
                .collect()
        })
        .collect();
    rows.push(vec![
        Button::callback("🗑 Удалить", DELETE_CHOICE),
        Button::callback("❌ Отмена", CANCEL_CHOICE),
    ]);

    Prompt::text(text).with_buttons(rows)
}

/// "Deleted" notice, shared with `/delete`.
pub fn deleted(title: &str) -> Prompt {
    Prompt::text(format!("🗑 Аниме «{}» удалено.", title))
}

/// "Not found" notice, shared with `/delete`.
pub fn not_found(title: &str) -> Prompt {
    Prompt::text(format!("❌ Аниме «{}» не найдено в базе.", title))
}

fn value_prompt(field: EditableField, entry: &CatalogEntry) -> Prompt {
    Prompt::text(format!(
        "Текущее значение «{}»: {}\nВведите новое значение ({}):",
        field.label(),
        field.display(entry),
        field.hint()
    ))
}

fn invalid_value_prompt(field: EditableField, err: &WizardError) -> Prompt {
    let reason = match err {
        WizardError::InvalidFieldValue { reason, .. } => reason.as_str(),
        _ => "некорректное значение",
    };
    Prompt::text(format!(
        "⚠️ Не получилось разобрать значение: {}.\nВведите новое значение для «{}» ({}):",
        reason,
        field.label(),
        field.hint()
    ))
}

fn record(mode: WizardMode, outcome: &str) {
    WIZARD_TRANSITIONS
        .with_label_values(&[mode.as_str(), outcome])
        .inc();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CatalogError, InMemoryStore};

    fn wizard_with(entries: Vec<CatalogEntry>) -> (Wizard, Arc<InMemoryStore>) {
        let store = Arc::new(InMemoryStore::with_entries(entries));
        let catalog = Arc::new(Catalog::new(store.clone()));
        (Wizard::new(catalog), store)
    }

    fn stored(store: &InMemoryStore) -> Vec<CatalogEntry> {
        use crate::catalog::CatalogStore;
        store.load().unwrap()
    }

    fn naruto() -> CatalogEntry {
        let mut entry = CatalogEntry::new("Naruto");
        entry.link = "https://t.me/anihub/1".to_string();
        entry.genres = vec!["Action".to_string()];
        entry.years = vec![2002];
        entry
    }

    /// Run every input through the wizard, returning the last step.
    fn feed(wizard: &Wizard, first: Step, inputs: &[&str]) -> Step {
        let mut step = first;
        for input in inputs {
            let session = step.session.expect("session ended early");
            step = wizard.advance(session, input);
        }
        step
    }

    #[test]
    fn test_add_end_to_end() {
        let (wizard, store) = wizard_with(vec![]);
        let step = feed(
            &wizard,
            wizard.start_add(),
            &["Title X", "http://example", "1", "Action", "2020", "12", "A description"],
        );

        assert!(step.session.is_none());
        assert!(step.reply.text.contains("Title X"));
        assert!(matches!(step.change, Some(CatalogChange::Added(_))));

        let entries = stored(&store);
        assert_eq!(entries.len(), 1);
        let entry = &entries[0];
        assert_eq!(entry.title, "Title X");
        assert_eq!(entry.link, "http://example");
        assert_eq!(entry.seasons, vec![1]);
        assert_eq!(entry.genres, vec!["Action"]);
        assert_eq!(entry.years, vec![2020]);
        assert_eq!(entry.episode_counts, vec![12]);
        assert_eq!(entry.description, "A description");
    }

    #[test]
    fn test_add_non_numeric_optional_fields_are_unset() {
        let (wizard, store) = wizard_with(vec![]);
        feed(
            &wizard,
            wizard.start_add(),
            &["Title X", "http://example", "-", "Action, Drama", "скоро", "?", "Text"],
        );

        let entry = &stored(&store)[0];
        assert!(entry.seasons.is_empty());
        assert!(entry.years.is_empty());
        assert!(entry.episode_counts.is_empty());
        assert_eq!(entry.genres, vec!["Action", "Drama"]);
    }

    #[test]
    fn test_add_rejects_empty_title() {
        let (wizard, _) = wizard_with(vec![]);
        let step = feed(&wizard, wizard.start_add(), &["   "]);
        let session = step.session.unwrap();
        assert_eq!(session.state, WizardState::Add(AddStep::Title));
    }

    #[test]
    fn test_add_existing_title_replaces() {
        let (wizard, store) = wizard_with(vec![naruto()]);
        let step = feed(
            &wizard,
            wizard.start_add(),
            &["naruto", "http://new", "", "", "", "", "New"],
        );

        assert!(matches!(step.change, Some(CatalogChange::Replaced(_))));
        let entries = stored(&store);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].link, "http://new");
    }

    #[test]
    fn test_add_save_failure_keeps_session() {
        let (wizard, store) = wizard_with(vec![]);
        store.set_fail_saves(true);
        let step = feed(
            &wizard,
            wizard.start_add(),
            &["Title X", "http://example", "1", "Action", "2020", "12", "A description"],
        );

        let session = step.session.clone().unwrap();
        assert_eq!(session.state, WizardState::Add(AddStep::Description));
        assert!(step.change.is_none());

        store.set_fail_saves(false);
        let retry = wizard.advance(session, "A description");
        assert!(retry.session.is_none());
        assert_eq!(stored(&store).len(), 1);
    }

    #[test]
    fn test_edit_loop_then_cancel_keeps_saved_edit() {
        let (wizard, store) = wizard_with(vec![naruto()]);
        let step = feed(
            &wizard,
            wizard.start_edit(Some("Naruto")),
            &["genre", "Comedy, Drama"],
        );

        let session = step.session.clone().unwrap();
        assert_eq!(session.state, WizardState::Edit(EditStep::ChooseField));
        assert_eq!(session.draft.genres, vec!["Comedy", "Drama"]);
        assert!(step.reply.text.contains("Comedy, Drama"));
        assert!(matches!(
            step.change,
            Some(CatalogChange::Updated { field: EditableField::Genre, .. })
        ));
        assert_eq!(stored(&store)[0].genres, vec!["Comedy", "Drama"]);

        let cancelled = wizard.advance(session, CANCEL_CHOICE);
        assert!(cancelled.session.is_none());
        assert!(cancelled.change.is_none());
        assert_eq!(stored(&store)[0].genres, vec!["Comedy", "Drama"]);
    }

    #[test]
    fn test_edit_select_target_by_prompt() {
        let (wizard, _) = wizard_with(vec![naruto()]);
        let first = wizard.start_edit(None);
        assert_eq!(
            first.session.as_ref().unwrap().state,
            WizardState::Edit(EditStep::SelectTarget)
        );

        let step = feed(&wizard, first, &["  NARUTO "]);
        let session = step.session.unwrap();
        assert_eq!(session.target_title.as_deref(), Some("Naruto"));
        assert_eq!(step.reply.buttons.last().unwrap().len(), 2);
    }

    #[test]
    fn test_edit_unknown_target_ends_session() {
        let (wizard, _) = wizard_with(vec![naruto()]);
        let step = wizard.start_edit(Some("Bleach"));
        assert!(step.session.is_none());
        assert!(step.reply.text.contains("не найдено"));
    }

    #[test]
    fn test_edit_invalid_value_reprompts() {
        let (wizard, store) = wizard_with(vec![naruto()]);
        let step = feed(
            &wizard,
            wizard.start_edit(Some("Naruto")),
            &["year", "two thousand"],
        );

        let session = step.session.clone().unwrap();
        assert_eq!(
            session.state,
            WizardState::Edit(EditStep::AwaitValue(EditableField::Year))
        );
        assert!(step.change.is_none());
        assert_eq!(stored(&store)[0].years, vec![2002]);

        let fixed = wizard.advance(session, "2007");
        assert_eq!(stored(&store)[0].years, vec![2007]);
        assert!(fixed.change.is_some());
    }

    #[test]
    fn test_edit_unknown_choice_reshows_menu() {
        let (wizard, _) = wizard_with(vec![naruto()]);
        let step = feed(&wizard, wizard.start_edit(Some("Naruto")), &["title"]);
        let session = step.session.unwrap();
        assert_eq!(session.state, WizardState::Edit(EditStep::ChooseField));
        assert!(step.reply.text.starts_with("Выберите поле из списка."));
    }

    #[test]
    fn test_edit_choice_by_label() {
        let (wizard, _) = wizard_with(vec![naruto()]);
        let step = feed(&wizard, wizard.start_edit(Some("Naruto")), &["Рейтинг"]);
        assert_eq!(
            step.session.unwrap().state,
            WizardState::Edit(EditStep::AwaitValue(EditableField::Rating))
        );
    }

    #[test]
    fn test_edit_delete() {
        let (wizard, store) = wizard_with(vec![naruto(), CatalogEntry::new("Bleach")]);
        let step = feed(&wizard, wizard.start_edit(Some("Naruto")), &[DELETE_CHOICE]);

        assert!(step.session.is_none());
        assert!(matches!(step.change, Some(CatalogChange::Deleted(_))));
        let titles: Vec<_> = stored(&store).into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Bleach"]);
    }

    #[test]
    fn test_edit_delete_vanished_entry() {
        let (wizard, store) = wizard_with(vec![naruto()]);
        let step = wizard.start_edit(Some("Naruto"));
        store.replace_externally(vec![]);

        let step = wizard.advance(step.session.unwrap(), DELETE_CHOICE);
        assert!(step.session.is_none());
        assert!(step.change.is_none());
        assert!(step.reply.text.contains("не найдено"));
    }

    #[test]
    fn test_edit_keeps_changes_made_since_edit_started() {
        let (wizard, store) = wizard_with(vec![naruto()]);
        let step = wizard.start_edit(Some("Naruto"));

        let mut refreshed = naruto();
        refreshed.link = "https://t.me/anihub/99".to_string();
        refreshed.seasons = vec![2];
        store.replace_externally(vec![refreshed]);

        let step = feed(&wizard, step, &["genre", "Comedy, Drama"]);
        assert!(step.change.is_some());

        let entry = &stored(&store)[0];
        assert_eq!(entry.genres, vec!["Comedy", "Drama"]);
        assert_eq!(entry.seasons, vec![2]);
        assert_eq!(entry.link, "https://t.me/anihub/99");
        assert_eq!(step.session.unwrap().draft, *entry);
    }

    #[test]
    fn test_transitions_counted_by_mode() {
        let committed = || {
            WIZARD_TRANSITIONS
                .with_label_values(&["edit", "committed"])
                .get()
        };
        let before = committed();
        let (wizard, _) = wizard_with(vec![naruto()]);
        feed(&wizard, wizard.start_edit(Some("Naruto")), &["year", "2003"]);
        assert!(committed() > before);
    }

    #[test]
    fn test_edit_value_for_vanished_entry_ends_session() {
        let (wizard, store) = wizard_with(vec![naruto()]);
        let step = feed(&wizard, wizard.start_edit(Some("Naruto")), &["year"]);
        store.replace_externally(vec![CatalogEntry::new("Bleach")]);

        let step = wizard.advance(step.session.unwrap(), "2003");
        assert!(step.session.is_none());
        assert!(step.change.is_none());
        assert!(step.reply.text.contains("не найдено"));
        let titles: Vec<_> = stored(&store).into_iter().map(|e| e.title).collect();
        assert_eq!(titles, vec!["Bleach"]);
    }

    #[test]
    fn test_edit_save_failure_keeps_state() {
        let (wizard, store) = wizard_with(vec![naruto()]);
        let step = feed(&wizard, wizard.start_edit(Some("Naruto")), &["voice"]);
        store.set_fail_saves(true);

        let step = wizard.advance(step.session.unwrap(), "AniDub");
        assert_eq!(
            step.session.unwrap().state,
            WizardState::Edit(EditStep::AwaitValue(EditableField::Voice))
        );
        assert!(step.reply.text.starts_with("⚠️"));
    }

    #[test]
    fn test_menu_lists_current_values() {
        let menu = edit_menu(&naruto(), None);
        assert!(menu.text.contains("Жанр: Action"));
        assert!(menu.text.contains("Год: 2002"));
        assert!(menu.text.contains("Рейтинг: —"));
        let data: Vec<_> = menu.buttons.iter().flatten().collect();
        assert_eq!(data.len(), EditableField::ALL.len() + 2);
    }

    #[test]
    fn test_wizard_error_from_catalog() {
        let err = WizardError::from(CatalogError::StorageUnwritable("disk".to_string()));
        assert!(err.to_string().contains("disk"));
    }
}
