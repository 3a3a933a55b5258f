//! Wizard session state and errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::field::EditableField;
use crate::catalog::{CatalogEntry, CatalogError};

// ============================================================================
// State
// ============================================================================

/// Which flow a session is running.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardMode {
    Add,
    Edit,
}

impl WizardMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            WizardMode::Add => "add",
            WizardMode::Edit => "edit",
        }
    }
}

/// Add flow steps, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AddStep {
    Title,
    Link,
    Season,
    Genre,
    Year,
    Episodes,
    Description,
}

/// Edit flow steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", content = "field", rename_all = "snake_case")]
pub enum EditStep {
    /// Waiting for the title of the entry to edit.
    SelectTarget,
    /// Showing the field menu.
    ChooseField,
    /// Waiting for a new value of the chosen field.
    AwaitValue(EditableField),
}

/// Where a session is. The step always belongs to the session's mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "state", rename_all = "snake_case")]
pub enum WizardState {
    Add(AddStep),
    Edit(EditStep),
}

/// One operator's in-progress dialogue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardSession {
    pub state: WizardState,
    /// Entry being built (add) or a working copy of the target (edit).
    pub draft: CatalogEntry,
    /// Title of the persisted entry being edited.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_title: Option<String>,
}

impl WizardSession {
    /// Fresh add session waiting for a title.
    pub fn add() -> Self {
        Self {
            state: WizardState::Add(AddStep::Title),
            draft: CatalogEntry::default(),
            target_title: None,
        }
    }

    /// Fresh edit session waiting for a target title.
    pub fn edit() -> Self {
        Self {
            state: WizardState::Edit(EditStep::SelectTarget),
            draft: CatalogEntry::default(),
            target_title: None,
        }
    }

    /// Edit session positioned on the menu for `entry`.
    pub fn editing(entry: CatalogEntry) -> Self {
        Self {
            state: WizardState::Edit(EditStep::ChooseField),
            target_title: Some(entry.title.clone()),
            draft: entry,
        }
    }

    pub fn mode(&self) -> WizardMode {
        match self.state {
            WizardState::Add(_) => WizardMode::Add,
            WizardState::Edit(_) => WizardMode::Edit,
        }
    }

    pub(crate) fn at(mut self, state: WizardState) -> Self {
        self.state = state;
        self
    }
}

// ============================================================================
// Results
// ============================================================================

/// A change the wizard committed to the catalog.
#[derive(Debug, Clone, PartialEq)]
pub enum CatalogChange {
    /// New entry stored.
    Added(CatalogEntry),
    /// Add flow replaced an existing entry with the same title.
    Replaced(CatalogEntry),
    /// One field of an existing entry changed.
    Updated {
        entry: CatalogEntry,
        field: EditableField,
    },
    /// Entry removed.
    Deleted(CatalogEntry),
}

impl CatalogChange {
    pub fn entry(&self) -> &CatalogEntry {
        match self {
            CatalogChange::Added(entry)
            | CatalogChange::Replaced(entry)
            | CatalogChange::Updated { entry, .. }
            | CatalogChange::Deleted(entry) => entry,
        }
    }
}

/// Errors from wizard steps.
#[derive(Debug, Error)]
pub enum WizardError {
    #[error("Invalid value {input:?} for {field}: {reason}")]
    InvalidFieldValue {
        field: &'static str,
        input: String,
        reason: String,
    },

    #[error("Entry not found: {0}")]
    EntryNotFound(String),

    #[error("Storage error: {0}")]
    Storage(CatalogError),
}

impl From<CatalogError> for WizardError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::EntryNotFound(title) => WizardError::EntryNotFound(title),
            other => WizardError::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_constructors() {
        let add = WizardSession::add();
        assert_eq!(add.mode(), WizardMode::Add);
        assert_eq!(add.state, WizardState::Add(AddStep::Title));

        let edit = WizardSession::editing(CatalogEntry::new("Monster"));
        assert_eq!(edit.mode(), WizardMode::Edit);
        assert_eq!(edit.target_title.as_deref(), Some("Monster"));
        assert_eq!(edit.state, WizardState::Edit(EditStep::ChooseField));
    }

    #[test]
    fn test_catalog_error_conversion() {
        let err: WizardError = CatalogError::EntryNotFound("Monster".to_string()).into();
        assert!(matches!(err, WizardError::EntryNotFound(t) if t == "Monster"));

        let err: WizardError = CatalogError::StorageConflict.into();
        assert!(matches!(err, WizardError::Storage(CatalogError::StorageConflict)));
    }

    #[test]
    fn test_state_serialization() {
        let state = WizardState::Edit(EditStep::AwaitValue(EditableField::Rating));
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["mode"], "edit");
        assert_eq!(json["state"]["step"], "await_value");
        assert_eq!(json["state"]["field"], "rating");
    }
}
