//! Multi-turn add/edit wizard for catalog entries.
//!
//! Add flow: title, link, season, genre, year, episodes, description, then
//! commit. Edit flow: pick an entry, then loop over the field menu until the
//! operator deletes the entry or cancels. Every field edit is saved as soon
//! as it parses.

mod field;
mod machine;
mod registry;
mod types;

pub use field::{optional_number, split_strings, EditableField, FieldValue};
pub use machine::{deleted, edit_menu, not_found, Step, Wizard, CANCEL_CHOICE, DELETE_CHOICE};
pub use registry::SessionRegistry;
pub use types::{
    AddStep, CatalogChange, EditStep, WizardError, WizardMode, WizardSession, WizardState,
};
