//! Editable catalog fields and their typed parsers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::types::WizardError;
use crate::catalog::CatalogEntry;

/// Fields the edit menu can change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EditableField {
    Genre,
    Year,
    Season,
    Episodes,
    Rating,
    Voice,
    Description,
}

impl EditableField {
    /// Menu order.
    pub const ALL: [EditableField; 7] = [
        EditableField::Genre,
        EditableField::Year,
        EditableField::Season,
        EditableField::Episodes,
        EditableField::Rating,
        EditableField::Voice,
        EditableField::Description,
    ];

    /// Stable key, also used as button callback data.
    pub fn key(&self) -> &'static str {
        match self {
            EditableField::Genre => "genre",
            EditableField::Year => "year",
            EditableField::Season => "season",
            EditableField::Episodes => "episodes",
            EditableField::Rating => "rating",
            EditableField::Voice => "voice",
            EditableField::Description => "description",
        }
    }

    /// Label shown to the operator.
    pub fn label(&self) -> &'static str {
        match self {
            EditableField::Genre => "Жанр",
            EditableField::Year => "Год",
            EditableField::Season => "Сезон",
            EditableField::Episodes => "Серии",
            EditableField::Rating => "Рейтинг",
            EditableField::Voice => "Озвучка",
            EditableField::Description => "Описание",
        }
    }

    /// Input format hint shown with the value prompt.
    pub fn hint(&self) -> &'static str {
        match self {
            EditableField::Genre | EditableField::Voice => "через запятую",
            EditableField::Year | EditableField::Season | EditableField::Episodes => {
                "целые числа через запятую"
            }
            EditableField::Rating => "числа через запятую, например 8.5",
            EditableField::Description => "любой текст",
        }
    }

    /// Resolve a menu choice given as key or label, ignoring case.
    pub fn from_choice(input: &str) -> Option<Self> {
        let choice = input.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.key() == choice || f.label().to_lowercase() == choice)
    }

    /// Parse operator input into a value for this field.
    pub fn parse(&self, input: &str) -> Result<FieldValue, WizardError> {
        match self {
            EditableField::Genre => Ok(FieldValue::Genres(split_strings(input))),
            EditableField::Voice => Ok(FieldValue::VoiceCast(split_strings(input))),
            EditableField::Year => parse_numbers(*self, input).map(FieldValue::Years),
            EditableField::Season => parse_numbers(*self, input).map(FieldValue::Seasons),
            EditableField::Episodes => {
                parse_numbers(*self, input).map(FieldValue::EpisodeCounts)
            }
            EditableField::Rating => parse_ratings(input).map(FieldValue::Ratings),
            EditableField::Description => Ok(FieldValue::Description(input.to_string())),
        }
    }

    /// Current value of this field, rendered for the menu.
    pub fn display(&self, entry: &CatalogEntry) -> String {
        let rendered = match self {
            EditableField::Genre => entry.genres.join(", "),
            EditableField::Voice => entry.voice_cast.join(", "),
            EditableField::Year => join_numbers(&entry.years),
            EditableField::Season => join_numbers(&entry.seasons),
            EditableField::Episodes => join_numbers(&entry.episode_counts),
            EditableField::Rating => join_numbers(&entry.ratings),
            EditableField::Description => entry.description.clone(),
        };
        if rendered.trim().is_empty() {
            "—".to_string()
        } else {
            rendered
        }
    }
}

impl fmt::Display for EditableField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// A parsed, type-checked replacement for one field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Genres(Vec<String>),
    VoiceCast(Vec<String>),
    Years(Vec<u32>),
    Seasons(Vec<u32>),
    EpisodeCounts(Vec<u32>),
    Ratings(Vec<f64>),
    Description(String),
}

impl FieldValue {
    /// Replace the corresponding field of `entry`.
    pub fn apply(self, entry: &mut CatalogEntry) {
        match self {
            FieldValue::Genres(v) => entry.genres = v,
            FieldValue::VoiceCast(v) => entry.voice_cast = v,
            FieldValue::Years(v) => entry.years = v,
            FieldValue::Seasons(v) => entry.seasons = v,
            FieldValue::EpisodeCounts(v) => entry.episode_counts = v,
            FieldValue::Ratings(v) => entry.ratings = v,
            FieldValue::Description(v) => entry.description = v,
        }
    }
}

/// Comma-separated list, trimmed, empty items dropped.
pub fn split_strings(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// A single optional integer: digits only, anything else means unset.
pub fn optional_number(input: &str) -> Option<u32> {
    let trimmed = input.trim();
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

fn parse_numbers(field: EditableField, input: &str) -> Result<Vec<u32>, WizardError> {
    parse_list(input, |item| {
        u32::from_str(item).map_err(|_| invalid(field, input, "ожидались целые числа"))
    })
}

fn parse_ratings(input: &str) -> Result<Vec<f64>, WizardError> {
    parse_list(input, |item| {
        let value = f64::from_str(item)
            .map_err(|_| invalid(EditableField::Rating, input, "ожидались числа"))?;
        if value.is_finite() {
            Ok(value)
        } else {
            Err(invalid(EditableField::Rating, input, "ожидались конечные числа"))
        }
    })
}

fn parse_list<T>(
    input: &str,
    parse: impl Fn(&str) -> Result<T, WizardError>,
) -> Result<Vec<T>, WizardError> {
    input
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse)
        .collect()
}

fn invalid(field: EditableField, input: &str, reason: &str) -> WizardError {
    WizardError::InvalidFieldValue {
        field: field.key(),
        input: input.to_string(),
        reason: reason.to_string(),
    }
}

fn join_numbers<T: ToString>(values: &[T]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
