use serde::{Deserialize, Serialize};
use std::str::FromStr;
use ts_rs::TS;

use crate::event::COLUMNS;
use crate::source::SourceContext;

/// Sentinel for a registration link when the caption only signals a no-cost event
pub const FREE_SENTINEL: &str = "FREE";

/// Default sentinel for an unresolved location or registration link
pub const NOT_FOUND_SENTINEL: &str = "-";

/// Default title when the caption has no usable line
pub const UNTITLED_EVENT: &str = "Untitled Event";

/// Core trait that all field extractors implement
pub trait Extractor: Send + Sync {
    /// Resolve one field of the record. Ambiguity is resolved inside the
    /// extractor; an unresolvable field yields its sentinel, never an error.
    fn extract(&self, input: &ExtractionInput<'_>) -> String;

    /// Which record field does this extractor fill?
    fn field(&self) -> RecordField;

    /// Names of the active rules, in evaluation order
    fn rule_names(&self) -> Vec<&'static str>;
}

/// Extraction error types
#[derive(Debug, thiserror::Error)]
pub enum ExtractionError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Fields of an [`crate::EventRecord`], in column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "kebab-case")]
pub enum RecordField {
    EventDate,
    Title,
    Organizers,
    Location,
    RegistrationLink,
    SourceUrl,
}

impl RecordField {
    pub const ALL: [RecordField; 6] = [
        RecordField::EventDate,
        RecordField::Title,
        RecordField::Organizers,
        RecordField::Location,
        RecordField::RegistrationLink,
        RecordField::SourceUrl,
    ];

    /// Zero-based column of this field in the sheet range
    pub fn column_index(self) -> usize {
        match self {
            RecordField::EventDate => 0,
            RecordField::Title => 1,
            RecordField::Organizers => 2,
            RecordField::Location => 3,
            RecordField::RegistrationLink => 4,
            RecordField::SourceUrl => 5,
        }
    }

    pub fn header(self) -> &'static str {
        COLUMNS[self.column_index()]
    }

    /// Kebab-case name used in configuration, e.g. `registration-link`
    pub fn key(self) -> &'static str {
        match self {
            RecordField::EventDate => "event-date",
            RecordField::Title => "title",
            RecordField::Organizers => "organizers",
            RecordField::Location => "location",
            RecordField::RegistrationLink => "registration-link",
            RecordField::SourceUrl => "source-url",
        }
    }
}

impl FromStr for RecordField {
    type Err = ExtractionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RecordField::ALL
            .into_iter()
            .find(|field| field.key() == s)
            .ok_or_else(|| ExtractionError::ConfigError(format!("Unknown field '{}'", s)))
    }
}

/// Input handed to every extractor: the caption plus where it came from
#[derive(Debug, Clone, Copy)]
pub struct ExtractionInput<'a> {
    pub caption: &'a str,
    pub context: &'a SourceContext,
}

impl<'a> ExtractionInput<'a> {
    pub fn new(caption: &'a str, context: &'a SourceContext) -> Self {
        Self { caption, context }
    }

    /// Non-empty lines of the caption, trimmed
    pub fn lines(&self) -> impl Iterator<Item = &'a str> {
        self.caption
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
    }
}

/// Sentinels used for fields that could not be resolved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(default)]
pub struct ExtractionPolicy {
    /// Placeholder for an unresolved location or registration link
    pub unresolved_sentinel: String,
    /// Title used when the caption has no usable line
    pub untitled_title: String,
}

impl Default for ExtractionPolicy {
    fn default() -> Self {
        Self {
            unresolved_sentinel: NOT_FOUND_SENTINEL.to_string(),
            untitled_title: UNTITLED_EVENT.to_string(),
        }
    }
}

impl ExtractionPolicy {
    pub fn validate(&self) -> Result<(), ExtractionError> {
        if self.untitled_title.trim().is_empty() {
            return Err(ExtractionError::ConfigError(
                "untitled_title must not be empty".to_string(),
            ));
        }
        if self.unresolved_sentinel == FREE_SENTINEL {
            return Err(ExtractionError::ConfigError(format!(
                "unresolved_sentinel cannot be {FREE_SENTINEL}"
            )));
        }
        Ok(())
    }
}
