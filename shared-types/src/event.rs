use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::extraction::RecordField;

/// Number of columns in the record store range (`A:F`)
pub const COLUMN_COUNT: usize = 6;

/// Column headers, in the fixed record order
pub const COLUMNS: [&str; COLUMN_COUNT] = [
    "Event Date",
    "Event Title",
    "Penyelenggara",
    "Location",
    "Registration Link",
    "Source",
];

/// One extracted event, in the fixed column order of the record store.
///
/// Every field is always populated: unresolved values hold an empty string or
/// the sentinel chosen by [`crate::ExtractionPolicy`]. The order of the fields
/// is the wire contract with the persistence side and must not change without
/// a matching change to the column range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EventRecord {
    event_date: String,
    title: String,
    organizers: String,
    location: String,
    registration_link: String,
    source_url: String,
}

impl EventRecord {
    pub fn new(
        event_date: String,
        title: String,
        organizers: String,
        location: String,
        registration_link: String,
        source_url: String,
    ) -> Self {
        Self {
            event_date,
            title,
            organizers,
            location,
            registration_link,
            source_url,
        }
    }

    pub fn event_date(&self) -> &str {
        &self.event_date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn organizers(&self) -> &str {
        &self.organizers
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    pub fn registration_link(&self) -> &str {
        &self.registration_link
    }

    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Value of a single field
    pub fn get(&self, field: RecordField) -> &str {
        match field {
            RecordField::EventDate => &self.event_date,
            RecordField::Title => &self.title,
            RecordField::Organizers => &self.organizers,
            RecordField::Location => &self.location,
            RecordField::RegistrationLink => &self.registration_link,
            RecordField::SourceUrl => &self.source_url,
        }
    }

    /// The record as an ordered row, ready to be appended to a sheet
    pub fn to_row(&self) -> [String; COLUMN_COUNT] {
        RecordField::ALL.map(|field| self.get(field).to_string())
    }
}
