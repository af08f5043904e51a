use regex::Regex;
use shared_types::{ExtractionInput, Extractor, RecordField, NOT_FOUND_SENTINEL};

use super::rules::{pattern, Rule, RuleChain};

/// Glyphs authors put in front of a venue
const PIN_GLYPHS: &[char] = &['📍', '📌'];

const VARIATION_SELECTOR: char = '\u{FE0F}';

/// Resolves the venue from the first line carrying a location marker
pub struct LocationExtractor {
    rules: RuleChain,
    unresolved: String,
}

impl LocationExtractor {
    pub fn new(unresolved: impl Into<String>) -> Self {
        Self {
            rules: RuleChain::new(vec![Box::new(MarkedLineRule::new())]),
            unresolved: unresolved.into(),
        }
    }

    pub fn rules_mut(&mut self) -> &mut RuleChain {
        &mut self.rules
    }
}

impl Default for LocationExtractor {
    fn default() -> Self {
        Self::new(NOT_FOUND_SENTINEL)
    }
}

impl Extractor for LocationExtractor {
    fn extract(&self, input: &ExtractionInput<'_>) -> String {
        match self.rules.first_match(input) {
            Some((rule, location)) => {
                tracing::debug!(rule, %location, "Resolved location");
                location
            }
            None => self.unresolved.clone(),
        }
    }

    fn field(&self) -> RecordField {
        RecordField::Location
    }

    fn rule_names(&self) -> Vec<&'static str> {
        self.rules.names()
    }
}

/// First line, in caption order, with a pin glyph or a location label.
/// Glyph and label markers are one rule so that an earlier label line is not
/// outranked by a later pin line.
struct MarkedLineRule {
    label: Regex,
}

impl MarkedLineRule {
    fn new() -> Self {
        Self {
            label: pattern(r"(?i)\b(?:location|lokasi|area|at|place|venue|tempat)\s*:"),
        }
    }

    fn strip_markers(&self, line: &str) -> String {
        let without_glyphs: String = line
            .chars()
            .filter(|c| !PIN_GLYPHS.contains(c) && *c != VARIATION_SELECTOR)
            .collect();

        // Only the text after the first label is the place
        let place = match self.label.find(&without_glyphs) {
            Some(label) => &without_glyphs[label.end()..],
            None => without_glyphs.as_str(),
        };

        place
            .trim_matches(|c: char| c.is_whitespace() || c == ':' || c == '-' || c == '–')
            .to_string()
    }
}

impl Rule for MarkedLineRule {
    fn name(&self) -> &'static str {
        "marked-line"
    }

    fn apply(&self, input: &ExtractionInput<'_>) -> Option<String> {
        input
            .lines()
            .filter(|line| line.contains(PIN_GLYPHS) || self.label.is_match(line))
            .map(|line| self.strip_markers(line))
            .find(|location| !location.is_empty())
    }
}
