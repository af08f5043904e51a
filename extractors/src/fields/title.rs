use regex::Regex;
use shared_types::{ExtractionInput, Extractor, RecordField, UNTITLED_EVENT};

use super::rules::{pattern, Rule, RuleChain};

const MAX_TITLE_CHARS: usize = 100;
const MIN_UPPERCASE_CHARS: usize = 4;
const MAX_UPPERCASE_CHARS: usize = 70;

/// Resolves the event title.
///
/// Explicit labels (`Tema:`) and bold spans are how authors usually mark a
/// title; the line-based rules only run when neither is present.
pub struct TitleExtractor {
    rules: RuleChain,
    untitled: String,
}

impl TitleExtractor {
    pub fn new(untitled: impl Into<String>) -> Self {
        Self {
            rules: RuleChain::new(vec![
                Box::new(LabelLineRule::new()),
                Box::new(BoldSpanRule::new()),
                Box::new(UppercaseLineRule),
                Box::new(FirstLineRule),
            ]),
            untitled: untitled.into(),
        }
    }

    pub fn rules_mut(&mut self) -> &mut RuleChain {
        &mut self.rules
    }
}

impl Default for TitleExtractor {
    fn default() -> Self {
        Self::new(UNTITLED_EVENT)
    }
}

impl Extractor for TitleExtractor {
    fn extract(&self, input: &ExtractionInput<'_>) -> String {
        match self.rules.first_match(input) {
            Some((rule, title)) => {
                tracing::debug!(rule, %title, "Resolved title");
                title
            }
            None => self.untitled.clone(),
        }
    }

    fn field(&self) -> RecordField {
        RecordField::Title
    }

    fn rule_names(&self) -> Vec<&'static str> {
        self.rules.names()
    }
}

/// `Tema: Kopi Pagi`, `EVENT - Night Run`
struct LabelLineRule {
    regex: Regex,
}

impl LabelLineRule {
    fn new() -> Self {
        Self {
            // A dash separator needs trailing whitespace so `event-driven` is not a label
            regex: pattern(r"(?i)\b(?:title|tema|theme|event)\s*(?::+|[-–]+\s)\s*(.*)$"),
        }
    }
}

impl Rule for LabelLineRule {
    fn name(&self) -> &'static str {
        "label-line"
    }

    fn apply(&self, input: &ExtractionInput<'_>) -> Option<String> {
        input.lines().find_map(|line| {
            let caps = self.regex.captures(line)?;
            let title = caps.get(1)?.as_str().trim_matches(|c: char| c == '*' || c.is_whitespace());
            (!title.is_empty()).then(|| title.to_string())
        })
    }
}

/// First `**bold**` span on a single line
struct BoldSpanRule {
    regex: Regex,
}

impl BoldSpanRule {
    fn new() -> Self {
        Self {
            regex: pattern(r"\*\*(.+?)\*\*"),
        }
    }
}

impl Rule for BoldSpanRule {
    fn name(&self) -> &'static str {
        "bold-span"
    }

    fn apply(&self, input: &ExtractionInput<'_>) -> Option<String> {
        input.lines().find_map(|line| {
            self.regex
                .captures_iter(line)
                .filter_map(|caps| caps.get(1))
                .map(|span| span.as_str().trim())
                .find(|span| !span.is_empty())
                .map(str::to_string)
        })
    }
}

/// First line written entirely in capitals
struct UppercaseLineRule;

impl Rule for UppercaseLineRule {
    fn name(&self) -> &'static str {
        "uppercase-line"
    }

    fn apply(&self, input: &ExtractionInput<'_>) -> Option<String> {
        input
            .lines()
            .find(|line| {
                let length = line.chars().count();
                (MIN_UPPERCASE_CHARS..=MAX_UPPERCASE_CHARS).contains(&length)
                    && is_upper_case(line)
            })
            .map(str::to_string)
    }
}

/// At least one cased letter and no lower-case letters
fn is_upper_case(line: &str) -> bool {
    line.chars().any(char::is_uppercase) && !line.chars().any(char::is_lowercase)
}

/// First line that is not a hashtag block, cut to a readable length
struct FirstLineRule;

impl Rule for FirstLineRule {
    fn name(&self) -> &'static str {
        "first-line"
    }

    fn apply(&self, input: &ExtractionInput<'_>) -> Option<String> {
        input
            .lines()
            .find(|line| !line.starts_with('#'))
            .map(|line| line.chars().take(MAX_TITLE_CHARS).collect::<String>().trim_end().to_string())
    }
}
