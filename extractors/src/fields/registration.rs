use regex::Regex;
use shared_types::{ExtractionInput, Extractor, RecordField, FREE_SENTINEL, NOT_FOUND_SENTINEL};

use super::rules::{pattern, Rule, RuleChain};
use super::strip_trailing_punctuation;

/// Links with an explicit scheme or `www.`, plus bare shortlink domains
const URL_PATTERN: &str = r#"(?i)(?:https?://|www\.)[^\s<>"'()\[\]]+|\b(?:bit\.ly|linktr\.ee|forms\.gle|tinyurl\.com|linkin\.bio|s\.id|lynk\.id)/[^\s<>"'()\[\]]*"#;

const INTENT_KEYWORDS: &str = r"(?i)link|htm|daftar|regis|tiket|ticket|pendaftaran|bit\.ly|gform|form|linktr\.ee|forms\.gle|tinyurl\.com|linkin\.bio";

const FREE_KEYWORDS: &str = r"(?i)\b(?:free(?:\s+entry)?|gratis|no\s+fee)\b|\brp\.?\s*0\b|\bhtm\s*:\s*0\b";

/// Resolves where to register, or whether the event is free.
///
/// A no-cost keyword is only a fallback: a caption can say "free for
/// students" and still carry a ticket link for everyone else.
pub struct RegistrationExtractor {
    rules: RuleChain,
    free_keywords: Regex,
    unresolved: String,
}

impl RegistrationExtractor {
    pub fn new(unresolved: impl Into<String>) -> Self {
        let urls = pattern(URL_PATTERN);

        Self {
            rules: RuleChain::new(vec![
                Box::new(KeywordLinkRule {
                    keywords: pattern(INTENT_KEYWORDS),
                    urls: urls.clone(),
                }),
                Box::new(FirstLinkRule { urls }),
            ]),
            free_keywords: pattern(FREE_KEYWORDS),
            unresolved: unresolved.into(),
        }
    }

    pub fn rules_mut(&mut self) -> &mut RuleChain {
        &mut self.rules
    }

    fn is_free(&self, caption: &str) -> bool {
        self.free_keywords.is_match(caption)
    }
}

impl Default for RegistrationExtractor {
    fn default() -> Self {
        Self::new(NOT_FOUND_SENTINEL)
    }
}

impl Extractor for RegistrationExtractor {
    fn extract(&self, input: &ExtractionInput<'_>) -> String {
        let free = self.is_free(input.caption);

        if let Some((rule, link)) = self.rules.first_match(input) {
            tracing::debug!(rule, %link, free, "Resolved registration link");
            return link;
        }

        if free {
            tracing::debug!("No registration link, caption marks the event as free");
            FREE_SENTINEL.to_string()
        } else {
            self.unresolved.clone()
        }
    }

    fn field(&self) -> RecordField {
        RecordField::RegistrationLink
    }

    fn rule_names(&self) -> Vec<&'static str> {
        self.rules.names()
    }
}

fn clean_link(link: &str) -> Option<String> {
    let link = strip_trailing_punctuation(link);
    (!link.is_empty()).then(|| link.to_string())
}

/// First link positioned after the earliest registration keyword. The search
/// spans lines, and a keyword inside the link itself (`bit.ly/...`) counts.
struct KeywordLinkRule {
    keywords: Regex,
    urls: Regex,
}

impl Rule for KeywordLinkRule {
    fn name(&self) -> &'static str {
        "keyword-link"
    }

    fn apply(&self, input: &ExtractionInput<'_>) -> Option<String> {
        let keyword_start = self.keywords.find(input.caption)?.start();

        self.urls
            .find_iter(input.caption)
            .filter(|url| url.end() > keyword_start)
            .find_map(|url| clean_link(url.as_str()))
    }
}

/// First link anywhere in the caption
struct FirstLinkRule {
    urls: Regex,
}

impl Rule for FirstLinkRule {
    fn name(&self) -> &'static str {
        "first-link"
    }

    fn apply(&self, input: &ExtractionInput<'_>) -> Option<String> {
        self.urls
            .find_iter(input.caption)
            .find_map(|url| clean_link(url.as_str()))
    }
}
