use regex::Regex;
use shared_types::{ExtractionInput, Extractor, RecordField};
use std::collections::BTreeSet;

use super::rules::{pattern, Rule, RuleChain};
use super::strip_trailing_punctuation;

/// First path segments that name a post type rather than an account
const RESERVED_PATH_SEGMENTS: &[&str] = &["p", "reels", "reel", "tv", "stories"];

/// Domains that show up as `bit.ly x forms.gle` style false collaborations
const LINK_SUFFIXES: &[&str] = &[
    ".com", ".id", ".ly", ".gle", ".ee", ".bio", ".net", ".org", ".co", ".io",
];

/// Collects every party that hosts or co-hosts the event.
///
/// All sources contribute; none suppresses another. Tokens are deduplicated
/// with exact, case-sensitive comparison and sorted by code point.
pub struct OrganizerExtractor {
    sources: RuleChain<Vec<String>>,
}

impl OrganizerExtractor {
    pub fn new() -> Self {
        Self {
            sources: RuleChain::new(vec![
                Box::new(OwnerHandleRule),
                Box::new(UrlHandleRule::new()),
                Box::new(MentionRule::new()),
                Box::new(CollaborationRule::new()),
            ]),
        }
    }

    pub fn rules_mut(&mut self) -> &mut RuleChain<Vec<String>> {
        &mut self.sources
    }
}

impl Default for OrganizerExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor for OrganizerExtractor {
    fn extract(&self, input: &ExtractionInput<'_>) -> String {
        let mut organizers = BTreeSet::new();

        for (rule, tokens) in self.sources.all_matches(input) {
            tracing::debug!(rule, count = tokens.len(), "Collected organizer tokens");
            organizers.extend(tokens);
        }

        organizers.into_iter().collect::<Vec<_>>().join(", ")
    }

    fn field(&self) -> RecordField {
        RecordField::Organizers
    }

    fn rule_names(&self) -> Vec<&'static str> {
        self.sources.names()
    }
}

/// `jktinfo` or `@jktinfo` → `@jktinfo`
fn as_handle(name: &str) -> String {
    format!("@{}", name.trim().trim_start_matches('@'))
}

fn is_link_fragment(token: &str) -> bool {
    let lower = token.to_lowercase();
    lower.starts_with("http")
        || lower.starts_with("www.")
        || lower.contains("://")
        || (!lower.starts_with('@') && LINK_SUFFIXES.iter().any(|suffix| lower.contains(suffix)))
}

/// The account that authored the post
struct OwnerHandleRule;

impl Rule<Vec<String>> for OwnerHandleRule {
    fn name(&self) -> &'static str {
        "owner-handle"
    }

    fn apply(&self, input: &ExtractionInput<'_>) -> Option<Vec<String>> {
        input.context.owner().map(|owner| vec![as_handle(owner)])
    }
}

/// Account name taken from the post URL when the owner is not known
struct UrlHandleRule {
    regex: Regex,
}

impl UrlHandleRule {
    fn new() -> Self {
        Self {
            regex: pattern(r"(?i)^\s*(?:[a-z][a-z0-9+.-]*://)?[^/\s?#]+/([^/\s?#]+)"),
        }
    }
}

impl Rule<Vec<String>> for UrlHandleRule {
    fn name(&self) -> &'static str {
        "url-handle"
    }

    fn apply(&self, input: &ExtractionInput<'_>) -> Option<Vec<String>> {
        if input.context.owner().is_some() {
            return None;
        }

        let segment = self
            .regex
            .captures(&input.context.source_url)?
            .get(1)?
            .as_str()
            .trim_start_matches('@');

        if segment.is_empty() || RESERVED_PATH_SEGMENTS.contains(&segment.to_lowercase().as_str()) {
            return None;
        }

        Some(vec![as_handle(segment)])
    }
}

/// Every `@handle` in the caption
struct MentionRule {
    regex: Regex,
}

impl MentionRule {
    fn new() -> Self {
        Self {
            // Skip the `@` of e-mail addresses
            regex: pattern(r"(?:^|[^\w@])(@[\w.]+)"),
        }
    }
}

impl Rule<Vec<String>> for MentionRule {
    fn name(&self) -> &'static str {
        "mentions"
    }

    fn apply(&self, input: &ExtractionInput<'_>) -> Option<Vec<String>> {
        let mentions: Vec<String> = self
            .regex
            .captures_iter(input.caption)
            .filter_map(|caps| caps.get(1))
            .map(|mention| strip_trailing_punctuation(mention.as_str()))
            .filter(|mention| mention.len() > 1)
            .map(str::to_string)
            .collect();

        (!mentions.is_empty()).then_some(mentions)
    }
}

/// `Bar x @baz` collaborations, including chains like `A x B x C`
struct CollaborationRule {
    chain: Regex,
    separator: Regex,
}

impl CollaborationRule {
    fn new() -> Self {
        Self {
            chain: pattern(r"(?i)[@\w][\w.@]*(?:\s+x\s+[@\w][\w.@]*)+"),
            separator: pattern(r"(?i)\s+x\s+"),
        }
    }
}

impl Rule<Vec<String>> for CollaborationRule {
    fn name(&self) -> &'static str {
        "collaboration"
    }

    fn apply(&self, input: &ExtractionInput<'_>) -> Option<Vec<String>> {
        // Sides without a letter are times or sizes (`10.00 x 12.00`, `3 x 4`)
        let parties: Vec<String> = self
            .chain
            .find_iter(input.caption)
            .flat_map(|chain| self.separator.split(chain.as_str()))
            .map(|side| strip_trailing_punctuation(side.trim()))
            .filter(|side| {
                side.chars().count() > 2
                    && side.chars().any(char::is_alphabetic)
                    && !is_link_fragment(side)
            })
            .map(str::to_string)
            .collect();

        (!parties.is_empty()).then_some(parties)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_support::run;
    use shared_types::SourceContext;

    fn run_with(context: &SourceContext, caption: &str) -> String {
        OrganizerExtractor::new().extract(&ExtractionInput::new(caption, context))
    }

    #[test]
    fn test_union_of_owner_mentions_and_collaboration() {
        let context = SourceContext::new("https://www.instagram.com/p/abc/").with_owner("jktinfo");
        assert_eq!(
            run_with(&context, "collab by @foo and Bar x @baz"),
            "@baz, @foo, @jktinfo, Bar"
        );
    }

    #[test]
    fn test_owner_with_at_sign_is_not_doubled() {
        let context = SourceContext::new("https://www.instagram.com/p/abc/").with_owner("@jktinfo");
        assert_eq!(run_with(&context, "hosted by @jktinfo."), "@jktinfo");
    }

    #[test]
    fn test_handle_from_url_when_owner_unknown() {
        let context = SourceContext::new("https://www.instagram.com/kopikenangan/p/abc/");
        assert_eq!(run_with(&context, ""), "@kopikenangan");
    }

    #[test]
    fn test_reserved_url_segments_are_ignored() {
        for url in [
            "https://www.instagram.com/p/abc/",
            "https://www.instagram.com/reels/abc/",
            "https://www.instagram.com/tv/abc/",
            "https://www.instagram.com/stories/someone/1/",
        ] {
            let context = SourceContext::new(url);
            assert_eq!(run_with(&context, ""), "", "{url}");
        }
    }

    #[test]
    fn test_url_handle_skipped_when_owner_known() {
        let context = SourceContext::new("https://www.instagram.com/other/").with_owner("jktinfo");
        assert_eq!(run_with(&context, ""), "@jktinfo");
    }

    #[test]
    fn test_mentions_strip_trailing_punctuation() {
        let extractor = OrganizerExtractor::new();
        assert_eq!(
            run(&extractor, "Thanks @kopi.pagi, @teman_baik! and @kopi.pagi."),
            "@kopi.pagi, @teman_baik"
        );
    }

    #[test]
    fn test_email_addresses_are_not_mentions() {
        let extractor = OrganizerExtractor::new();
        assert_eq!(run(&extractor, "mail info@example.com"), "");
    }

    #[test]
    fn test_deduplication_is_case_sensitive() {
        let extractor = OrganizerExtractor::new();
        assert_eq!(run(&extractor, "@Foo @foo @foo"), "@Foo, @foo");
    }

    #[test]
    fn test_collaboration_filters_short_and_link_sides() {
        let extractor = OrganizerExtractor::new();
        assert_eq!(run(&extractor, "3 x 3 basketball"), "");
        assert_eq!(run(&extractor, "bit.ly X forms.gle"), "");
        assert_eq!(run(&extractor, "Kopi X Teman."), "Kopi, Teman");
    }

    #[test]
    fn test_no_organizers_is_empty() {
        let extractor = OrganizerExtractor::new();
        assert_eq!(run(&extractor, "just a caption"), "");
    }

    #[test]
    fn test_collaboration_chain_keeps_every_party() {
        let extractor = OrganizerExtractor::new();
        assert_eq!(run(&extractor, "Kopi x Teman x Buku"), "Buku, Kopi, Teman");
        assert_eq!(
            run(&extractor, "@kopi.pagi x Teman X @buku.id"),
            "@buku.id, @kopi.pagi, Teman"
        );
    }

    #[test]
    fn test_numeric_sides_are_not_collaborations() {
        let extractor = OrganizerExtractor::new();
        assert_eq!(run(&extractor, "Open 10.00 x 12.00 WIB"), "");
        assert_eq!(run(&extractor, "Booth 300 x 400 cm"), "");
    }
}
