mod date;
mod lexicon;
mod location;
mod organizer;
mod registration;
mod rules;
mod title;

pub use date::DateExtractor;
pub use lexicon::MonthLexicon;
pub use location::LocationExtractor;
pub use organizer::OrganizerExtractor;
pub use registration::RegistrationExtractor;
pub(crate) use rules::pattern;
pub use rules::{Rule, RuleChain};
pub use title::TitleExtractor;

/// Strip punctuation that sticks to the end of a token or link in prose
pub(crate) fn strip_trailing_punctuation(token: &str) -> &str {
    token.trim_end_matches(['.', ',', ';', ':', '!', '?'])
}
