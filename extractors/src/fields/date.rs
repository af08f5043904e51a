use regex::Regex;
use shared_types::{ExtractionInput, Extractor, RecordField};

use super::lexicon::MonthLexicon;
use super::rules::{pattern, Rule, RuleChain};

/// Resolves the event date as `YYYY-MM-DD`, or an empty string.
///
/// The current year is injected so that a caption such as `5 dec` resolves
/// the same way no matter when the extractor runs.
pub struct DateExtractor {
    rules: RuleChain,
}

impl DateExtractor {
    pub fn new(current_year: i32) -> Self {
        Self {
            rules: RuleChain::new(vec![
                Box::new(DayMonthNameRule::new(current_year)),
                Box::new(NumericDateRule::new()),
            ]),
        }
    }

    pub fn rules_mut(&mut self) -> &mut RuleChain {
        &mut self.rules
    }
}

impl Extractor for DateExtractor {
    fn extract(&self, input: &ExtractionInput<'_>) -> String {
        match self.rules.first_match(input) {
            Some((rule, date)) => {
                tracing::debug!(rule, %date, "Resolved event date");
                date
            }
            None => String::new(),
        }
    }

    fn field(&self) -> RecordField {
        RecordField::EventDate
    }

    fn rule_names(&self) -> Vec<&'static str> {
        self.rules.names()
    }
}

/// `25 Oct 2024`, `5-7 Desember`, `12 – 13 mei 2025`
struct DayMonthNameRule {
    regex: Regex,
    current_year: i32,
}

impl DayMonthNameRule {
    fn new(current_year: i32) -> Self {
        Self {
            // The day must not follow a digit, nor a `.`/`:` that follows a digit,
            // so times like 19.00 are skipped but `Tgl.5 Des` is not. Group 4
            // marks a clock time right after a two-digit "year" (`10 am`, `10.30`).
            regex: pattern(
                r"(?i)(?:^|[^\d.:]|(?:^|[^\d])[.:])(\d{1,2})(?:\s*[-–]\s*\d{1,2})?\s+([a-z]{3,10})\b(?:,?[^\S\n]+(\d{4}|\d{2})\b(\s*(?:[.:]\d|[ap]\.?m\b))?)?",
            ),
            current_year,
        }
    }
}

impl Rule for DayMonthNameRule {
    fn name(&self) -> &'static str {
        "day-month-name"
    }

    fn apply(&self, input: &ExtractionInput<'_>) -> Option<String> {
        let caps = self.regex.captures(input.caption)?;

        let day: u32 = caps.get(1)?.as_str().parse().ok()?;
        let month = MonthLexicon::month_or_default(caps.get(2)?.as_str());
        let year = match caps.get(3) {
            Some(year) if year.as_str().len() == 4 => year.as_str().parse().ok()?,
            Some(year) if caps.get(4).is_none() => format!("20{}", year.as_str()).parse().ok()?,
            _ => self.current_year,
        };

        Some(format!("{:04}-{}-{:02}", year, month, day))
    }
}

/// `25/10/2024`, `5-12-24`
struct NumericDateRule {
    regex: Regex,
}

impl NumericDateRule {
    fn new() -> Self {
        Self {
            regex: pattern(r"(?:^|[^\d])(\d{1,2})[/-](0?[1-9]|1[0-2])[/-](\d{4}|\d{2})\b"),
        }
    }
}

impl Rule for NumericDateRule {
    fn name(&self) -> &'static str {
        "numeric-date"
    }

    fn apply(&self, input: &ExtractionInput<'_>) -> Option<String> {
        let caps = self.regex.captures(input.caption)?;

        let day: u32 = caps.get(1)?.as_str().parse().ok()?;
        let month: u32 = caps.get(2)?.as_str().parse().ok()?;
        let year_str = caps.get(3)?.as_str();
        let year: i32 = if year_str.len() == 2 {
            format!("20{}", year_str).parse().ok()?
        } else {
            year_str.parse().ok()?
        };

        Some(format!("{:04}-{:02}-{:02}", year, month, day))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::test_support::run;

    #[test]
    fn test_explicit_year() {
        let extractor = DateExtractor::new(1999);
        assert_eq!(run(&extractor, "Join us 25 Oct 2024 at the hall"), "2024-10-25");
    }

    #[test]
    fn test_default_year() {
        let extractor = DateExtractor::new(2025);
        assert_eq!(run(&extractor, "event on 5 dec"), "2025-12-05");
    }

    #[test]
    fn test_day_right_after_label_punctuation() {
        let extractor = DateExtractor::new(2025);
        assert_eq!(run(&extractor, "Tanggal:5 Desember 2025"), "2025-12-05");
        assert_eq!(run(&extractor, "Tgl.5 Des"), "2025-12-05");
        assert_eq!(run(&extractor, ":7 Jan 2026"), "2026-01-07");
    }

    #[test]
    fn test_two_digit_year_after_month() {
        let extractor = DateExtractor::new(2025);
        assert_eq!(run(&extractor, "Join us 25 Oct 24"), "2024-10-25");
        assert_eq!(run(&extractor, "Join us 25 Oct, 26!"), "2026-10-25");
        assert_eq!(run(&extractor, "5 Des\n20 peserta"), "2025-12-05");
    }

    #[test]
    fn test_clock_time_after_month_is_not_a_year() {
        let extractor = DateExtractor::new(2025);
        assert_eq!(run(&extractor, "5 dec 10 am"), "2025-12-05");
        assert_eq!(run(&extractor, "5 dec 10 P.M."), "2025-12-05");
        assert_eq!(run(&extractor, "5 dec 10.30 WIB"), "2025-12-05");
        assert_eq!(run(&extractor, "5 dec 19:00"), "2025-12-05");
        assert_eq!(run(&extractor, "5 dec 10am"), "2025-12-05");
    }

    #[test]
    fn test_day_range_keeps_first_day() {
        let extractor = DateExtractor::new(2025);
        assert_eq!(run(&extractor, "Festival 12-14 Desember 2025"), "2025-12-12");
        assert_eq!(run(&extractor, "Festival 12 – 14 Agustus"), "2025-08-12");
    }

    #[test]
    fn test_indonesian_month() {
        let extractor = DateExtractor::new(2025);
        assert_eq!(run(&extractor, "📅 Sabtu, 3 Mei 2025"), "2025-05-03");
    }

    #[test]
    fn test_unknown_month_token_defaults_to_january() {
        let extractor = DateExtractor::new(2025);
        assert_eq!(run(&extractor, "only 3 seats left"), "2025-01-03");
    }

    #[test]
    fn test_day_is_not_range_checked() {
        let extractor = DateExtractor::new(2025);
        assert_eq!(run(&extractor, "on 31 feb"), "2025-02-31");
        assert_eq!(run(&extractor, "on 32 jan 2024"), "2024-01-32");
    }

    #[test]
    fn test_first_match_wins() {
        let extractor = DateExtractor::new(2025);
        assert_eq!(
            run(&extractor, "early bird until 1 Nov, event 20 Nov 2025"),
            "2025-11-01"
        );
    }

    #[test]
    fn test_clock_times_are_not_days() {
        let extractor = DateExtractor::new(2025);
        assert_eq!(run(&extractor, "Open gate 19.00 WIB\n20/11/2025"), "2025-11-20");
    }

    #[test]
    fn test_numeric_fallback() {
        let extractor = DateExtractor::new(2025);
        assert_eq!(run(&extractor, "Tanggal: 5/12/2024"), "2024-12-05");
        assert_eq!(run(&extractor, "Tanggal: 05-1-26"), "2026-01-05");
    }

    #[test]
    fn test_no_date_is_empty() {
        let extractor = DateExtractor::new(2025);
        assert_eq!(run(&extractor, ""), "");
        assert_eq!(run(&extractor, "no numbers here"), "");
    }

    #[test]
    fn test_numeric_rule_can_be_disabled() {
        let mut extractor = DateExtractor::new(2025);
        extractor.rules_mut().disable("numeric-date").unwrap();
        assert_eq!(extractor.rule_names(), vec!["day-month-name"]);
        assert_eq!(run(&extractor, "5/12/2024"), "");
    }
}
