/// Month used when a token is not in the lexicon
pub const DEFAULT_MONTH: &str = "01";

/// Month tokens keyed by their first three letters. English and Indonesian
/// names share most prefixes; the Indonesian-only ones are listed explicitly
/// (`mei`, `agu`/`agt`, `okt`, `nop`, `des`, `peb`).
const MONTH_PREFIXES: &[(&str, &str)] = &[
    ("jan", "01"),
    ("feb", "02"),
    ("peb", "02"),
    ("mar", "03"),
    ("apr", "04"),
    ("may", "05"),
    ("mei", "05"),
    ("jun", "06"),
    ("jul", "07"),
    ("aug", "08"),
    ("agu", "08"),
    ("agt", "08"),
    ("sep", "09"),
    ("oct", "10"),
    ("okt", "10"),
    ("nov", "11"),
    ("nop", "11"),
    ("dec", "12"),
    ("des", "12"),
];

/// Static month-name lookup for English and Indonesian captions
pub struct MonthLexicon;

impl MonthLexicon {
    /// Two-digit month for a token such as `Oct`, `oktober` or `DESEMBER`.
    /// Only the first three characters are compared, case-insensitively.
    pub fn lookup(token: &str) -> Option<&'static str> {
        let prefix: String = token.chars().take(3).flat_map(char::to_lowercase).collect();

        MONTH_PREFIXES
            .iter()
            .find(|(key, _)| *key == prefix)
            .map(|(_, month)| *month)
    }

    /// Like [`MonthLexicon::lookup`], falling back to January
    pub fn month_or_default(token: &str) -> &'static str {
        Self::lookup(token).unwrap_or(DEFAULT_MONTH)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_english_and_indonesian_names() {
        assert_eq!(MonthLexicon::lookup("October"), Some("10"));
        assert_eq!(MonthLexicon::lookup("Oktober"), Some("10"));
        assert_eq!(MonthLexicon::lookup("mei"), Some("05"));
        assert_eq!(MonthLexicon::lookup("Agustus"), Some("08"));
        assert_eq!(MonthLexicon::lookup("Agt"), Some("08"));
        assert_eq!(MonthLexicon::lookup("DESEMBER"), Some("12"));
        assert_eq!(MonthLexicon::lookup("Maret"), Some("03"));
        assert_eq!(MonthLexicon::lookup("Februari"), Some("02"));
    }

    #[test]
    fn test_unknown_token_defaults_to_january() {
        assert_eq!(MonthLexicon::lookup("people"), None);
        assert_eq!(MonthLexicon::month_or_default("people"), "01");
        assert_eq!(MonthLexicon::month_or_default("ju"), "01");
    }
}
