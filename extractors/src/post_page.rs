use regex::Regex;
use shared_types::{ExtractionError, FetchedCaption};

use crate::fields::pattern;

/// JSON string body: anything but a quote or backslash, or an escape
const JSON_STRING: &str = r#"((?:[^"\\]|\\.)*)"#;

/// Pulls the caption and author out of a saved post page.
///
/// Post pages embed the media object as JSON. The caption is a JSON string
/// literal inside it and its escapes (`\n`, `\u00e9`, surrogate pairs) are
/// decoded with `serde_json`.
pub struct PostPageParser {
    caption_patterns: Vec<Regex>,
    owner_patterns: Vec<Regex>,
}

impl PostPageParser {
    pub fn new() -> Self {
        Self {
            caption_patterns: vec![
                pattern(&format!(
                    r#"(?s)"edge_media_to_caption"\s*:\s*\{{\s*"edges"\s*:\s*\[\s*\{{\s*"node"\s*:\s*\{{\s*"text"\s*:\s*"{}""#,
                    JSON_STRING
                )),
                pattern(&format!(
                    r#"(?s)"caption"\s*:\s*\{{[^{{}}]*?"text"\s*:\s*"{}""#,
                    JSON_STRING
                )),
            ],
            // A bare "username" may belong to a commenter or a tagged account
            owner_patterns: vec![
                pattern(r#""owner"\s*:\s*\{[^{}]*?"username"\s*:\s*"([A-Za-z0-9._]+)""#),
                pattern(r#""user"\s*:\s*\{[^{}]*?"username"\s*:\s*"([A-Za-z0-9._]+)""#),
            ],
        }
    }

    /// Caption and owner embedded in `html`.
    ///
    /// `Ok(None)` means the page has no caption (or an empty one); an
    /// `Err` means a caption was found but its escapes are malformed.
    pub fn parse(&self, html: &str) -> Result<Option<FetchedCaption>, ExtractionError> {
        let Some(raw) = self
            .caption_patterns
            .iter()
            .find_map(|regex| regex.captures(html)?.get(1))
        else {
            tracing::debug!("No embedded caption found in post page");
            return Ok(None);
        };

        let caption = decode_json_string(raw.as_str())?;
        if caption.trim().is_empty() {
            return Ok(None);
        }

        let owner_handle = self
            .owner_patterns
            .iter()
            .find_map(|regex| regex.captures(html)?.get(1))
            .map(|owner| owner.as_str().to_string());

        Ok(Some(FetchedCaption {
            caption,
            owner_handle,
        }))
    }
}

impl Default for PostPageParser {
    fn default() -> Self {
        Self::new()
    }
}

fn decode_json_string(raw: &str) -> Result<String, ExtractionError> {
    serde_json::from_str(&format!("\"{}\"", raw))
        .map_err(|e| ExtractionError::ParseError(format!("Invalid caption escape: {}", e)))
}
