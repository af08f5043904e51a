use extractors::PostPageParser;
use shared_types::{CaptionSource, FetchedCaption};
use std::fs;
use std::path::PathBuf;

/// Caption typed in by hand
pub struct ManualCaption {
    pub text: String,
}

impl CaptionSource for ManualCaption {
    fn fetch(&self, _post_url: &str) -> Option<FetchedCaption> {
        // An empty manual caption is still a caption
        Some(FetchedCaption {
            caption: self.text.clone(),
            owner_handle: None,
        })
    }
}

/// Plain-text caption saved to a file
pub struct CaptionFile {
    pub path: PathBuf,
}

impl CaptionSource for CaptionFile {
    fn fetch(&self, post_url: &str) -> Option<FetchedCaption> {
        let caption = match fs::read_to_string(&self.path) {
            Ok(caption) => caption,
            Err(e) => {
                tracing::warn!("Failed to read caption file {:?} for {}: {}", self.path, post_url, e);
                return None;
            }
        };

        if caption.trim().is_empty() {
            return None;
        }

        Some(FetchedCaption {
            caption,
            owner_handle: None,
        })
    }
}

/// Post page saved from the browser; the caption is read from its embedded JSON
pub struct PostPageFile {
    pub path: PathBuf,
    parser: PostPageParser,
}

impl PostPageFile {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            parser: PostPageParser::new(),
        }
    }
}

impl CaptionSource for PostPageFile {
    fn fetch(&self, post_url: &str) -> Option<FetchedCaption> {
        let html = match fs::read_to_string(&self.path) {
            Ok(html) => html,
            Err(e) => {
                tracing::warn!("Failed to read post page {:?} for {}: {}", self.path, post_url, e);
                return None;
            }
        };

        match self.parser.parse(&html) {
            Ok(fetched) => fetched,
            Err(e) => {
                tracing::warn!("Failed to parse caption from {:?}: {}", self.path, e);
                None
            }
        }
    }
}
