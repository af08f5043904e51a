use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Where a caption came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SourceContext {
    pub source_url: String,
    /// Account that authored the post, when known
    pub owner_handle: Option<String>,
}

impl SourceContext {
    pub fn new(source_url: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            owner_handle: None,
        }
    }

    pub fn with_owner(mut self, owner_handle: impl Into<String>) -> Self {
        self.owner_handle = Some(owner_handle.into());
        self
    }

    /// Owner handle, treating a blank value as unknown
    pub fn owner(&self) -> Option<&str> {
        self.owner_handle
            .as_deref()
            .map(str::trim)
            .filter(|handle| !handle.is_empty() && *handle != "@")
    }
}

/// Caption and author returned by a [`CaptionSource`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
pub struct FetchedCaption {
    pub caption: String,
    pub owner_handle: Option<String>,
}

/// Anything that can produce the caption of a post.
///
/// `None` is the absence signal (nothing fetched, or an empty caption). It is
/// up to the caller to fall back to manual entry.
pub trait CaptionSource {
    fn fetch(&self, post_url: &str) -> Option<FetchedCaption>;
}
