pub mod event;
pub mod extraction;
pub mod source;
pub mod store;

pub use event::{EventRecord, COLUMNS, COLUMN_COUNT};
pub use source::{CaptionSource, FetchedCaption, SourceContext};
pub use store::{RecordSink, StoreError};

// Re-export extraction types
pub use extraction::*;
