//! Extractors Crate
//!
//! Heuristic field extraction for event captions posted on social media. Each
//! field of an [`EventRecord`] is resolved by its own extractor, which walks an
//! ordered list of named rules and stops at the first one that matches.
//!
//! # Architecture
//!
//! - **Types**: the record, source context and the `Extractor` trait live in
//!   the `shared-types` crate
//! - **Implementations**: the five field extractors, the month lexicon and the
//!   pipeline that assembles a record are implemented in this crate
//!
//! # Example
//!
//! ```rust,ignore
//! use extractors::FieldExtractionPipeline;
//! use shared_types::SourceContext;
//!
//! let pipeline = FieldExtractionPipeline::with_defaults(2025);
//! let context = SourceContext::new("https://www.instagram.com/p/abc/").with_owner("jktinfo");
//! let record = pipeline.process("Tema: Kopi Pagi\n📍 Senayan Park", &context);
//! ```

pub mod fields;
pub mod pipeline;
pub mod post_page;

// Re-export commonly used types
pub use fields::{
    DateExtractor, LocationExtractor, MonthLexicon, OrganizerExtractor, RegistrationExtractor,
    Rule, RuleChain, TitleExtractor,
};
pub use pipeline::FieldExtractionPipeline;
pub use post_page::PostPageParser;

// Re-export the shared types callers need alongside the pipeline
pub use shared_types::{EventRecord, Extractor, SourceContext};
