use crate::event::EventRecord;

/// Persistence errors, surfaced to the caller as-is
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Write error: {0}")]
    Write(String),

    #[error("Sheet {sheet} has {found} columns, expected {expected}")]
    ColumnMismatch {
        sheet: String,
        expected: usize,
        found: usize,
    },
}

/// A tabular store that accepts one record per append.
///
/// Implementations write exactly [`crate::COLUMN_COUNT`] cells per row and do
/// not retry on failure.
pub trait RecordSink {
    fn append(&self, record: &EventRecord) -> Result<(), StoreError>;

    /// Range label of the target, e.g. `Sheet1!A:F`
    fn range(&self) -> String;
}
