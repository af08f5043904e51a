use csv::{ReaderBuilder, WriterBuilder};
use shared_types::{EventRecord, RecordSink, StoreError, COLUMNS, COLUMN_COUNT};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};

/// Sheet-like store backed by one CSV file per sheet.
///
/// Each append writes one row of exactly six cells; a header row is written
/// when the sheet is created.
pub struct CsvSheetStore {
    directory: PathBuf,
    sheet_name: String,
}

impl CsvSheetStore {
    pub fn new(directory: impl Into<PathBuf>, sheet_name: impl Into<String>) -> Self {
        Self {
            directory: directory.into(),
            sheet_name: sheet_name.into(),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.directory.join(format!("{}.csv", self.sheet_name))
    }

    fn check_columns(&self, path: &Path) -> Result<(), StoreError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_path(path)
            .map_err(|e| StoreError::Write(e.to_string()))?;

        let found = reader
            .headers()
            .map_err(|e| StoreError::Write(e.to_string()))?
            .len();

        if found != COLUMN_COUNT {
            return Err(StoreError::ColumnMismatch {
                sheet: self.sheet_name.clone(),
                expected: COLUMN_COUNT,
                found,
            });
        }

        Ok(())
    }
}

impl RecordSink for CsvSheetStore {
    fn append(&self, record: &EventRecord) -> Result<(), StoreError> {
        fs::create_dir_all(&self.directory)?;

        let path = self.path();
        let is_new = !path.exists() || fs::metadata(&path)?.len() == 0;
        if !is_new {
            self.check_columns(&path)?;
        }

        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        if is_new {
            writer
                .write_record(COLUMNS)
                .map_err(|e| StoreError::Write(e.to_string()))?;
        }

        writer
            .write_record(record.to_row())
            .map_err(|e| StoreError::Write(e.to_string()))?;
        writer.flush()?;

        tracing::debug!(path = %path.display(), range = %self.range(), "Appended record");
        Ok(())
    }

    fn range(&self) -> String {
        format!("{}!A:F", self.sheet_name)
    }
}
