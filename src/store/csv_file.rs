use std::fs::File;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use super::RecordStore;
use crate::feedback::{AttrValue, RawRecord};

/// One row of a feedback export. Every column is optional so that incomplete
/// rows reach the decoder and get skipped there like any other bad record.
#[derive(Debug, Deserialize)]
struct CsvRow {
    id: Option<String>,
    description: Option<String>,
    rating: Option<String>,
    urgency: Option<String>,
    submitted_at: Option<String>,
}

impl CsvRow {
    fn into_raw_record(self) -> RawRecord {
        let mut record = RawRecord::new();
        let mut put = |name: &str, value: Option<String>, wrap: fn(String) -> AttrValue| {
            if let Some(value) = value {
                record.insert(name.to_string(), wrap(value));
            }
        };

        put("id", self.id, AttrValue::Text);
        put("description", self.description, AttrValue::Text);
        put("rating", self.rating, AttrValue::Number);
        put("urgency", self.urgency, AttrValue::Text);
        put("submitted_at", self.submitted_at, AttrValue::Text);

        record
    }
}

/// Reads feedback from a CSV export with a header row.
///
/// Empty cells count as absent fields. The `submitted_at` cutoff is applied
/// locally with the same lexical comparison the table scan uses.
pub struct CsvFileStore {
    path: PathBuf,
}

impl CsvFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn load(&self, cutoff: &str) -> Result<Vec<RawRecord>> {
        let file = File::open(&self.path)
            .with_context(|| format!("failed to open {}", self.path.display()))?;
        let mut rdr = csv::Reader::from_reader(file);

        let mut records = Vec::new();
        let mut skipped = 0;
        for result in rdr.deserialize() {
            let row: CsvRow = match result {
                Ok(row) => row,
                Err(e) => {
                    skipped += 1;
                    warn!(path = %self.path.display(), error = %e, "Skipping unreadable CSV row");
                    continue;
                }
            };
            let in_window = row
                .submitted_at
                .as_deref()
                .is_some_and(|submitted_at| submitted_at > cutoff);
            if in_window {
                records.push(row.into_raw_record());
            }
        }

        debug!(
            path = %self.path.display(),
            count = records.len(),
            skipped,
            "CSV export loaded"
        );
        Ok(records)
    }
}

#[async_trait]
impl RecordStore for CsvFileStore {
    async fn records_since(&self, cutoff: &str) -> Result<Vec<RawRecord>> {
        self.load(cutoff)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feedback::FeedbackItem;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> String {
        format!("{}/{}", env::temp_dir().display(), name)
    }

    #[tokio::test]
    async fn test_csv_rows_filtered_by_cutoff() {
        let path = temp_path("feedback_reporter_test_cutoff.csv");
        fs::write(
            &path,
            "id,description,rating,urgency,submitted_at\n\
             1,old,3,low,2023-12-30T10:00:00Z\n\
             2,new,4,high,2024-01-02T10:00:00Z\n\
             3,newer,5,low,2024-01-03T10:00:00Z\n",
        )
        .unwrap();

        let store = CsvFileStore::new(&path);
        let records = store.records_since("2024-01-01T00:00:00.000Z").await.unwrap();

        let ids: Vec<_> = records
            .iter()
            .map(|r| FeedbackItem::from_attributes(r).unwrap().id().to_string())
            .collect();
        assert_eq!(ids, vec!["2", "3"]);

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_csv_empty_cell_is_missing_field() {
        let path = temp_path("feedback_reporter_test_empty_cell.csv");
        fs::write(
            &path,
            "id,description,rating,urgency,submitted_at\n\
             ,no id,3,low,2024-01-02\n",
        )
        .unwrap();

        let records = CsvFileStore::new(&path).records_since("2024-01-01").await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].contains_key("id"));
        assert!(FeedbackItem::from_attributes(&records[0]).is_err());

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_csv_short_row_is_skipped() {
        let path = temp_path("feedback_reporter_test_short_row.csv");
        fs::write(
            &path,
            "id,description,rating,urgency,submitted_at\n\
             1,first,4,low,2024-01-02\n\
             2,truncated row\n\
             3,third,2,high,2024-01-03\n",
        )
        .unwrap();

        let records = CsvFileStore::new(&path).records_since("2024-01-01").await.unwrap();

        let ids: Vec<_> = records
            .iter()
            .map(|r| FeedbackItem::from_attributes(r).unwrap().id().to_string())
            .collect();
        assert_eq!(ids, vec!["1", "3"]);

        fs::remove_file(&path).unwrap();
    }

    #[tokio::test]
    async fn test_csv_missing_file_is_error() {
        let store = CsvFileStore::new(temp_path("feedback_reporter_does_not_exist.csv"));
        assert!(store.records_since("2024-01-01").await.is_err());
    }
}
