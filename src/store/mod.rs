//! Sources of raw feedback records.
//!
//! [`RecordStore`] is the narrow query interface the report job depends on.
//! [`DynamoDbStore`] scans the production table; [`CsvFileStore`] reads a
//! local export for offline previews.

mod client;
mod csv_file;
mod dynamodb;

pub use client::RecordStore;
pub use csv_file::CsvFileStore;
pub use dynamodb::DynamoDbStore;
