use anyhow::Result;
use async_trait::async_trait;

use crate::feedback::RawRecord;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Returns every record whose `submitted_at` is lexically greater than
    /// `cutoff`, in no particular order.
    async fn records_since(&self, cutoff: &str) -> Result<Vec<RawRecord>>;
}
