//! One end-to-end report run: fetch, decode, summarize, mail.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::config::ReportConfig;
use crate::feedback::{AttrValue, FeedbackItem, RawRecord};
use crate::mail::{Email, Mailer};
use crate::report::ReportGenerator;
use crate::store::RecordStore;

/// What a run did, for logging and tests.
#[derive(Debug, Clone)]
pub struct JobOutcome {
    pub cutoff: String,
    pub fetched: usize,
    pub decoded: usize,
    pub skipped: usize,
    pub report: String,
}

/// Decodes every record, dropping the ones that fail with a warning.
///
/// Returns the decoded items in input order and the number skipped.
pub fn decode_records(records: &[RawRecord]) -> (Vec<FeedbackItem>, usize) {
    let mut items = Vec::with_capacity(records.len());
    let mut skipped = 0;

    for record in records {
        match FeedbackItem::from_attributes(record) {
            Ok(item) => items.push(item),
            Err(e) => {
                skipped += 1;
                let id = match record.get("id") {
                    Some(AttrValue::Text(id)) => id.as_str(),
                    _ => "<unknown>",
                };
                warn!(record_id = id, error = %e, "Skipping malformed feedback record");
            }
        }
    }

    (items, skipped)
}

/// Generates the report for the window ending at `now` and mails it.
///
/// An empty window still produces a (sentinel) report and an email.
///
/// # Errors
///
/// Fails if the store query or the mail dispatch fails. Malformed records
/// are never an error.
#[tracing::instrument(skip_all, fields(window_hours = config.window.duration().num_hours()))]
pub async fn run_report<S, M>(
    store: &S,
    mailer: &M,
    config: &ReportConfig,
    now: DateTime<Utc>,
) -> Result<JobOutcome>
where
    S: RecordStore + ?Sized,
    M: Mailer + ?Sized,
{
    let cutoff = config.window.cutoff_at(now);
    info!(cutoff = %cutoff, "Fetching feedback");

    let records = store
        .records_since(&cutoff)
        .await
        .context("failed to fetch feedback records")?;

    let (items, skipped) = decode_records(&records);
    let report = ReportGenerator::new().generate(&items);

    info!(
        fetched = records.len(),
        decoded = items.len(),
        skipped,
        "Report generated"
    );

    let email = Email {
        from: config.sender.clone(),
        to: config.recipients.clone(),
        subject: config.subject.clone(),
        body: report.clone(),
    };
    mailer
        .send(&email)
        .await
        .context("failed to send report email")?;

    Ok(JobOutcome {
        cutoff,
        fetched: records.len(),
        decoded: items.len(),
        skipped,
        report,
    })
}
