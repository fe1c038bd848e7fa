//! Weekly feedback report generation.
//!
//! [`FeedbackSummary`] holds the aggregates computed over a window of
//! feedback, and [`ReportGenerator`] turns a list of items into the plain-text
//! report that gets mailed out.

pub mod summary;
pub mod utility;

pub use summary::FeedbackSummary;

use crate::feedback::FeedbackItem;

/// Sent instead of a report when the window holds no feedback.
pub const EMPTY_REPORT: &str = "Nenhum feedback na última semana.";

pub const REPORT_HEADER: &str = "Relatório Semanal de Feedbacks:";

/// Renders feedback lists into report text.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReportGenerator;

impl ReportGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Produces the report for `items`, or [`EMPTY_REPORT`] if there are none.
    pub fn generate(&self, items: &[FeedbackItem]) -> String {
        match FeedbackSummary::from_items(items) {
            Some(summary) => summary.render(),
            None => EMPTY_REPORT.to_string(),
        }
    }
}
