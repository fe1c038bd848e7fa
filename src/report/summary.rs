//! Aggregates computed over one report window.

use std::collections::BTreeMap;
use std::fmt;

use crate::feedback::FeedbackItem;
use crate::report::REPORT_HEADER;
use crate::report::utility::{count_by, mean};

/// Summary statistics for a non-empty set of feedback items.
#[derive(Debug, Clone, PartialEq)]
pub struct FeedbackSummary {
    pub average_rating: f64,
    /// Item count per distinct `submitted_at` value.
    pub count_by_day: BTreeMap<String, usize>,
    /// Item count per distinct urgency label.
    pub count_by_urgency: BTreeMap<String, usize>,
    /// Descriptions in input order, duplicates kept.
    pub descriptions: Vec<String>,
}

impl FeedbackSummary {
    /// Aggregates `items`. Returns `None` when there is nothing to summarize.
    pub fn from_items(items: &[FeedbackItem]) -> Option<Self> {
        let average_rating = mean(items.iter().map(FeedbackItem::rating))?;

        Some(Self {
            average_rating,
            count_by_day: count_by(items, FeedbackItem::submitted_at),
            count_by_urgency: count_by(items, FeedbackItem::urgency),
            descriptions: items
                .iter()
                .map(|item| item.description().to_string())
                .collect(),
        })
    }

    pub fn total(&self) -> usize {
        self.descriptions.len()
    }

    /// Renders the plain-text report. Every line ends with a newline.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FeedbackSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{REPORT_HEADER}")?;
        writeln!(f, "Média de notas: {:.2}", self.average_rating)?;

        writeln!(f, "Quantidade por dia:")?;
        for (day, count) in &self.count_by_day {
            writeln!(f, "{day}: {count}")?;
        }

        writeln!(f, "Quantidade por urgência:")?;
        for (urgency, count) in &self.count_by_urgency {
            writeln!(f, "{urgency}: {count}")?;
        }

        writeln!(f, "Descrições:")?;
        for description in &self.descriptions {
            writeln!(f, "- {description}")?;
        }

        Ok(())
    }
}
