//! Settings for a report run, resolved by the binary from CLI flags and env.

use crate::window::ReportWindow;

pub const DEFAULT_SUBJECT: &str = "Relatório Semanal de Feedbacks";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("sender address is empty")]
    EmptySender,

    #[error("no recipient addresses configured")]
    NoRecipients,

    #[error("recipient address at position {0} is empty")]
    EmptyRecipient(usize),

    #[error("report subject is empty")]
    EmptySubject,

    #[error("report window must be longer than zero hours")]
    ZeroWindow,
}

/// Everything the report job needs besides its collaborators.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub sender: String,
    pub recipients: Vec<String>,
    pub subject: String,
    pub window: ReportWindow,
}

impl ReportConfig {
    pub fn new(sender: impl Into<String>, recipients: Vec<String>) -> Self {
        Self {
            sender: sender.into(),
            recipients,
            subject: DEFAULT_SUBJECT.to_string(),
            window: ReportWindow::default(),
        }
    }

    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    pub fn with_window(mut self, window: ReportWindow) -> Self {
        self.window = window;
        self
    }

    /// Checks the settings before any collaborator is contacted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sender.trim().is_empty() {
            return Err(ConfigError::EmptySender);
        }
        if self.recipients.is_empty() {
            return Err(ConfigError::NoRecipients);
        }
        if let Some(pos) = self.recipients.iter().position(|r| r.trim().is_empty()) {
            return Err(ConfigError::EmptyRecipient(pos));
        }
        if self.subject.trim().is_empty() {
            return Err(ConfigError::EmptySubject);
        }
        if self.window.duration() <= chrono::Duration::zero() {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }
}
