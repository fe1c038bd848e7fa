use anyhow::Result;
use async_trait::async_trait;
use tracing::info;

use super::{Email, Mailer};

/// A [`Mailer`] that logs the message instead of sending it.
#[derive(Debug, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<()> {
        info!(
            from = %email.from,
            to = ?email.to,
            subject = %email.subject,
            "Dry run, email not sent"
        );
        info!("\n{}", email.body);
        Ok(())
    }
}
