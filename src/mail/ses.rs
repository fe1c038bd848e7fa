use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_ses::types::{Body, Content, Destination, Message};
use tracing::info;

use super::{Email, Mailer};

const CHARSET: &str = "UTF-8";

/// Sends mail through Amazon SES `SendEmail`.
///
/// The sender address must be verified in SES for the configured region.
pub struct SesMailer {
    client: aws_sdk_ses::Client,
}

impl SesMailer {
    pub fn new(config: &aws_config::SdkConfig) -> Self {
        Self {
            client: aws_sdk_ses::Client::new(config),
        }
    }
}

fn content(data: &str) -> Result<Content> {
    Ok(Content::builder().data(data).charset(CHARSET).build()?)
}

/// Plain-text SES message for `email`.
fn build_message(email: &Email) -> Result<Message> {
    Ok(Message::builder()
        .subject(content(&email.subject)?)
        .body(Body::builder().text(content(&email.body)?).build())
        .build())
}

#[async_trait]
impl Mailer for SesMailer {
    #[tracing::instrument(skip(self, email), fields(from = %email.from, recipients = email.to.len()))]
    async fn send(&self, email: &Email) -> Result<()> {
        let message = build_message(email)?;

        let destination = Destination::builder()
            .set_to_addresses(Some(email.to.clone()))
            .build();

        let resp = self
            .client
            .send_email()
            .source(&email.from)
            .destination(destination)
            .message(message)
            .send()
            .await
            .context("SES SendEmail failed")?;

        info!(message_id = resp.message_id(), "Report email sent");
        Ok(())
    }
}
