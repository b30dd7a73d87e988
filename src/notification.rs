use async_trait::async_trait;

use crate::client::{Email, EmailClient};
use crate::domain::EmailAddress;
use crate::repo::ContactSubmission;

const SUBJECT: &str = "New Photoshoot Request";

/// Result of the best-effort notification that follows a stored submission
#[derive(Debug)]
pub enum NotificationOutcome {
    Delivered,
    /// No transport is configured
    Skipped,
    /// Recorded, never surfaced to the client
    Failed(anyhow::Error),
}

impl NotificationOutcome {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Delivered => "delivered",
            Self::Skipped => "skipped",
            Self::Failed(_) => "failed",
        }
    }
}

/// Delivers a summary of a stored submission to whoever handles them
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, submission: &ContactSubmission) -> anyhow::Result<()>;
}

/// Emails the configured operator address, which is also the sender
#[derive(Debug)]
pub struct OperatorNotifier {
    client: EmailClient,
}

impl OperatorNotifier {
    pub fn new(client: EmailClient) -> Self {
        Self { client }
    }

    pub fn operator(&self) -> &EmailAddress {
        self.client.sender()
    }

    fn build_email(&self, submission: &ContactSubmission) -> Email {
        Email {
            recipient: self.operator().clone(),
            subject: SUBJECT.to_string(),
            text_body: summary(submission),
        }
    }
}

#[async_trait]
impl Notifier for OperatorNotifier {
    #[tracing::instrument(
        name = "Notify operator",
        skip(self, submission),
        fields(id = %submission.id)
    )]
    async fn notify(&self, submission: &ContactSubmission) -> anyhow::Result<()> {
        let email = self.build_email(submission);
        self.client.send(&email).await?;
        Ok(())
    }
}

/// Plain-text summary of a submission
fn summary(submission: &ContactSubmission) -> String {
    format!(
        "New photoshoot request\n\nName: {}\nEmail: {}\nPhone: {}\nDate: {}\nMessage: {}\n",
        submission.name,
        submission.email,
        submission.phone,
        submission.date.as_deref().unwrap_or_default(),
        submission.message.as_deref().unwrap_or_default(),
    )
}
