use std::sync::Arc;

use chrono::Utc;

use serde::{Deserialize, Serialize};

use crate::domain::RequiredText;
use crate::error::{ContactError, ContactResult};
use crate::notification::{NotificationOutcome, Notifier};
use crate::repo::{ContactStore, ContactSubmission, NewContact};

const SUCCESS_MESSAGE: &str = "Request sent successfully";

/// Inbound contact form payload. Every field may be absent.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub date: Option<String>,
    pub message: Option<String>,
}

impl ContactRequest {
    /// Check the required fields and stamp the submission time
    pub fn into_new_contact(self) -> ContactResult<NewContact> {
        let name = RequiredText::from_optional(self.name);
        let email = RequiredText::from_optional(self.email);
        let phone = RequiredText::from_optional(self.phone);

        match (name, email, phone) {
            (Some(name), Some(email), Some(phone)) => Ok(NewContact {
                name,
                email,
                phone,
                date: self.date,
                message: self.message,
                created_at: Utc::now(),
            }),
            (name, email, phone) => {
                let missing = [
                    ("name", name.is_none()),
                    ("email", email.is_none()),
                    ("phone", phone.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, missing)| missing.then_some(field))
                .collect();
                Err(ContactError::MissingFields(missing))
            }
        }
    }
}

/// Uniform JSON acknowledgment returned for every submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgment {
    pub success: bool,
    pub message: String,
}

impl Acknowledgment {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

/// Validates, stores and forwards contact form submissions
#[derive(Clone)]
pub struct SubmissionHandler {
    store: Arc<dyn ContactStore>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl SubmissionHandler {
    pub fn new(store: Arc<dyn ContactStore>, notifier: Option<Arc<dyn Notifier>>) -> Self {
        Self { store, notifier }
    }

    /// Handle one submission.
    ///
    /// Only validation and persistence failures are returned; the notification
    /// outcome is logged and never changes the acknowledgment.
    #[tracing::instrument(name = "Submit contact request", skip(self, request))]
    pub async fn submit(&self, request: ContactRequest) -> ContactResult<Acknowledgment> {
        let new_contact = request.into_new_contact().map_err(|error| {
            if let ContactError::MissingFields(fields) = &error {
                tracing::info!(missing = ?fields, "Rejected contact request");
            }
            error
        })?;

        let submission = self.store.insert(&new_contact).await.map_err(|error| {
            tracing::error!(error.cause_chain = ?error, "Failed to store contact request");
            ContactError::DatabaseError(error)
        })?;
        tracing::info!(id = %submission.id, "Contact request stored");

        let outcome = self.notify(&submission).await;
        match &outcome {
            NotificationOutcome::Failed(error) => tracing::warn!(
                id = %submission.id,
                error.cause_chain = ?error,
                "Failed to send notification email"
            ),
            outcome => tracing::info!(
                id = %submission.id,
                outcome = outcome.as_str(),
                "Notification handled"
            ),
        }

        Ok(Acknowledgment::success(SUCCESS_MESSAGE))
    }

    /// Best-effort notification for a stored submission
    pub async fn notify(&self, submission: &ContactSubmission) -> NotificationOutcome {
        let Some(notifier) = &self.notifier else {
            return NotificationOutcome::Skipped;
        };

        match notifier.notify(submission).await {
            Ok(()) => NotificationOutcome::Delivered,
            Err(error) => NotificationOutcome::Failed(error),
        }
    }
}
