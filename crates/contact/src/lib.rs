use std::{
    str::FromStr,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use async_trait::async_trait;
use shared::{
    error::{UnknownFieldError, ValidationError},
    notification::{Notification, Notifier},
    protocol::ContactMessage,
};
use tracing::{debug, info, warn};

mod error;
pub mod relay;

pub use error::DispatchError;
pub use relay::EmailJsRelay;

#[async_trait]
pub trait MessageRelay: Send + Sync {
    async fn send(&self, message: &ContactMessage) -> Result<(), DispatchError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactField {
    Name,
    Email,
    Message,
}

impl FromStr for ContactField {
    type Err = UnknownFieldError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw {
            "name" => Ok(ContactField::Name),
            "email" => Ok(ContactField::Email),
            "message" => Ok(ContactField::Message),
            other => Err(UnknownFieldError(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactFormState {
    pub name: String,
    pub email: String,
    pub message: String,
    pub is_submitting: bool,
}

impl ContactFormState {
    /// Presence check only; email shape and length are not inspected.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() || self.email.is_empty() || self.message.is_empty() {
            return Err(ValidationError::MissingFields);
        }
        Ok(())
    }

    pub fn submit_enabled(&self) -> bool {
        !self.is_submitting
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_submitting {
            "Sending..."
        } else {
            "Send Message"
        }
    }

    fn field_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.name,
            ContactField::Email => &mut self.email,
            ContactField::Message => &mut self.message,
        }
    }

    fn clear_fields(&mut self) {
        self.name.clear();
        self.email.clear();
        self.message.clear();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    ValidationRejected,
    DispatchSucceeded,
    DispatchFailed,
}

impl SubmissionOutcome {
    pub fn notification(self) -> Notification {
        match self {
            SubmissionOutcome::ValidationRejected => {
                Notification::new("Error", "Please fill in all fields").destructive()
            }
            SubmissionOutcome::DispatchSucceeded => {
                Notification::new("Success!", "Your message has been sent successfully.")
            }
            SubmissionOutcome::DispatchFailed => Notification::new(
                "Error",
                "Failed to send message. Please try again or contact directly via email.",
            )
            .destructive(),
        }
    }
}

enum Admission {
    Busy,
    Rejected(ValidationError),
    Admitted(ContactMessage),
}

pub struct ContactForm {
    state: Mutex<ContactFormState>,
    relay: Arc<dyn MessageRelay>,
    notifier: Arc<dyn Notifier>,
    recipient_address: String,
}

impl ContactForm {
    pub fn new(
        relay: Arc<dyn MessageRelay>,
        notifier: Arc<dyn Notifier>,
        recipient_address: impl Into<String>,
    ) -> Self {
        Self {
            state: Mutex::new(ContactFormState::default()),
            relay,
            notifier,
            recipient_address: recipient_address.into(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ContactFormState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn snapshot(&self) -> ContactFormState {
        self.lock().clone()
    }

    pub fn is_submitting(&self) -> bool {
        self.lock().is_submitting
    }

    pub fn set_field(&self, field: ContactField, value: impl Into<String>) {
        *self.lock().field_mut(field) = value.into();
    }

    /// Runs one submission. Returns `None` when a submission is already in
    /// flight; that call neither dispatches nor notifies.
    pub async fn submit(&self) -> Option<SubmissionOutcome> {
        let message = match self.admit() {
            Admission::Busy => {
                debug!("submit ignored while a message is in flight");
                return None;
            }
            Admission::Rejected(err) => {
                warn!(error = %err, "contact submission rejected");
                let outcome = SubmissionOutcome::ValidationRejected;
                self.notifier.notify(outcome.notification());
                return Some(outcome);
            }
            Admission::Admitted(message) => message,
        };

        let _release = SubmittingFlag { state: &self.state };
        info!(
            body_len = message.message_body.len(),
            "dispatching contact message"
        );

        let outcome = match self.relay.send(&message).await {
            Ok(()) => {
                info!("contact message sent");
                self.lock().clear_fields();
                SubmissionOutcome::DispatchSucceeded
            }
            Err(err) => {
                warn!(error = %err, "contact message dispatch failed");
                SubmissionOutcome::DispatchFailed
            }
        };
        self.notifier.notify(outcome.notification());
        Some(outcome)
    }

    fn admit(&self) -> Admission {
        let mut state = self.lock();
        if state.is_submitting {
            return Admission::Busy;
        }
        if let Err(err) = state.validate() {
            return Admission::Rejected(err);
        }
        state.is_submitting = true;
        Admission::Admitted(ContactMessage {
            sender_name: state.name.clone(),
            sender_email: state.email.clone(),
            message_body: state.message.clone(),
            recipient_address: self.recipient_address.clone(),
        })
    }
}

/// Clears `is_submitting` on every exit, including a dropped future.
struct SubmittingFlag<'a> {
    state: &'a Mutex<ContactFormState>,
}

impl Drop for SubmittingFlag<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_submitting = false;
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
