use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::{ContactMessage, EmailSendRequest, RelayCredentials};
use tracing::debug;
use url::Url;

use crate::{DispatchError, MessageRelay};

pub const EMAILJS_SEND_ENDPOINT: &str = "https://api.emailjs.com/api/v1.0/email/send";

pub struct EmailJsRelay {
    http: Client,
    endpoint: Url,
    credentials: RelayCredentials,
}

impl EmailJsRelay {
    pub fn new(endpoint: Url, credentials: RelayCredentials) -> Self {
        Self {
            http: Client::new(),
            endpoint,
            credentials,
        }
    }
}

#[async_trait]
impl MessageRelay for EmailJsRelay {
    async fn send(&self, message: &ContactMessage) -> Result<(), DispatchError> {
        let body = EmailSendRequest::new(&self.credentials, message);
        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        debug!(status = status.as_u16(), "relay responded");
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DispatchError::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
#[path = "tests/relay_tests.rs"]
mod tests;
