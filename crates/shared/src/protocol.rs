use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactMessage {
    pub sender_name: String,
    pub sender_email: String,
    pub message_body: String,
    pub recipient_address: String,
}

#[derive(Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RelayCredentials {
    pub service_id: String,
    pub template_id: String,
    pub public_key: String,
}

impl fmt::Debug for RelayCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RelayCredentials")
            .field("service_id", &self.service_id)
            .field("template_id", &self.template_id)
            .field("public_key", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateParams {
    pub from_name: String,
    pub from_email: String,
    pub message: String,
    pub to_email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailSendRequest {
    pub service_id: String,
    pub template_id: String,
    /// EmailJS names the public key `user_id` on the wire.
    pub user_id: String,
    pub template_params: TemplateParams,
}

impl EmailSendRequest {
    pub fn new(credentials: &RelayCredentials, message: &ContactMessage) -> Self {
        Self {
            service_id: credentials.service_id.clone(),
            template_id: credentials.template_id.clone(),
            user_id: credentials.public_key.clone(),
            template_params: TemplateParams {
                from_name: message.sender_name.clone(),
                from_email: message.sender_email.clone(),
                message: message.message_body.clone(),
                to_email: message.recipient_address.clone(),
            },
        }
    }
}
