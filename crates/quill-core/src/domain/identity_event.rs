//! Events delivered by the identity provider's webhook.

use serde::Deserialize;

/// Event type that provisions a local user.
pub const USER_CREATED: &str = "user.created";

/// Envelope of a verified identity provider event.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

/// Payload of a `user.created` event.
#[derive(Debug, Clone, Deserialize)]
pub struct UserCreatedData {
    pub id: String,
    #[serde(default)]
    pub email_addresses: Vec<EmailAddress>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailAddress {
    pub email_address: String,
}

impl IdentityEvent {
    pub fn is_user_created(&self) -> bool {
        self.event_type == USER_CREATED
    }
}
