//! Webhook signature verification port.

/// Signature headers accompanying an identity provider webhook.
#[derive(Debug, Clone, Copy)]
pub struct SignatureHeaders<'a> {
    pub id: &'a str,
    pub timestamp: &'a str,
    pub signature: &'a str,
}

/// Verifies that a raw webhook body was signed with the shared secret.
pub trait WebhookVerifier: Send + Sync {
    fn verify(&self, payload: &[u8], headers: SignatureHeaders<'_>) -> Result<(), WebhookError>;
}

/// Webhook verification errors.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    #[error("Invalid signing secret: {0}")]
    InvalidSecret(String),

    #[error("Invalid timestamp header")]
    InvalidTimestamp,

    #[error("Message timestamp outside the tolerance window")]
    TimestampOutOfRange,

    #[error("No matching signature found")]
    SignatureMismatch,
}
