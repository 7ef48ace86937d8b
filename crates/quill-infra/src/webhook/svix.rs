//! Svix-style webhook signature verification.
//!
//! The signed content is `"{svix-id}.{svix-timestamp}.{raw body}"`, signed
//! with HMAC-SHA256 under the base64 key that follows the `whsec_` prefix of
//! the signing secret. The `svix-signature` header carries one or more
//! space-separated `v1,<base64 signature>` entries; any match is accepted.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use quill_core::ports::{SignatureHeaders, WebhookError, WebhookVerifier};

type HmacSha256 = Hmac<Sha256>;

const SECRET_PREFIX: &str = "whsec_";
const SIGNATURE_VERSION: &str = "v1";
/// Messages older or newer than this are rejected to limit replays.
const DEFAULT_TOLERANCE_SECS: u64 = 5 * 60;

/// Verifies identity provider webhooks signed with a shared secret.
pub struct SvixVerifier {
    key: Vec<u8>,
    tolerance_secs: u64,
}

impl std::fmt::Debug for SvixVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvixVerifier")
            .field("key", &"<redacted>")
            .field("tolerance_secs", &self.tolerance_secs)
            .finish()
    }
}

impl SvixVerifier {
    /// Build a verifier from a `whsec_...` signing secret.
    pub fn new(secret: &str) -> Result<Self, WebhookError> {
        let encoded = secret.trim();
        let encoded = encoded.strip_prefix(SECRET_PREFIX).unwrap_or(encoded);

        let key = STANDARD
            .decode(encoded)
            .map_err(|e| WebhookError::InvalidSecret(e.to_string()))?;
        if key.is_empty() {
            return Err(WebhookError::InvalidSecret("empty key".to_string()));
        }

        Ok(Self {
            key,
            tolerance_secs: DEFAULT_TOLERANCE_SECS,
        })
    }

    /// Compute the base64 `v1` signature for a message.
    pub fn sign(&self, msg_id: &str, timestamp: &str, payload: &[u8]) -> String {
        let mut mac =
            HmacSha256::new_from_slice(&self.key).expect("HMAC accepts keys of any length");
        mac.update(msg_id.as_bytes());
        mac.update(b".");
        mac.update(timestamp.as_bytes());
        mac.update(b".");
        mac.update(payload);

        STANDARD.encode(mac.finalize().into_bytes())
    }

    /// Verify against an explicit "now", in unix seconds.
    pub fn verify_at(
        &self,
        payload: &[u8],
        headers: SignatureHeaders<'_>,
        now: i64,
    ) -> Result<(), WebhookError> {
        let timestamp: i64 = headers
            .timestamp
            .trim()
            .parse()
            .map_err(|_| WebhookError::InvalidTimestamp)?;

        if now.abs_diff(timestamp) > self.tolerance_secs {
            return Err(WebhookError::TimestampOutOfRange);
        }

        let expected = self.sign(headers.id, headers.timestamp.trim(), payload);

        let matched = headers
            .signature
            .split_whitespace()
            .filter_map(|entry| entry.split_once(','))
            .filter(|(version, _)| *version == SIGNATURE_VERSION)
            .any(|(_, signature)| bool::from(signature.as_bytes().ct_eq(expected.as_bytes())));

        if matched {
            Ok(())
        } else {
            Err(WebhookError::SignatureMismatch)
        }
    }
}

impl WebhookVerifier for SvixVerifier {
    fn verify(&self, payload: &[u8], headers: SignatureHeaders<'_>) -> Result<(), WebhookError> {
        self.verify_at(payload, headers, chrono::Utc::now().timestamp())
    }
}
