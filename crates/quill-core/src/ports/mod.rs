//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod blob;
mod rate_limit;
mod repository;
mod webhook;

pub use auth::{AuthError, SessionClaims, TokenService};
pub use blob::{BlobError, BlobStore, StoredBlob, upload_pathname};
pub use rate_limit::{RateLimitError, RateLimitResult, RateLimiter};
pub use repository::{BaseRepository, PostRepository, UserRepository};
pub use webhook::{SignatureHeaders, WebhookError, WebhookVerifier};
