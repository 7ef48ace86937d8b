//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the database, session, webhook and blob storage
//! integrations.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external services, in-memory stores and local blobs only
//! - `postgres` - PostgreSQL content store via SeaORM
//! - `auth` - JWT session token verification
//! - `webhooks` - Svix-style webhook signature verification
//! - `rate-limit` - Rate limiting via governor
//! - `http-blob` - Remote blob storage over HTTP

pub mod blob;
pub mod database;

#[cfg(feature = "auth")]
pub mod auth;

#[cfg(feature = "webhooks")]
pub mod webhook;

#[cfg(feature = "rate-limit")]
pub mod rate_limit;

// Re-exports - In-Memory
pub use blob::{LocalBlobConfig, LocalBlobStore};
pub use database::{DatabaseConnections, InMemoryPostRepository, InMemoryUserRepository};

#[cfg(feature = "auth")]
pub use auth::{JwtConfig, JwtTokenService};

#[cfg(feature = "webhooks")]
pub use webhook::SvixVerifier;

#[cfg(feature = "rate-limit")]
pub use rate_limit::{InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "http-blob")]
pub use blob::{HttpBlobConfig, HttpBlobStore};
