//! # Quill Core
//!
//! The domain layer of the Quill blogging backend.
//! This crate contains the post lifecycle and authorization rules, the
//! user provisioning rules and the ports infrastructure has to implement.
//! It has zero infrastructure dependencies.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::{PostError, PostErrorKind};
pub use services::{PostService, UserProvisioning};
