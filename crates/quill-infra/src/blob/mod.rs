//! Blob store implementations for uploaded post images.

mod local;

pub use local::{LocalBlobConfig, LocalBlobStore};

#[cfg(feature = "http-blob")]
mod http;
#[cfg(feature = "http-blob")]
pub use self::http::{HttpBlobConfig, HttpBlobStore};
