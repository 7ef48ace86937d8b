//! Application services - the business rules built on top of the ports.

mod post_service;
mod provisioning;

pub use post_service::PostService;
pub use provisioning::{ProvisionOutcome, UserProvisioning};
