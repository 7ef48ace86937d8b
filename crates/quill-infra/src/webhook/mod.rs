//! Identity provider webhook verification.

mod svix;

pub use svix::SvixVerifier;
