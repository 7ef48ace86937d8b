//! SeaORM entities for the content store tables.

pub mod post;
pub mod user;
