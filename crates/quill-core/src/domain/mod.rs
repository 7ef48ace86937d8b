//! Domain entities - the core business objects.

mod identity_event;
mod post;
mod user;

pub mod text;

pub use identity_event::{EmailAddress, IdentityEvent, USER_CREATED, UserCreatedData};
pub use post::{AuthoredPost, EditablePost, Post, PostDraft};
pub use user::{User, mask_email};
