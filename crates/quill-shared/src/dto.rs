//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Body of create and edit requests.
///
/// On edit, omitting `image_url` keeps the current image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostPayload {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image_url: Option<String>,
}

/// Author as shown next to a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthorResponse {
    pub id: String,
    pub name: String,
    pub profile_image: Option<String>,
}

/// A full post record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub author_id: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Fields the editor form is populated with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditablePostResponse {
    pub id: String,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub author_id: String,
}

/// Listing card: plain-text excerpt instead of the markup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostSummaryResponse {
    pub id: String,
    pub title: String,
    pub excerpt: String,
    pub image_url: Option<String>,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<AuthorResponse>,
}

/// Detail page: the post, its author, and whether the caller wrote it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostDetailResponse {
    #[serde(flatten)]
    pub post: PostResponse,
    pub author: AuthorResponse,
    pub is_author: bool,
}

/// Acknowledgement of a deletion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeletedResponse {
    pub id: String,
    pub deleted: bool,
}

/// Result of an image upload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    pub pathname: String,
}

/// A provisioned user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub profile_image: Option<String>,
}
