use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{AuthoredPost, Post, User};
use crate::error::RepoError;

/// Generic repository trait shared by every entity store.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Fails with [`RepoError::Duplicate`] on a
    /// uniqueness violation.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository. Users are keyed by the identity provider's id.
#[async_trait]
pub trait UserRepository: BaseRepository<User, String> {}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// Overwrite title, content, image URL and `updated_at` of the post with
    /// `post.id`, only if it is still authored by `post.author_id`.
    ///
    /// Returns [`RepoError::NotFound`] when no row matched.
    async fn update(&self, post: Post) -> Result<Post, RepoError>;

    /// Delete the post with `id` if it is authored by `author_id`.
    ///
    /// Returns [`RepoError::NotFound`] when no row matched.
    async fn delete_owned(&self, id: Uuid, author_id: &str) -> Result<(), RepoError>;

    /// All posts written by `author_id`, newest first.
    async fn find_by_author(&self, author_id: &str) -> Result<Vec<Post>, RepoError>;

    /// A single post joined with its author.
    async fn find_with_author(&self, id: Uuid) -> Result<Option<AuthoredPost>, RepoError>;

    /// Every post joined with its author, newest first.
    async fn list_with_authors(&self) -> Result<Vec<AuthoredPost>, RepoError>;
}
