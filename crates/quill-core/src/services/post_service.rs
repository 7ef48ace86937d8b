//! Post lifecycle and authorization.
//!
//! Every mutation re-checks authentication and ownership against the stored
//! record; nothing from an earlier read is trusted. The caller identity is
//! always passed in explicitly, `None` meaning "not signed in".

use std::sync::Arc;

use uuid::Uuid;

use crate::domain::{AuthoredPost, EditablePost, Post, PostDraft};
use crate::error::{PostAction, PostError, RepoError};
use crate::ports::PostRepository;

/// Single boundary for post mutations and the ownership-gated editor read.
#[derive(Clone)]
pub struct PostService {
    posts: Arc<dyn PostRepository>,
}

impl PostService {
    pub fn new(posts: Arc<dyn PostRepository>) -> Self {
        Self { posts }
    }

    /// Create a post authored by the caller.
    pub async fn create(
        &self,
        current_user: Option<&str>,
        draft: PostDraft,
    ) -> Result<Post, PostError> {
        let user_id = require_user(current_user)?;
        let draft = validate(draft)?;

        let post = Post::new(user_id, draft);
        let post_id = post.id;

        match self.posts.insert(post).await {
            Ok(post) => {
                tracing::info!(post_id = %post.id, author_id = %user_id, "Post created");
                Ok(post)
            }
            Err(e) => {
                tracing::error!(error = %e, post_id = %post_id, author_id = %user_id, "Error creating post");
                Err(PostError::CreationFailed)
            }
        }
    }

    /// Fetch the fields the editor needs. Only the author may do this.
    pub async fn get_for_edit(
        &self,
        current_user: Option<&str>,
        post_id: Uuid,
    ) -> Result<EditablePost, PostError> {
        let user_id = require_user(current_user)?;
        let post = self
            .load_owned(user_id, post_id, PostAction::Edit, PostError::FetchFailed)
            .await?;

        Ok(post.into())
    }

    /// Replace title and content, and the image when a new one is supplied.
    pub async fn edit(
        &self,
        current_user: Option<&str>,
        post_id: Uuid,
        draft: PostDraft,
    ) -> Result<Post, PostError> {
        let user_id = require_user(current_user)?;
        let mut post = self
            .load_owned(user_id, post_id, PostAction::Edit, PostError::UpdateFailed)
            .await?;

        let draft = validate(draft)?;
        post.revise(draft);

        match self.posts.update(post).await {
            Ok(post) => {
                tracing::info!(post_id = %post_id, author_id = %user_id, "Post updated");
                Ok(post)
            }
            // Deleted between the ownership check and the write.
            Err(RepoError::NotFound) => Err(PostError::NotFound),
            Err(e) => {
                tracing::error!(error = %e, post_id = %post_id, "Error updating post");
                Err(PostError::UpdateFailed)
            }
        }
    }

    /// Permanently delete a post. Only the author may do this.
    pub async fn delete(&self, current_user: Option<&str>, post_id: Uuid) -> Result<(), PostError> {
        let user_id = require_user(current_user)?;
        self.load_owned(user_id, post_id, PostAction::Delete, PostError::DeletionFailed)
            .await?;

        match self.posts.delete_owned(post_id, user_id).await {
            Ok(()) => {
                tracing::info!(post_id = %post_id, author_id = %user_id, "Post deleted");
                Ok(())
            }
            Err(RepoError::NotFound) => Err(PostError::NotFound),
            Err(e) => {
                tracing::error!(error = %e, post_id = %post_id, "Error deleting post");
                Err(PostError::DeletionFailed)
            }
        }
    }

    /// Public listing, newest first.
    pub async fn list_recent(&self) -> Result<Vec<AuthoredPost>, PostError> {
        let posts = self.posts.list_with_authors().await.map_err(|e| {
            tracing::error!(error = %e, "Error listing posts");
            PostError::FetchFailed
        })?;

        tracing::debug!(count = posts.len(), "Listed posts");
        Ok(posts)
    }

    /// The caller's own posts, newest first.
    pub async fn list_mine(&self, current_user: Option<&str>) -> Result<Vec<Post>, PostError> {
        let user_id = require_user(current_user)?;

        self.posts.find_by_author(user_id).await.map_err(|e| {
            tracing::error!(error = %e, author_id = %user_id, "Error listing author posts");
            PostError::FetchFailed
        })
    }

    /// Public detail view.
    pub async fn get(&self, post_id: Uuid) -> Result<AuthoredPost, PostError> {
        self.posts
            .find_with_author(post_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, post_id = %post_id, "Error fetching post");
                PostError::FetchFailed
            })?
            .ok_or(PostError::NotFound)
    }

    async fn load_owned(
        &self,
        user_id: &str,
        post_id: Uuid,
        action: PostAction,
        on_fault: PostError,
    ) -> Result<Post, PostError> {
        let post = match self.posts.find_by_id(post_id).await {
            Ok(Some(post)) => post,
            Ok(None) => return Err(PostError::NotFound),
            Err(e) => {
                tracing::error!(error = %e, post_id = %post_id, "Error fetching post");
                return Err(on_fault);
            }
        };

        if !post.is_authored_by(user_id) {
            tracing::warn!(
                post_id = %post_id,
                user_id = %user_id,
                action = %action,
                "Denied post access to non-author"
            );
            return Err(PostError::Forbidden(action));
        }

        Ok(post)
    }
}

fn require_user(current_user: Option<&str>) -> Result<&str, PostError> {
    match current_user {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(PostError::Unauthorized),
    }
}

fn validate(mut draft: PostDraft) -> Result<PostDraft, PostError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(PostError::Validation("Title is required".to_string()));
    }
    draft.title = title.to_string();
    Ok(draft)
}
