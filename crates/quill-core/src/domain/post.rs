use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::User;

/// Post entity - a blog post owned by exactly one author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: String,
    pub title: String,
    /// Rich-text markup as produced by the editor.
    pub content: String,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Title, content and optional image URL submitted by an editor form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostDraft {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
}

impl PostDraft {
    pub fn new(title: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            content: content.into(),
            image_url: None,
        }
    }

    pub fn with_image(mut self, image_url: impl Into<String>) -> Self {
        self.image_url = Some(image_url.into());
        self
    }
}

impl Post {
    /// Create a new post authored by `author_id`.
    pub fn new(author_id: impl Into<String>, draft: PostDraft) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            author_id: author_id.into(),
            title: draft.title,
            content: draft.content,
            image_url: draft.image_url,
            created_at: now,
            updated_at: now,
        }
    }

    /// Ownership check: exact match on the stored author id.
    pub fn is_authored_by(&self, user_id: &str) -> bool {
        self.author_id == user_id
    }

    /// Apply an edit. The image is only replaced when the draft carries one.
    ///
    /// `updated_at` always moves forward by at least one microsecond, the
    /// resolution of the timestamp column, so two edits in quick succession
    /// still produce distinct, ordered timestamps.
    pub fn revise(&mut self, draft: PostDraft) {
        self.title = draft.title;
        self.content = draft.content;
        if let Some(url) = draft.image_url {
            self.image_url = Some(url);
        }

        let floor = self.updated_at + TimeDelta::microseconds(1);
        self.updated_at = Utc::now().max(floor);
    }

    /// Plain-text preview of the content for listings.
    pub fn excerpt(&self, max_chars: usize) -> String {
        super::text::excerpt(&self.content, max_chars)
    }
}

/// The subset of a post the editor needs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditablePost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub author_id: String,
}

impl From<Post> for EditablePost {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            content: post.content,
            image_url: post.image_url,
            author_id: post.author_id,
        }
    }
}

/// A post joined with its author, as shown in listings and on the detail page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthoredPost {
    pub post: Post,
    pub author: User,
}
