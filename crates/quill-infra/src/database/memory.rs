//! In-memory content store - used when no database is configured.
//!
//! Mirrors the PostgreSQL constraints that matter to callers: unique user
//! id and email, posts referencing an existing author, ownership-filtered
//! updates and deletes. Data is lost on process restart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use quill_core::domain::{AuthoredPost, Post, User};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, PostRepository, UserRepository};

/// In-memory user store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    async fn get(&self, id: &str) -> Option<User> {
        self.users.read().await.get(id).cloned()
    }
}

#[async_trait]
impl BaseRepository<User, String> for InMemoryUserRepository {
    async fn find_by_id(&self, id: String) -> Result<Option<User>, RepoError> {
        Ok(self.get(&id).await)
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut users = self.users.write().await;

        if users.contains_key(&user.id) {
            return Err(RepoError::Duplicate(format!("user {} already exists", user.id)));
        }
        if users.values().any(|u| u.email == user.email) {
            return Err(RepoError::Duplicate("email already registered".to_string()));
        }

        users.insert(user.id.clone(), user.clone());
        Ok(user)
    }
}

impl UserRepository for InMemoryUserRepository {}

/// In-memory post store. Joins authors from the shared user store.
pub struct InMemoryPostRepository {
    posts: RwLock<HashMap<Uuid, Post>>,
    users: Arc<InMemoryUserRepository>,
}

impl InMemoryPostRepository {
    pub fn new(users: Arc<InMemoryUserRepository>) -> Self {
        Self {
            posts: RwLock::new(HashMap::new()),
            users,
        }
    }

    async fn with_author(&self, post: Post) -> Option<AuthoredPost> {
        let author = self.users.get(&post.author_id).await?;
        Some(AuthoredPost { post, author })
    }
}

fn newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        if self.users.get(&post.author_id).await.is_none() {
            return Err(RepoError::Constraint(format!(
                "author {} does not exist",
                post.author_id
            )));
        }

        let mut posts = self.posts.write().await;
        if posts.contains_key(&post.id) {
            return Err(RepoError::Duplicate(format!("post {} already exists", post.id)));
        }

        posts.insert(post.id, post.clone());
        Ok(post)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let mut posts = self.posts.write().await;

        match posts.get_mut(&post.id) {
            Some(stored) if stored.author_id == post.author_id => {
                stored.title = post.title.clone();
                stored.content = post.content.clone();
                stored.image_url = post.image_url.clone();
                stored.updated_at = post.updated_at;
                Ok(stored.clone())
            }
            _ => Err(RepoError::NotFound),
        }
    }

    async fn delete_owned(&self, id: Uuid, author_id: &str) -> Result<(), RepoError> {
        let mut posts = self.posts.write().await;

        match posts.get(&id) {
            Some(stored) if stored.author_id == author_id => {
                posts.remove(&id);
                Ok(())
            }
            _ => Err(RepoError::NotFound),
        }
    }

    async fn find_by_author(&self, author_id: &str) -> Result<Vec<Post>, RepoError> {
        let mut posts: Vec<Post> = self
            .posts
            .read()
            .await
            .values()
            .filter(|p| p.author_id == author_id)
            .cloned()
            .collect();
        newest_first(&mut posts);
        Ok(posts)
    }

    async fn find_with_author(&self, id: Uuid) -> Result<Option<AuthoredPost>, RepoError> {
        let post = self.posts.read().await.get(&id).cloned();
        match post {
            Some(post) => Ok(self.with_author(post).await),
            None => Ok(None),
        }
    }

    async fn list_with_authors(&self) -> Result<Vec<AuthoredPost>, RepoError> {
        let mut posts: Vec<Post> = self.posts.read().await.values().cloned().collect();
        newest_first(&mut posts);

        let mut joined = Vec::with_capacity(posts.len());
        for post in posts {
            if let Some(authored) = self.with_author(post).await {
                joined.push(authored);
            }
        }
        Ok(joined)
    }
}
