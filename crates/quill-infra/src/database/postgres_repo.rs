//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::prelude::DateTimeWithTimeZone;
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use quill_core::domain::{AuthoredPost, Post};
use quill_core::error::RepoError;
use quill_core::ports::{PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

#[async_trait]
impl UserRepository for PostgresUserRepository {}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn update(&self, post: Post) -> Result<Post, RepoError> {
        let updated_at: DateTimeWithTimeZone = post.updated_at.into();

        // Filtering on the author keeps the write itself ownership-safe.
        let result = PostEntity::update_many()
            .col_expr(post::Column::Title, Expr::value(post.title.clone()))
            .col_expr(post::Column::Content, Expr::value(post.content.clone()))
            .col_expr(post::Column::ImageUrl, Expr::value(post.image_url.clone()))
            .col_expr(post::Column::UpdatedAt, Expr::value(updated_at))
            .filter(post::Column::Id.eq(post.id))
            .filter(post::Column::AuthorId.eq(post.author_id.as_str()))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(post)
    }

    async fn delete_owned(&self, id: Uuid, author_id: &str) -> Result<(), RepoError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::AuthorId.eq(author_id))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        if result.rows_affected == 0 {
            return Err(RepoError::NotFound);
        }

        Ok(())
    }

    async fn find_by_author(&self, author_id: &str) -> Result<Vec<Post>, RepoError> {
        tracing::debug!(author_id = %author_id, "Finding posts by author");

        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author_id))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_with_author(&self, id: Uuid) -> Result<Option<AuthoredPost>, RepoError> {
        let result = PostEntity::find_by_id(id)
            .find_also_related(UserEntity)
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.and_then(join_author))
    }

    async fn list_with_authors(&self) -> Result<Vec<AuthoredPost>, RepoError> {
        let result = PostEntity::find()
            .find_also_related(UserEntity)
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().filter_map(join_author).collect())
    }
}

fn join_author((post, author): (post::Model, Option<user::Model>)) -> Option<AuthoredPost> {
    match author {
        Some(author) => Some(AuthoredPost {
            post: post.into(),
            author: author.into(),
        }),
        None => {
            // The foreign key makes this unreachable short of manual edits.
            tracing::warn!(post_id = %post.id, author_id = %post.author_id, "Post without author row");
            None
        }
    }
}
