#[cfg(test)]
mod tests {
    use crate::database::entity::{post, user};
    use crate::database::postgres_base::map_db_err;
    use crate::database::postgres_repo::{PostgresPostRepository, PostgresUserRepository};
    use quill_core::domain::{Post, PostDraft, User};
    use quill_core::error::RepoError;
    use quill_core::ports::{BaseRepository, PostRepository};
    use sea_orm::{DatabaseBackend, DbErr, MockDatabase, MockExecResult};

    fn post_model(id: uuid::Uuid, author_id: &str) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            author_id: author_id.to_owned(),
            title: "Test Post".to_owned(),
            content: "<p>Content</p>".to_owned(),
            image_url: None,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post_id, "user_1")]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.id, post_id);
        assert_eq!(post.author_id, "user_1");
        assert!(post.image_url.is_none());
    }

    #[tokio::test]
    async fn test_insert_post_returns_stored_row() {
        let draft = PostDraft::new("Test Post", "<p>Content</p>");
        let post = Post::new("user_1", draft);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post.id, "user_1")]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let stored = repo.insert(post.clone()).await.unwrap();

        assert_eq!(stored.id, post.id);
        assert_eq!(stored.author_id, "user_1");
    }

    #[tokio::test]
    async fn test_update_without_matching_row_is_not_found() {
        let post = Post::new("user_1", PostDraft::new("t", "c"));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result = repo.update(post).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_update_filters_on_author() {
        let post = Post::new("user_1", PostDraft::new("Revised", "<p>New</p>"));

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let updated = repo.update(post.clone()).await.unwrap();
        assert_eq!(updated.title, "Revised");

        let log = repo.db.into_transaction_log();
        let sql = format!("{:?}", log);
        assert!(sql.contains("UPDATE"));
        assert!(sql.contains("author_id"));
        assert!(sql.contains("user_1"));
    }

    #[tokio::test]
    async fn test_delete_owned_filters_on_author() {
        let post_id = uuid::Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        repo.delete_owned(post_id, "user_1").await.unwrap();

        let log = repo.db.into_transaction_log();
        let sql = format!("{:?}", log);
        assert!(sql.contains("DELETE FROM"));
        assert!(sql.contains("author_id"));
    }

    #[tokio::test]
    async fn test_find_by_author_maps_rows() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                post_model(uuid::Uuid::new_v4(), "user_1"),
                post_model(uuid::Uuid::new_v4(), "user_1"),
            ]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let posts = repo.find_by_author("user_1").await.unwrap();

        assert_eq!(posts.len(), 2);
        assert!(posts.iter().all(|p| p.author_id == "user_1"));
    }

    #[tokio::test]
    async fn test_insert_user_duplicate_is_reported() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors(vec![DbErr::Custom(
                "duplicate key value violates unique constraint \"users_pkey\"".to_owned(),
            )])
            .into_connection();

        let repo = PostgresUserRepository::new(db);
        let user = User {
            id: "user_1".to_owned(),
            email: "ada@example.com".to_owned(),
            first_name: "Ada".to_owned(),
            last_name: "Lovelace".to_owned(),
            profile_image: None,
        };

        let result = repo.insert(user).await;

        assert!(matches!(result, Err(RepoError::Duplicate(_))));
    }

    #[tokio::test]
    async fn test_find_user_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: "user_1".to_owned(),
                email: "ada@example.com".to_owned(),
                first_name: "Ada".to_owned(),
                last_name: "Lovelace".to_owned(),
                profile_image: Some("https://img/ada.png".to_owned()),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);

        let user: Option<User> = repo.find_by_id("user_1".to_owned()).await.unwrap();

        assert_eq!(user.unwrap().profile_image.as_deref(), Some("https://img/ada.png"));
    }

    #[test]
    fn test_map_db_err_classifies_query_errors() {
        let err = map_db_err(DbErr::Custom("syntax error".to_owned()));
        assert!(matches!(err, RepoError::Query(_)));
    }
}
