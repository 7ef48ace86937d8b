//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{BlobStore, PostRepository, TokenService, UserRepository, WebhookVerifier};
use quill_core::{PostService, UserProvisioning};
use quill_infra::database::DatabaseConnections;
use quill_infra::{
    InMemoryPostRepository, InMemoryUserRepository, JwtTokenService, LocalBlobStore,
    SvixVerifier,
};

#[cfg(feature = "postgres")]
use quill_infra::database::{PostgresPostRepository, PostgresUserRepository};

#[cfg(feature = "http-blob")]
use quill_infra::HttpBlobStore;

use crate::config::{AppConfig, BlobBackend};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub provisioning: UserProvisioning,
    pub tokens: Arc<dyn TokenService>,
    /// `None` when no signing secret is configured.
    pub webhook_verifier: Option<Arc<dyn WebhookVerifier>>,
    pub blobs: Arc<dyn BlobStore>,
    pub db: Option<DatabaseConnections>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let tokens: Arc<dyn TokenService> = Arc::new(JwtTokenService::new(config.session.clone()));

        let webhook_verifier = match &config.signing_secret {
            Some(secret) => {
                let verifier: Arc<dyn WebhookVerifier> = Arc::new(SvixVerifier::new(secret)?);
                Some(verifier)
            }
            None => {
                tracing::warn!("SIGNING_SECRET not set. Identity webhooks will be rejected.");
                None
            }
        };

        let blobs: Arc<dyn BlobStore> = match &config.blob {
            BlobBackend::Local(local) => {
                tracing::info!(root = %local.root.display(), "Using local blob store");
                Arc::new(LocalBlobStore::new(local.clone()))
            }
            #[cfg(feature = "http-blob")]
            BlobBackend::Http(http) => {
                tracing::info!(api = %http.api_url, "Using remote blob store");
                Arc::new(HttpBlobStore::new(http.clone()))
            }
        };

        let (db, users, posts) = Self::repositories(config).await?;

        tracing::info!("Application state initialized");

        Ok(Self {
            posts: PostService::new(posts),
            provisioning: UserProvisioning::new(users),
            tokens,
            webhook_verifier,
            blobs,
            db,
        })
    }

    /// State backed by in-memory repositories.
    #[cfg(test)]
    pub fn in_memory(
        tokens: Arc<dyn TokenService>,
        webhook_verifier: Option<Arc<dyn WebhookVerifier>>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        let (users, posts) = in_memory_repositories();
        Self {
            posts: PostService::new(posts),
            provisioning: UserProvisioning::new(users),
            tokens,
            webhook_verifier,
            blobs,
            db: None,
        }
    }

    #[cfg(feature = "postgres")]
    async fn repositories(
        config: &AppConfig,
    ) -> anyhow::Result<(
        Option<DatabaseConnections>,
        Arc<dyn UserRepository>,
        Arc<dyn PostRepository>,
    )> {
        let Some(db_config) = &config.database else {
            tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
            let (users, posts) = in_memory_repositories();
            return Ok((None, users, posts));
        };

        let connections = DatabaseConnections::init(db_config).await?;
        let users: Arc<dyn UserRepository> =
            Arc::new(PostgresUserRepository::new(connections.main.clone()));
        let posts: Arc<dyn PostRepository> =
            Arc::new(PostgresPostRepository::new(connections.main.clone()));
        Ok((Some(connections), users, posts))
    }

    #[cfg(not(feature = "postgres"))]
    async fn repositories(
        config: &AppConfig,
    ) -> anyhow::Result<(
        Option<DatabaseConnections>,
        Arc<dyn UserRepository>,
        Arc<dyn PostRepository>,
    )> {
        if config.database.is_some() {
            tracing::warn!("DATABASE_URL ignored: built without the postgres feature");
        }
        let (users, posts) = in_memory_repositories();
        Ok((None, users, posts))
    }
}

fn in_memory_repositories() -> (Arc<dyn UserRepository>, Arc<dyn PostRepository>) {
    let users = Arc::new(InMemoryUserRepository::new());
    let posts: Arc<dyn PostRepository> = Arc::new(InMemoryPostRepository::new(users.clone()));
    let users: Arc<dyn UserRepository> = users;
    (users, posts)
}
