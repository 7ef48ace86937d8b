//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;

use anyhow::bail;
use quill_infra::database::DatabaseConfig;
use quill_infra::{JwtConfig, LocalBlobConfig, RateLimitConfig};

#[cfg(feature = "http-blob")]
use quill_infra::HttpBlobConfig;

/// Default request body limit for uploads: 4.5 MB.
const DEFAULT_UPLOAD_MAX_BYTES: usize = 4_500_000;

/// Where uploaded images are stored.
#[derive(Debug, Clone)]
pub enum BlobBackend {
    Local(LocalBlobConfig),
    #[cfg(feature = "http-blob")]
    Http(HttpBlobConfig),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: Option<DatabaseConfig>,
    pub session: JwtConfig,
    /// Webhook signing secret (`whsec_...`). Webhooks answer 500 without it.
    pub signing_secret: Option<String>,
    pub blob: BlobBackend,
    pub upload_max_bytes: usize,
    /// `None` when rate limiting is disabled.
    pub rate_limit: Option<RateLimitConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse_var("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parse_var("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            config
        });

        let rate_limit = env::var("RATE_LIMIT_ENABLED")
            .map(|v| v != "false" && v != "0")
            .unwrap_or(true)
            .then(RateLimitConfig::from_env);

        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            session: JwtConfig::from_env(),
            signing_secret: env::var("SIGNING_SECRET").ok().filter(|s| !s.is_empty()),
            blob: blob_backend_from_env()?,
            upload_max_bytes: parse_var("UPLOAD_MAX_BYTES").unwrap_or(DEFAULT_UPLOAD_MAX_BYTES),
            rate_limit,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|s| s.parse().ok())
}

fn blob_backend_from_env() -> anyhow::Result<BlobBackend> {
    let backend = env::var("BLOB_BACKEND").unwrap_or_else(|_| "local".to_string());

    match backend.to_lowercase().as_str() {
        "local" => {
            let defaults = LocalBlobConfig::default();
            Ok(BlobBackend::Local(LocalBlobConfig {
                root: env::var("BLOB_LOCAL_DIR")
                    .map(PathBuf::from)
                    .unwrap_or(defaults.root),
                public_base_url: env::var("BLOB_PUBLIC_BASE_URL")
                    .unwrap_or(defaults.public_base_url),
            }))
        }
        #[cfg(feature = "http-blob")]
        "http" => {
            let Ok(api_url) = env::var("BLOB_API_URL") else {
                bail!("BLOB_BACKEND=http requires BLOB_API_URL");
            };
            let Ok(token) = env::var("BLOB_READ_WRITE_TOKEN") else {
                bail!("BLOB_BACKEND=http requires BLOB_READ_WRITE_TOKEN");
            };
            Ok(BlobBackend::Http(HttpBlobConfig { api_url, token }))
        }
        other => bail!("Unsupported BLOB_BACKEND '{}'", other),
    }
}
