use anyhow::Result;
use std::env;

use crate::storage::StorageConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub server_address: String,
    pub jwt_secret: String,
    pub upload_path: String,
    pub media_backend: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // DATABASE_URL takes priority; otherwise assemble the URL from the
        // individual POSTGRES_* variables with local-dev defaults.
        let database_url = env::var("DATABASE_URL").unwrap_or_else(|_| {
            let host = env::var("POSTGRES_HOST").unwrap_or_else(|_| "localhost".to_string());
            let port = env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".to_string());
            let db = env::var("POSTGRES_DB").unwrap_or_else(|_| "notewell".to_string());
            let user = env::var("POSTGRES_USER").unwrap_or_else(|_| "notewell".to_string());
            let password = env::var("POSTGRES_PASSWORD").unwrap_or_else(|_| "notewell".to_string());
            format!("postgresql://{}:{}@{}:{}/{}", user, password, host, port, db)
        });

        let jwt_secret = env::var("JWT_SECRET")
            .map_err(|_| anyhow::anyhow!("JWT_SECRET environment variable must be set"))?;

        let media_backend = env::var("MEDIA_BACKEND").unwrap_or_else(|_| "filesystem".to_string());
        if media_backend != "filesystem" {
            return Err(anyhow::anyhow!(
                "Unknown MEDIA_BACKEND '{}' (supported: filesystem)",
                media_backend
            ));
        }

        Ok(Config {
            database_url,
            server_address: env::var("SERVER_ADDRESS").unwrap_or_else(|_| "0.0.0.0:8000".to_string()),
            jwt_secret,
            upload_path: env::var("UPLOAD_PATH").unwrap_or_else(|_| "./uploads".to_string()),
            media_backend,
        })
    }

    /// Storage configuration for the backend selected by `MEDIA_BACKEND`.
    /// The selection happens once here; the rest of the system only ever
    /// sees the resulting backend instance.
    pub fn storage_config(&self) -> StorageConfig {
        StorageConfig::Filesystem {
            upload_path: self.upload_path.clone(),
        }
    }
}
