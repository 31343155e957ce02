//! Factory for creating the active media backend from configuration

use anyhow::Result;
use std::sync::Arc;

use super::filesystem::FilesystemBackend;
use super::{MediaBackend, StorageConfig};

/// Create and initialize the media backend selected by `config`.
///
/// Called once at process startup; the orchestrator receives the result as
/// a constructor parameter and never re-selects a backend at call time.
pub async fn create_media_backend(config: StorageConfig) -> Result<Arc<dyn MediaBackend>> {
    match config {
        StorageConfig::Filesystem { upload_path } => {
            let backend = FilesystemBackend::new(upload_path);
            backend.initialize().await?;
            Ok(Arc::new(backend))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn creates_an_initialized_filesystem_backend() {
        let dir = TempDir::new().unwrap();
        let backend = create_media_backend(StorageConfig::Filesystem {
            upload_path: dir.path().to_string_lossy().to_string(),
        })
        .await
        .unwrap();

        assert_eq!(backend.backend_type(), "filesystem");
        assert!(dir.path().join("media").is_dir());
    }
}
