//! Local filesystem media backend implementation

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{info, warn};

use super::{MediaBackend, StorageError};

/// Opaque per-upload metadata for this backend. Serialized into the record's
/// `backend_data` column; nothing outside this module reads it.
#[derive(Debug, Serialize, Deserialize)]
struct FilesystemBackendData {
    path: String,
}

/// Local filesystem storage backend
pub struct FilesystemBackend {
    upload_path: String,
}

impl FilesystemBackend {
    /// Create a new filesystem backend rooted at `upload_path`
    pub fn new(upload_path: String) -> Self {
        Self { upload_path }
    }

    /// Directory holding final media artifacts
    pub fn media_dir(&self) -> PathBuf {
        Path::new(&self.upload_path).join("media")
    }

    /// Directory holding in-flight writes before they are renamed into place
    fn tmp_dir(&self) -> PathBuf {
        Path::new(&self.upload_path).join("tmp")
    }

    /// Resolve the physical path of a stored artifact.
    ///
    /// The backend data blob is authoritative; when it is missing or
    /// unreadable (older records, manual edits), fall back to the locator
    /// under the media directory.
    fn resolve_path(&self, locator: &str, backend_data: Option<&str>) -> Result<PathBuf, StorageError> {
        if let Some(raw) = backend_data {
            match serde_json::from_str::<FilesystemBackendData>(raw) {
                Ok(data) => {
                    let path = PathBuf::from(&data.path);
                    if path.starts_with(&self.upload_path) {
                        return Ok(path);
                    }
                    warn!(
                        "backend data for '{}' points outside the upload root, falling back to locator",
                        locator
                    );
                }
                Err(e) => {
                    warn!("unreadable backend data for '{}': {}", locator, e);
                }
            }
        }

        Ok(self.media_dir().join(sanitize_file_name(locator)?))
    }
}

/// Reduce an untrusted name hint to a single safe path component.
///
/// Rejects rather than rewrites: the caller derives names from generated
/// identifiers, so anything that trips these checks is hostile or corrupt
/// input, not a filename worth salvaging.
fn sanitize_file_name(proposed: &str) -> Result<String, StorageError> {
    if proposed.is_empty() {
        return Err(StorageError::InvalidName("empty file name".to_string()));
    }
    if proposed.len() > 255 {
        return Err(StorageError::InvalidName("file name too long".to_string()));
    }
    if proposed.contains('/') || proposed.contains('\\') {
        return Err(StorageError::InvalidName(format!(
            "file name contains path separators: {}",
            proposed
        )));
    }
    if proposed == "." || proposed == ".." || proposed.starts_with('.') {
        return Err(StorageError::InvalidName(format!(
            "file name is a dot path: {}",
            proposed
        )));
    }
    if proposed.chars().any(|c| c.is_control()) || proposed.contains('\0') {
        return Err(StorageError::InvalidName(
            "file name contains control characters".to_string(),
        ));
    }

    Ok(proposed.to_string())
}

#[async_trait]
impl MediaBackend for FilesystemBackend {
    async fn save_file(
        &self,
        content: &[u8],
        proposed_name: &str,
    ) -> Result<(String, Option<String>), StorageError> {
        let file_name = sanitize_file_name(proposed_name)?;

        let media_dir = self.media_dir();
        let tmp_dir = self.tmp_dir();
        fs::create_dir_all(&media_dir).await?;
        fs::create_dir_all(&tmp_dir).await?;

        let tmp_path = tmp_dir.join(format!("{}.partial", file_name));
        let final_path = media_dir.join(&file_name);

        // Write to the tmp directory first and rename into place so a
        // failed write never leaves a partial artifact reachable under
        // media/.
        if let Err(e) = fs::write(&tmp_path, content).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&tmp_path, &final_path).await {
            let _ = fs::remove_file(&tmp_path).await;
            return Err(e.into());
        }

        info!("stored media file: {}", final_path.display());

        let backend_data = serde_json::to_string(&FilesystemBackendData {
            path: final_path.to_string_lossy().to_string(),
        })
        .map_err(|e| StorageError::Io(std::io::Error::other(e)))?;

        Ok((file_name, Some(backend_data)))
    }

    async fn delete_file(
        &self,
        locator: &str,
        backend_data: Option<&str>,
    ) -> Result<(), StorageError> {
        let path = self.resolve_path(locator, backend_data)?;

        match fs::remove_file(&path).await {
            Ok(()) => {
                info!("deleted media file: {}", path.display());
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(locator.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    fn backend_type(&self) -> &'static str {
        "filesystem"
    }

    async fn initialize(&self) -> Result<(), StorageError> {
        fs::create_dir_all(self.media_dir()).await?;
        fs::create_dir_all(self.tmp_dir()).await?;

        // Sweep partials left behind by a crash mid-save. The matching
        // records never existed, so these artifacts are unreachable.
        let mut entries = fs::read_dir(self.tmp_dir()).await?;
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("partial") {
                warn!("removing stale partial upload: {}", path.display());
                let _ = fs::remove_file(&path).await;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_backend() -> (FilesystemBackend, TempDir) {
        let dir = TempDir::new().unwrap();
        let backend = FilesystemBackend::new(dir.path().to_string_lossy().to_string());
        (backend, dir)
    }

    #[tokio::test]
    async fn save_round_trips_content_through_backend_data_path() {
        let (backend, _dir) = test_backend();
        let content = b"not really a png, but bytes are bytes down here";

        let (locator, backend_data) = backend.save_file(content, "abc123.png").await.unwrap();
        assert_eq!(locator, "abc123.png");

        let data: FilesystemBackendData =
            serde_json::from_str(backend_data.as_deref().unwrap()).unwrap();
        let stored = fs::read(&data.path).await.unwrap();
        assert_eq!(stored, content);
    }

    #[tokio::test]
    async fn save_leaves_no_partials_behind() {
        let (backend, _dir) = test_backend();
        backend.save_file(b"content", "abc123.png").await.unwrap();

        let mut entries = fs::read_dir(backend.tmp_dir()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_rejects_traversal_and_separator_names() {
        let (backend, _dir) = test_backend();

        for name in ["../escape.png", "a/b.png", "..", ".hidden", "", "a\\b.png"] {
            let result = backend.save_file(b"content", name).await;
            assert!(
                matches!(result, Err(StorageError::InvalidName(_))),
                "name {:?} should have been rejected",
                name
            );
        }

        // Nothing may have landed in media/ for any of the rejected names
        fs::create_dir_all(backend.media_dir()).await.unwrap();
        let mut entries = fs::read_dir(backend.media_dir()).await.unwrap();
        assert!(entries.next_entry().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn delete_removes_artifact_and_reports_absence_afterwards() {
        let (backend, _dir) = test_backend();
        let (locator, backend_data) = backend.save_file(b"content", "gone.png").await.unwrap();

        backend
            .delete_file(&locator, backend_data.as_deref())
            .await
            .unwrap();

        let second = backend.delete_file(&locator, backend_data.as_deref()).await;
        assert!(matches!(second, Err(StorageError::NotFound(_))));
    }

    #[tokio::test]
    async fn delete_falls_back_to_locator_without_backend_data() {
        let (backend, _dir) = test_backend();
        let (locator, _) = backend.save_file(b"content", "fallback.png").await.unwrap();

        backend.delete_file(&locator, None).await.unwrap();
        assert!(!backend.media_dir().join(&locator).exists());
    }

    #[tokio::test]
    async fn delete_ignores_backend_data_escaping_the_upload_root() {
        let (backend, _dir) = test_backend();
        backend.save_file(b"content", "kept.png").await.unwrap();

        let outside = TempDir::new().unwrap();
        let victim = outside.path().join("victim.txt");
        fs::write(&victim, b"precious").await.unwrap();

        let forged = serde_json::to_string(&FilesystemBackendData {
            path: victim.to_string_lossy().to_string(),
        })
        .unwrap();

        // The forged path is outside the upload root, so the backend falls
        // back to the locator; the outside file must survive.
        backend.delete_file("kept.png", Some(&forged)).await.unwrap();
        assert!(victim.exists());
    }

    #[tokio::test]
    async fn initialize_creates_layout_and_sweeps_stale_partials() {
        let (backend, _dir) = test_backend();

        fs::create_dir_all(backend.tmp_dir()).await.unwrap();
        let stale = backend.tmp_dir().join("crashed-upload.png.partial");
        fs::write(&stale, b"half written").await.unwrap();

        backend.initialize().await.unwrap();

        assert!(backend.media_dir().is_dir());
        assert!(!stale.exists());
    }
}
