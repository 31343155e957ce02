//! Storage backend abstraction for uploaded media
//!
//! This module provides a clean abstraction over different physical storage
//! backends (local filesystem, object store, ...) with a unified interface.
//! Exactly one backend is active per process, selected by configuration at
//! startup.

use async_trait::async_trait;
use thiserror::Error;

pub mod factory;
pub mod filesystem;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    /// The artifact does not exist (any more). Surfaced so the caller can
    /// decide whether that is fatal; the orchestrator tolerates it during
    /// deletion only.
    #[error("artifact not found: {0}")]
    NotFound(String),

    #[error("invalid file name: {0}")]
    InvalidName(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Core trait that all media storage backends must implement
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Persist `content` under a backend-chosen physical name and return
    /// the public locator plus an opaque metadata blob only this backend
    /// interprets.
    ///
    /// `proposed_name` is a hint (e.g. for extension preservation), never a
    /// path component taken verbatim from untrusted input; implementations
    /// must sanitize or ignore it. Must be atomic from the caller's
    /// perspective: on failure, no partial artifact is left reachable.
    async fn save_file(
        &self,
        content: &[u8],
        proposed_name: &str,
    ) -> Result<(String, Option<String>), StorageError>;

    /// Remove the physical artifact. Not idempotent by contract: deleting
    /// an absent artifact reports `StorageError::NotFound` rather than
    /// succeeding silently.
    async fn delete_file(
        &self,
        locator: &str,
        backend_data: Option<&str>,
    ) -> Result<(), StorageError>;

    /// Human-readable identifier for this backend type, recorded on every
    /// upload so records are never serviced by a different backend later.
    fn backend_type(&self) -> &'static str;

    /// Initialize the backend (create directories, validate access, etc.)
    async fn initialize(&self) -> Result<(), StorageError>;
}

/// Storage configuration enum for the backend types this build knows about
#[derive(Debug, Clone)]
pub enum StorageConfig {
    /// Local filesystem storage
    Filesystem { upload_path: String },
}
