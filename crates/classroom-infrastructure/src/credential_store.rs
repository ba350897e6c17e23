//! File-backed credential store.
//!
//! Persists the bearer credential to `credential.toml` so a session survives
//! process restarts.

use crate::paths::ClassroomPaths;
use crate::storage::{AtomicTomlError, AtomicTomlFile};
use classroom_core::error::{ClassroomError, Result};
use classroom_core::session::CredentialStore;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;

/// On-disk layout of `credential.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoredCredential {
    token: String,
}

impl From<AtomicTomlError> for ClassroomError {
    fn from(err: AtomicTomlError) -> Self {
        match err {
            AtomicTomlError::IoError(e) => e.into(),
            AtomicTomlError::TomlError(e) => e.into(),
            AtomicTomlError::TomlSerError(e) => e.into(),
        }
    }
}

/// Credential store backed by a single TOML file.
///
/// File I/O runs on the blocking pool so callers on the async runtime are
/// never stalled by the fsync in `set`.
///
/// # Security Note
///
/// The token is stored in plaintext; the file is created with permissions
/// 600 on Unix.
#[derive(Clone)]
pub struct FileCredentialStore {
    file: Arc<AtomicTomlFile<StoredCredential>>,
}

impl FileCredentialStore {
    /// Creates a store at the default location (`<config_dir>/credential.toml`).
    pub fn new(paths: &ClassroomPaths) -> Result<Self> {
        let path = paths
            .credential_file()
            .map_err(|e| ClassroomError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a store at a custom path (for testing).
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            file: Arc::new(AtomicTomlFile::new(path).with_mode(0o600)),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.file.path().to_path_buf()
    }

    async fn run_blocking<R, F>(&self, f: F) -> Result<R>
    where
        R: Send + 'static,
        F: FnOnce(&AtomicTomlFile<StoredCredential>) -> std::result::Result<R, AtomicTomlError>
            + Send
            + 'static,
    {
        let file = self.file.clone();
        tokio::task::spawn_blocking(move || f(&file))
            .await
            .map_err(|e| ClassroomError::internal(format!("Failed to join task: {}", e)))?
            .map_err(ClassroomError::from)
    }
}

#[async_trait::async_trait]
impl CredentialStore for FileCredentialStore {
    async fn get(&self) -> Result<Option<String>> {
        let stored = self.run_blocking(|file| file.load()).await?;
        Ok(stored
            .map(|s| s.token)
            .filter(|token| !token.trim().is_empty()))
    }

    async fn set(&self, credential: &str) -> Result<()> {
        let stored = StoredCredential {
            token: credential.to_string(),
        };
        self.run_blocking(move |file| file.save(&stored)).await?;
        tracing::debug!("[CredentialStore] Credential persisted");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.run_blocking(|file| file.remove()).await?;
        tracing::debug!("[CredentialStore] Credential cleared");
        Ok(())
    }
}
