//! Credential store trait.
//!
//! Defines the interface for persisting the bearer credential across restarts.

use crate::error::Result;
use async_trait::async_trait;

/// Durable key-value slot holding the current bearer credential.
///
/// # Implementation Notes
///
/// Implementations must survive process restarts. `clear` on an empty store
/// succeeds.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Returns the persisted credential, if any.
    async fn get(&self) -> Result<Option<String>>;

    /// Persists `credential`, replacing any previous one.
    async fn set(&self, credential: &str) -> Result<()>;

    /// Removes the persisted credential.
    async fn clear(&self) -> Result<()>;
}
