//! Session domain module.
//!
//! # Module Structure
//!
//! - `model`: Session lifecycle state (`SessionStatus`, `SessionSnapshot`)
//! - `repository`: Credential persistence trait (`CredentialStore`)

mod model;
mod repository;

// Re-export public API
pub use model::{SessionSnapshot, SessionStatus};
pub use repository::CredentialStore;
