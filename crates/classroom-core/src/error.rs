//! Error types for the classroom client.

use thiserror::Error;

/// A shared error type for the entire classroom client.
///
/// Variants follow the failure taxonomy of the client: authentication,
/// session resolution, reads (`Fetch`) and writes (`Mutation`), plus the
/// ambient storage/serialization/configuration failures.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ClassroomError {
    /// Sign-in was rejected or returned an unusable payload.
    #[error("Authentication failed: {0}")]
    Authentication(String),

    /// A persisted credential could not be turned back into a session.
    #[error("Session resolution failed: {0}")]
    SessionResolution(String),

    /// A read operation (feed, members, profile) failed.
    #[error("Failed to fetch {resource}: {message}")]
    Fetch {
        resource: &'static str,
        message: String,
    },

    /// A write operation (post, like, comment, delete) failed.
    #[error("Failed to {action}: {message}")]
    Mutation {
        action: &'static str,
        message: String,
    },

    /// An operation that needs a bearer credential ran without a session.
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Caller input rejected before any I/O.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Credential store or other local persistence failed.
    #[error("Storage error: {message}")]
    Storage { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization {
        format: String, // "TOML", "JSON", etc.
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Internal error (should not happen in normal operation)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ClassroomError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates an Authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication(message.into())
    }

    /// Creates a SessionResolution error
    pub fn session_resolution(message: impl Into<String>) -> Self {
        Self::SessionResolution(message.into())
    }

    /// Creates a Fetch error for the named resource
    pub fn fetch(resource: &'static str, message: impl Into<String>) -> Self {
        Self::Fetch {
            resource,
            message: message.into(),
        }
    }

    /// Creates a Mutation error for the named action
    pub fn mutation(action: &'static str, message: impl Into<String>) -> Self {
        Self::Mutation {
            action,
            message: message.into(),
        }
    }

    /// Creates an InvalidInput error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Creates a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an Internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    // ============================================================================
    // Type checking methods
    // ============================================================================

    /// Check if this is an Authentication error
    pub fn is_authentication(&self) -> bool {
        matches!(self, Self::Authentication(_))
    }

    /// Check if this is a Fetch error
    pub fn is_fetch(&self) -> bool {
        matches!(self, Self::Fetch { .. })
    }

    /// Check if this is a Mutation error
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Mutation { .. })
    }

    /// Check if this is a NotAuthenticated error
    pub fn is_not_authenticated(&self) -> bool {
        matches!(self, Self::NotAuthenticated)
    }

    /// Check if this is an InvalidInput error
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Self::InvalidInput(_))
    }

    /// Returns the human-readable part of the error without the category prefix.
    ///
    /// Used by front ends that show the server's message inline.
    pub fn user_message(&self) -> String {
        match self {
            Self::Authentication(message)
            | Self::SessionResolution(message)
            | Self::InvalidInput(message)
            | Self::Config(message)
            | Self::Internal(message) => message.clone(),
            Self::Fetch { message, .. }
            | Self::Mutation { message, .. }
            | Self::Storage { message }
            | Self::Serialization { message, .. } => message.clone(),
            Self::NotAuthenticated => "Please sign in first".to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for ClassroomError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for ClassroomError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for ClassroomError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for ClassroomError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, ClassroomError>`.
pub type Result<T> = std::result::Result<T, ClassroomError>;
