//! Session state model.

use crate::user::User;
use serde::{Deserialize, Serialize};

/// Where the session is in its lifecycle.
///
/// `Initializing` is an explicit pending state: front ends must not guess
/// between the signed-in and signed-out views until it is left.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Initializing,
    Authenticated,
    Unauthenticated,
}

impl SessionStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::Initializing)
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated)
    }
}

/// A point-in-time copy of the session, without the credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionSnapshot {
    pub status: SessionStatus,
    pub identity: Option<User>,
}
