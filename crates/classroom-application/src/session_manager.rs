//! Session manager implementation.
//!
//! Owns the authenticated identity and bearer credential for the lifetime of
//! the process, and keeps the persisted copy of the credential in step with
//! memory.

use classroom_core::api::ClassroomApi;
use classroom_core::error::{ClassroomError, Result};
use classroom_core::session::{CredentialStore, SessionSnapshot, SessionStatus};
use classroom_core::user::User;
use std::sync::Arc;
use tokio::sync::{Mutex, OnceCell, RwLock, watch};

#[derive(Debug, Clone)]
struct SessionState {
    status: SessionStatus,
    credential: Option<String>,
    identity: Option<User>,
}

impl SessionState {
    fn initializing() -> Self {
        Self {
            status: SessionStatus::Initializing,
            credential: None,
            identity: None,
        }
    }

    fn authenticated(credential: String, identity: User) -> Self {
        Self {
            status: SessionStatus::Authenticated,
            credential: Some(credential),
            identity: Some(identity),
        }
    }

    fn unauthenticated() -> Self {
        Self {
            status: SessionStatus::Unauthenticated,
            credential: None,
            identity: None,
        }
    }
}

/// Manages the authentication session lifecycle.
///
/// `SessionManager` is responsible for:
/// - Restoring a persisted credential on startup (`initialize`)
/// - Signing in and persisting the new credential (`login`)
/// - Signing out and forgetting the credential (`logout`)
/// - Handing the current credential to the feed and directory use cases
///
/// State machine: `Initializing → {Authenticated, Unauthenticated}`, then
/// `Authenticated ⇄ Unauthenticated` through `logout`/`login`.
///
/// One instance exists per process; share it through `Arc`.
pub struct SessionManager {
    api: Arc<dyn ClassroomApi>,
    store: Arc<dyn CredentialStore>,
    state: RwLock<SessionState>,
    /// One-shot latch: resolution runs once, concurrent callers share the result.
    init: OnceCell<SessionStatus>,
    /// Serializes login/logout so persistence and memory never diverge.
    transition: Mutex<()>,
    status_tx: watch::Sender<SessionStatus>,
}

impl SessionManager {
    /// Creates a manager in the `Initializing` state.
    ///
    /// # Arguments
    ///
    /// * `api` - Remote directory used to sign in and resolve identities
    /// * `store` - Durable slot for the bearer credential
    pub fn new(api: Arc<dyn ClassroomApi>, store: Arc<dyn CredentialStore>) -> Self {
        let (status_tx, _) = watch::channel(SessionStatus::Initializing);
        Self {
            api,
            store,
            state: RwLock::new(SessionState::initializing()),
            init: OnceCell::new(),
            transition: Mutex::new(()),
            status_tx,
        }
    }

    /// Resolves the session from the persisted credential.
    ///
    /// Runs at most once per instance. A missing credential yields
    /// `Unauthenticated` without touching the network. A credential the
    /// remote cannot resolve is cleared from the store; the resolution error
    /// is logged and not returned.
    ///
    /// # Returns
    ///
    /// The status the session settled on.
    pub async fn initialize(&self) -> SessionStatus {
        *self.init.get_or_init(|| self.resolve()).await
    }

    async fn resolve(&self) -> SessionStatus {
        let _transition = self.transition.lock().await;

        // login() may have already settled the session
        {
            let state = self.state.read().await;
            if !state.status.is_pending() {
                return state.status;
            }
        }

        let token = match self.store.get().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                tracing::info!("[SessionManager] No persisted credential");
                return self.set_state(SessionState::unauthenticated()).await;
            }
            Err(e) => {
                let err = ClassroomError::session_resolution(format!(
                    "could not read persisted credential: {}",
                    e
                ));
                return self.discard_persisted(err).await;
            }
        };

        self.state.write().await.credential = Some(token.clone());

        match self.api.current_user(&token).await {
            Ok(user) => {
                tracing::info!("[SessionManager] Restored session for user {}", user.id);
                self.set_state(SessionState::authenticated(token, user)).await
            }
            Err(e) => {
                let err = ClassroomError::session_resolution(e.user_message());
                self.discard_persisted(err).await
            }
        }
    }

    /// Self-heal path for a credential that cannot be turned into a session.
    async fn discard_persisted(&self, err: ClassroomError) -> SessionStatus {
        tracing::warn!("[SessionManager] {}; clearing persisted credential", err);
        if let Err(e) = self.store.clear().await {
            tracing::error!("[SessionManager] Failed to clear persisted credential: {}", e);
        }
        self.set_state(SessionState::unauthenticated()).await
    }

    /// Signs in with an identifier (email) and secret.
    ///
    /// Input is trimmed; a blank identifier or secret is rejected before any
    /// network call. The credential is persisted before the in-memory session
    /// changes, and any failure leaves the previous session untouched.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: blank identifier or secret
    /// - `Authentication`: rejected, or no usable credential/identity returned
    /// - `Storage`: the credential could not be persisted
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<User> {
        let identifier = identifier.trim();
        let secret = secret.trim();
        if identifier.is_empty() {
            return Err(ClassroomError::invalid_input("email must not be empty"));
        }
        if secret.is_empty() {
            return Err(ClassroomError::invalid_input("password must not be empty"));
        }

        let _transition = self.transition.lock().await;

        let sign_in = self.api.sign_in(identifier, secret).await?;
        if sign_in.token.trim().is_empty() || sign_in.user.id.trim().is_empty() {
            return Err(ClassroomError::authentication(
                "sign-in did not return a usable session",
            ));
        }

        self.store.set(&sign_in.token).await?;

        let user = sign_in.user.clone();
        self.set_state(SessionState::authenticated(sign_in.token, sign_in.user))
            .await;
        tracing::info!("[SessionManager] Signed in as user {}", user.id);

        Ok(user)
    }

    /// Signs out: clears the persisted credential, then memory.
    ///
    /// Idempotent: when already signed out this does nothing and succeeds.
    ///
    /// # Errors
    ///
    /// - `Storage`: the persisted credential could not be removed; the
    ///   in-memory session is kept so the two stay consistent
    pub async fn logout(&self) -> Result<()> {
        let _transition = self.transition.lock().await;

        if self.status().await == SessionStatus::Unauthenticated {
            return Ok(());
        }

        self.store.clear().await?;
        self.set_state(SessionState::unauthenticated()).await;
        tracing::info!("[SessionManager] Signed out");
        Ok(())
    }

    /// Re-reads the signed-in user's profile and replaces the identity.
    ///
    /// # Errors
    ///
    /// - `NotAuthenticated`: no session
    /// - `Fetch`: the profile could not be read; the identity is unchanged
    pub async fn refresh_identity(&self) -> Result<User> {
        let token = self.require_credential().await?;
        let user = self.api.current_user(&token).await?;

        let mut state = self.state.write().await;
        // Signed out or switched accounts while the request was in flight
        if state.credential.as_deref() != Some(token.as_str()) {
            return Err(ClassroomError::NotAuthenticated);
        }
        state.identity = Some(user.clone());
        Ok(user)
    }

    async fn set_state(&self, next: SessionState) -> SessionStatus {
        let status = next.status;
        *self.state.write().await = next;
        self.status_tx.send_replace(status);
        status
    }

    // ============================================================================
    // Observers
    // ============================================================================

    pub async fn status(&self) -> SessionStatus {
        self.state.read().await.status
    }

    pub async fn identity(&self) -> Option<User> {
        self.state.read().await.identity.clone()
    }

    /// Returns the bearer credential while authenticated.
    pub async fn credential(&self) -> Option<String> {
        let state = self.state.read().await;
        match state.status {
            SessionStatus::Authenticated => state.credential.clone(),
            _ => None,
        }
    }

    /// Returns the bearer credential, or `NotAuthenticated`.
    pub async fn require_credential(&self) -> Result<String> {
        self.credential()
            .await
            .ok_or(ClassroomError::NotAuthenticated)
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.read().await;
        SessionSnapshot {
            status: state.status,
            identity: state.identity.clone(),
        }
    }

    /// Whether `user_id` is the signed-in user.
    ///
    /// Front ends use this to decide whether to offer delete actions.
    pub async fn is_current_user(&self, user_id: &str) -> bool {
        self.state
            .read()
            .await
            .identity
            .as_ref()
            .is_some_and(|identity| identity.id == user_id)
    }

    /// Subscribes to status transitions.
    pub fn subscribe(&self) -> watch::Receiver<SessionStatus> {
        self.status_tx.subscribe()
    }
}
