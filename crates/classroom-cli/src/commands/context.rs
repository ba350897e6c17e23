//! Composition root: wires configuration, storage, the HTTP client and the
//! use cases together.

use anyhow::{Result, anyhow};
use classroom_application::{FeedSynchronizer, MemberDirectory, SessionManager, SyncPolicy};
use classroom_core::api::ClassroomApi;
use classroom_core::config::ClientConfig;
use classroom_core::session::{CredentialStore, SessionStatus};
use classroom_infrastructure::{ClassroomPaths, ConfigService, FileCredentialStore};
use classroom_interaction::HttpClassroomApi;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Configuration and paths, loaded before logging is installed.
pub struct AppContext {
    pub paths: ClassroomPaths,
    pub config: ClientConfig,
    pub config_path: PathBuf,
    pub logs_dir: Option<PathBuf>,
}

/// The wired-up use cases with the session already resolved.
pub struct App {
    pub session: Arc<SessionManager>,
    pub feed: FeedSynchronizer,
    pub members: MemberDirectory,
}

impl AppContext {
    pub fn load(config_dir: Option<&Path>) -> Result<Self> {
        let paths = ClassroomPaths::new(config_dir);
        let service = ConfigService::new(&paths)?;
        let config = service.load()?;
        let logs_dir = paths.logs_dir().ok();

        Ok(Self {
            config_path: service.path(),
            paths,
            config,
            logs_dir,
        })
    }

    /// Builds the use cases and restores any persisted session.
    pub async fn connect(self) -> Result<App> {
        let api: Arc<dyn ClassroomApi> = Arc::new(HttpClassroomApi::from_config(&self.config.api)?);
        let store: Arc<dyn CredentialStore> = Arc::new(FileCredentialStore::new(&self.paths)?);

        let session = Arc::new(SessionManager::new(api.clone(), store));
        let status = session.initialize().await;
        tracing::info!("[Bootstrap] Session resolved: {:?}", status);

        let policy = SyncPolicy::from_serialize_flag(self.config.sync.serialize_mutations);
        let feed = FeedSynchronizer::with_policy(session.clone(), api.clone(), policy);
        let members = MemberDirectory::new(session.clone(), api, &self.config.members);

        Ok(App {
            session,
            feed,
            members,
        })
    }
}

impl App {
    /// Fails with a hint to sign in unless the session is authenticated.
    pub async fn require_session(&self) -> Result<()> {
        match self.session.status().await {
            SessionStatus::Authenticated => Ok(()),
            _ => Err(anyhow!("Not signed in. Run `classroom login <email>` first.")),
        }
    }
}
