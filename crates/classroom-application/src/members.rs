//! Class member directory.
//!
//! Lists the members of one enrollment year at a time.

use crate::session_manager::SessionManager;
use classroom_core::api::ClassroomApi;
use classroom_core::config::MembersConfig;
use classroom_core::error::{ClassroomError, Result};
use classroom_core::user::User;
use std::sync::Arc;
use tokio::sync::RwLock;

pub struct MemberDirectory {
    session: Arc<SessionManager>,
    api: Arc<dyn ClassroomApi>,
    class_years: Vec<String>,
    selected_year: RwLock<String>,
    members: RwLock<Vec<User>>,
}

impl MemberDirectory {
    pub fn new(
        session: Arc<SessionManager>,
        api: Arc<dyn ClassroomApi>,
        config: &MembersConfig,
    ) -> Self {
        Self {
            session,
            api,
            class_years: config.class_years.clone(),
            selected_year: RwLock::new(config.default_year.clone()),
            members: RwLock::new(Vec::new()),
        }
    }

    /// Years offered for selection, in configuration order.
    pub fn class_years(&self) -> &[String] {
        &self.class_years
    }

    pub async fn selected_year(&self) -> String {
        self.selected_year.read().await.clone()
    }

    /// Selects an enrollment year and loads its members.
    ///
    /// Years outside the configured list are accepted; the list only drives
    /// what front ends offer.
    pub async fn select_year(&self, year: &str) -> Result<()> {
        let year = year.trim();
        if year.is_empty() {
            return Err(ClassroomError::invalid_input("year must not be empty"));
        }
        if !self.class_years.iter().any(|y| y == year) {
            tracing::debug!("[Members] Year {} is not in the configured list", year);
        }

        *self.selected_year.write().await = year.to_string();
        self.refresh().await
    }

    /// Reloads the members of the selected year.
    ///
    /// A response for a year that is no longer selected is dropped. On
    /// failure the previous listing is kept.
    pub async fn refresh(&self) -> Result<()> {
        let token = self.session.require_credential().await?;
        let year = self.selected_year().await;

        let members = self
            .api
            .class_members(&year, &token)
            .await
            .inspect_err(|e| tracing::warn!("[Members] Failed to load year {}: {}", year, e))?;

        if *self.selected_year.read().await != year {
            tracing::debug!("[Members] Discarding stale listing for year {}", year);
            return Ok(());
        }

        tracing::debug!("[Members] Loaded {} members for year {}", members.len(), year);
        *self.members.write().await = members;
        Ok(())
    }

    pub async fn members(&self) -> Vec<User> {
        self.members.read().await.clone()
    }
}
