//! Feed synchronizer.
//!
//! Keeps a local, newest-first copy of the status feed. Every mutation is
//! sent to the server first and followed by a full refetch; the local copy is
//! never patched optimistically.

use crate::session_manager::SessionManager;
use classroom_core::api::ClassroomApi;
use classroom_core::error::{ClassroomError, Result};
use classroom_core::feed::{Comment, Post, sort_newest_first};
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::{Mutex, RwLock, RwLockWriteGuard};

/// How overlapping mutate-then-refetch cycles are scheduled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SyncPolicy {
    /// Cycles run independently; the last refetch to finish wins.
    #[default]
    Concurrent,
    /// Cycles (and standalone fetches) run one at a time.
    Serialized,
}

impl SyncPolicy {
    pub fn from_serialize_flag(serialize_mutations: bool) -> Self {
        if serialize_mutations {
            Self::Serialized
        } else {
            Self::Concurrent
        }
    }
}

/// Resets a flag when dropped, including when the owning future is cancelled.
struct FlagGuard<'a>(&'a AtomicBool);

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(counter: &'a AtomicUsize) -> Self {
        counter.fetch_add(1, Ordering::SeqCst);
        Self(counter)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Local feed and comment drafts of one signed-in user.
#[derive(Default)]
struct FeedState {
    owner: Option<String>,
    posts: Vec<Post>,
    /// Pending comment text, keyed by post id.
    drafts: HashMap<String, String>,
}

/// Synchronizes the local feed with the server.
///
/// Requires an authenticated [`SessionManager`]; every operation fails with
/// `NotAuthenticated` otherwise and performs no network call. The local feed
/// and drafts belong to the user that loaded them: once that user signs out
/// they are discarded, so the next account starts from an empty feed.
pub struct FeedSynchronizer {
    session: Arc<SessionManager>,
    api: Arc<dyn ClassroomApi>,
    state: RwLock<FeedState>,
    submitting: AtomicBool,
    fetches_in_flight: AtomicUsize,
    policy: SyncPolicy,
    cycle: Mutex<()>,
}

impl FeedSynchronizer {
    pub fn new(session: Arc<SessionManager>, api: Arc<dyn ClassroomApi>) -> Self {
        Self::with_policy(session, api, SyncPolicy::default())
    }

    pub fn with_policy(
        session: Arc<SessionManager>,
        api: Arc<dyn ClassroomApi>,
        policy: SyncPolicy,
    ) -> Self {
        Self {
            session,
            api,
            state: RwLock::new(FeedState::default()),
            submitting: AtomicBool::new(false),
            fetches_in_flight: AtomicUsize::new(0),
            policy,
            cycle: Mutex::new(()),
        }
    }

    pub fn policy(&self) -> SyncPolicy {
        self.policy
    }

    // ============================================================================
    // Fetch
    // ============================================================================

    /// Replaces the local feed with the server's, newest first.
    ///
    /// On failure the previous feed is kept.
    pub async fn fetch_feed(&self) -> Result<()> {
        let _cycle = self.enter_cycle().await;
        let token = self.session.require_credential().await?;
        self.refetch(&token).await
    }

    async fn refetch(&self, token: &str) -> Result<()> {
        let _in_flight = InFlight::enter(&self.fetches_in_flight);

        let mut posts = self.api.list_posts(token).await.inspect_err(|e| {
            tracing::warn!("[Feed] Fetch failed, keeping previous feed: {}", e);
        })?;
        sort_newest_first(&mut posts);

        let mut state = self.current_state().await;
        if self.session.credential().await.as_deref() != Some(token) {
            tracing::debug!("[Feed] Session changed during fetch, discarding result");
            return Err(ClassroomError::NotAuthenticated);
        }
        tracing::debug!("[Feed] Loaded {} posts", posts.len());
        state.posts = posts;
        Ok(())
    }

    /// Locks the local state, first emptying it if it was loaded by someone
    /// other than the signed-in user.
    async fn current_state(&self) -> RwLockWriteGuard<'_, FeedState> {
        let me = self.session.identity().await.map(|user| user.id);
        let mut state = self.state.write().await;
        if state.owner != me {
            if state.owner.is_some() {
                tracing::debug!("[Feed] Session changed, discarding local feed and drafts");
            }
            *state = FeedState {
                owner: me,
                ..FeedState::default()
            };
        }
        state
    }

    async fn enter_cycle(&self) -> Option<tokio::sync::MutexGuard<'_, ()>> {
        match self.policy {
            SyncPolicy::Serialized => Some(self.cycle.lock().await),
            SyncPolicy::Concurrent => None,
        }
    }

    /// Runs `mutation` with the current credential, then refetches.
    ///
    /// A failed mutation skips the refetch. When the mutation succeeds but the
    /// refetch fails, the fetch error is returned.
    async fn mutate_then_refetch<F, Fut>(&self, action: &str, mutation: F) -> Result<()>
    where
        F: FnOnce(String) -> Fut,
        Fut: Future<Output = Result<()>>,
    {
        let _cycle = self.enter_cycle().await;
        let token = self.session.require_credential().await?;

        mutation(token.clone()).await.inspect_err(|e| {
            tracing::warn!("[Feed] {} failed: {}", action, e);
        })?;
        tracing::debug!("[Feed] {} succeeded, refetching", action);

        self.refetch(&token).await
    }

    // ============================================================================
    // Mutations
    // ============================================================================

    /// Publishes a new post.
    ///
    /// Returns `Ok(false)` without any network call when the trimmed text is
    /// empty or another `create_post` is already in flight.
    pub async fn create_post(&self, text: &str) -> Result<bool> {
        let content = text.trim();
        if content.is_empty() {
            return Ok(false);
        }
        if self
            .submitting
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            tracing::debug!("[Feed] create_post ignored, a submission is in flight");
            return Ok(false);
        }
        let _submitting = FlagGuard(&self.submitting);

        let api = &self.api;
        self.mutate_then_refetch("create post", |token| async move {
            api.create_post(content, &token).await
        })
        .await?;
        Ok(true)
    }

    /// Flips the like state of a post.
    ///
    /// `currently_liked` is the caller's view of whether the signed-in user
    /// already likes the post: `true` sends an unlike, `false` a like.
    pub async fn toggle_like(&self, post_id: &str, currently_liked: bool) -> Result<()> {
        let api = &self.api;
        if currently_liked {
            self.mutate_then_refetch("unlike post", |token| async move {
                api.unlike(post_id, &token).await
            })
            .await
        } else {
            self.mutate_then_refetch("like post", |token| async move {
                api.like(post_id, &token).await
            })
            .await
        }
    }

    /// Toggles the like on a post in the local feed, deriving the current
    /// state from its liker set.
    ///
    /// # Errors
    ///
    /// - `InvalidInput`: the post is not in the local feed
    pub async fn toggle_like_by_id(&self, post_id: &str) -> Result<bool> {
        let post = self
            .post(post_id)
            .await
            .ok_or_else(|| ClassroomError::invalid_input(format!("unknown post '{}'", post_id)))?;
        let liked = self.is_liked_by_me(&post).await;
        self.toggle_like(post_id, liked).await?;
        Ok(!liked)
    }

    /// Adds a comment to a post.
    ///
    /// Returns `Ok(false)` without any network call for blank text. On
    /// success the draft for the post is cleared before the refetch; on
    /// failure it is kept.
    pub async fn add_comment(&self, post_id: &str, text: &str) -> Result<bool> {
        let content = text.trim();
        if content.is_empty() {
            return Ok(false);
        }

        let api = &self.api;
        self.mutate_then_refetch("add comment", |token| async move {
            api.add_comment(post_id, content, &token).await?;
            self.current_state().await.drafts.remove(post_id);
            Ok(())
        })
        .await?;
        Ok(true)
    }

    pub async fn delete_post(&self, post_id: &str) -> Result<()> {
        let api = &self.api;
        self.mutate_then_refetch("delete post", |token| async move {
            api.delete_post(post_id, &token).await
        })
        .await
    }

    pub async fn delete_comment(&self, post_id: &str, comment_id: &str) -> Result<()> {
        let api = &self.api;
        self.mutate_then_refetch("delete comment", |token| async move {
            api.delete_comment(post_id, comment_id, &token).await
        })
        .await
    }

    // ============================================================================
    // Comment drafts
    // ============================================================================

    pub async fn set_draft(&self, post_id: &str, text: &str) {
        let drafts = &mut self.current_state().await.drafts;
        if text.is_empty() {
            drafts.remove(post_id);
        } else {
            drafts.insert(post_id.to_string(), text.to_string());
        }
    }

    pub async fn draft(&self, post_id: &str) -> Option<String> {
        self.current_state().await.drafts.get(post_id).cloned()
    }

    /// Submits the pending draft for a post as a comment.
    pub async fn submit_draft(&self, post_id: &str) -> Result<bool> {
        let text = self.draft(post_id).await.unwrap_or_default();
        self.add_comment(post_id, &text).await
    }

    // ============================================================================
    // Observers
    // ============================================================================

    /// The local feed, newest first.
    pub async fn posts(&self) -> Vec<Post> {
        self.current_state().await.posts.clone()
    }

    pub async fn post(&self, post_id: &str) -> Option<Post> {
        self.current_state()
            .await
            .posts
            .iter()
            .find(|p| p.id == post_id)
            .cloned()
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting.load(Ordering::SeqCst)
    }

    pub fn is_loading(&self) -> bool {
        self.fetches_in_flight.load(Ordering::SeqCst) > 0
    }

    /// Whether the signed-in user is in the post's liker set.
    pub async fn is_liked_by_me(&self, post: &Post) -> bool {
        match self.session.identity().await {
            Some(me) => post.is_liked_by(&me.id),
            None => false,
        }
    }

    /// Whether the signed-in user authored the post.
    pub async fn can_delete_post(&self, post: &Post) -> bool {
        self.session.is_current_user(&post.created_by.id).await
    }

    /// Whether the signed-in user authored the comment.
    pub async fn can_delete_comment(&self, comment: &Comment) -> bool {
        self.session.is_current_user(&comment.created_by.id).await
    }
}
