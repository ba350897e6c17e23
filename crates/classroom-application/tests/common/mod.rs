//! In-memory collaborators shared by the application tests.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use classroom_core::api::{ClassroomApi, SignIn};
use classroom_core::error::{ClassroomError, Result};
use classroom_core::feed::{Author, Comment, Post};
use classroom_core::session::CredentialStore;
use classroom_core::user::User;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

pub fn user(id: &str, email: &str) -> User {
    User {
        id: id.to_string(),
        firstname: String::new(),
        lastname: String::new(),
        email: email.to_string(),
        role: "user".to_string(),
        account_type: String::new(),
        confirmed: true,
        image: None,
        education: None,
    }
}

pub fn author(user: &User) -> Author {
    Author {
        id: user.id.clone(),
        email: user.email.clone(),
    }
}

pub fn timestamp(rfc3339: &str) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(rfc3339)
        .unwrap()
        .with_timezone(&Utc)
}

pub fn post(id: &str, created_at: &str, by: &User) -> Post {
    Post {
        id: id.to_string(),
        content: format!("content of {}", id),
        created_at: timestamp(created_at),
        created_by: author(by),
        likers: Vec::new(),
        comments: Vec::new(),
    }
}

// ============================================================================
// MockApi
// ============================================================================

#[derive(Default)]
struct ApiState {
    sign_in: Option<Result<SignIn>>,
    users_by_token: HashMap<String, User>,
    members_by_year: HashMap<String, Vec<User>>,
    posts: Vec<Post>,
    list_error: Option<ClassroomError>,
    mutation_error: Option<ClassroomError>,
    calls: Vec<String>,
    next_id: usize,
}

/// A classroom server held in memory.
///
/// Mutations change the server-side feed the way the real service does, so
/// a refetch after a mutation observes its effect.
#[derive(Default)]
pub struct MockApi {
    state: Mutex<ApiState>,
    /// When set, `create_post` waits for a notification before completing.
    create_gate: Mutex<Option<Arc<Notify>>>,
}

impl MockApi {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Registers an account: sign-in returns `token` and `token` resolves to `user`.
    pub fn with_account(self: &Arc<Self>, token: &str, user: User) -> Arc<Self> {
        let mut state = self.state.lock().unwrap();
        state.sign_in = Some(Ok(SignIn {
            token: token.to_string(),
            user: user.clone(),
        }));
        state.users_by_token.insert(token.to_string(), user);
        drop(state);
        Arc::clone(self)
    }

    pub fn set_sign_in(&self, result: Result<SignIn>) {
        self.state.lock().unwrap().sign_in = Some(result);
    }

    pub fn set_posts(&self, posts: Vec<Post>) {
        self.state.lock().unwrap().posts = posts;
    }

    pub fn server_posts(&self) -> Vec<Post> {
        self.state.lock().unwrap().posts.clone()
    }

    pub fn set_members(&self, year: &str, members: Vec<User>) {
        self.state
            .lock()
            .unwrap()
            .members_by_year
            .insert(year.to_string(), members);
    }

    pub fn fail_list(&self, error: Option<ClassroomError>) {
        self.state.lock().unwrap().list_error = error;
    }

    pub fn fail_mutations(&self, error: Option<ClassroomError>) {
        self.state.lock().unwrap().mutation_error = error;
    }

    pub fn gate_create_post(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.create_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| call.starts_with(prefix))
            .count()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn record(&self, call: String) {
        self.state.lock().unwrap().calls.push(call);
    }

    fn caller(&self, token: &str, resource: &'static str) -> Result<User> {
        self.state
            .lock()
            .unwrap()
            .users_by_token
            .get(token)
            .cloned()
            .ok_or_else(|| ClassroomError::fetch(resource, "Unauthorized (401)"))
    }

    /// Applies a mutation to the server-side state unless mutations are set to fail.
    fn mutate<F>(&self, call: String, token: &str, apply: F) -> Result<()>
    where
        F: FnOnce(&mut ApiState, &User) -> Result<()>,
    {
        self.record(call);
        let caller = self.caller(token, "profile")?;
        let mut state = self.state.lock().unwrap();
        if let Some(error) = state.mutation_error.clone() {
            return Err(error);
        }
        apply(&mut state, &caller)
    }
}

fn find_post<'a>(state: &'a mut ApiState, post_id: &str) -> Result<&'a mut Post> {
    state
        .posts
        .iter_mut()
        .find(|p| p.id == post_id)
        .ok_or_else(|| ClassroomError::mutation("find post", "Status not found (404)"))
}

#[async_trait]
impl ClassroomApi for MockApi {
    async fn sign_in(&self, identifier: &str, _secret: &str) -> Result<SignIn> {
        self.record(format!("sign_in:{}", identifier));
        self.state
            .lock()
            .unwrap()
            .sign_in
            .clone()
            .unwrap_or_else(|| Err(ClassroomError::authentication("Invalid email or password (401)")))
    }

    async fn current_user(&self, token: &str) -> Result<User> {
        self.record(format!("current_user:{}", token));
        self.caller(token, "profile")
    }

    async fn class_members(&self, year: &str, token: &str) -> Result<Vec<User>> {
        self.record(format!("class_members:{}", year));
        self.caller(token, "class members")?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .members_by_year
            .get(year)
            .cloned()
            .unwrap_or_default())
    }

    async fn list_posts(&self, token: &str) -> Result<Vec<Post>> {
        self.record("list_posts".to_string());
        self.caller(token, "feed")?;
        let state = self.state.lock().unwrap();
        if let Some(error) = state.list_error.clone() {
            return Err(error);
        }
        Ok(state.posts.clone())
    }

    async fn create_post(&self, content: &str, token: &str) -> Result<()> {
        let gate = self.create_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        self.mutate(format!("create_post:{}", content), token, |state, caller| {
            state.next_id += 1;
            let id = format!("new{}", state.next_id);
            state.posts.push(Post {
                id,
                content: content.to_string(),
                created_at: Utc::now(),
                created_by: author(caller),
                likers: Vec::new(),
                comments: Vec::new(),
            });
            Ok(())
        })
    }

    async fn like(&self, post_id: &str, token: &str) -> Result<()> {
        self.mutate(format!("like:{}", post_id), token, |state, caller| {
            let post = find_post(state, post_id)?;
            if !post.is_liked_by(&caller.id) {
                post.likers.push(author(caller));
            }
            Ok(())
        })
    }

    async fn unlike(&self, post_id: &str, token: &str) -> Result<()> {
        self.mutate(format!("unlike:{}", post_id), token, |state, caller| {
            let post = find_post(state, post_id)?;
            post.likers.retain(|liker| liker.id != caller.id);
            Ok(())
        })
    }

    async fn add_comment(&self, post_id: &str, content: &str, token: &str) -> Result<()> {
        self.mutate(
            format!("add_comment:{}:{}", post_id, content),
            token,
            |state, caller| {
                state.next_id += 1;
                let id = format!("c{}", state.next_id);
                let post = find_post(state, post_id)?;
                post.comments.push(Comment {
                    id,
                    content: content.to_string(),
                    created_at: Utc::now(),
                    created_by: author(caller),
                });
                Ok(())
            },
        )
    }

    async fn delete_post(&self, post_id: &str, token: &str) -> Result<()> {
        self.mutate(format!("delete_post:{}", post_id), token, |state, caller| {
            let post = find_post(state, post_id)?;
            if post.created_by.id != caller.id {
                return Err(ClassroomError::mutation(
                    "delete post",
                    "You can only delete your own post (403)",
                ));
            }
            state.posts.retain(|p| p.id != post_id);
            Ok(())
        })
    }

    async fn delete_comment(&self, post_id: &str, comment_id: &str, token: &str) -> Result<()> {
        self.mutate(
            format!("delete_comment:{}:{}", post_id, comment_id),
            token,
            |state, _caller| {
                let post = find_post(state, post_id)?;
                post.comments.retain(|c| c.id != comment_id);
                Ok(())
            },
        )
    }
}

// ============================================================================
// MockStore
// ============================================================================

#[derive(Default)]
struct StoreState {
    credential: Option<String>,
    fail_get: bool,
    fail_set: bool,
    fail_clear: bool,
    clears: usize,
}

/// Credential store held in memory, with switchable failures.
#[derive(Default)]
pub struct MockStore {
    state: Mutex<StoreState>,
}

impl MockStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn with_credential(credential: &str) -> Arc<Self> {
        let store = Self::default();
        store.state.lock().unwrap().credential = Some(credential.to_string());
        Arc::new(store)
    }

    pub fn stored(&self) -> Option<String> {
        self.state.lock().unwrap().credential.clone()
    }

    pub fn clears(&self) -> usize {
        self.state.lock().unwrap().clears
    }

    pub fn fail_get(&self) {
        self.state.lock().unwrap().fail_get = true;
    }

    pub fn fail_set(&self) {
        self.state.lock().unwrap().fail_set = true;
    }

    pub fn fail_clear(&self) {
        self.state.lock().unwrap().fail_clear = true;
    }
}

#[async_trait]
impl CredentialStore for MockStore {
    async fn get(&self) -> Result<Option<String>> {
        let state = self.state.lock().unwrap();
        if state.fail_get {
            return Err(ClassroomError::storage("credential file unreadable"));
        }
        Ok(state.credential.clone())
    }

    async fn set(&self, credential: &str) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        if state.fail_set {
            return Err(ClassroomError::storage("disk full"));
        }
        state.credential = Some(credential.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        let mut state = self.state.lock().unwrap();
        state.clears += 1;
        if state.fail_clear {
            return Err(ClassroomError::storage("read-only file system"));
        }
        state.credential = None;
        Ok(())
    }
}
