//! Remote classroom API trait.
//!
//! Defines the interface to the remote directory and status feed. The core
//! only depends on this trait; the HTTP implementation lives in
//! `classroom-interaction`.

use crate::error::Result;
use crate::feed::Post;
use crate::user::User;
use async_trait::async_trait;

/// A validated sign-in result: both halves are guaranteed present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignIn {
    pub token: String,
    pub user: User,
}

/// Remote directory and feed operations.
///
/// Every method except [`ClassroomApi::sign_in`] takes the bearer credential.
/// Implementations map transport failures and non-2xx responses to
/// [`crate::ClassroomError`]: `Authentication` for sign-in, `Fetch` for reads
/// and `Mutation` for writes.
#[async_trait]
pub trait ClassroomApi: Send + Sync {
    /// Exchanges an identifier/secret pair for a credential and identity.
    async fn sign_in(&self, identifier: &str, secret: &str) -> Result<SignIn>;

    /// Resolves the identity that owns `token`.
    async fn current_user(&self, token: &str) -> Result<User>;

    /// Lists the members enrolled in `year`.
    async fn class_members(&self, year: &str, token: &str) -> Result<Vec<User>>;

    /// Lists every post, in the server's order.
    async fn list_posts(&self, token: &str) -> Result<Vec<Post>>;

    /// Creates a post.
    ///
    /// Any accepted response counts as a stored post, whatever its body;
    /// callers read the post back through [`ClassroomApi::list_posts`].
    async fn create_post(&self, content: &str, token: &str) -> Result<()>;

    async fn like(&self, post_id: &str, token: &str) -> Result<()>;

    async fn unlike(&self, post_id: &str, token: &str) -> Result<()>;

    async fn add_comment(&self, post_id: &str, content: &str, token: &str) -> Result<()>;

    async fn delete_post(&self, post_id: &str, token: &str) -> Result<()>;

    async fn delete_comment(&self, post_id: &str, comment_id: &str, token: &str) -> Result<()>;
}
