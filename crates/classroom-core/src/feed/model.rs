//! Status feed domain models.

use crate::user::User;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;

/// Reference to the account that authored or liked something.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub email: String,
}

/// A comment on a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Author,
}

impl Comment {
    pub fn is_authored_by(&self, user: &User) -> bool {
        self.created_by.id == user.id
    }
}

/// A status post with its likers and comments.
///
/// `likers` is a set keyed by user id: duplicates sent by the server are
/// dropped on decode, keeping the first occurrence. `comments` keeps the
/// server's order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(rename = "_id")]
    pub id: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub created_by: Author,
    #[serde(rename = "like", default, deserialize_with = "unique_likers")]
    pub likers: Vec<Author>,
    #[serde(rename = "comment", default)]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn like_count(&self) -> usize {
        self.likers.len()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    /// Whether `user_id` is in the liker set.
    pub fn is_liked_by(&self, user_id: &str) -> bool {
        self.likers.iter().any(|liker| liker.id == user_id)
    }

    /// Whether `user` may be offered the delete affordance for this post.
    pub fn is_authored_by(&self, user: &User) -> bool {
        self.created_by.id == user.id
    }

    pub fn comment(&self, comment_id: &str) -> Option<&Comment> {
        self.comments.iter().find(|c| c.id == comment_id)
    }
}

fn unique_likers<'de, D>(deserializer: D) -> Result<Vec<Author>, D::Error>
where
    D: Deserializer<'de>,
{
    let likers = Option::<Vec<Author>>::deserialize(deserializer)?.unwrap_or_default();
    let mut seen = HashSet::new();
    Ok(likers
        .into_iter()
        .filter(|liker| seen.insert(liker.id.clone()))
        .collect())
}

/// Orders posts newest first.
///
/// Posts sharing a timestamp are ordered by id so that the result does not
/// depend on the order the server happened to send them in.
pub fn sort_newest_first(posts: &mut [Post]) {
    posts.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
