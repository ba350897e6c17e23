//! Status feed domain module.
//!
//! # Module Structure
//!
//! - `model`: `Post`, `Comment`, `Author` and the feed ordering rule

mod model;

// Re-export public API
pub use model::{Author, Comment, Post, sort_newest_first};
