//! Application use cases for the classroom client.
//!
//! - [`SessionManager`]: sign-in state and the persisted credential
//! - [`FeedSynchronizer`]: the status feed, always mutate-then-refetch
//! - [`MemberDirectory`]: class member listings by enrollment year

pub mod feed_sync;
pub mod members;
pub mod session_manager;

pub use feed_sync::{FeedSynchronizer, SyncPolicy};
pub use members::MemberDirectory;
pub use session_manager::SessionManager;
