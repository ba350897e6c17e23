pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod session;
pub mod text;
pub mod user;

// Re-export common error type
pub use error::{ClassroomError, Result};
