//! User domain module.
//!
//! # Module Structure
//!
//! - `model`: User record and education sub-record

mod model;

// Re-export public API
pub use model::{Education, User};
