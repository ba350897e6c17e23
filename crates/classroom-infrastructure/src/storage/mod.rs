//! Storage layer.
//!
//! Provides atomic file operations shared by the credential store and the
//! configuration service.

pub mod atomic_toml;

pub use atomic_toml::{AtomicTomlError, AtomicTomlFile};
