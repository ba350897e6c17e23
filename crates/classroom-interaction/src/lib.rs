//! HTTP interaction layer for the classroom client.
//!
//! Provides [`HttpClassroomApi`], the `reqwest` implementation of
//! [`classroom_core::api::ClassroomApi`].

pub mod http_api;
mod wire;

pub use http_api::HttpClassroomApi;
