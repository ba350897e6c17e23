pub mod auth;
pub mod context;
pub mod feed;
pub mod members;
