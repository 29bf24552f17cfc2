//! Reddit API clients and services for communicating with Reddit over HTTP.

pub mod client;
pub mod service;
pub mod thing;

pub use client::PostFetcher;
pub use service::{RedditService, SortMode};
pub use thing::Post;
