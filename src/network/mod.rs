//! Outbound networking: HTTP client, user agents and retry policy

mod client;
mod retry;
mod user_agent;

pub use client::HttpClient;
pub use retry::RetryPolicy;
pub use user_agent::{accept_html, accept_language, generate_user_agent};
