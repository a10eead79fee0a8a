//! Claude API integration for logo design feedback.
//!
//! A single-turn Messages API call: the logo as an image block plus an
//! instruction asking for `{"score", "suggestions"}` JSON.

mod client;
mod error;
pub mod types;

pub use client::ClaudeClient;
pub use error::ClaudeError;
