// Trade explanation via the Claude API.

pub mod client;
pub mod prompt;

pub use client::{ClaudeClient, LlmClient};
