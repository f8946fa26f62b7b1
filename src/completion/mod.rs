//! Text completion with deterministic fallbacks.
//!
//! [`ApiCompleter`] calls the external completion service; the
//! description-rewrite and keyword-extraction helpers in [`rewrite`]
//! and [`keywords`] wrap it with deterministic substitutes so the
//! authoring pipeline keeps working when the service is unavailable or
//! misbehaving. The contract is "best available answer", never "fail
//! because the AI is imperfect".

pub mod api;
pub mod keywords;
pub mod rewrite;

use crate::error::Result;

pub use api::ApiCompleter;
pub use keywords::generate_keywords;
pub use rewrite::rewrite_description;

/// Pluggable completion backend interface.
pub trait CompletionProvider: Send + Sync {
    /// Generate text for a prompt.
    fn complete(&self, prompt: &str) -> Result<String>;
}
