//! External services used by the storefront.
//!
//! - `gemini` - Gemini `generateContent` client backing the chat host

pub mod gemini;

pub use gemini::{GeminiClient, GeminiError};
