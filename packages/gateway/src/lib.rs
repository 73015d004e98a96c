//! # LessonForge Gateway
//!
//! The opaque generative-content capability the rest of the workspace
//! consumes. [`LessonGateway`] defines the four operations; the
//! [`GeminiClient`] implementation talks to Google's generative language
//! API with a JSON response schema.
//!
//! The API key lives only inside this crate's client configuration. It
//! is read from the environment, never serialized and never logged.

mod client;
mod gemini;
mod prompts;

pub use client::{GatewayError, LessonGateway};
pub use gemini::{GeminiClient, GeminiClientConfig};
