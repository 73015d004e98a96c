use async_trait::async_trait;
use lessonforge_model::{GeneratedLesson, LessonParams, NewPagePair, StructuredBlocks};
use thiserror::Error;

/// Errors from the generative backend boundary.
///
/// None of these are retried automatically; they bubble to the caller
/// and the lesson store is never mutated on the error path.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GatewayError {
    #[error("API key not configured. Set GEMINI_API_KEY in the server environment.")]
    MissingApiKey,

    #[error("HTTP transport error: {0}")]
    Http(String),

    #[error("Backend error (HTTP {status}): {message}")]
    Backend { status: u16, message: String },

    #[error("Backend returned an unusable response: {0}")]
    MalformedResponse(String),
}

impl GatewayError {
    /// Best-effort classified message for display. The backend is opaque;
    /// beyond a few well-known statuses we pass its message through.
    pub fn user_message(&self) -> String {
        match self {
            GatewayError::Backend { status: 429, .. } => {
                "The generation service is over quota or rate-limited. Wait a moment and try again."
                    .to_string()
            }
            GatewayError::Backend { status: 403, .. } => {
                "The configured API key was rejected by the generation service.".to_string()
            }
            other => other.to_string(),
        }
    }
}

/// The opaque generative capability consumed by this system.
///
/// One implementation talks to the real backend; tests substitute their
/// own. Every operation maps a structured request to a structured
/// response and nothing else — no state lives behind this trait.
#[async_trait]
pub trait LessonGateway: Send + Sync {
    /// Full generation: two index-aligned page tracks plus editable
    /// blocks. When `params.refined_blocks` is present the backend
    /// re-renders strictly from those blocks.
    async fn generate(&self, params: &LessonParams) -> Result<GeneratedLesson, GatewayError>;

    /// Apply a free-text instruction to the blocks and return a complete
    /// replacement object (never a partial patch).
    async fn modify_blocks(
        &self,
        current: &StructuredBlocks,
        instruction: &str,
        params: &LessonParams,
    ) -> Result<StructuredBlocks, GatewayError>;

    /// Generate exactly one new page per track.
    async fn add_page(
        &self,
        params: &LessonParams,
        instruction: &str,
    ) -> Result<NewPagePair, GatewayError>;

    /// Rewrite one text fragment of one block.
    async fn rewrite_fragment(
        &self,
        block_key: &str,
        current_text: &str,
        instruction: &str,
        params: &LessonParams,
    ) -> Result<String, GatewayError>;
}
