use thiserror::Error;

/// Rejections raised before any network dispatch.
///
/// These are local checks: missing required generation parameters or an
/// attached source document that is unusable. They never reach the
/// generative backend.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Source document is not valid base64: {0}")]
    InvalidSourceDocument(String),

    #[error("Source document is too large ({bytes} bytes, limit {limit}). Compress the PDF or attach a smaller file.")]
    PayloadTooLarge { bytes: usize, limit: usize },
}

