use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use lessonforge_common::ValidationError;

use crate::types::LessonParams;

/// Decoded size ceiling for an attached source document (4 MB).
pub const MAX_SOURCE_DOCUMENT_BYTES: usize = 4 * 1024 * 1024;

impl LessonParams {
    /// Reject unusable params before any network call is made.
    pub fn validate(&self) -> Result<(), ValidationError> {
        required(&self.grade, "grade")?;
        required(&self.subject, "subject")?;
        required(&self.lo_code, "loCode")?;
        required(&self.learning_objective, "learningObjective")?;
        required(&self.topic_outcome, "topicOutcome")?;
        required(&self.regional_language, "regionalLanguage")?;

        if let Some(doc) = &self.source_document {
            let bytes = BASE64
                .decode(doc.data.as_bytes())
                .map_err(|e| ValidationError::InvalidSourceDocument(e.to_string()))?;

            if bytes.len() > MAX_SOURCE_DOCUMENT_BYTES {
                return Err(ValidationError::PayloadTooLarge {
                    bytes: bytes.len(),
                    limit: MAX_SOURCE_DOCUMENT_BYTES,
                });
            }
        }

        Ok(())
    }
}

fn required(value: &str, field: &'static str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::MissingField(field));
    }
    Ok(())
}
