//! # Conversational request router
//!
//! Free-text instructions arrive with an explicit, user-selected mode —
//! the router performs no natural-language intent classification. It
//! dispatches to the matching studio operation and keeps an append-only
//! transcript for user feedback. The transcript is purely observational:
//! it is never replayed and never sent to the backend.

use chrono::{DateTime, Utc};

use crate::studio::{Studio, StudioError};

/// Intent chosen by the user immediately before submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatMode {
    /// Alter the structured blocks, then re-render everything.
    Modify,
    /// Append one new page to the lesson.
    AddPage,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChatOutcome {
    Applied,
    Failed(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranscriptEntry {
    pub instruction: String,
    pub mode: ChatMode,
    pub outcome: ChatOutcome,
    pub at: DateTime<Utc>,
}

impl Studio {
    /// Dispatch one conversational instruction.
    ///
    /// Rejected outright (no transcript entry, nothing dispatched) while
    /// another request is in flight. Dispatched outcomes, success or
    /// failure, are appended to the transcript.
    pub async fn submit_chat(
        &self,
        mode: ChatMode,
        instruction: &str,
    ) -> Result<(), StudioError> {
        if self.is_busy() {
            return Err(StudioError::Busy);
        }

        let result = match mode {
            ChatMode::Modify => self.modify_blocks(instruction).await,
            ChatMode::AddPage => self.add_page(instruction).await.map(|_| ()),
        };

        // A Busy error here means we lost the race to another entry
        // point; treat it as the same no-op as the check above.
        if matches!(result, Err(StudioError::Busy)) {
            return result;
        }

        let outcome = match &result {
            Ok(()) => ChatOutcome::Applied,
            Err(e) => ChatOutcome::Failed(e.to_string()),
        };

        self.lock().transcript.push(TranscriptEntry {
            instruction: instruction.to_string(),
            mode,
            outcome,
            at: Utc::now(),
        });

        result
    }
}
