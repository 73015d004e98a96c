//! # LessonForge Model
//!
//! Wire types shared by every crate in the workspace: the generation
//! request, the structured editable blocks, and the rendered lesson
//! payload returned by the generative backend.
//!
//! Field names match the JSON exchanged with the backend and the HTTP
//! API exactly, so these types serialize straight onto the wire.

mod types;
mod validate;

pub use types::{
    GeneratedLesson, LessonParams, NewPagePair, PracticeItem, SourceDocument, StructuredBlocks,
    ViewMode, WordProblem,
};
pub use validate::MAX_SOURCE_DOCUMENT_BYTES;
