//! # LessonForge Workspace
//!
//! Ties the pieces together: the [`Studio`] drives generation,
//! regeneration, page lifecycle and visual edits over a single lesson
//! store behind one global busy flag; the HTTP server exposes the four
//! gateway operations to browser clients while keeping the credential
//! server-side; the exporter packages the regional track into one
//! self-contained playable file.

mod export;
mod router;
mod server;
mod studio;

pub use export::playable_lesson;
pub use router::{ChatMode, ChatOutcome, TranscriptEntry};
pub use server::{api_router, serve, ApiError};
pub use studio::{Studio, StudioError};
