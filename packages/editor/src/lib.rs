//! # LessonForge Editor
//!
//! Core state engine for a generated lesson.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ gateway: params/blocks → rendered lesson    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: LessonStore + edit sessions         │
//! │  - Two index-aligned page tracks            │
//! │  - Structured blocks (source of truth)      │
//! │  - Page append/delete with parity invariant │
//! │  - In-place visual edits via EditSurface    │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ workspace: orchestration + HTTP surface     │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Blocks are source of truth**: rendered pages are derived views,
//!    regenerated from blocks by the gateway.
//! 2. **One-way flow**: direct visual edits patch a single page and never
//!    flow back into the blocks; the next blocks-regeneration overwrites
//!    them.
//! 3. **Parity invariant**: `regional.len() == english.len() >= 1` holds
//!    at every observable point; no mutation exposes a half-updated pair.
//! 4. **Narrow edit contract**: the rendering surface is a capability
//!    object ([`EditSurface`]), not a document model we reach into.

mod session;
mod store;
mod view;

pub use session::{EditSession, EditSurface, MemorySurface, SessionError, SessionManager};
pub use store::{LessonStore, StoreError, Track};
pub use view::ViewState;

// Re-export model types the editor API speaks in
pub use lessonforge_model::{GeneratedLesson, StructuredBlocks, ViewMode};
