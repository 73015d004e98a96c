//! # Visual Edit Sessions
//!
//! Toggles one rendered page between read-only and directly-editable,
//! and on save extracts the edited markup back into the store.
//!
//! The rendering surface is treated as a capability object with a narrow
//! contract ([`EditSurface`]) rather than a document model the session
//! reaches into. Sessions hold no copy of the content: the surface IS
//! the in-progress buffer, and cancel reloads it from the store's exact
//! stored string.

use crate::store::{LessonStore, StoreError, Track};
use thiserror::Error;

/// Narrow contract over whatever renders a page.
///
/// Implementations may wrap an embedded browser frame, a WYSIWYG widget,
/// or (for tests and the CLI) a plain string buffer.
pub trait EditSurface {
    /// Enable or disable direct editing, including any visual affordance
    /// (outline/highlight) marking the editable region.
    fn set_editable(&mut self, editable: bool);

    /// Serialize the full current rendered state, including structural
    /// changes made during the session.
    fn extract_html(&self) -> String;

    /// Discard whatever the surface currently shows and re-render from
    /// `html`.
    fn load_html(&mut self, html: &str);
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("Another page is already being edited")]
    AlreadyEditing,

    #[error("No edit session is active")]
    NotEditing,

    #[error("The English review track is read-only")]
    ReadOnlyTrack,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// One active edit: a page index on the regional track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditSession {
    pub track: Track,
    pub index: usize,
}

/// Enforces global single-session exclusivity: at most one page is in
/// the Editing state at a time.
#[derive(Debug, Default)]
pub struct SessionManager {
    active: Option<EditSession>,
}

impl SessionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<EditSession> {
        self.active
    }

    /// Idle → Editing. Only the regional track may be edited; the
    /// English track exists as an un-editable reference for review.
    pub fn begin(
        &mut self,
        store: &LessonStore,
        track: Track,
        index: usize,
        surface: &mut dyn EditSurface,
    ) -> Result<(), SessionError> {
        if self.active.is_some() {
            return Err(SessionError::AlreadyEditing);
        }
        if track == Track::English {
            return Err(SessionError::ReadOnlyTrack);
        }
        // Bounds check against the live store before enabling anything.
        store.page(track, index)?;

        surface.set_editable(true);
        self.active = Some(EditSession { track, index });
        tracing::debug!(index, "edit session started");
        Ok(())
    }

    /// Editing → Idle via save: extract the surface's full content and
    /// patch it into the store. The only path by which visual edits
    /// persist.
    pub fn save(
        &mut self,
        store: &mut LessonStore,
        surface: &mut dyn EditSurface,
    ) -> Result<u64, SessionError> {
        let session = self.active.ok_or(SessionError::NotEditing)?;

        let html = surface.extract_html();
        let version = store.patch_page(session.track, session.index, html)?;
        surface.set_editable(false);
        self.active = None;
        tracing::debug!(index = session.index, version, "edit session saved");
        Ok(version)
    }

    /// Editing → Idle via cancel: discard in-session changes and restore
    /// the surface to exactly the string the store holds for that slot.
    pub fn cancel(
        &mut self,
        store: &LessonStore,
        surface: &mut dyn EditSurface,
    ) -> Result<(), SessionError> {
        let session = self.active.ok_or(SessionError::NotEditing)?;

        let stored = store.page(session.track, session.index)?;
        surface.load_html(stored);
        surface.set_editable(false);
        self.active = None;
        tracing::debug!(index = session.index, "edit session cancelled");
        Ok(())
    }
}

/// String-backed surface for tests and headless use.
#[derive(Debug, Clone, Default)]
pub struct MemorySurface {
    html: String,
    editable: bool,
}

impl MemorySurface {
    pub fn showing(html: &str) -> Self {
        Self {
            html: html.to_string(),
            editable: false,
        }
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    /// Simulates the user typing into the editable region.
    pub fn type_content(&mut self, html: &str) {
        self.html = html.to_string();
    }
}

impl EditSurface for MemorySurface {
    fn set_editable(&mut self, editable: bool) {
        self.editable = editable;
    }

    fn extract_html(&self) -> String {
        self.html.clone()
    }

    fn load_html(&mut self, html: &str) {
        self.html = html.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lessonforge_model::{GeneratedLesson, StructuredBlocks};

    fn store() -> LessonStore {
        LessonStore::new(GeneratedLesson {
            regional_html_pages: vec!["<html>r-0</html>".to_string(), "<html>r-1</html>".to_string()],
            english_html_pages: vec!["<html>e-0</html>".to_string(), "<html>e-1</html>".to_string()],
            editable_blocks: StructuredBlocks::default(),
        })
        .unwrap()
    }

    #[test]
    fn save_persists_the_extracted_surface_content() {
        let mut store = store();
        let mut surface = MemorySurface::showing(store.page(Track::Regional, 0).unwrap());
        let mut sessions = SessionManager::new();

        sessions
            .begin(&store, Track::Regional, 0, &mut surface)
            .unwrap();
        assert!(surface.is_editable());

        surface.type_content("<html>r-0 edited</html>");
        sessions.save(&mut store, &mut surface).unwrap();

        assert_eq!(store.page(Track::Regional, 0).unwrap(), "<html>r-0 edited</html>");
        assert!(!surface.is_editable());
        assert!(sessions.active().is_none());
    }

    #[test]
    fn cancel_restores_the_exact_stored_string() {
        let store = store();
        let original = store.page(Track::Regional, 1).unwrap().to_string();
        let mut surface = MemorySurface::showing(&original);
        let mut sessions = SessionManager::new();

        sessions
            .begin(&store, Track::Regional, 1, &mut surface)
            .unwrap();
        surface.type_content("<html>scribbles</html>");
        sessions.cancel(&store, &mut surface).unwrap();

        // Byte-for-byte restoration, store untouched.
        assert_eq!(surface.extract_html(), original);
        assert_eq!(store.page(Track::Regional, 1).unwrap(), original);
        assert_eq!(store.version(), 0);
    }

    #[test]
    fn english_track_cannot_enter_editing() {
        let store = store();
        let mut surface = MemorySurface::default();
        let mut sessions = SessionManager::new();

        let err = sessions
            .begin(&store, Track::English, 0, &mut surface)
            .unwrap_err();
        assert_eq!(err, SessionError::ReadOnlyTrack);
        assert!(!surface.is_editable());
    }

    #[test]
    fn only_one_session_at_a_time() {
        let store = store();
        let mut surface = MemorySurface::default();
        let mut sessions = SessionManager::new();

        sessions
            .begin(&store, Track::Regional, 0, &mut surface)
            .unwrap();
        let err = sessions
            .begin(&store, Track::Regional, 1, &mut surface)
            .unwrap_err();
        assert_eq!(err, SessionError::AlreadyEditing);
    }

    #[test]
    fn begin_rejects_out_of_bounds_index() {
        let store = store();
        let mut surface = MemorySurface::default();
        let mut sessions = SessionManager::new();

        let err = sessions
            .begin(&store, Track::Regional, 7, &mut surface)
            .unwrap_err();
        assert!(matches!(err, SessionError::Store(_)));
        assert!(sessions.active().is_none());
    }

    #[test]
    fn save_without_session_fails() {
        let mut store = store();
        let mut surface = MemorySurface::default();
        let mut sessions = SessionManager::new();

        assert_eq!(
            sessions.save(&mut store, &mut surface).unwrap_err(),
            SessionError::NotEditing
        );
    }
}
