//! # Lesson Store
//!
//! Holds the two parallel page tracks (regional and English) plus the
//! structured blocks they were rendered from.
//!
//! The store is the single unit of synchronization between generated
//! content and user edits. All mutations are synchronous: a reader never
//! observes a state where one track was updated and the other was not.

use lessonforge_model::{GeneratedLesson, StructuredBlocks};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Which page track an operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Track {
    /// Learner-facing pages in the target regional language.
    Regional,
    /// Reviewer-facing English pages. Always read-only for visual edits.
    English,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StoreError {
    #[error("Track lengths differ: {regional} regional vs {english} english pages")]
    TrackLengthMismatch { regional: usize, english: usize },

    #[error("A lesson must have at least one page")]
    Empty,

    #[error("Page index {index} out of bounds (lesson has {len} pages)")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Cannot delete the last remaining page")]
    LastPage,
}

/// Store for one generated lesson.
///
/// Constructed only from a lesson that satisfies the parity invariant, so
/// a `LessonStore` value is always valid. Visual edits patch individual
/// pages here but never touch `blocks` — blocks change only through a
/// full regeneration.
#[derive(Debug, Clone)]
pub struct LessonStore {
    regional: Vec<String>,
    english: Vec<String>,
    blocks: StructuredBlocks,

    /// Increments on every successful mutation.
    version: u64,
}

impl LessonStore {
    /// Build a store from a freshly generated lesson. Rejects any payload
    /// violating the parity invariant without constructing a store.
    pub fn new(lesson: GeneratedLesson) -> Result<Self, StoreError> {
        Self::check_parity(&lesson)?;
        Ok(Self {
            regional: lesson.regional_html_pages,
            english: lesson.english_html_pages,
            blocks: lesson.editable_blocks,
            version: 0,
        })
    }

    /// Atomic full replacement after a successful regeneration.
    ///
    /// If the incoming lesson fails validation the store keeps its
    /// previous content untouched.
    pub fn replace(&mut self, lesson: GeneratedLesson) -> Result<(), StoreError> {
        Self::check_parity(&lesson)?;
        self.regional = lesson.regional_html_pages;
        self.english = lesson.english_html_pages;
        self.blocks = lesson.editable_blocks;
        self.version += 1;
        Ok(())
    }

    fn check_parity(lesson: &GeneratedLesson) -> Result<(), StoreError> {
        let (r, e) = (
            lesson.regional_html_pages.len(),
            lesson.english_html_pages.len(),
        );
        if r != e {
            return Err(StoreError::TrackLengthMismatch {
                regional: r,
                english: e,
            });
        }
        if r == 0 {
            return Err(StoreError::Empty);
        }
        Ok(())
    }

    /// Replace exactly one page on one track. Used by edit-session commit
    /// and nowhere else.
    pub fn patch_page(
        &mut self,
        track: Track,
        index: usize,
        html: String,
    ) -> Result<u64, StoreError> {
        let len = self.page_count();
        let pages = match track {
            Track::Regional => &mut self.regional,
            Track::English => &mut self.english,
        };
        let slot = pages
            .get_mut(index)
            .ok_or(StoreError::IndexOutOfBounds { index, len })?;
        *slot = html;
        self.version += 1;
        Ok(self.version)
    }

    /// Append a page to both tracks at the same new index. Returns that
    /// index.
    pub fn append_page(&mut self, regional: String, english: String) -> usize {
        self.regional.push(regional);
        self.english.push(english);
        self.version += 1;
        self.regional.len() - 1
    }

    /// Remove the page at `index` from both tracks simultaneously.
    ///
    /// Deleting the last remaining page is rejected, not silently
    /// degraded.
    pub fn delete_page(&mut self, index: usize) -> Result<(), StoreError> {
        let len = self.page_count();
        if index >= len {
            return Err(StoreError::IndexOutOfBounds { index, len });
        }
        if len == 1 {
            return Err(StoreError::LastPage);
        }
        self.regional.remove(index);
        self.english.remove(index);
        self.version += 1;
        Ok(())
    }

    pub fn page(&self, track: Track, index: usize) -> Result<&str, StoreError> {
        let pages = self.pages(track);
        pages
            .get(index)
            .map(String::as_str)
            .ok_or(StoreError::IndexOutOfBounds {
                index,
                len: pages.len(),
            })
    }

    pub fn pages(&self, track: Track) -> &[String] {
        match track {
            Track::Regional => &self.regional,
            Track::English => &self.english,
        }
    }

    pub fn page_count(&self) -> usize {
        debug_assert_eq!(self.regional.len(), self.english.len());
        self.regional.len()
    }

    pub fn blocks(&self) -> &StructuredBlocks {
        &self.blocks
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Snapshot back into the wire shape (used by the exporter and for
    /// persistence-to-file in the CLI).
    pub fn to_lesson(&self) -> GeneratedLesson {
        GeneratedLesson {
            regional_html_pages: self.regional.clone(),
            english_html_pages: self.english.clone(),
            editable_blocks: self.blocks.clone(),
        }
    }
}
