//! View-mode and page-index state, clamped to the live page count.

use lessonforge_model::ViewMode;

/// Transient UI state: which screen is shown and which page index is
/// current. The index is re-clamped whenever the page count changes so
/// it never points past the end of the tracks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ViewState {
    pub mode: ViewMode,
    page_index: usize,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        self.mode = mode;
    }

    /// Jump to `index`, clamped to `[0, page_count - 1]`.
    pub fn go_to(&mut self, index: usize, page_count: usize) {
        self.page_index = index.min(page_count.saturating_sub(1));
    }

    /// Re-clamp after the page count changed (e.g. a delete).
    pub fn clamp(&mut self, page_count: usize) {
        self.page_index = self.page_index.min(page_count.saturating_sub(1));
    }

    /// Reset to the configuration form with no lesson loaded.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_on_the_form_at_page_zero() {
        let view = ViewState::new();
        assert_eq!(view.mode, ViewMode::Form);
        assert_eq!(view.page_index(), 0);
    }

    #[test]
    fn go_to_clamps_past_the_end() {
        let mut view = ViewState::new();
        view.go_to(10, 3);
        assert_eq!(view.page_index(), 2);
    }

    #[test]
    fn clamp_pulls_a_dangling_index_back() {
        let mut view = ViewState::new();
        view.go_to(2, 3);
        // A delete shrank the lesson to 2 pages.
        view.clamp(2);
        assert_eq!(view.page_index(), 1);
    }

    #[test]
    fn clamp_leaves_valid_indices_alone() {
        let mut view = ViewState::new();
        view.go_to(1, 3);
        view.clamp(3);
        assert_eq!(view.page_index(), 1);
    }
}
