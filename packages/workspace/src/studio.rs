//! # Studio
//!
//! Single shared state object for one authoring session: the lesson
//! store, the view state, the active edit session and the request
//! parameters, guarded by one global busy flag.
//!
//! Every gateway-invoking operation acquires the busy flag first; while
//! a call is outstanding all other gateway-invoking entry points return
//! [`StudioError::Busy`] without dispatching anything. Local operations
//! (delete-page, edit save/cancel) touch no network and are not gated.
//! The store is only ever mutated after a call succeeds — a failed call
//! leaves it in its last-known-good state.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use lessonforge_common::ValidationError;
use lessonforge_editor::{
    EditSurface, LessonStore, SessionError, SessionManager, StoreError, Track, ViewState,
};
use lessonforge_gateway::{GatewayError, LessonGateway};
use lessonforge_model::{GeneratedLesson, LessonParams, StructuredBlocks, ViewMode};
use thiserror::Error;

use crate::router::TranscriptEntry;

#[derive(Error, Debug)]
pub enum StudioError {
    #[error("Another request is still in flight")]
    Busy,

    #[error("No lesson is loaded")]
    NoLesson,

    #[error("Deleting a page requires explicit confirmation")]
    DeleteNotConfirmed,

    #[error("Backend returned incomplete blocks; lesson left unchanged")]
    IncompleteBlocks,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

#[derive(Default)]
pub(crate) struct StudioState {
    pub(crate) params: Option<LessonParams>,
    pub(crate) store: Option<LessonStore>,
    pub(crate) view: ViewState,
    pub(crate) sessions: SessionManager,
    pub(crate) transcript: Vec<TranscriptEntry>,
}

pub struct Studio {
    gateway: Arc<dyn LessonGateway>,
    busy: AtomicBool,
    state: Mutex<StudioState>,
}

/// Clears the busy flag when the guarded request resolves or rejects.
struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl Studio {
    pub fn new(gateway: Arc<dyn LessonGateway>) -> Self {
        Self {
            gateway,
            busy: AtomicBool::new(false),
            state: Mutex::new(StudioState::default()),
        }
    }

    fn acquire_busy(&self) -> Result<BusyGuard<'_>, StudioError> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| StudioError::Busy)?;
        Ok(BusyGuard(&self.busy))
    }

    pub(crate) fn lock(&self) -> MutexGuard<'_, StudioState> {
        // The mutex is never held across an await, so poisoning only
        // happens if a holder panicked; propagate that.
        self.state.lock().expect("studio state poisoned")
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Initial generation from a fresh configuration.
    pub async fn generate(&self, params: LessonParams) -> Result<(), StudioError> {
        params.validate()?;
        let _guard = self.acquire_busy()?;

        let lesson = self.gateway.generate(&params).await?;

        let mut state = self.lock();
        install_lesson(&mut state, lesson)?;
        state.params = Some(params);
        show_first_page(&mut state);
        tracing::info!(pages = page_count(&state), "lesson generated");
        Ok(())
    }

    /// Re-render both tracks from (possibly hand-edited) blocks. The
    /// stored params keep their original form; the refined blocks ride
    /// along only for this call.
    pub async fn regenerate_from_blocks(
        &self,
        blocks: StructuredBlocks,
    ) -> Result<(), StudioError> {
        let _guard = self.acquire_busy()?;
        self.regenerate_while_busy(blocks).await
    }

    /// Ask the gateway to alter the blocks per a free-text instruction,
    /// then re-render everything from the result. Strictly sequential:
    /// the re-render never starts before the altered blocks are in hand.
    pub async fn modify_blocks(&self, instruction: &str) -> Result<(), StudioError> {
        let _guard = self.acquire_busy()?;

        let (current, params) = {
            let state = self.lock();
            let store = state.store.as_ref().ok_or(StudioError::NoLesson)?;
            (
                store.blocks().clone(),
                state.params.clone().ok_or(StudioError::NoLesson)?,
            )
        };

        let new_blocks = self
            .gateway
            .modify_blocks(&current, instruction, &params)
            .await?;

        if !new_blocks.is_complete() {
            return Err(StudioError::IncompleteBlocks);
        }

        self.regenerate_while_busy(new_blocks).await
    }

    async fn regenerate_while_busy(&self, blocks: StructuredBlocks) -> Result<(), StudioError> {
        let call_params = {
            let state = self.lock();
            let mut params = state.params.clone().ok_or(StudioError::NoLesson)?;
            params.refined_blocks = Some(blocks);
            params
        };

        let lesson = self.gateway.generate(&call_params).await?;

        let mut state = self.lock();
        install_lesson(&mut state, lesson)?;
        show_first_page(&mut state);
        tracing::info!(pages = page_count(&state), "lesson regenerated from blocks");
        Ok(())
    }

    /// Generate one new page pair and append it; the active index jumps
    /// to the new page.
    pub async fn add_page(&self, instruction: &str) -> Result<usize, StudioError> {
        let _guard = self.acquire_busy()?;

        let params = {
            let state = self.lock();
            state.store.as_ref().ok_or(StudioError::NoLesson)?;
            state.params.clone().ok_or(StudioError::NoLesson)?
        };

        let pair = self.gateway.add_page(&params, instruction).await?;

        let mut state = self.lock();
        let store = state.store.as_mut().ok_or(StudioError::NoLesson)?;
        let index = store.append_page(pair.regional, pair.english);
        let count = store.page_count();
        state.view.go_to(index, count);
        tracing::info!(index, "page appended");
        Ok(index)
    }

    /// Delete the page at `index` from both tracks. Local-only, so not
    /// gated by the busy flag, but destructive and therefore requiring
    /// explicit confirmation. The last remaining page cannot be deleted.
    pub fn delete_page(&self, index: usize, confirmed: bool) -> Result<(), StudioError> {
        if !confirmed {
            return Err(StudioError::DeleteNotConfirmed);
        }

        let mut state = self.lock();
        let store = state.store.as_mut().ok_or(StudioError::NoLesson)?;
        store.delete_page(index)?;
        let count = store.page_count();
        state.view.clamp(count);
        tracing::info!(index, remaining = count, "page deleted");
        Ok(())
    }

    /// Targeted rewrite of one block fragment. Returns the new text for
    /// the caller's draft; the store is not touched.
    pub async fn rewrite_block(
        &self,
        block_key: &str,
        current_text: &str,
        instruction: &str,
    ) -> Result<String, StudioError> {
        let _guard = self.acquire_busy()?;

        let params = {
            let state = self.lock();
            state.params.clone().ok_or(StudioError::NoLesson)?
        };

        let text = self
            .gateway
            .rewrite_fragment(block_key, current_text, instruction, &params)
            .await?;
        Ok(text)
    }

    // Visual edit sessions (local, synchronous, never gated)

    pub fn begin_edit(
        &self,
        track: Track,
        index: usize,
        surface: &mut dyn EditSurface,
    ) -> Result<(), StudioError> {
        let mut state = self.lock();
        let StudioState {
            store, sessions, ..
        } = &mut *state;
        let store = store.as_ref().ok_or(StudioError::NoLesson)?;
        sessions.begin(store, track, index, surface)?;
        Ok(())
    }

    pub fn save_edit(&self, surface: &mut dyn EditSurface) -> Result<u64, StudioError> {
        let mut state = self.lock();
        let StudioState {
            store, sessions, ..
        } = &mut *state;
        let store = store.as_mut().ok_or(StudioError::NoLesson)?;
        Ok(sessions.save(store, surface)?)
    }

    pub fn cancel_edit(&self, surface: &mut dyn EditSurface) -> Result<(), StudioError> {
        let mut state = self.lock();
        let StudioState {
            store, sessions, ..
        } = &mut *state;
        let store = store.as_ref().ok_or(StudioError::NoLesson)?;
        sessions.cancel(store, surface)?;
        Ok(())
    }

    // Views and snapshots

    pub fn set_view_mode(&self, mode: ViewMode) {
        self.lock().view.set_mode(mode);
    }

    pub fn view_mode(&self) -> ViewMode {
        self.lock().view.mode
    }

    pub fn go_to_page(&self, index: usize) -> Result<(), StudioError> {
        let mut state = self.lock();
        let count = state
            .store
            .as_ref()
            .ok_or(StudioError::NoLesson)?
            .page_count();
        state.view.go_to(index, count);
        Ok(())
    }

    pub fn active_page_index(&self) -> usize {
        self.lock().view.page_index()
    }

    pub fn page_count(&self) -> usize {
        self.lock()
            .store
            .as_ref()
            .map(LessonStore::page_count)
            .unwrap_or(0)
    }

    pub fn page(&self, track: Track, index: usize) -> Result<String, StudioError> {
        let state = self.lock();
        let store = state.store.as_ref().ok_or(StudioError::NoLesson)?;
        Ok(store.page(track, index)?.to_string())
    }

    pub fn blocks(&self) -> Option<StructuredBlocks> {
        self.lock().store.as_ref().map(|s| s.blocks().clone())
    }

    pub fn lesson(&self) -> Option<GeneratedLesson> {
        self.lock().store.as_ref().map(LessonStore::to_lesson)
    }

    pub fn params(&self) -> Option<LessonParams> {
        self.lock().params.clone()
    }

    pub fn transcript(&self) -> Vec<TranscriptEntry> {
        self.lock().transcript.clone()
    }

    /// Abandon the lesson and return to the configuration form. Full
    /// reset: store, params, transcript and view are all cleared.
    pub fn reset(&self) {
        let mut state = self.lock();
        *state = StudioState::default();
        tracing::info!("studio reset");
    }
}

fn install_lesson(state: &mut StudioState, lesson: GeneratedLesson) -> Result<(), StoreError> {
    match &mut state.store {
        Some(store) => store.replace(lesson),
        None => {
            state.store = Some(LessonStore::new(lesson)?);
            Ok(())
        }
    }
}

fn show_first_page(state: &mut StudioState) {
    let count = page_count(state);
    state.view.set_mode(ViewMode::Split);
    state.view.go_to(0, count);
}

fn page_count(state: &StudioState) -> usize {
    state.store.as_ref().map(LessonStore::page_count).unwrap_or(0)
}
