//! Shared test support: a scriptable in-memory gateway.
#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use lessonforge_gateway::{GatewayError, LessonGateway};
use lessonforge_model::{
    GeneratedLesson, LessonParams, NewPagePair, PracticeItem, StructuredBlocks, WordProblem,
};
use tokio::sync::Notify;

pub fn sample_params() -> LessonParams {
    LessonParams {
        grade: "3".to_string(),
        subject: "Maths".to_string(),
        lo_code: "MT03A01".to_string(),
        learning_objective: "Subtract 3-digit numbers with borrowing".to_string(),
        topic_outcome: "Solves subtraction word problems".to_string(),
        regional_language: "Hindi".to_string(),
        context_text: None,
        source_document: None,
        custom_icon: None,
        refined_blocks: None,
    }
}

pub fn complete_blocks(title: &str) -> StructuredBlocks {
    StructuredBlocks {
        title: title.to_string(),
        objective: "Subtract 3-digit numbers".to_string(),
        intro_text: "Sometimes we need to borrow from the next place.".to_string(),
        worked_example_steps: vec!["Line up the digits".to_string(), "Borrow".to_string()],
        practice_questions: vec![PracticeItem {
            question: "458 - 123 = ?".to_string(),
            answer: "335".to_string(),
        }],
        word_problem: WordProblem {
            question: "Ravi had 458 marbles and gave away 123.".to_string(),
            steps: vec!["458 - 123 = 335".to_string()],
            answer: "335".to_string(),
        },
        reflection_question: "When do we need to borrow?".to_string(),
    }
}

/// Scriptable gateway: records calls, can fail the next call, and can
/// hold a generation open to simulate an outstanding request.
pub struct MockGateway {
    pub calls: Mutex<Vec<&'static str>>,
    pub fail_next: Mutex<Option<GatewayError>>,
    pub modify_result: Mutex<Option<StructuredBlocks>>,
    gate: Notify,
    gated: AtomicBool,
}

impl Default for MockGateway {
    fn default() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_next: Mutex::new(None),
            modify_result: Mutex::new(None),
            gate: Notify::new(),
            gated: AtomicBool::new(false),
        }
    }
}

impl MockGateway {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_next_with(&self, err: GatewayError) {
        *self.fail_next.lock().unwrap() = Some(err);
    }

    /// Make the next generate call block until [`Self::release`].
    pub fn hold_next_generate(&self) {
        self.gated.store(true, Ordering::SeqCst);
    }

    pub fn release(&self) {
        self.gate.notify_one();
    }

    pub fn call_log(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, op: &'static str) -> Result<(), GatewayError> {
        self.calls.lock().unwrap().push(op);
        if let Some(err) = self.fail_next.lock().unwrap().take() {
            return Err(err);
        }
        Ok(())
    }

    fn render_pages(blocks: &StructuredBlocks, language: &str) -> (Vec<String>, Vec<String>) {
        let regional = (1..=3)
            .map(|n| format!("<html>{} page {} ({})</html>", blocks.title, n, language))
            .collect();
        let english = (1..=3)
            .map(|n| format!("<html>{} page {} (English)</html>", blocks.title, n))
            .collect();
        (regional, english)
    }
}

#[async_trait]
impl LessonGateway for MockGateway {
    async fn generate(&self, params: &LessonParams) -> Result<GeneratedLesson, GatewayError> {
        if self.gated.swap(false, Ordering::SeqCst) {
            self.gate.notified().await;
        }
        self.record("generate")?;

        let blocks = params
            .refined_blocks
            .clone()
            .unwrap_or_else(|| complete_blocks("Subtraction with Borrowing"));
        let (regional, english) = Self::render_pages(&blocks, &params.regional_language);

        Ok(GeneratedLesson {
            regional_html_pages: regional,
            english_html_pages: english,
            editable_blocks: blocks,
        })
    }

    async fn modify_blocks(
        &self,
        current: &StructuredBlocks,
        _instruction: &str,
        _params: &LessonParams,
    ) -> Result<StructuredBlocks, GatewayError> {
        self.record("modify_blocks")?;

        if let Some(scripted) = self.modify_result.lock().unwrap().take() {
            return Ok(scripted);
        }

        // Default behavior: honor "add one more practice question".
        let mut blocks = current.clone();
        blocks.practice_questions.push(PracticeItem {
            question: "700 - 256 = ?".to_string(),
            answer: "444".to_string(),
        });
        Ok(blocks)
    }

    async fn add_page(
        &self,
        _params: &LessonParams,
        instruction: &str,
    ) -> Result<NewPagePair, GatewayError> {
        self.record("add_page")?;
        Ok(NewPagePair {
            regional: format!("<html>extra page: {instruction}</html>"),
            english: format!("<html>extra page (English): {instruction}</html>"),
        })
    }

    async fn rewrite_fragment(
        &self,
        block_key: &str,
        current_text: &str,
        _instruction: &str,
        _params: &LessonParams,
    ) -> Result<String, GatewayError> {
        self.record("rewrite_fragment")?;
        Ok(format!("rewritten {block_key}: {current_text}"))
    }
}
