use serde::{Deserialize, Serialize};

/// Parameters for one generation call. Immutable once submitted; the
/// same params are reused verbatim for regeneration, add-page and
/// rewrite calls against the same lesson.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonParams {
    pub grade: String,
    pub subject: String,
    pub lo_code: String,
    pub learning_objective: String,
    pub topic_outcome: String,
    pub regional_language: String,

    /// Free-text curriculum excerpt to ground the generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_text: Option<String>,

    /// Attached source chapter (PDF), sent inline on initial generation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_document: Option<SourceDocument>,

    /// Icon URL embedded in the exported playable lesson.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_icon: Option<String>,

    /// Present only when regenerating from hand-edited blocks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refined_blocks: Option<StructuredBlocks>,
}

/// Binary attachment, base64-encoded for transport.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SourceDocument {
    pub name: String,
    #[serde(rename = "mimeType")]
    pub media_type: String,
    /// Base64-encoded bytes.
    pub data: String,
}

/// The canonical, human-editable source of truth for lesson content.
///
/// Replaced wholesale on every successful regeneration; field-edited
/// locally before being submitted back. Every field is always present —
/// sequences may be empty but the object is never partial.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct StructuredBlocks {
    pub title: String,
    pub objective: String,
    pub intro_text: String,
    pub worked_example_steps: Vec<String>,
    pub practice_questions: Vec<PracticeItem>,
    pub word_problem: WordProblem,
    pub reflection_question: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct PracticeItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WordProblem {
    pub question: String,
    pub steps: Vec<String>,
    pub answer: String,
}

impl StructuredBlocks {
    /// Whether every scalar field carries content. Used to verify that a
    /// modify-blocks response is a complete replacement object rather
    /// than a partial patch.
    pub fn is_complete(&self) -> bool {
        !self.title.trim().is_empty()
            && !self.objective.trim().is_empty()
            && !self.intro_text.trim().is_empty()
            && !self.reflection_question.trim().is_empty()
            && !self.word_problem.question.trim().is_empty()
            && !self.word_problem.answer.trim().is_empty()
    }
}

/// Full generation response: two index-aligned page tracks plus the
/// editable blocks they were rendered from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeneratedLesson {
    pub regional_html_pages: Vec<String>,
    pub english_html_pages: Vec<String>,
    pub editable_blocks: StructuredBlocks,
}

/// Response of the add-page operation: exactly one new page per track.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewPagePair {
    pub regional: String,
    pub english: String,
}

/// Which screen the author is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Configuration form (no lesson loaded).
    #[default]
    Form,
    /// Regional and English side by side.
    Split,
    /// Learner-facing regional pages only.
    Regional,
    /// Reviewer-facing English pages only.
    English,
    /// Structured block editor.
    Edit,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_blocks() -> StructuredBlocks {
        StructuredBlocks {
            title: "Subtraction with Borrowing".to_string(),
            objective: "Subtract 3-digit numbers".to_string(),
            intro_text: "Sometimes we need to borrow.".to_string(),
            worked_example_steps: vec!["Line up the digits".to_string()],
            practice_questions: vec![PracticeItem {
                question: "458 - 123 = ?".to_string(),
                answer: "335".to_string(),
            }],
            word_problem: WordProblem {
                question: "Ravi had 458 marbles...".to_string(),
                steps: vec!["458 - 123".to_string()],
                answer: "335".to_string(),
            },
            reflection_question: "When do we borrow?".to_string(),
        }
    }

    #[test]
    fn params_serialize_with_camel_case_wire_names() {
        let params = LessonParams {
            grade: "3".to_string(),
            subject: "Maths".to_string(),
            lo_code: "MT03A01".to_string(),
            learning_objective: "Subtract with borrowing".to_string(),
            topic_outcome: "Solves 3-digit subtraction".to_string(),
            regional_language: "Hindi".to_string(),
            context_text: None,
            source_document: None,
            custom_icon: None,
            refined_blocks: None,
        };

        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["loCode"], "MT03A01");
        assert_eq!(json["regionalLanguage"], "Hindi");
        // Optional fields are omitted entirely, not serialized as null.
        assert!(json.get("refinedBlocks").is_none());
        assert!(json.get("sourceDocument").is_none());
    }

    #[test]
    fn lesson_round_trips_with_snake_case_block_names() {
        let lesson = GeneratedLesson {
            regional_html_pages: vec!["<html>p1</html>".to_string()],
            english_html_pages: vec!["<html>p1</html>".to_string()],
            editable_blocks: sample_blocks(),
        };

        let json = serde_json::to_string(&lesson).unwrap();
        assert!(json.contains("regional_html_pages"));
        assert!(json.contains("worked_example_steps"));

        let back: GeneratedLesson = serde_json::from_str(&json).unwrap();
        assert_eq!(back, lesson);
    }

    #[test]
    fn complete_blocks_pass_the_completeness_check() {
        assert!(sample_blocks().is_complete());
    }

    #[test]
    fn blank_scalar_field_fails_the_completeness_check() {
        let mut blocks = sample_blocks();
        blocks.reflection_question = "  ".to_string();
        assert!(!blocks.is_complete());
    }

    #[test]
    fn empty_sequences_do_not_make_blocks_incomplete() {
        let mut blocks = sample_blocks();
        blocks.worked_example_steps.clear();
        blocks.practice_questions.clear();
        assert!(blocks.is_complete());
    }
}
