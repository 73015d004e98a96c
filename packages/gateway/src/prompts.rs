//! Prompt assembly for the four gateway operations.
//!
//! The prompts encode the product's content rules: Cognitive Load
//! Theory page structure, regional-language output with a parallel
//! English review track, and HTML-only math notation (no LaTeX, no
//! external scripts).

use lessonforge_model::{LessonParams, StructuredBlocks};

pub const SYSTEM_INSTRUCTION: &str = r#"
You are an expert educational content generator for Indian schools.
You create short, structured HTML lessons based on Cognitive Load Theory (CLT).
You must output JSON only.

RULES:
1. Use the requested Regional Language.
2. Reading Level: Grade - 1 (Simple words, short sentences).
3. Context: Use Indian names, currency (Rs.), and examples fitting rural/semi-urban India.
4. Structure:
   - Page 1: Title, Objective, Short Concept Intro.
   - Page 2: Worked Example (Step-by-step).
   - Page 3: Practice Questions (2-3), Word Problem (1), Reflection (1).
5. HTML & STYLING:
   - Every page is a complete, self-contained HTML document with an inline <style> block.
   - RESPONSIVE: 100% width, max-width for containers, flexbox for alignment; must look right from 320px to desktop.
   - ICONS: start section headers with large styled emojis or unicode icons.
   - MATH NOTATION:
     - Do NOT use LaTeX or external scripts.
     - Fractions: <span class="fraction"><span class="num">numerator</span><span class="den">denominator</span></span>
     - Algebra/Variables: <em>x</em> or <var>x</var>; exponents with <sup>, subscripts with <sub>.
     - VERTICAL MATH: never align with spaces or <pre>; always use <table class="vertical-math">
       with a thead for place values and a tr.result row for the answer.
   - Include the standard stylesheet (body, .fraction, .expression, .card, .vertical-math rules) in every page's <style> block.
6. Tone: Encouraging, simple, direct (NCERT style).

OUTPUT FORMAT (JSON):
{
  "regional_html_pages": ["<html>...page1...</html>", "..."],
  "english_html_pages": ["<html>...page1...</html>", "..."],
  "editable_blocks": {
    "title": "...",
    "objective": "...",
    "intro_text": "...",
    "worked_example_steps": ["Step 1..."],
    "practice_questions": [{"question": "...", "answer": "..."}],
    "word_problem": {"question": "...", "steps": ["..."], "answer": "..."},
    "reflection_question": "..."
  }
}
"#;

pub const MATH_NOTATION_RULES: &str = r#"
MATH NOTATION (CRITICAL - ALWAYS INCLUDE):
- Do NOT use LaTeX or external scripts.
- Fractions: <span class="fraction"><span class="num">3</span><span class="den">4</span></span>
- Algebra: <em>x</em> / <var>x</var>; exponents with <sup>; subscripts with <sub>.
- VERTICAL MATH: always <table class="vertical-math"> for vertical arithmetic.
- Inline math: <span class="expression">2 + 3 = 5</span>
"#;

/// Prompt for the full-generation operation. Two variants: a fresh
/// generation from parameters, or a strict re-render of hand-refined
/// blocks.
pub fn generation_prompt(params: &LessonParams) -> String {
    if let Some(blocks) = &params.refined_blocks {
        let blocks_json =
            serde_json::to_string_pretty(blocks).unwrap_or_else(|_| "{}".to_string());
        format!(
            r#"REGENERATE the lesson HTMLs based STRICTLY on the following Refined Content Blocks.

User Updated Content (Refined Blocks):
{blocks_json}

Input Details (Keep Context):
- Grade: {grade}
- Subject: {subject}
- LO Code: {lo_code}
- Language: {language}

INSTRUCTIONS:
1. Use the "Refined Blocks" content exactly for the text logic.
2. Re-wrap them into the structured HTML pages (Regional & English).
3. Apply all CSS/styling rules (Cognitive Load Theory, responsive, icons).
4. Use <table class="vertical-math"> for any vertical arithmetic.
5. Output the exact same JSON structure with updated HTMLs and the editable blocks."#,
            grade = params.grade,
            subject = params.subject,
            lo_code = params.lo_code,
            language = params.regional_language,
        )
    } else {
        format!(
            r#"Generate a Cognitive Load Theory based lesson.

Input Details:
- Grade: {grade}
- Subject: {subject} (Support Fractions, Algebra, Geometry notations if needed)
- LO Code: {lo_code}
- Learning Objective: {objective}
- Topic Outcome: {outcome}
- Target Language: {language}
- Context Text: {context}
{attachment_note}
Strictly follow the JSON schema. Ensure HTML is valid, responsive, and self-contained.
Add visual icons (emojis or unicode) to section headers.
Use <table class="vertical-math"> for any vertical arithmetic."#,
            grade = params.grade,
            subject = params.subject,
            lo_code = params.lo_code,
            objective = params.learning_objective,
            outcome = params.topic_outcome,
            language = params.regional_language,
            context = params
                .context_text
                .as_deref()
                .unwrap_or("None provided, use standard curriculum concepts for this grade."),
            attachment_note = if params.source_document.is_some() {
                "Note: A source chapter is attached. Use its vocabulary, examples, and style.\n"
            } else {
                ""
            },
        )
    }
}

pub fn modify_blocks_prompt(
    current: &StructuredBlocks,
    instruction: &str,
    params: &LessonParams,
) -> String {
    let blocks_json = serde_json::to_string_pretty(current).unwrap_or_else(|_| "{}".to_string());
    format!(
        r#"You are modifying an existing lesson's editable blocks based on user feedback.

Current Blocks:
{blocks_json}

User Request: "{instruction}"

Context:
- Grade: {grade}
- Subject: {subject}
- Language: {language}
{math}
Task: Apply the user's requested changes to the blocks and return the COMPLETE updated blocks structure.
Maintain all fields, only modify what the user asked for.

Return ONLY valid JSON with exactly these fields:
title, objective, intro_text, worked_example_steps, practice_questions, word_problem, reflection_question."#,
        grade = params.grade,
        subject = params.subject,
        language = params.regional_language,
        math = MATH_NOTATION_RULES,
    )
}

pub fn add_page_prompt(params: &LessonParams, instruction: &str) -> String {
    format!(
        r#"You are adding a NEW page to an existing lesson.

Lesson Context:
- Grade: {grade}
- Subject: {subject}
- LO Code: {lo_code}
- Learning Objective: {objective}
- Regional Language: {language}

New Page Request: "{instruction}"
{math}
Task: Create a COMPLETE, STANDALONE HTML page for this new content.
- Apply Cognitive Load Theory principles
- Include a full <style> block with ALL CSS (fractions, vertical-math, expressions, cards)
- Use appropriate emojis/icons for sections
- Ensure responsive design (mobile 320px to desktop)

Return ONLY valid JSON:
{{
  "regional": "<html>...complete page in {language}...</html>",
  "english": "<html>...complete page in English...</html>"
}}"#,
        grade = params.grade,
        subject = params.subject,
        lo_code = params.lo_code,
        objective = params.learning_objective,
        language = params.regional_language,
        math = MATH_NOTATION_RULES,
    )
}

pub fn rewrite_fragment_prompt(
    block_key: &str,
    current_text: &str,
    instruction: &str,
    params: &LessonParams,
) -> String {
    format!(
        r#"You are helping rewrite a specific part of a lesson.

Block: {block_key}
Current Text: "{current_text}"
User Instruction: "{instruction}"

Context:
- Grade: {grade}
- Subject: {subject}
- Language: {language}
{math}
Task: Rewrite ONLY this specific text based on the instruction.
- Keep it appropriate for Grade {grade} and subject {subject}
- If the content contains math, use proper HTML formatting
- Maintain the same language ({language})
- Return ONLY the new text, no JSON structure, no extra formatting"#,
        grade = params.grade,
        subject = params.subject,
        language = params.regional_language,
        math = MATH_NOTATION_RULES,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LessonParams {
        LessonParams {
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
        }
    }

    #[test]
    fn fresh_generation_prompt_carries_all_parameters() {
        let prompt = generation_prompt(&params());
        assert!(prompt.contains("MT03A01"));
        assert!(prompt.contains("Subtract with borrowing"));
        assert!(prompt.contains("Hindi"));
        assert!(!prompt.contains("Refined Blocks"));
    }

    #[test]
    fn refined_blocks_switch_to_the_regeneration_variant() {
        let mut p = params();
        p.refined_blocks = Some(StructuredBlocks {
            title: "Edited Title".to_string(),
            ..Default::default()
        });

        let prompt = generation_prompt(&p);
        assert!(prompt.contains("REGENERATE"));
        assert!(prompt.contains("Edited Title"));
    }

    #[test]
    fn modify_prompt_embeds_current_blocks_and_instruction() {
        let blocks = StructuredBlocks {
            title: "Fractions".to_string(),
            ..Default::default()
        };
        let prompt = modify_blocks_prompt(&blocks, "add one more practice question", &params());

        assert!(prompt.contains("Fractions"));
        assert!(prompt.contains("add one more practice question"));
        assert!(prompt.contains("COMPLETE updated blocks"));
    }

    #[test]
    fn add_page_prompt_requests_one_page_per_track() {
        let prompt = add_page_prompt(&params(), "a quiz page");
        assert!(prompt.contains("\"regional\""));
        assert!(prompt.contains("\"english\""));
        assert!(prompt.contains("a quiz page"));
    }
}
