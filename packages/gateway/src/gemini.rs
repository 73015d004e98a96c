//! Gemini client for the lesson gateway.
//!
//! Speaks the `generateContent` REST surface with a JSON response schema
//! for structured output. The API key is appended to the request URL and
//! exists nowhere else.

use async_trait::async_trait;
use lessonforge_model::{GeneratedLesson, LessonParams, NewPagePair, StructuredBlocks};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::client::{GatewayError, LessonGateway};
use crate::prompts;

/// Gemini client configuration.
#[derive(Clone)]
pub struct GeminiClientConfig {
    /// API key for authentication. Never logged or serialized.
    pub api_key: String,
    /// Model name (e.g. "gemini-2.5-flash").
    pub model: String,
    /// Base endpoint URL.
    pub endpoint: String,
    /// Request timeout in seconds. Full lesson generation is slow.
    pub timeout_secs: u64,
}

impl std::fmt::Debug for GeminiClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClientConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for GeminiClientConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_secs: 180,
        }
    }
}

pub struct GeminiClient {
    client: reqwest::Client,
    config: GeminiClientConfig,
}

impl GeminiClient {
    pub fn new(config: GeminiClientConfig) -> Result<Self, GatewayError> {
        if config.api_key.trim().is_empty() {
            return Err(GatewayError::MissingApiKey);
        }
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GatewayError::Http(e.to_string()))?;
        Ok(Self { client, config })
    }

    /// Build a client from `GEMINI_API_KEY` / `GEMINI_MODEL`.
    pub fn from_env() -> Result<Self, GatewayError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or(GatewayError::MissingApiKey)?;

        let mut config = GeminiClientConfig {
            api_key,
            ..Default::default()
        };
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            if !model.trim().is_empty() {
                config.model = model;
            }
        }
        Self::new(config)
    }

    fn build_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.endpoint, self.config.model, self.config.api_key
        )
    }

    async fn complete(&self, call: Call<'_>) -> Result<String, GatewayError> {
        let mut parts = vec![Part {
            text: Some(call.prompt),
            inline_data: None,
        }];
        if let Some((media_type, data)) = call.attachment {
            parts.push(Part {
                text: None,
                inline_data: Some(InlineData {
                    mime_type: media_type.to_string(),
                    data: data.to_string(),
                }),
            });
        }

        let body = GeminiRequest {
            contents: vec![Content {
                role: "user".to_string(),
                parts,
            }],
            system_instruction: call.system.map(|text| SystemInstruction {
                parts: vec![Part {
                    text: Some(text.to_string()),
                    inline_data: None,
                }],
            }),
            generation_config: GenerationConfig {
                temperature: call.temperature,
                response_mime_type: call.json_output.then(|| "application/json".to_string()),
                response_schema: call.schema,
            },
        };

        tracing::debug!(model = %self.config.model, "dispatching generateContent call");

        let response = self
            .client
            .post(self.build_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::Http(e.to_string()))?;

        if !status.is_success() {
            let message = serde_json::from_str::<GeminiResponse>(&text)
                .ok()
                .and_then(|r| r.error)
                .map(|e| e.message)
                .unwrap_or(text);
            return Err(GatewayError::Backend {
                status: status.as_u16(),
                message,
            });
        }

        extract_text(&text)
    }
}

struct Call<'a> {
    system: Option<&'a str>,
    prompt: String,
    /// (media type, base64 data)
    attachment: Option<(&'a str, &'a str)>,
    temperature: f32,
    json_output: bool,
    schema: Option<Value>,
}

#[async_trait]
impl LessonGateway for GeminiClient {
    async fn generate(&self, params: &LessonParams) -> Result<GeneratedLesson, GatewayError> {
        // The attachment only accompanies an initial generation; a
        // refined-blocks re-render works from the blocks alone.
        let attachment = match (&params.source_document, &params.refined_blocks) {
            (Some(doc), None) => Some((doc.media_type.as_str(), doc.data.as_str())),
            _ => None,
        };

        let text = self
            .complete(Call {
                system: Some(prompts::SYSTEM_INSTRUCTION),
                prompt: prompts::generation_prompt(params),
                attachment,
                temperature: 0.4,
                json_output: true,
                schema: Some(lesson_response_schema()),
            })
            .await?;

        let lesson: GeneratedLesson = parse_json_payload(&text)?;
        if lesson.regional_html_pages.is_empty() || lesson.english_html_pages.is_empty() {
            return Err(GatewayError::MalformedResponse(
                "backend returned an empty page track".to_string(),
            ));
        }
        Ok(lesson)
    }

    async fn modify_blocks(
        &self,
        current: &StructuredBlocks,
        instruction: &str,
        params: &LessonParams,
    ) -> Result<StructuredBlocks, GatewayError> {
        let text = self
            .complete(Call {
                system: None,
                prompt: prompts::modify_blocks_prompt(current, instruction, params),
                attachment: None,
                temperature: 0.6,
                json_output: true,
                schema: None,
            })
            .await?;

        parse_json_payload(&text)
    }

    async fn add_page(
        &self,
        params: &LessonParams,
        instruction: &str,
    ) -> Result<NewPagePair, GatewayError> {
        let text = self
            .complete(Call {
                system: None,
                prompt: prompts::add_page_prompt(params, instruction),
                attachment: None,
                temperature: 0.7,
                json_output: true,
                schema: None,
            })
            .await?;

        parse_json_payload(&text)
    }

    async fn rewrite_fragment(
        &self,
        block_key: &str,
        current_text: &str,
        instruction: &str,
        params: &LessonParams,
    ) -> Result<String, GatewayError> {
        let text = self
            .complete(Call {
                system: None,
                prompt: prompts::rewrite_fragment_prompt(
                    block_key,
                    current_text,
                    instruction,
                    params,
                ),
                attachment: None,
                temperature: 0.6,
                json_output: false,
                schema: None,
            })
            .await?;

        Ok(text.trim().to_string())
    }
}

// Wire structures for the generateContent surface

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    #[serde(rename = "generationConfig")]
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(rename = "inlineData", skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

#[derive(Debug, Serialize)]
struct InlineData {
    #[serde(rename = "mimeType")]
    mime_type: String,
    data: String,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
    #[serde(rename = "responseMimeType", skip_serializing_if = "Option::is_none")]
    response_mime_type: Option<String>,
    #[serde(rename = "responseSchema", skip_serializing_if = "Option::is_none")]
    response_schema: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    candidates: Option<Vec<Candidate>>,
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Pull the first candidate's text out of a raw generateContent body.
fn extract_text(raw: &str) -> Result<String, GatewayError> {
    let parsed: GeminiResponse =
        serde_json::from_str(raw).map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;

    if let Some(error) = parsed.error {
        return Err(GatewayError::MalformedResponse(error.message));
    }

    parsed
        .candidates
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.content.parts.into_iter().next())
        .map(|p| p.text)
        .ok_or_else(|| GatewayError::MalformedResponse("no content in response".to_string()))
}

/// Deserialize a JSON payload the model produced. Without an enforced
/// schema the model occasionally wraps JSON in markdown fences; strip
/// them before parsing.
fn parse_json_payload<T: DeserializeOwned>(text: &str) -> Result<T, GatewayError> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    serde_json::from_str(body.trim()).map_err(|e| GatewayError::MalformedResponse(e.to_string()))
}

/// Response schema for the full-generation call, mirrored from the
/// product's structured-output contract.
fn lesson_response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "regional_html_pages": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Complete HTML strings for the regional language lesson pages."
            },
            "english_html_pages": {
                "type": "ARRAY",
                "items": { "type": "STRING" },
                "description": "Complete HTML strings for the English review version."
            },
            "editable_blocks": {
                "type": "OBJECT",
                "properties": {
                    "title": { "type": "STRING" },
                    "objective": { "type": "STRING" },
                    "intro_text": { "type": "STRING" },
                    "worked_example_steps": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "practice_questions": {
                        "type": "ARRAY",
                        "items": {
                            "type": "OBJECT",
                            "properties": {
                                "question": { "type": "STRING" },
                                "answer": { "type": "STRING" }
                            }
                        }
                    },
                    "word_problem": {
                        "type": "OBJECT",
                        "properties": {
                            "question": { "type": "STRING" },
                            "steps": { "type": "ARRAY", "items": { "type": "STRING" } },
                            "answer": { "type": "STRING" }
                        }
                    },
                    "reflection_question": { "type": "STRING" }
                }
            }
        },
        "required": ["regional_html_pages", "english_html_pages", "editable_blocks"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_the_generative_language_api() {
        let config = GeminiClientConfig::default();
        assert_eq!(config.model, "gemini-2.5-flash");
        assert!(config.endpoint.contains("generativelanguage.googleapis.com"));
    }

    #[test]
    fn missing_api_key_is_rejected_at_construction() {
        let config = GeminiClientConfig::default();
        assert!(matches!(
            GeminiClient::new(config),
            Err(GatewayError::MissingApiKey)
        ));
    }

    #[test]
    fn build_url_embeds_model_and_key() {
        let client = GeminiClient::new(GeminiClientConfig {
            api_key: "test-key".to_string(),
            ..Default::default()
        })
        .unwrap();

        let url = client.build_url();
        assert!(url.contains("gemini-2.5-flash:generateContent"));
        assert!(url.contains("key=test-key"));
    }

    #[test]
    fn debug_output_redacts_the_api_key() {
        let config = GeminiClientConfig {
            api_key: "secret-key".to_string(),
            ..Default::default()
        };
        let printed = format!("{config:?}");
        assert!(!printed.contains("secret-key"));
        assert!(printed.contains("<redacted>"));
    }

    #[test]
    fn extract_text_pulls_the_first_candidate() {
        let raw = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "hello" } ] } }
            ]
        }"#;
        assert_eq!(extract_text(raw).unwrap(), "hello");
    }

    #[test]
    fn extract_text_surfaces_an_api_error_body() {
        let raw = r#"{ "error": { "message": "quota exceeded" } }"#;
        let err = extract_text(raw).unwrap_err();
        assert!(matches!(err, GatewayError::MalformedResponse(m) if m.contains("quota")));
    }

    #[test]
    fn payload_parser_strips_markdown_fences() {
        let fenced = "```json\n{\"regional\": \"<html>r</html>\", \"english\": \"<html>e</html>\"}\n```";
        let pair: NewPagePair = parse_json_payload(fenced).unwrap();
        assert_eq!(pair.regional, "<html>r</html>");
    }

    #[test]
    fn payload_parser_rejects_partial_blocks() {
        // A partial patch missing fields must not deserialize into
        // StructuredBlocks.
        let partial = r#"{ "title": "only a title" }"#;
        assert!(parse_json_payload::<StructuredBlocks>(partial).is_err());
    }

    #[test]
    fn lesson_schema_requires_both_tracks_and_blocks() {
        let schema = lesson_response_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 3);
        assert!(required.iter().any(|v| v == "editable_blocks"));
    }
}
