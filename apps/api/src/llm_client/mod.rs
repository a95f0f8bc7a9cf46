/// LLM Client: the single point of entry for all Gemini API calls in Pathfinder.
///
/// ARCHITECTURAL RULE: No other module may call the Generative Language API directly.
/// Stages reach the model through `guarded_complete`, which applies one failure
/// policy to every call: classify, log, report as a `Notice`.
///
/// Model: gemini-1.5-flash at temperature 0.7 (hardcoded, do not make configurable)
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::outcome::{Notice, NoticeKind};

#[cfg(test)]
pub mod scripted;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
/// The model used for all LLM calls in Pathfinder.
pub const MODEL: &str = "gemini-1.5-flash";
pub const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("LLM returned empty content")]
    EmptyContent,

    #[error("Malformed LLM response: {0}")]
    Malformed(String),
}

impl LlmError {
    pub fn notice_kind(&self) -> NoticeKind {
        match self {
            LlmError::Http(_) | LlmError::Api { .. } => NoticeKind::ServiceError,
            LlmError::EmptyContent => NoticeKind::EmptyLlmResponse,
            LlmError::Malformed(_) => NoticeKind::MalformedResponse,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// One message of a completion request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            text: text.into(),
        }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: Role::Model,
            text: text.into(),
        }
    }
}

/// A provider-neutral completion request: optional system instruction plus
/// an ordered conversation ending in a user turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub turns: Vec<Turn>,
}

impl CompletionRequest {
    /// A single-prompt request, the shape every non-chat stage uses.
    pub fn prompt(prompt: impl Into<String>) -> Self {
        Self {
            system: None,
            turns: vec![Turn::user(prompt)],
        }
    }

    /// The text of the final user turn.
    pub fn last_user_text(&self) -> Option<&str> {
        self.turns
            .iter()
            .rev()
            .find(|t| t.role == Role::User)
            .map(|t| t.text.as_str())
    }
}

/// The text-completion capability the pipeline depends on.
///
/// Carried in `AppState` as `Arc<dyn LanguageModel>`.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Gemini wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent<'a>>,
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<Role>,
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
pub struct ResponsePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateContentResponse {
    /// Concatenates the text parts of the first candidate.
    pub fn into_text(self) -> Result<String, LlmError> {
        let Some(candidate) = self.candidates.into_iter().next() else {
            let reason = self
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates returned".to_string());
            return Err(LlmError::Malformed(format!("prompt rejected: {reason}")));
        };

        let text: String = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();

        if text.is_empty() {
            if let Some(reason) = candidate.finish_reason.filter(|r| r != "STOP") {
                return Err(LlmError::Malformed(format!(
                    "generation stopped early: {reason}"
                )));
            }
        }

        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Wraps the Gemini `generateContent` endpoint. No retries: one request per call.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: String, timeout: Duration) -> Self {
        Self {
            client: Client::builder()
                .timeout(timeout)
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }

    fn endpoint() -> String {
        format!("{GEMINI_API_BASE}/{MODEL}:generateContent")
    }
}

fn build_request_body(request: &CompletionRequest) -> GenerateContentRequest<'_> {
    GenerateContentRequest {
        system_instruction: request.system.as_deref().map(|text| GeminiContent {
            role: None,
            parts: vec![GeminiPart { text }],
        }),
        contents: request
            .turns
            .iter()
            .map(|turn| GeminiContent {
                role: Some(turn.role),
                parts: vec![GeminiPart { text: &turn.text }],
            })
            .collect(),
        generation_config: GenerationConfig {
            temperature: TEMPERATURE,
        },
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        let body = build_request_body(request);

        let response = self
            .client
            .post(Self::endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let raw = response.text().await?;
        let parsed: GenerateContentResponse = serde_json::from_str(&raw)
            .map_err(|e| LlmError::Malformed(format!("unreadable response body: {e}")))?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "LLM call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed.into_text()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Uniform failure policy
// ────────────────────────────────────────────────────────────────────────────

/// Runs one completion and returns its trimmed text.
///
/// Every failure (transport, API status, malformed body, empty reply)
/// is logged and converted into a `Notice` naming `stage`. Callers pair the
/// notice with their own safe default.
pub async fn guarded_complete(
    llm: &dyn LanguageModel,
    stage: &str,
    request: &CompletionRequest,
) -> Result<String, Notice> {
    let result = llm.complete(request).await.and_then(|text| {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            Err(LlmError::EmptyContent)
        } else {
            Ok(trimmed.to_string())
        }
    });

    result.map_err(|e| {
        warn!("{stage} failed: {e}");
        Notice::new(e.notice_kind(), format!("{stage} failed: {e}"))
    })
}

#[cfg(test)]
mod tests {
    use super::scripted::ScriptedModel;
    use super::*;

    #[test]
    fn test_request_body_uses_gemini_field_names() {
        let request = CompletionRequest {
            system: Some("be brief".to_string()),
            turns: vec![Turn::user("hi"), Turn::model("hello"), Turn::user("bye")],
        };
        let json = serde_json::to_value(build_request_body(&request)).unwrap();

        assert_eq!(json["systemInstruction"]["parts"][0]["text"], "be brief");
        assert!(json["systemInstruction"].get("role").is_none());
        assert_eq!(json["contents"][1]["role"], "model");
        assert_eq!(json["contents"][2]["parts"][0]["text"], "bye");
        let temperature = json["generationConfig"]["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_request_body_omits_missing_system_instruction() {
        let json = serde_json::to_value(build_request_body(&CompletionRequest::prompt("x"))).unwrap();
        assert!(json.get("systemInstruction").is_none());
        assert_eq!(json["contents"][0]["role"], "user");
    }

    #[test]
    fn test_response_text_joins_parts_of_first_candidate() {
        let raw = r#"{
            "candidates": [
                {"content": {"role": "model", "parts": [{"text": "Rust, "}, {"text": "SQL"}]}, "finishReason": "STOP"},
                {"content": {"role": "model", "parts": [{"text": "ignored"}]}}
            ],
            "usageMetadata": {"promptTokenCount": 12, "candidatesTokenCount": 3}
        }"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_text().unwrap(), "Rust, SQL");
    }

    #[test]
    fn test_response_without_candidates_is_malformed() {
        let raw = r#"{"promptFeedback": {"blockReason": "SAFETY"}}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        let err = parsed.into_text().unwrap_err();
        assert!(matches!(err, LlmError::Malformed(ref m) if m.contains("SAFETY")));
    }

    #[test]
    fn test_empty_candidate_with_stop_is_plain_empty_text() {
        let raw = r#"{"candidates": [{"content": {"parts": []}, "finishReason": "STOP"}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.into_text().unwrap(), "");
    }

    #[test]
    fn test_empty_candidate_cut_off_is_malformed() {
        let raw = r#"{"candidates": [{"finishReason": "MAX_TOKENS"}]}"#;
        let parsed: GenerateContentResponse = serde_json::from_str(raw).unwrap();
        assert!(matches!(parsed.into_text(), Err(LlmError::Malformed(_))));
    }

    #[test]
    fn test_error_classification() {
        let api = LlmError::Api {
            status: 503,
            message: "overloaded".to_string(),
        };
        assert_eq!(api.notice_kind(), NoticeKind::ServiceError);
        assert_eq!(LlmError::EmptyContent.notice_kind(), NoticeKind::EmptyLlmResponse);
        assert_eq!(
            LlmError::Malformed("x".to_string()).notice_kind(),
            NoticeKind::MalformedResponse
        );
    }

    #[tokio::test]
    async fn test_guarded_complete_trims_reply() {
        let model = ScriptedModel::new([Ok("  Analytical Strategist \n".to_string())]);
        let text = guarded_complete(&model, "Personality classification", &CompletionRequest::prompt("p"))
            .await
            .unwrap();
        assert_eq!(text, "Analytical Strategist");
    }

    #[tokio::test]
    async fn test_guarded_complete_reports_whitespace_reply_as_empty() {
        let model = ScriptedModel::new([Ok(" \n ".to_string())]);
        let notice = guarded_complete(&model, "Roadmap generation", &CompletionRequest::prompt("p"))
            .await
            .unwrap_err();
        assert_eq!(notice.kind, NoticeKind::EmptyLlmResponse);
        assert!(notice.message.starts_with("Roadmap generation failed"));
    }

    #[tokio::test]
    async fn test_guarded_complete_reports_api_error_as_service_error() {
        let model = ScriptedModel::new([Err(LlmError::Api {
            status: 500,
            message: "boom".to_string(),
        })]);
        let notice = guarded_complete(&model, "Chat", &CompletionRequest::prompt("p"))
            .await
            .unwrap_err();
        assert_eq!(notice.kind, NoticeKind::ServiceError);
        assert!(notice.message.contains("boom"));
    }

    #[test]
    fn test_last_user_text_skips_model_turns() {
        let request = CompletionRequest {
            system: None,
            turns: vec![Turn::user("first"), Turn::model("reply")],
        };
        assert_eq!(request.last_user_text(), Some("first"));
    }
}
