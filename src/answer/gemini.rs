//! Gemini `generateContent` client with Google Search grounding

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};

use super::{Answer, AnswerService, RELATED_SEARCHES_HEADING, Source, parse_answer_text};
use crate::utils::{AnswerError, Result, ServiceError};

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Answer service backed by the Gemini REST API
#[derive(Clone)]
pub struct GeminiAnswerService {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiAnswerService {
    /// Create a client for the default model
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("answer-browser/", env!("CARGO_PKG_VERSION")))
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| AnswerError::Config(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        })
    }

    /// Override the model after construction
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the client at a different endpoint root
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        )
    }

    async fn generate(&self, query: &str) -> std::result::Result<Answer, ServiceError> {
        let body = GenerateContentRequest::grounded(query);

        let response = self.client.post(self.endpoint()).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            return Err(map_http_error(status, &text));
        }

        let parsed: GenerateContentResponse = response.json().await?;
        answer_from_response(parsed)
    }
}

#[async_trait]
impl AnswerService for GeminiAnswerService {
    async fn answer(&self, query: &str) -> Result<Answer> {
        log::debug!("Requesting answer from {} for {:?}", self.model, query);
        self.generate(query).await.map_err(|e| {
            log::error!("Error fetching answer: {}", e);
            AnswerError::Service(e)
        })
    }
}

/// Prompt sent for a query: the query plus the related-search instruction
pub fn enhanced_prompt(query: &str) -> String {
    format!(
        "{}\n\nIMPORTANT: After the answer, provide a list of 3-5 related search queries. \
         Format this list under a markdown heading \"{}\".",
        query, RELATED_SEARCHES_HEADING
    )
}

fn answer_from_response(
    response: GenerateContentResponse,
) -> std::result::Result<Answer, ServiceError> {
    let candidate = response
        .candidates
        .unwrap_or_default()
        .into_iter()
        .next()
        .ok_or(ServiceError::EmptyResponse)?;

    let raw: String = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect()
        })
        .unwrap_or_default();

    let sources = candidate
        .grounding_metadata
        .map(|meta| meta.grounding_chunks)
        .unwrap_or_default()
        .into_iter()
        .filter_map(|chunk| chunk.web)
        .filter_map(|web| {
            let uri = web.uri.filter(|uri| !uri.is_empty())?;
            let title = web
                .title
                .filter(|title| !title.is_empty())
                .unwrap_or_else(|| uri.clone());
            Some(Source { uri, title })
        })
        .collect();

    if raw.is_empty() {
        return Err(ServiceError::EmptyResponse);
    }

    let (text, related_searches) = parse_answer_text(&raw);
    Ok(Answer {
        text,
        sources,
        related_searches,
    })
}

fn map_http_error(status: StatusCode, body: &str) -> ServiceError {
    let message = serde_json::from_str::<ErrorWrapper>(body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.to_string());
            if status_text.is_empty() {
                msg
            } else {
                format!("{status_text}: {msg}")
            }
        })
        .unwrap_or_else(|_| body.to_string());

    ServiceError::Http {
        status: status.as_u16(),
        message,
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
    tools: Vec<Tool>,
}

impl GenerateContentRequest {
    fn grounded(query: &str) -> Self {
        Self {
            contents: vec![Content {
                role: "user".to_string(),
                parts: vec![Part {
                    text: enhanced_prompt(query),
                }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        }
    }
}

#[derive(Serialize)]
struct Content {
    role: String,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct Tool {
    #[serde(rename = "googleSearch")]
    google_search: GoogleSearch,
}

#[derive(Serialize)]
struct GoogleSearch {}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<ContentResponse>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> GenerateContentResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GenerateContentRequest::grounded("rust")).unwrap();
        assert_eq!(body["contents"][0]["role"], "user");
        assert!(body["tools"][0]["googleSearch"].is_object());
        let text = body["contents"][0]["parts"][0]["text"].as_str().unwrap();
        assert!(text.starts_with("rust\n\nIMPORTANT:"));
        assert!(text.contains("\"### Related Searches\""));
    }

    #[test]
    fn test_answer_from_grounded_response() {
        let response = parse(
            r#"{
              "candidates": [{
                "content": {"parts": [
                  {"text": "Rust is a systems language.\n### Related Searches\n"},
                  {"text": "* rust borrow checker\n* cargo workspaces"}
                ]},
                "groundingMetadata": {"groundingChunks": [
                  {"web": {"uri": "https://rust-lang.org", "title": "Rust"}},
                  {"web": {"uri": "https://doc.rust-lang.org/book"}},
                  {"web": {"title": "no uri"}},
                  {"maps": {"uri": "https://maps.example"}}
                ]}
              }]
            }"#,
        );

        let answer = answer_from_response(response).unwrap();
        assert_eq!(answer.text, "Rust is a systems language.");
        assert_eq!(
            answer.related_searches,
            vec!["rust borrow checker", "cargo workspaces"]
        );
        assert_eq!(
            answer.sources,
            vec![
                Source {
                    uri: "https://rust-lang.org".into(),
                    title: "Rust".into()
                },
                Source {
                    uri: "https://doc.rust-lang.org/book".into(),
                    title: "https://doc.rust-lang.org/book".into()
                },
            ]
        );
    }

    #[test]
    fn test_empty_text_is_an_error() {
        let response = parse(r#"{"candidates": [{"content": {"parts": [{}]}}]}"#);
        assert!(matches!(
            answer_from_response(response),
            Err(ServiceError::EmptyResponse)
        ));

        let response = parse(r#"{}"#);
        assert!(matches!(
            answer_from_response(response),
            Err(ServiceError::EmptyResponse)
        ));
    }

    #[test]
    fn test_map_http_error_prefers_api_message() {
        let body = r#"{"error": {"code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED"}}"#;
        match map_http_error(StatusCode::FORBIDDEN, body) {
            ServiceError::Http { status, message } => {
                assert_eq!(status, 403);
                assert_eq!(message, "PERMISSION_DENIED: API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_map_http_error_falls_back_to_body() {
        match map_http_error(StatusCode::BAD_GATEWAY, "upstream down") {
            ServiceError::Http { message, .. } => assert_eq!(message, "upstream down"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_builder_overrides() {
        let service = GeminiAnswerService::new("key")
            .unwrap()
            .with_model("gemini-pro")
            .with_base_url("http://localhost:9000/models/");
        assert_eq!(service.model(), "gemini-pro");
        assert_eq!(
            service.endpoint(),
            "http://localhost:9000/models/gemini-pro:generateContent?key=key"
        );
    }
}
