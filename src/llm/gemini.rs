//! Google Gemini provider implementation

use super::types::{LlmRequest, LlmResponse, Usage};
use super::{LlmError, LlmService};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const API_KEY_HEADER: &str = "x-goog-api-key";

/// Gemini service implementation
pub struct GeminiService {
    client: Client,
    api_key: String,
    endpoint: String,
    model_id: String,
}

impl GeminiService {
    pub fn new(
        api_key: String,
        model: &str,
        base_url: Option<&str>,
        timeout: Duration,
    ) -> Result<Self, LlmError> {
        let base = base_url.unwrap_or(DEFAULT_BASE_URL).trim_end_matches('/');
        let endpoint = format!("{base}/v1beta/models/{model}:generateContent");

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LlmError::unknown(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key,
            endpoint,
            model_id: model.to_string(),
        })
    }

    /// Build the wire request. History roles are translated here and the
    /// prompt always goes last as a `user` turn.
    fn translate_request(request: &LlmRequest) -> GeminiRequest {
        let mut contents: Vec<GeminiContent> = request
            .history
            .iter()
            .map(|turn| GeminiContent {
                role: Some(turn.role.provider_name().to_string()),
                parts: vec![GeminiPart {
                    text: turn.text.clone(),
                }],
            })
            .collect();

        contents.push(GeminiContent {
            role: Some("user".to_string()),
            parts: vec![GeminiPart {
                text: request.prompt.clone(),
            }],
        });

        GeminiRequest {
            contents,
            generation_config: Some(GeminiGenerationConfig {
                max_output_tokens: request.options.max_output_tokens,
                temperature: request.options.temperature,
            }),
        }
    }

    fn normalize_response(resp: GeminiResponse) -> Result<LlmResponse, LlmError> {
        let candidate = resp
            .candidates
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::unknown("No candidates in response"))?;

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            let reason = candidate.finish_reason.as_deref().unwrap_or("unknown");
            return Err(LlmError::unknown(format!(
                "Empty completion (finish reason: {reason})"
            )));
        }

        let end_turn = candidate.finish_reason.is_some_and(|r| r == "STOP");
        let usage = resp.usage_metadata.unwrap_or_default();

        Ok(LlmResponse {
            text,
            end_turn,
            usage: Usage {
                input_tokens: u64::from(usage.prompt_token_count),
                output_tokens: u64::from(usage.candidates_token_count),
            },
        })
    }
}

#[async_trait]
impl LlmService for GeminiService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let gemini_request = Self::translate_request(request);

        let response = self
            .client
            .post(&self.endpoint)
            .header(API_KEY_HEADER, self.api_key.as_str())
            .json(&gemini_request)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            LlmError::network(format!("Failed to read response: {}", e.without_url()))
        })?;

        if !status.is_success() {
            if let Ok(error_resp) = serde_json::from_str::<GeminiErrorResponse>(&body) {
                return Err(LlmError::from_status(
                    status.as_u16(),
                    &error_resp.error.message,
                ));
            }
            return Err(LlmError::from_status(status.as_u16(), &body));
        }

        let gemini_response: GeminiResponse = serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(error = %e, body = %body, "Unparseable Gemini response");
            LlmError::unknown(format!("Failed to parse response: {e}"))
        })?;

        Self::normalize_response(gemini_response)
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Error messages reach HTTP clients, so the URL is stripped from them.
fn transport_error(e: reqwest::Error) -> LlmError {
    let e = e.without_url();
    if e.is_timeout() {
        LlmError::network(format!("Request timeout: {e}"))
    } else if e.is_connect() {
        LlmError::network(format!("Connection failed: {e}"))
    } else {
        LlmError::unknown(format!("Request failed: {e}"))
    }
}

// Gemini API types

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GeminiGenerationConfig>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct GeminiPart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    usage_metadata: Option<GeminiUsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    content: Option<GeminiContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsageMetadata {
    #[serde(default)]
    prompt_token_count: u32,
    #[serde(default)]
    candidates_token_count: u32,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiError,
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{ConversationTurn, GenerationOptions, LlmErrorKind, Role};
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const ENDPOINT: &str = "/v1beta/models/gemini-test:generateContent";

    fn service(server: &MockServer) -> GeminiService {
        GeminiService::new(
            "test-key".to_string(),
            "gemini-test",
            Some(server.uri().as_str()),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    fn request(history: Vec<ConversationTurn>) -> LlmRequest {
        LlmRequest {
            history,
            prompt: "¿Hacéis tiendas online?".to_string(),
            options: GenerationOptions::default(),
        }
    }

    #[test]
    fn test_translate_maps_roles_and_appends_prompt() {
        let req = request(vec![
            ConversationTurn::new(Role::User, "hola"),
            ConversationTurn::new(Role::Assistant, "¡Hola!"),
            ConversationTurn::new(Role::Other("model".to_string()), "previo"),
        ]);
        let wire = serde_json::to_value(GeminiService::translate_request(&req)).unwrap();

        let roles: Vec<&str> = wire["contents"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["role"].as_str().unwrap())
            .collect();
        assert_eq!(roles, vec!["user", "model", "model", "user"]);
        assert_eq!(wire["contents"][3]["parts"][0]["text"], "¿Hacéis tiendas online?");
        assert_eq!(wire["generationConfig"]["maxOutputTokens"], 500);
    }

    #[tokio::test]
    async fn test_complete_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .and(header("x-goog-api-key", "test-key"))
            .and(body_partial_json(json!({ "generationConfig": { "maxOutputTokens": 500 } })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "Sí, " }, { "text": "claro." }] },
                    "finishReason": "STOP"
                }],
                "usageMetadata": { "promptTokenCount": 12, "candidatesTokenCount": 3, "totalTokenCount": 15 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let response = service(&server).complete(&request(vec![])).await.unwrap();
        assert_eq!(response.text, "Sí, claro.");
        assert!(response.end_turn);
        assert_eq!(response.usage.input_tokens, 12);
        assert_eq!(response.usage.output_tokens, 3);
    }

    #[tokio::test]
    async fn test_complete_surfaces_provider_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(403).set_body_json(json!({
                "error": { "code": 403, "message": "API key not valid", "status": "PERMISSION_DENIED" }
            })))
            .mount(&server)
            .await;

        let err = service(&server).complete(&request(vec![])).await.unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Auth);
        assert!(err.message.contains("API key not valid"));
    }

    #[tokio::test]
    async fn test_blocked_response_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "finishReason": "SAFETY" }]
            })))
            .mount(&server)
            .await;

        let err = service(&server).complete(&request(vec![])).await.unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Unknown);
        assert!(err.message.contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path(ENDPOINT))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json <internal dump>"))
            .mount(&server)
            .await;

        let err = service(&server).complete(&request(vec![])).await.unwrap_err();
        assert!(err.message.starts_with("Failed to parse response"));
        assert!(!err.message.contains("internal dump"));
    }

    #[tokio::test]
    async fn test_connection_error_hides_api_key() {
        // Nothing listens on the discard port
        let service = GeminiService::new(
            "SECRET-KEY-123".to_string(),
            "gemini-test",
            Some("http://127.0.0.1:9"),
            Duration::from_secs(5),
        )
        .unwrap();

        let err = service.complete(&request(vec![])).await.unwrap_err();
        assert_eq!(err.kind, LlmErrorKind::Network);
        assert!(!err.message.contains("SECRET-KEY-123"));
    }
}
