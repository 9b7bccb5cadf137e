//! Generative content client
//!
//! [`ContentClient`] is the seam the generator talks through. The production
//! implementation, [`GeminiClient`], issues one `generateContent` call with a
//! declared JSON response schema and returns the first candidate's text.

use crate::config::GeneratorConfig;
use crate::error::ClientError;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One structured-output request
#[derive(Debug, Clone, PartialEq)]
pub struct ContentRequest {
    /// Natural-language prompt
    pub prompt: String,
    /// Schema the reply must follow
    pub response_schema: Value,
}

/// Outbound generative content API
#[async_trait]
pub trait ContentClient: Send + Sync {
    /// Send the request and return the reply text
    async fn generate(&self, request: &ContentRequest) -> Result<String, ClientError>;
}

/// Gemini `generateContent` client
#[derive(Debug, Clone)]
pub struct GeminiClient {
    endpoint: String,
    api_key: Option<String>,
    client: Client,
}

impl GeminiClient {
    /// Build a client from configuration
    ///
    /// # Errors
    /// `ClientError::Build` if the HTTP client cannot be constructed
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Build(e.to_string()))?;

        Ok(Self {
            endpoint: format!(
                "{}/models/{}:generateContent",
                config.base_url.trim_end_matches('/'),
                config.model
            ),
            api_key: config.api_key.clone().filter(|key| !key.trim().is_empty()),
            client,
        })
    }

    /// Full `generateContent` URL
    #[inline]
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Whether a credential is configured
    #[inline]
    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: [RequestContent<'a>; 1],
    generation_config: GenerationConfig<'a>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: [RequestPart<'a>; 1],
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig<'a> {
    response_mime_type: &'a str,
    response_schema: &'a Value,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    fn into_text(self) -> Option<String> {
        let content = self.candidates.into_iter().next()?.content?;
        let text: String = content.parts.into_iter().filter_map(|p| p.text).collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[async_trait]
impl ContentClient for GeminiClient {
    async fn generate(&self, request: &ContentRequest) -> Result<String, ClientError> {
        let api_key = self.api_key.as_deref().ok_or(ClientError::MissingCredential)?;

        let payload = GenerateContentRequest {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart {
                    text: &request.prompt,
                }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &request.response_schema,
            },
        };

        tracing::debug!(endpoint = %self.endpoint, "sending generateContent request");

        let response = self
            .client
            .post(&self.endpoint)
            .header("x-goog-api-key", api_key)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ClientError::Http(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(ClientError::HttpStatus {
                code: status.as_u16(),
                message,
            });
        }

        let body: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(e.to_string()))?;

        body.into_text().ok_or(ClientError::EmptyCandidate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_joins_base_and_model() {
        let config = GeneratorConfig::new()
            .with_base_url("http://localhost:9999/v1beta/")
            .with_model("gemini-test");
        let client = GeminiClient::from_config(&config).unwrap();
        assert_eq!(
            client.endpoint(),
            "http://localhost:9999/v1beta/models/gemini-test:generateContent"
        );
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let config = GeneratorConfig::new().with_api_key("   ");
        assert!(!GeminiClient::from_config(&config).unwrap().has_credential());
    }

    #[test]
    fn request_body_shape() {
        let schema = json!({"type": "ARRAY"});
        let payload = GenerateContentRequest {
            contents: [RequestContent {
                role: "user",
                parts: [RequestPart { text: "hello" }],
            }],
            generation_config: GenerationConfig {
                response_mime_type: "application/json",
                response_schema: &schema,
            },
        };
        let body = serde_json::to_value(&payload).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hello");
        assert_eq!(body["generationConfig"]["responseMimeType"], "application/json");
        assert_eq!(body["generationConfig"]["responseSchema"]["type"], "ARRAY");
    }

    #[test]
    fn response_text_joins_parts() {
        let body: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{"content": {"parts": [{"text": "[{\"a\":"}, {"text": "1}]"}]}}]
        }))
        .unwrap();
        assert_eq!(body.into_text().as_deref(), Some("[{\"a\":1}]"));
    }

    #[test]
    fn response_without_candidates_is_empty() {
        let body: GenerateContentResponse =
            serde_json::from_value(json!({"promptFeedback": {"blockReason": "SAFETY"}})).unwrap();
        assert!(body.into_text().is_none());
    }

    #[tokio::test]
    async fn missing_key_fails_without_network() {
        let client = GeminiClient::from_config(&GeneratorConfig::new()).unwrap();
        let request = ContentRequest {
            prompt: "p".to_string(),
            response_schema: json!({}),
        };
        assert_eq!(
            client.generate(&request).await.unwrap_err(),
            ClientError::MissingCredential
        );
    }
}
