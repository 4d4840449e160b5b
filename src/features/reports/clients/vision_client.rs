use async_trait::async_trait;
use base64::prelude::*;
use thiserror::Error;

use crate::core::config::VisionConfig;

#[derive(Debug, Error)]
pub enum VisionError {
    /// The model could not be reached or answered with a failure status
    #[error("vision model unreachable: {0}")]
    Transport(String),

    /// The model answered but the reply carried no text content
    #[error("vision model reply unusable: {0}")]
    MalformedReply(String),
}

/// External vision-language capability: image in, free-form text out.
///
/// One call per invocation, no internal retry. The production
/// implementation is [`GeminiVisionClient`]; tests substitute stubs.
#[async_trait]
pub trait VisionModel: Send + Sync {
    async fn describe(&self, image: &[u8], prompt: &str) -> Result<String, VisionError>;
}

/// Client for the Gemini generateContent API
pub struct GeminiVisionClient {
    http: reqwest::Client,
    config: VisionConfig,
}

impl GeminiVisionClient {
    pub fn new(config: VisionConfig) -> Result<Self, VisionError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| VisionError::Transport(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { http, config })
    }
}

#[async_trait]
impl VisionModel for GeminiVisionClient {
    async fn describe(&self, image: &[u8], prompt: &str) -> Result<String, VisionError> {
        let payload = serde_json::json!({
            "contents": [{
                "parts": [
                    { "text": prompt },
                    {
                        "inline_data": {
                            "mime_type": "image/jpeg",
                            "data": BASE64_STANDARD.encode(image)
                        }
                    }
                ]
            }]
        });

        let response = self
            .http
            .post(&self.config.endpoint)
            .query(&[("key", self.config.api_key.as_str())])
            .json(&payload)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    VisionError::Transport("request timed out".to_string())
                } else {
                    VisionError::Transport(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(VisionError::Transport(upstream_error_detail(status, &body)));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| VisionError::Transport(format!("failed to read reply body: {}", e)))?;

        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .ok_or_else(|| VisionError::MalformedReply("reply carried no text part".to_string()))
    }
}

/// Failure detail for a non-success upstream reply. Carries the error
/// message from a JSON body when one is present; always names the HTTP
/// status, including for non-JSON bodies.
fn upstream_error_detail(status: reqwest::StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .map(|message| format!("upstream status {}: {}", status, message))
        .unwrap_or_else(|| format!("upstream status {}", status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upstream_error_detail_surfaces_json_message() {
        let detail = upstream_error_detail(
            reqwest::StatusCode::FORBIDDEN,
            r#"{"error": {"message": "API key not valid"}}"#,
        );

        assert_eq!(detail, "upstream status 403 Forbidden: API key not valid");
    }

    #[test]
    fn test_upstream_error_detail_non_json_body_keeps_status() {
        let detail = upstream_error_detail(
            reqwest::StatusCode::SERVICE_UNAVAILABLE,
            "<html>temporarily overloaded</html>",
        );

        assert_eq!(detail, "upstream status 503 Service Unavailable");
    }

    #[test]
    fn test_upstream_error_detail_json_without_message_keeps_status() {
        let detail = upstream_error_detail(reqwest::StatusCode::BAD_REQUEST, r#"{"error": {}}"#);

        assert_eq!(detail, "upstream status 400 Bad Request");
    }
}
