use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::reports::clients::{VisionError, VisionModel};
use crate::shared::constants::DEFAULT_REASONING;
use crate::shared::llm::{extract_reply, Category};

/// Instruction prompt enumerating the closed taxonomy and demanding a
/// two-field JSON reply.
const CLASSIFICATION_PROMPT: &str = "You are an environmental monitoring assistant. \
Analyze this image and classify it into exactly one of the following categories:\n\n\
- DEF (Deforestation): Cutting, clearing, or burning of mangrove trees.\n\
- POL (Pollution): Dumping or release of harmful substances (solid waste, oil spill, sewage, etc.).\n\
- ENC (Encroachment): Illegal construction, land reclamation, aquaculture pond conversion.\n\
- ECO (Ecological Stress): Natural or human-induced threats (pest infestation, algal blooms, mass die-off).\n\
- OTH (Other): Poaching, illegal fishing, fire, or unspecified disturbance.\n\
- Not_relevant: If the image does not relate to mangrove environmental concerns.\n\n\
Return only a JSON object with exactly these two fields:\n\
{\"classification\": \"DEF|POL|ENC|ECO|OTH|Not_relevant\", \"reasoning\": \"<short explanation>\"}\n\
Do not include any extra text or markdown.";

/// Final classification decision for one submitted image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    pub reasoning: String,
}

/// Orchestrates one vision-model call per image and coerces the free-form
/// reply into the closed taxonomy.
///
/// Malformed model text never surfaces as an error here: the extractor and
/// normalizer are total, degrading to the irrelevant sentinel. Only
/// transport-level failures and unusable reply envelopes become errors.
pub struct ClassificationService {
    vision: Arc<dyn VisionModel>,
}

impl ClassificationService {
    pub fn new(vision: Arc<dyn VisionModel>) -> Self {
        Self { vision }
    }

    pub async fn classify(&self, image: &[u8]) -> Result<Classification> {
        let text = self
            .vision
            .describe(image, CLASSIFICATION_PROMPT)
            .await
            .map_err(|e| match e {
                VisionError::Transport(detail) => AppError::ExternalServiceError(format!(
                    "Failed to communicate with the vision model: {}",
                    detail
                )),
                VisionError::MalformedReply(detail) => {
                    AppError::Internal(format!("Unexpected vision model reply: {}", detail))
                }
            })?;

        tracing::debug!(
            "Raw vision reply (first 500 chars): {}",
            text.chars().take(500).collect::<String>()
        );

        let reply = extract_reply(&text);
        let category = Category::normalize(reply.classification.as_deref().unwrap_or(""));
        let reasoning = reply
            .reasoning
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .unwrap_or(DEFAULT_REASONING)
            .to_string();

        tracing::info!("Image classified: category={}", category);

        Ok(Classification {
            category,
            reasoning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Stub model returning a canned reply
    struct CannedModel(&'static str);

    #[async_trait]
    impl VisionModel for CannedModel {
        async fn describe(&self, _image: &[u8], _prompt: &str) -> std::result::Result<String, VisionError> {
            Ok(self.0.to_string())
        }
    }

    /// Stub model that always fails at the transport level
    struct DownModel;

    #[async_trait]
    impl VisionModel for DownModel {
        async fn describe(&self, _image: &[u8], _prompt: &str) -> std::result::Result<String, VisionError> {
            Err(VisionError::Transport("connection refused".to_string()))
        }
    }

    fn service(model: impl VisionModel + 'static) -> ClassificationService {
        ClassificationService::new(Arc::new(model))
    }

    #[tokio::test]
    async fn test_classify_clean_reply() {
        let svc = service(CannedModel(
            r#"{"classification": "DEF", "reasoning": "freshly cut stumps"}"#,
        ));

        let result = svc.classify(b"jpeg").await.unwrap();

        assert_eq!(result.category, Category::Deforestation);
        assert_eq!(result.reasoning, "freshly cut stumps");
    }

    #[tokio::test]
    async fn test_classify_fenced_reply() {
        let svc = service(CannedModel(
            "```json\n{\"classification\": \"POL\", \"reasoning\": \"oil sheen\"}\n```",
        ));

        let result = svc.classify(b"jpeg").await.unwrap();

        assert_eq!(result.category, Category::Pollution);
        assert_eq!(result.reasoning, "oil sheen");
    }

    #[tokio::test]
    async fn test_classify_free_form_label_is_normalized() {
        let svc = service(CannedModel(
            r#"{"classification": "illegal logging", "reasoning": "trucks hauling timber"}"#,
        ));

        let result = svc.classify(b"jpeg").await.unwrap();

        assert_eq!(result.category, Category::Deforestation);
    }

    #[tokio::test]
    async fn test_classify_missing_reasoning_gets_placeholder() {
        let svc = service(CannedModel(r#"{"classification": "ENC"}"#));

        let result = svc.classify(b"jpeg").await.unwrap();

        assert_eq!(result.category, Category::Encroachment);
        assert_eq!(result.reasoning, DEFAULT_REASONING);
    }

    #[tokio::test]
    async fn test_classify_garbage_reply_is_irrelevant_not_error() {
        let svc = service(CannedModel("complete nonsense, no JSON anywhere"));

        let result = svc.classify(b"jpeg").await.unwrap();

        assert_eq!(result.category, Category::Irrelevant);
        assert_eq!(result.reasoning, DEFAULT_REASONING);
    }

    #[tokio::test]
    async fn test_classify_transport_failure_is_external_service_error() {
        let svc = service(DownModel);

        let err = svc.classify(b"jpeg").await.unwrap_err();

        assert!(matches!(
            err,
            crate::core::error::AppError::ExternalServiceError(_)
        ));
    }
}
