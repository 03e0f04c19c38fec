//! Amazon Bedrock text completions.

use async_trait::async_trait;
use aws_config::{Region, SdkConfig};
use aws_sdk_bedrockruntime::Client as BedrockClient;
use aws_sdk_bedrockruntime::error::DisplayErrorContext;
use aws_sdk_bedrockruntime::primitives::Blob;
use tracing::{debug, error};

use crate::core::services::TextGenerationService;
use crate::core::summary::{CompletionRequest, CompletionResponse};
use crate::errors::{PipelineError, PipelineResult};

const CONTENT_TYPE: &str = "application/json";
const ACCEPT: &str = "*/*";

/// Claude text-completions through Bedrock `InvokeModel`.
#[derive(Debug, Clone)]
pub struct BedrockTextGenerator {
    client: BedrockClient,
    model_id: String,
}

impl BedrockTextGenerator {
    /// Build a client bound to `region`, independent of the SDK config region.
    pub fn new(sdk_config: &SdkConfig, region: &str, model_id: impl Into<String>) -> Self {
        let config = aws_sdk_bedrockruntime::config::Builder::from(sdk_config)
            .region(Region::new(region.to_string()))
            .build();
        Self {
            client: BedrockClient::from_conf(config),
            model_id: model_id.into(),
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// Extract the completion text from an `InvokeModel` response body.
fn decode_completion(body: &[u8]) -> PipelineResult<String> {
    let response: CompletionResponse = serde_json::from_slice(body)
        .map_err(|e| PipelineError::Model(format!("unreadable response body: {}", e)))?;
    debug!(stop_reason = ?response.stop_reason, "Model completion received");
    Ok(response.completion)
}

#[async_trait]
impl TextGenerationService for BedrockTextGenerator {
    async fn complete(&self, request: &CompletionRequest<'_>) -> PipelineResult<String> {
        let body = serde_json::to_vec(request)?;

        let output = self
            .client
            .invoke_model()
            .model_id(&self.model_id)
            .content_type(CONTENT_TYPE)
            .accept(ACCEPT)
            .body(Blob::new(body))
            .send()
            .await
            .map_err(|e| {
                error!(model_id = %self.model_id, error = %DisplayErrorContext(&e), "Bedrock API error");
                PipelineError::Model(format!(
                    "InvokeModel '{}' failed: {}",
                    self.model_id,
                    DisplayErrorContext(&e)
                ))
            })?;

        decode_completion(output.body().as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_completion() {
        let body = br#"{"completion": " Caller notes. Patient Traits: calm", "stop_reason": "stop_sequence"}"#;
        assert_eq!(
            decode_completion(body).unwrap(),
            " Caller notes. Patient Traits: calm"
        );
    }

    #[test]
    fn test_decode_missing_completion_is_empty() {
        assert_eq!(decode_completion(b"{}").unwrap(), "");
    }

    #[test]
    fn test_decode_garbage_is_model_error() {
        assert!(matches!(
            decode_completion(b"not json"),
            Err(PipelineError::Model(_))
        ));
    }
}
