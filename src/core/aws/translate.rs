//! Amazon Translate.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_translate::Client as TranslateClient;
use aws_sdk_translate::error::DisplayErrorContext;
use tracing::debug;

use crate::core::services::TranslationService;
use crate::errors::{PipelineError, PipelineResult};

#[derive(Debug, Clone)]
pub struct AwsTranslator {
    client: TranslateClient,
}

impl AwsTranslator {
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: TranslateClient::new(sdk_config),
        }
    }
}

#[async_trait]
impl TranslationService for AwsTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> PipelineResult<String> {
        debug!(
            chars = text.chars().count(),
            source_language, target_language, "Translating transcript"
        );

        let output = self
            .client
            .translate_text()
            .text(text)
            .source_language_code(source_language)
            .target_language_code(target_language)
            .send()
            .await
            .map_err(|e| {
                PipelineError::Translation(format!(
                    "TranslateText failed: {}",
                    DisplayErrorContext(&e)
                ))
            })?;

        debug!(
            detected_language = ?output.source_language_code(),
            "Transcript translated"
        );
        Ok(output.translated_text().to_string())
    }
}
