//! The per-upload pipeline: transcribe, segment, translate, summarize, persist.

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::config::HandlerConfig;
use crate::core::aws::{AwsTranscribeJobs, AwsTranslator, BedrockTextGenerator, load_sdk_config};
use crate::core::event::{S3Event, UploadedObject};
use crate::core::job::{JobOutcome, TranscriptionJobRequest, s3_media_uri, wait_for_completion};
use crate::core::services::{
    ArtifactStore, TextGenerationService, TranscriptionService, TranslationService,
};
use crate::core::storage::{S3ArtifactStore, results_body, summary_body, traits_body};
use crate::core::summary::{SummaryResponse, Summarizer};
use crate::core::transcript::{TranscriptResult, process_speaker_separation};
use crate::errors::PipelineResult;
use crate::handlers::response::HandlerResponse;

/// External capabilities the pipeline drives.
#[derive(Clone)]
pub struct PipelineServices {
    pub transcription: Arc<dyn TranscriptionService>,
    pub translation: Arc<dyn TranslationService>,
    pub model: Arc<dyn TextGenerationService>,
    pub artifacts: Arc<dyn ArtifactStore>,
}

impl PipelineServices {
    /// Build the AWS-backed services.
    pub async fn aws(config: &HandlerConfig) -> PipelineResult<Self> {
        let sdk_config = load_sdk_config(config).await;
        let artifact_region = config
            .aws_region
            .clone()
            .or_else(|| sdk_config.region().map(|r| r.to_string()));

        let model =
            BedrockTextGenerator::new(&sdk_config, &config.bedrock_region, config.model_id.clone());
        info!(
            region = artifact_region.as_deref().unwrap_or("default"),
            bedrock_region = %config.bedrock_region,
            model_id = model.model_id(),
            "AWS clients initialized"
        );

        Ok(Self {
            transcription: Arc::new(AwsTranscribeJobs::new(&sdk_config)?),
            translation: Arc::new(AwsTranslator::new(&sdk_config)),
            model: Arc::new(model),
            artifacts: Arc::new(S3ArtifactStore::new(
                artifact_region,
                config.s3_credentials(),
            )),
        })
    }
}

/// Processes one upload event end to end.
pub struct TranscriptionPipeline {
    config: Arc<HandlerConfig>,
    services: PipelineServices,
}

impl TranscriptionPipeline {
    pub fn new(config: HandlerConfig, services: PipelineServices) -> Self {
        Self {
            config: Arc::new(config),
            services,
        }
    }

    /// Build a pipeline backed by AWS services.
    pub async fn from_config(config: HandlerConfig) -> PipelineResult<Self> {
        let services = PipelineServices::aws(&config).await?;
        Ok(Self::new(config, services))
    }

    /// Handle one upload event. `request_id` names the transcription job.
    ///
    /// A failed transcription job yields the 500 response and writes nothing;
    /// every other failure is returned as an error.
    pub async fn handle(&self, event: &S3Event, request_id: &str) -> PipelineResult<HandlerResponse> {
        let object = event.uploaded_object()?;
        self.config.artifact_keys.check_writable(&object.key)?;
        info!(
            bucket = %object.bucket,
            key = %object.key,
            job_name = request_id,
            "Processing uploaded recording"
        );

        let request = TranscriptionJobRequest {
            job_name: request_id.to_string(),
            media_uri: s3_media_uri(&object.bucket, &object.key),
            language_options: self.config.language_options.clone(),
            max_speaker_labels: self.config.max_speaker_labels,
        };
        self.services.transcription.start_job(&request).await?;

        let outcome = wait_for_completion(
            self.services.transcription.as_ref(),
            &request.job_name,
            &self.config.poll,
        )
        .await?;

        match outcome {
            JobOutcome::Completed { transcript_uri } => {
                self.process_transcript(&object, &transcript_uri).await?;
                Ok(HandlerResponse::complete())
            }
            JobOutcome::Failed { reason } => {
                error!(
                    job_name = request_id,
                    reason = reason.as_deref().unwrap_or("unknown"),
                    "Transcription job failed with status: FAILED"
                );
                Ok(HandlerResponse::job_failed())
            }
        }
    }

    async fn process_transcript(
        &self,
        object: &UploadedObject,
        transcript_uri: &str,
    ) -> PipelineResult<()> {
        let document = self
            .services
            .transcription
            .fetch_transcript(transcript_uri)
            .await?;
        let items = document.items()?;
        let turns = process_speaker_separation(&items);
        info!(items = items.len(), turns = turns.len(), "Transcript segmented");

        let joined = TranscriptResult::from_turns(&turns).joined();
        let translated = self.translate(&joined).await?;
        let translated_result = TranscriptResult::from_joined(&translated);

        let summarizer = Summarizer::new(
            self.services.model.as_ref(),
            &self.config.model_parameters,
            self.config.min_summary_chars,
        );
        let summary = summarizer.summarize(&translated).await?;

        self.persist(object, &translated_result, &summary).await
    }

    async fn translate(&self, text: &str) -> PipelineResult<String> {
        // Translate rejects empty input
        if text.trim().is_empty() {
            debug!("Empty transcript, skipping translation");
            return Ok(String::new());
        }
        self.services
            .translation
            .translate(
                text,
                &self.config.source_language,
                &self.config.target_language,
            )
            .await
    }

    async fn persist(
        &self,
        object: &UploadedObject,
        results: &TranscriptResult,
        summary: &SummaryResponse,
    ) -> PipelineResult<()> {
        let keys = &self.config.artifact_keys;
        let artifacts = &self.services.artifacts;

        artifacts
            .put(
                &object.bucket,
                &keys.summary(&object.key),
                summary_body(&summary.summary)?,
            )
            .await?;
        artifacts
            .put(
                &object.bucket,
                &keys.results(&object.key),
                results_body(results)?,
            )
            .await?;
        artifacts
            .put(
                &object.bucket,
                &keys.traits(&object.key),
                traits_body(&summary.traits)?,
            )
            .await?;

        info!(bucket = %object.bucket, key = %object.key, "All artifacts written");
        Ok(())
    }
}
