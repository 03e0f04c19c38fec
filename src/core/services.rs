//! Service seams of the pipeline.
//!
//! Every external capability is reached through one of these traits so that
//! the handler can be driven by the AWS-backed implementations in
//! [`crate::core::aws`] or by in-process doubles in tests.

use async_trait::async_trait;
use bytes::Bytes;

use crate::core::job::{JobStatus, TranscriptionJobRequest};
use crate::core::summary::CompletionRequest;
use crate::core::transcript::TranscriptDocument;
use crate::errors::PipelineResult;

/// Asynchronous speech-to-text jobs.
#[async_trait]
pub trait TranscriptionService: Send + Sync {
    /// Submit a job. Returns once the service has accepted it.
    async fn start_job(&self, request: &TranscriptionJobRequest) -> PipelineResult<()>;

    /// Current status of a previously submitted job.
    async fn job_status(&self, job_name: &str) -> PipelineResult<JobStatus>;

    /// Download the transcript document of a completed job.
    async fn fetch_transcript(&self, transcript_uri: &str) -> PipelineResult<TranscriptDocument>;
}

/// Machine translation.
#[async_trait]
pub trait TranslationService: Send + Sync {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> PipelineResult<String>;
}

/// Generative text completion.
#[async_trait]
pub trait TextGenerationService: Send + Sync {
    /// Run one completion and return the raw completion text.
    async fn complete(&self, request: &CompletionRequest<'_>) -> PipelineResult<String>;
}

/// Write-only object storage for pipeline artifacts.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> PipelineResult<()>;
}
