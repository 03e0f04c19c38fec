//! Amazon Transcribe batch jobs.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_transcribe::Client as TranscribeClient;
use aws_sdk_transcribe::error::DisplayErrorContext;
use aws_sdk_transcribe::types::{
    LanguageCode, Media, Settings, TranscriptionJob, TranscriptionJobStatus,
};
use tracing::{debug, info, warn};

use crate::core::job::{JobStatus, TranscriptionJobRequest};
use crate::core::services::TranscriptionService;
use crate::core::transcript::TranscriptDocument;
use crate::errors::{PipelineError, PipelineResult};

/// Transcription jobs on Amazon Transcribe, with transcript documents
/// downloaded over HTTPS from the job's `TranscriptFileUri`.
#[derive(Debug, Clone)]
pub struct AwsTranscribeJobs {
    client: TranscribeClient,
    http: reqwest::Client,
}

impl AwsTranscribeJobs {
    pub fn new(sdk_config: &SdkConfig) -> PipelineResult<Self> {
        let http = reqwest::Client::builder().build().map_err(|e| {
            PipelineError::Configuration(format!("Failed to create HTTP client: {}", e))
        })?;
        Ok(Self {
            client: TranscribeClient::new(sdk_config),
            http,
        })
    }
}

/// Map a Transcribe job description to a [`JobStatus`].
fn convert_job_status(job: &TranscriptionJob) -> PipelineResult<JobStatus> {
    match job.transcription_job_status() {
        Some(TranscriptionJobStatus::Completed) => {
            let transcript_uri = job
                .transcript()
                .and_then(|t| t.transcript_file_uri())
                .ok_or_else(|| {
                    PipelineError::Transcription(
                        "completed job has no transcript file URI".to_string(),
                    )
                })?;
            Ok(JobStatus::Completed {
                transcript_uri: transcript_uri.to_string(),
            })
        }
        Some(TranscriptionJobStatus::Failed) => Ok(JobStatus::Failed {
            reason: job.failure_reason().map(String::from),
        }),
        Some(TranscriptionJobStatus::Queued) => Ok(JobStatus::Queued),
        Some(TranscriptionJobStatus::InProgress) => Ok(JobStatus::InProgress),
        Some(other) => {
            warn!(status = other.as_str(), "Unknown transcription job status, treating as in progress");
            Ok(JobStatus::InProgress)
        }
        None => Err(PipelineError::Transcription(
            "job description has no status".to_string(),
        )),
    }
}

/// Download and parse a transcript document.
pub async fn fetch_transcript_document(
    http: &reqwest::Client,
    uri: &str,
) -> PipelineResult<TranscriptDocument> {
    let fetch_error = |error: String| PipelineError::TranscriptFetch {
        uri: uri.to_string(),
        error,
    };

    let response = http
        .get(uri)
        .send()
        .await
        .map_err(|e| fetch_error(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(format!("HTTP {}", status)));
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| fetch_error(format!("failed to read body: {}", e)))?;
    debug!(bytes = body.len(), "Downloaded transcript document");

    TranscriptDocument::from_slice(&body)
}

#[async_trait]
impl TranscriptionService for AwsTranscribeJobs {
    async fn start_job(&self, request: &TranscriptionJobRequest) -> PipelineResult<()> {
        let media = Media::builder().media_file_uri(&request.media_uri).build();
        let settings = Settings::builder()
            .show_speaker_labels(true)
            .max_speaker_labels(request.max_speaker_labels)
            .build();
        let language_options = request
            .language_options
            .iter()
            .map(|code| LanguageCode::from(code.as_str()))
            .collect();

        self.client
            .start_transcription_job()
            .transcription_job_name(&request.job_name)
            .media(media)
            .identify_language(true)
            .set_language_options(Some(language_options))
            .settings(settings)
            .send()
            .await
            .map_err(|e| {
                PipelineError::Transcription(format!(
                    "Failed to start transcription job '{}': {}",
                    request.job_name,
                    DisplayErrorContext(&e)
                ))
            })?;

        info!(
            job_name = %request.job_name,
            media_uri = %request.media_uri,
            "Transcription job submitted"
        );
        Ok(())
    }

    async fn job_status(&self, job_name: &str) -> PipelineResult<JobStatus> {
        let output = self
            .client
            .get_transcription_job()
            .transcription_job_name(job_name)
            .send()
            .await
            .map_err(|e| {
                PipelineError::Transcription(format!(
                    "Failed to query transcription job '{}': {}",
                    job_name,
                    DisplayErrorContext(&e)
                ))
            })?;

        let job = output.transcription_job().ok_or_else(|| {
            PipelineError::Transcription(format!("job '{}' has no description", job_name))
        })?;
        convert_job_status(job)
    }

    async fn fetch_transcript(&self, transcript_uri: &str) -> PipelineResult<TranscriptDocument> {
        fetch_transcript_document(&self.http, transcript_uri).await
    }
}
