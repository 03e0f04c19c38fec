//! Transcription job submission types and the bounded status poll.

use std::time::Duration;

use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::core::services::TranscriptionService;
use crate::errors::{PipelineError, PipelineResult};

/// Candidate languages for automatic language identification.
pub const DEFAULT_LANGUAGE_OPTIONS: [&str; 13] = [
    "en-US", "zh-CN", "es-US", "es-ES", "en-IN", "en-GB", "zh-TW", "hi-IN", "ko-KR", "te-IN",
    "vi-VN", "th-TH", "ja-JP",
];

pub const DEFAULT_MAX_SPEAKER_LABELS: i32 = 2;

/// Growth factor applied per attempt by [`Backoff::Exponential`].
const EXPONENTIAL_FACTOR: u32 = 2;

/// Build the `s3://` URI Transcribe reads the media from.
pub fn s3_media_uri(bucket: &str, key: &str) -> String {
    format!("s3://{}/{}", bucket, key)
}

/// Parameters of one diarized, language-identifying transcription job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptionJobRequest {
    pub job_name: String,
    pub media_uri: String,
    pub language_options: Vec<String>,
    pub max_speaker_labels: i32,
}

/// Status reported by the transcription service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    InProgress,
    Completed { transcript_uri: String },
    Failed { reason: Option<String> },
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::InProgress => "IN_PROGRESS",
            Self::Completed { .. } => "COMPLETED",
            Self::Failed { .. } => "FAILED",
        }
    }

    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}

/// Terminal result of a transcription job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobOutcome {
    Completed { transcript_uri: String },
    Failed { reason: Option<String> },
}

// =============================================================================
// Poll policy
// =============================================================================

/// Delay growth between consecutive status polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backoff {
    /// Constant interval
    #[default]
    Fixed,
    /// Interval doubles per attempt, capped at `max_interval`
    Exponential,
}

impl Backoff {
    /// Parse from string, with fallback to Fixed.
    pub fn from_str_or_default(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "exponential" | "exp" => Self::Exponential,
            _ => Self::Fixed,
        }
    }
}

/// Bounds of the status poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_interval: Duration,
    pub backoff: Backoff,
    pub max_attempts: u32,
    pub timeout: Duration,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            max_interval: Duration::from_secs(60),
            backoff: Backoff::Fixed,
            max_attempts: 90,
            // Lambda caps an invocation at 15 minutes
            timeout: Duration::from_secs(840),
        }
    }
}

impl PollPolicy {
    /// Delay to wait after the given (1-based) unsuccessful attempt.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        match self.backoff {
            Backoff::Fixed => self.interval,
            Backoff::Exponential => {
                let exponent = attempt.saturating_sub(1).min(16);
                self.interval
                    .saturating_mul(EXPONENTIAL_FACTOR.saturating_pow(exponent))
                    .min(self.max_interval)
            }
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.interval.is_zero() {
            return Err("poll interval must be greater than zero".to_string());
        }
        if self.max_attempts == 0 {
            return Err("poll max_attempts must be greater than zero".to_string());
        }
        if self.timeout.is_zero() {
            return Err("poll timeout must be greater than zero".to_string());
        }
        if self.max_interval < self.interval {
            return Err(format!(
                "poll max_interval ({:?}) must not be shorter than interval ({:?})",
                self.max_interval, self.interval
            ));
        }
        Ok(())
    }
}

/// Poll a job until it reaches a terminal state or the policy is exhausted.
///
/// The budget is spent when either `max_attempts` polls returned a
/// non-terminal state or the next sleep would cross `timeout`.
pub async fn wait_for_completion(
    service: &dyn TranscriptionService,
    job_name: &str,
    policy: &PollPolicy,
) -> PipelineResult<JobOutcome> {
    let started = Instant::now();
    let mut attempts = 0;

    while attempts < policy.max_attempts {
        attempts += 1;

        match service.job_status(job_name).await? {
            JobStatus::Completed { transcript_uri } => {
                info!(job_name, attempts, "Transcription job completed successfully");
                return Ok(JobOutcome::Completed { transcript_uri });
            }
            JobStatus::Failed { reason } => {
                warn!(job_name, attempts, reason = ?reason, "Transcription job failed");
                return Ok(JobOutcome::Failed { reason });
            }
            status => {
                info!(job_name, status = status.as_str(), "Transcription job status");
            }
        }

        if attempts == policy.max_attempts {
            break;
        }

        let delay = policy.delay_after(attempts);
        if started.elapsed() + delay > policy.timeout {
            debug!(job_name, ?delay, "Next poll would exceed the timeout");
            break;
        }
        tokio::time::sleep(delay).await;
    }

    Err(PipelineError::PollTimeout {
        job_name: job_name.to_string(),
        attempts,
        elapsed: started.elapsed(),
    })
}
