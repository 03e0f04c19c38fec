//! Pipeline error types
//!
//! One error enum covers every failure an invocation can propagate. A
//! `FAILED` transcription job is not an error; it is reported through the
//! handler response.

use std::time::Duration;
use thiserror::Error;

/// Result type for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors raised while processing one upload event
#[derive(Error, Debug)]
pub enum PipelineError {
    // ─────────────────────────────────────────────────────────────────────────────
    // Input Errors
    // ─────────────────────────────────────────────────────────────────────────────

    /// Trigger event carried no usable S3 record
    #[error("Invalid upload event: {0}")]
    InvalidEvent(String),

    /// Transcript document violates the item contract
    #[error("Malformed transcript at item {index}: {reason}")]
    MalformedTranscript { index: usize, reason: String },

    /// Invalid handler configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    // ─────────────────────────────────────────────────────────────────────────────
    // Service Errors
    // ─────────────────────────────────────────────────────────────────────────────

    /// Transcribe rejected a request or returned an unusable job description
    #[error("Transcription service error: {0}")]
    Transcription(String),

    /// Job never reached a terminal state within the polling budget
    #[error("Transcription job '{job_name}' still running after {attempts} polls ({elapsed:?})")]
    PollTimeout {
        job_name: String,
        attempts: u32,
        elapsed: Duration,
    },

    /// Transcript document could not be downloaded
    #[error("Failed to fetch transcript from '{uri}': {error}")]
    TranscriptFetch { uri: String, error: String },

    /// Translate request failed
    #[error("Translation service error: {0}")]
    Translation(String),

    /// Bedrock request failed or returned an unreadable body
    #[error("Model invocation error: {0}")]
    Model(String),

    /// Artifact write failed
    #[error("Failed to write '{key}' to bucket '{bucket}': {error}")]
    Storage {
        bucket: String,
        key: String,
        error: String,
    },

    // ─────────────────────────────────────────────────────────────────────────────
    // Data Errors
    // ─────────────────────────────────────────────────────────────────────────────

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PipelineError {
    /// Create a malformed-transcript error for the item at `index`
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedTranscript {
            index,
            reason: reason.into(),
        }
    }

    /// Whether the failure originated in the trigger event or transcript data
    /// rather than in a remote service.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidEvent(_) | Self::MalformedTranscript { .. } | Self::Serialization(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_timeout_message_names_job() {
        let err = PipelineError::PollTimeout {
            job_name: "req-123".to_string(),
            attempts: 3,
            elapsed: Duration::from_secs(30),
        };
        let msg = err.to_string();
        assert!(msg.contains("req-123"));
        assert!(msg.contains("3 polls"));
    }

    #[test]
    fn test_input_error_classification() {
        assert!(PipelineError::InvalidEvent("no records".into()).is_input_error());
        assert!(PipelineError::malformed(4, "missing alternatives").is_input_error());
        assert!(!PipelineError::Translation("throttled".into()).is_input_error());
        assert!(!PipelineError::Model("denied".into()).is_input_error());
    }

    #[test]
    fn test_malformed_display() {
        let err = PipelineError::malformed(7, "missing type");
        assert_eq!(
            err.to_string(),
            "Malformed transcript at item 7: missing type"
        );
    }
}
