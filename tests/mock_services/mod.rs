//! In-process fakes for the pipeline service traits.
//!
//! - `ScriptedTranscription`: replays job statuses and serves a canned transcript
//! - `RecordingTranslator`: records translate calls, echoes or returns a fixed text
//! - `CountingModel`: counts completions and returns a canned completion

// Not every test binary uses every fake
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use serde_json::{Value, json};

use callscribe::core::summary::CompletionRequest;
use callscribe::{
    InMemoryArtifactStore, JobStatus, PipelineError, PipelineResult, PipelineServices,
    TextGenerationService, TranscriptDocument, TranscriptionJobRequest, TranscriptionService,
    TranslationService,
};

pub const TRANSCRIPT_URI: &str = "https://s3.amazonaws.com/transcripts/job.json";

/// Build a Transcribe item. `kind` is "pronunciation" or "punctuation".
pub fn item(kind: &str, content: &str, speaker: Option<&str>) -> Value {
    let mut item = json!({
        "type": kind,
        "alternatives": [{"confidence": "0.99", "content": content}],
    });
    if let Some(speaker) = speaker {
        item["speaker_label"] = json!(speaker);
    }
    item
}

pub fn transcript_document(items: Vec<Value>) -> Value {
    json!({
        "jobName": "test-job",
        "accountId": "123456789012",
        "results": {
            "transcripts": [{"transcript": ""}],
            "items": items,
        },
        "status": "COMPLETED",
    })
}

// =============================================================================
// Transcription
// =============================================================================

pub struct ScriptedTranscription {
    statuses: Mutex<VecDeque<JobStatus>>,
    document: Value,
    started: Mutex<Vec<TranscriptionJobRequest>>,
    polls: AtomicU32,
    fetches: AtomicU32,
}

impl ScriptedTranscription {
    /// Replays `statuses`, repeating the last one once the script runs out.
    pub fn new(statuses: Vec<JobStatus>, document: Value) -> Self {
        Self {
            statuses: Mutex::new(statuses.into()),
            document,
            started: Mutex::new(Vec::new()),
            polls: AtomicU32::new(0),
            fetches: AtomicU32::new(0),
        }
    }

    pub fn completed(document: Value) -> Self {
        Self::new(
            vec![JobStatus::Completed {
                transcript_uri: TRANSCRIPT_URI.to_string(),
            }],
            document,
        )
    }

    pub fn started(&self) -> Vec<TranscriptionJobRequest> {
        self.started.lock().unwrap().clone()
    }

    pub fn polls(&self) -> u32 {
        self.polls.load(Ordering::SeqCst)
    }

    pub fn fetches(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TranscriptionService for ScriptedTranscription {
    async fn start_job(&self, request: &TranscriptionJobRequest) -> PipelineResult<()> {
        self.started.lock().unwrap().push(request.clone());
        Ok(())
    }

    async fn job_status(&self, _job_name: &str) -> PipelineResult<JobStatus> {
        self.polls.fetch_add(1, Ordering::SeqCst);
        let mut statuses = self.statuses.lock().unwrap();
        if statuses.len() > 1 {
            Ok(statuses.pop_front().unwrap())
        } else {
            Ok(statuses.front().cloned().unwrap_or(JobStatus::InProgress))
        }
    }

    async fn fetch_transcript(&self, transcript_uri: &str) -> PipelineResult<TranscriptDocument> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        assert_eq!(transcript_uri, TRANSCRIPT_URI);
        TranscriptDocument::from_slice(&serde_json::to_vec(&self.document).unwrap())
    }
}

// =============================================================================
// Translation
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateCall {
    pub text: String,
    pub source: String,
    pub target: String,
}

pub struct RecordingTranslator {
    output: Option<String>,
    calls: Mutex<Vec<TranslateCall>>,
}

impl RecordingTranslator {
    /// Returns the input unchanged.
    pub fn echo() -> Self {
        Self {
            output: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(output: impl Into<String>) -> Self {
        Self {
            output: Some(output.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<TranslateCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl TranslationService for RecordingTranslator {
    async fn translate(
        &self,
        text: &str,
        source_language: &str,
        target_language: &str,
    ) -> PipelineResult<String> {
        self.calls.lock().unwrap().push(TranslateCall {
            text: text.to_string(),
            source: source_language.to_string(),
            target: target_language.to_string(),
        });
        Ok(self.output.clone().unwrap_or_else(|| text.to_string()))
    }
}

// =============================================================================
// Model
// =============================================================================

pub struct CountingModel {
    completion: Result<String, String>,
    prompts: Mutex<Vec<String>>,
}

impl CountingModel {
    pub fn returning(completion: impl Into<String>) -> Self {
        Self {
            completion: Ok(completion.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(error: impl Into<String>) -> Self {
        Self {
            completion: Err(error.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerationService for CountingModel {
    async fn complete(&self, request: &CompletionRequest<'_>) -> PipelineResult<String> {
        self.prompts.lock().unwrap().push(request.prompt.clone());
        self.completion.clone().map_err(PipelineError::Model)
    }
}

// =============================================================================
// Wiring
// =============================================================================

pub struct Fakes {
    pub transcription: Arc<ScriptedTranscription>,
    pub translation: Arc<RecordingTranslator>,
    pub model: Arc<CountingModel>,
    pub artifacts: Arc<InMemoryArtifactStore>,
}

impl Fakes {
    pub fn new(
        transcription: ScriptedTranscription,
        translation: RecordingTranslator,
        model: CountingModel,
    ) -> Self {
        Self {
            transcription: Arc::new(transcription),
            translation: Arc::new(translation),
            model: Arc::new(model),
            artifacts: Arc::new(InMemoryArtifactStore::new()),
        }
    }

    pub fn services(&self) -> PipelineServices {
        PipelineServices {
            transcription: self.transcription.clone(),
            translation: self.translation.clone(),
            model: self.model.clone(),
            artifacts: self.artifacts.clone(),
        }
    }

    /// Decoded JSON body of an artifact, if it was written.
    pub async fn artifact(&self, bucket: &str, key: &str) -> Option<Value> {
        self.artifacts
            .get(bucket, key)
            .await
            .unwrap()
            .map(|bytes| serde_json::from_slice(&bytes).unwrap())
    }
}
