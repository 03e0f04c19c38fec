pub mod aws;
pub mod event;
pub mod job;
pub mod services;
pub mod storage;
pub mod summary;
pub mod transcript;

// Re-export commonly used types for convenience
pub use event::{S3Event, UploadedObject};
pub use job::{JobOutcome, JobStatus, PollPolicy, TranscriptionJobRequest, wait_for_completion};
pub use services::{ArtifactStore, TextGenerationService, TranscriptionService, TranslationService};
pub use storage::{ArtifactKeys, InMemoryArtifactStore, S3ArtifactStore};
pub use summary::{SummaryResponse, Summarizer, parse_ai_response};
pub use transcript::{
    Speaker, SpeakerTurn, TranscriptDocument, TranscriptItem, TranscriptResult,
    process_speaker_separation,
};
