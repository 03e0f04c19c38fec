//! Transcript document model and speaker-turn segmentation.
//!
//! Amazon Transcribe emits a flat stream of recognized tokens under
//! `results.items`. Each token is either a pronounced word or a punctuation
//! mark and, when speaker labels are enabled, usually carries the label of
//! the speaker it was attributed to:
//!
//! ```json
//! {"type": "pronunciation", "alternatives": [{"content": "Hello"}], "speaker_label": "spk_0"}
//! {"type": "punctuation", "alternatives": [{"content": ","}], "speaker_label": "spk_0"}
//! ```
//!
//! [`process_speaker_separation`] folds that stream into ordered
//! [`SpeakerTurn`]s, which render as `"{speaker}: {text}"`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::{PipelineError, PipelineResult};

/// Rendered label for content that was never attributed to a speaker.
pub const UNKNOWN_SPEAKER: &str = "UNKNOWN";

/// Separator used when the turns are concatenated for translation.
pub const TURN_SEPARATOR: &str = ". ";

// =============================================================================
// Wire format
// =============================================================================

/// Transcript document as downloaded from `TranscriptFileUri`.
///
/// Item fields are deserialized leniently so that contract violations can be
/// reported with the offending item index instead of a bare serde error.
#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptDocument {
    #[serde(rename = "jobName", default)]
    pub job_name: Option<String>,
    pub results: TranscriptResults,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptResults {
    #[serde(default)]
    pub items: Vec<RawTranscriptItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawTranscriptItem {
    #[serde(rename = "type", default)]
    pub item_type: Option<String>,
    #[serde(default)]
    pub alternatives: Vec<RawAlternative>,
    #[serde(default)]
    pub speaker_label: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RawAlternative {
    #[serde(default)]
    pub content: Option<String>,
}

impl TranscriptDocument {
    /// Parse a transcript document from raw JSON bytes.
    pub fn from_slice(bytes: &[u8]) -> PipelineResult<Self> {
        Ok(serde_json::from_slice(bytes)?)
    }

    /// Validate every raw item and convert it to a [`TranscriptItem`].
    ///
    /// Fails on the first item without a type, with an unknown type, or
    /// without `alternatives[0].content`.
    pub fn items(&self) -> PipelineResult<Vec<TranscriptItem>> {
        self.results
            .items
            .iter()
            .enumerate()
            .map(|(index, raw)| TranscriptItem::from_raw(index, raw))
            .collect()
    }
}

// =============================================================================
// Domain types
// =============================================================================

/// Kind of recognized token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    /// A spoken word (`pronunciation` in Transcribe output)
    Word,
    /// A punctuation mark inserted by the recognizer
    Punctuation,
}

impl ItemKind {
    /// Parse the Transcribe `type` field.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pronunciation" | "word" => Some(Self::Word),
            "punctuation" => Some(Self::Punctuation),
            _ => None,
        }
    }
}

/// One recognized token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranscriptItem {
    pub kind: ItemKind,
    pub content: String,
    pub speaker_label: Option<String>,
}

impl TranscriptItem {
    pub fn word(content: impl Into<String>, speaker: Option<&str>) -> Self {
        Self {
            kind: ItemKind::Word,
            content: content.into(),
            speaker_label: speaker.map(String::from),
        }
    }

    pub fn punctuation(content: impl Into<String>, speaker: Option<&str>) -> Self {
        Self {
            kind: ItemKind::Punctuation,
            content: content.into(),
            speaker_label: speaker.map(String::from),
        }
    }

    fn from_raw(index: usize, raw: &RawTranscriptItem) -> PipelineResult<Self> {
        let item_type = raw
            .item_type
            .as_deref()
            .ok_or_else(|| PipelineError::malformed(index, "missing 'type'"))?;
        let kind = ItemKind::parse(item_type).ok_or_else(|| {
            PipelineError::malformed(index, format!("unknown item type '{}'", item_type))
        })?;
        let content = raw
            .alternatives
            .first()
            .and_then(|alt| alt.content.clone())
            .ok_or_else(|| PipelineError::malformed(index, "missing 'alternatives[0].content'"))?;

        Ok(Self {
            kind,
            content,
            speaker_label: raw.speaker_label.clone(),
        })
    }
}

/// Speaker identity of a turn.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Speaker {
    /// Diarization label such as `spk_0`
    Labeled(String),
    /// No token of the turn carried a label
    Unknown,
}

impl From<Option<String>> for Speaker {
    fn from(label: Option<String>) -> Self {
        match label {
            Some(label) => Self::Labeled(label),
            None => Self::Unknown,
        }
    }
}

impl fmt::Display for Speaker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Labeled(label) => f.write_str(label),
            Self::Unknown => f.write_str(UNKNOWN_SPEAKER),
        }
    }
}

/// A contiguous run of tokens attributed to one speaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakerTurn {
    pub speaker: Speaker,
    pub text: String,
}

impl fmt::Display for SpeakerTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.speaker, self.text)
    }
}

/// Ordered rendered turns; the unit that is translated and persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptResult {
    pub transcripts: Vec<String>,
}

impl TranscriptResult {
    pub fn from_turns(turns: &[SpeakerTurn]) -> Self {
        Self {
            transcripts: turns.iter().map(SpeakerTurn::to_string).collect(),
        }
    }

    /// Split translated text back into per-turn strings. Empty text yields
    /// no turns.
    pub fn from_joined(text: &str) -> Self {
        if text.is_empty() {
            return Self::default();
        }
        Self {
            transcripts: text.split(TURN_SEPARATOR).map(String::from).collect(),
        }
    }

    /// Concatenate the turns for translation.
    pub fn joined(&self) -> String {
        self.transcripts.join(TURN_SEPARATOR)
    }

    pub fn is_empty(&self) -> bool {
        self.transcripts.is_empty()
    }
}

// =============================================================================
// Segmentation
// =============================================================================

/// Fold a token stream into speaker turns.
///
/// A turn closes only when a token carries a label that differs from the
/// current speaker. Unlabeled tokens always extend the current turn, so
/// content preceding the first label joins the first labeled turn and an
/// unlabeled gap between two labels stays with the earlier speaker.
pub fn process_speaker_separation(items: &[TranscriptItem]) -> Vec<SpeakerTurn> {
    let mut turns = Vec::new();
    let mut current_speaker: Option<String> = None;
    let mut buffer = String::new();

    for item in items {
        if let Some(label) = item.speaker_label.as_deref()
            && current_speaker.as_deref() != Some(label)
        {
            if current_speaker.is_some() && !buffer.is_empty() {
                turns.push(SpeakerTurn {
                    speaker: Speaker::from(current_speaker.take()),
                    text: buffer.trim().to_string(),
                });
                buffer.clear();
            }
            current_speaker = Some(label.to_string());
        }

        match item.kind {
            ItemKind::Punctuation => {
                buffer.truncate(buffer.trim_end().len());
                buffer.push_str(&item.content);
            }
            ItemKind::Word => {
                buffer.push_str(&item.content);
                buffer.push(' ');
            }
        }
    }

    if !buffer.is_empty() {
        turns.push(SpeakerTurn {
            speaker: Speaker::from(current_speaker),
            text: buffer.trim().to_string(),
        });
    }

    turns
}
