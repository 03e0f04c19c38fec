//! Call summarization: the insufficient-data gate, the clinical prompt, the
//! Bedrock text-completions body and parsing of the completion into a
//! summary and a trait list.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::core::services::TextGenerationService;
use crate::errors::PipelineResult;

/// Literal marker separating the summary from the trait list in a completion.
pub const TRAITS_MARKER: &str = "Patient Traits:";

/// Traits value when the completion carries no marker.
pub const NO_TRAITS: &str = "No traits identified";

/// Summary returned when the transcript is too short to summarize.
pub const INSUFFICIENT_DATA_SUMMARY: &str = "Transcription data insufficient for a meaningful summary. Please check the transcription and ensure it is complete before attempting to summarize again.";

/// Traits returned when the transcript is too short to summarize.
pub const INSUFFICIENT_DATA_TRAITS: &str = "No traits identified due to insufficient data.";

/// Transcripts at or below this many characters skip the model call.
pub const DEFAULT_MIN_SUMMARY_CHARS: usize = 500;

pub const DEFAULT_MODEL_ID: &str = "anthropic.claude-v2";
pub const ANTHROPIC_VERSION: &str = "bedrock-2023-05-31";
pub const HUMAN_STOP_SEQUENCE: &str = "\n\nHuman:";

/// Summary and trait list derived from one completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryResponse {
    pub summary: String,
    pub traits: String,
}

impl SummaryResponse {
    fn insufficient_data() -> Self {
        Self {
            summary: INSUFFICIENT_DATA_SUMMARY.to_string(),
            traits: INSUFFICIENT_DATA_TRAITS.to_string(),
        }
    }
}

/// Split a raw completion on the first [`TRAITS_MARKER`].
///
/// Without a marker the whole completion is the summary, untrimmed, and the
/// traits fall back to [`NO_TRAITS`].
pub fn parse_ai_response(completion: &str) -> SummaryResponse {
    match completion.split_once(TRAITS_MARKER) {
        Some((summary, traits)) => SummaryResponse {
            summary: summary.trim().to_string(),
            traits: traits.trim().to_string(),
        },
        None => SummaryResponse {
            summary: completion.to_string(),
            traits: NO_TRAITS.to_string(),
        },
    }
}

/// Sampling parameters for the text-completions request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelParameters {
    pub max_tokens_to_sample: u32,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub stop_sequences: Vec<String>,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            max_tokens_to_sample: 2000,
            temperature: 1.0,
            top_k: 250,
            top_p: 0.999,
            stop_sequences: vec![HUMAN_STOP_SEQUENCE.to_string()],
        }
    }
}

impl ModelParameters {
    pub fn validate(&self) -> Result<(), String> {
        if self.max_tokens_to_sample == 0 {
            return Err("max_tokens_to_sample must be greater than zero".to_string());
        }
        if !(0.0..=1.0).contains(&self.temperature) {
            return Err(format!(
                "temperature must be within 0.0..=1.0, got {}",
                self.temperature
            ));
        }
        if !(0.0..=1.0).contains(&self.top_p) {
            return Err(format!("top_p must be within 0.0..=1.0, got {}", self.top_p));
        }
        if self.top_k > 500 {
            return Err(format!("top_k must be at most 500, got {}", self.top_k));
        }
        Ok(())
    }
}

/// Request body for the Claude text-completions API on Bedrock.
#[derive(Debug, Clone, Serialize)]
pub struct CompletionRequest<'a> {
    pub prompt: String,
    pub max_tokens_to_sample: u32,
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub stop_sequences: &'a [String],
    pub anthropic_version: &'static str,
}

impl<'a> CompletionRequest<'a> {
    pub fn new(prompt: &str, params: &'a ModelParameters) -> Self {
        Self {
            prompt: format!("\n\nHuman: {}\nAssistant:", prompt),
            max_tokens_to_sample: params.max_tokens_to_sample,
            temperature: params.temperature,
            top_k: params.top_k,
            top_p: params.top_p,
            stop_sequences: &params.stop_sequences,
            anthropic_version: ANTHROPIC_VERSION,
        }
    }
}

/// Response body of the text-completions API.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub completion: String,
    #[serde(default)]
    pub stop_reason: Option<String>,
}

/// Build the clinical call-notes prompt around a translated transcript.
pub fn build_prompt(transcript: &str) -> String {
    format!(
        "{transcript}: Given the following detailed conversation transcript between a patient and a healthcare coordinator,donot mention the gender in the summary, create a concise summary in the form of caller-written notes. The summary should include essential details such as patient concerns, notable symptoms, any mentioned appointments, and overall sentiment. Focus on capturing the key points in a clear, organized, and succinct manner as if jotting down notes during the call. Make it as a paragraph.\n        {TRAITS_MARKER} List the patient's traits identified from the call and assessment, using single words for each trait that capture their personality, behavior, and any notable health-related characteristics."
    )
}

/// Produces a [`SummaryResponse`] for a translated transcript, calling the
/// model only when the transcript is long enough to be worth summarizing.
pub struct Summarizer<'a> {
    model: &'a dyn TextGenerationService,
    params: &'a ModelParameters,
    min_chars: usize,
}

impl<'a> Summarizer<'a> {
    pub fn new(
        model: &'a dyn TextGenerationService,
        params: &'a ModelParameters,
        min_chars: usize,
    ) -> Self {
        Self {
            model,
            params,
            min_chars,
        }
    }

    pub async fn summarize(&self, transcript: &str) -> PipelineResult<SummaryResponse> {
        let length = transcript.chars().count();
        if length <= self.min_chars {
            info!(
                length,
                min_chars = self.min_chars,
                "Transcript too short, skipping model invocation"
            );
            return Ok(SummaryResponse::insufficient_data());
        }

        let prompt = build_prompt(transcript);
        let request = CompletionRequest::new(&prompt, self.params);
        debug!(
            prompt_chars = request.prompt.len(),
            max_tokens = request.max_tokens_to_sample,
            "Requesting call summary"
        );

        let completion = self.model.complete(&request).await?;
        Ok(parse_ai_response(&completion))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_splits_on_marker() {
        let parsed = parse_ai_response("Summary text. Patient Traits: calm, cooperative");
        assert_eq!(parsed.summary, "Summary text.");
        assert_eq!(parsed.traits, "calm, cooperative");
    }

    #[test]
    fn test_parse_without_marker_keeps_raw_text() {
        let parsed = parse_ai_response("Just a summary with no marker");
        assert_eq!(parsed.summary, "Just a summary with no marker");
        assert_eq!(parsed.traits, "No traits identified");
    }

    #[test]
    fn test_parse_without_marker_does_not_trim() {
        let parsed = parse_ai_response("  padded summary \n");
        assert_eq!(parsed.summary, "  padded summary \n");
    }

    #[test]
    fn test_parse_uses_first_marker_only() {
        let parsed =
            parse_ai_response("Notes.\nPatient Traits: anxious\nPatient Traits: repeated");
        assert_eq!(parsed.summary, "Notes.");
        assert_eq!(parsed.traits, "anxious\nPatient Traits: repeated");
    }

    #[test]
    fn test_parse_trims_multiline_sections() {
        let parsed = parse_ai_response(" Caller reports headaches.\n\nPatient Traits:\n- Anxious\n- Polite\n");
        assert_eq!(parsed.summary, "Caller reports headaches.");
        assert_eq!(parsed.traits, "- Anxious\n- Polite");
    }

    #[test]
    fn test_completion_request_body_shape() {
        let params = ModelParameters::default();
        let request = CompletionRequest::new("Summarize this", &params);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["prompt"], "\n\nHuman: Summarize this\nAssistant:");
        assert_eq!(body["max_tokens_to_sample"], 2000);
        assert_eq!(body["temperature"], 1.0);
        assert_eq!(body["top_k"], 250);
        assert_eq!(body["stop_sequences"], serde_json::json!(["\n\nHuman:"]));
        assert_eq!(body["anthropic_version"], "bedrock-2023-05-31");
        let top_p = body["top_p"].as_f64().unwrap();
        assert!((top_p - 0.999).abs() < 1e-6);
    }

    #[test]
    fn test_prompt_embeds_transcript_and_marker() {
        let prompt = build_prompt("spk_0: I have a fever");
        assert!(prompt.starts_with("spk_0: I have a fever: Given the following"));
        assert!(prompt.contains("Patient Traits: List the patient's traits"));
    }

    #[test]
    fn test_completion_response_missing_field_defaults_empty() {
        let response: CompletionResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(response.completion, "");
    }

    #[test]
    fn test_model_parameters_validation() {
        assert!(ModelParameters::default().validate().is_ok());

        let params = ModelParameters {
            temperature: 1.5,
            ..Default::default()
        };
        assert!(params.validate().unwrap_err().contains("temperature"));

        let params = ModelParameters {
            max_tokens_to_sample: 0,
            ..Default::default()
        };
        assert!(params.validate().is_err());
    }
}
