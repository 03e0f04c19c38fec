use serde::Deserialize;
use std::path::Path;

/// Complete YAML configuration structure
///
/// All fields are optional to allow partial configuration. Values present here
/// override environment variables.
///
/// # Example YAML structure
/// ```yaml
/// aws:
///   region: "us-west-2"
///   access_key_id: "AKIA..."
///   secret_access_key: "secret"
///
/// transcribe:
///   language_options: ["en-US", "es-US"]
///   max_speaker_labels: 2
///
/// poll:
///   interval_seconds: 10
///   max_interval_seconds: 60
///   backoff: "exponential"
///   max_attempts: 90
///   timeout_seconds: 840
///
/// translate:
///   source_language: "auto"
///   target_language: "en"
///
/// model:
///   region: "us-east-1"
///   model_id: "anthropic.claude-v2"
///   min_summary_chars: 500
///   max_tokens_to_sample: 2000
///   temperature: 1.0
///   top_k: 250
///   top_p: 0.999
///
/// artifacts:
///   results_prefix: "transcription_results"
///   summary_prefix: "transcription_summary"
///   traits_prefix: "patient_traits"
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct YamlConfig {
    pub aws: Option<AwsYaml>,
    pub transcribe: Option<TranscribeYaml>,
    pub poll: Option<PollYaml>,
    pub translate: Option<TranslateYaml>,
    pub model: Option<ModelYaml>,
    pub artifacts: Option<ArtifactsYaml>,
}

/// AWS region and explicit credentials from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AwsYaml {
    pub region: Option<String>,
    pub access_key_id: Option<String>,
    pub secret_access_key: Option<String>,
    pub session_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TranscribeYaml {
    pub language_options: Option<Vec<String>>,
    pub max_speaker_labels: Option<i32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct PollYaml {
    pub interval_seconds: Option<u64>,
    pub max_interval_seconds: Option<u64>,
    /// "fixed" or "exponential"
    pub backoff: Option<String>,
    pub max_attempts: Option<u32>,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct TranslateYaml {
    pub source_language: Option<String>,
    pub target_language: Option<String>,
}

/// Bedrock model and sampling settings from YAML
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ModelYaml {
    pub region: Option<String>,
    pub model_id: Option<String>,
    pub min_summary_chars: Option<usize>,
    pub max_tokens_to_sample: Option<u32>,
    pub temperature: Option<f32>,
    pub top_k: Option<u32>,
    pub top_p: Option<f32>,
    pub stop_sequences: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ArtifactsYaml {
    pub results_prefix: Option<String>,
    pub summary_prefix: Option<String>,
    pub traits_prefix: Option<String>,
}

impl YamlConfig {
    /// Load YAML configuration from a file
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or the YAML is malformed
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| format!("Failed to read config file {}: {e}", path.display()))?;

        let config: YamlConfig = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse YAML config: {e}"))?;

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_yaml_config_full() {
        let yaml = r#"
aws:
  region: "eu-west-1"
  access_key_id: "AKIAEXAMPLE"
  secret_access_key: "secret"

transcribe:
  language_options: ["en-US", "es-US"]
  max_speaker_labels: 3

poll:
  interval_seconds: 5
  backoff: "exponential"
  max_attempts: 20

translate:
  target_language: "es"

model:
  region: "us-west-2"
  model_id: "anthropic.claude-v2:1"
  min_summary_chars: 200
  temperature: 0.5

artifacts:
  traits_prefix: "traits"
"#;
        let config: YamlConfig = serde_yaml::from_str(yaml).unwrap();

        let aws = config.aws.unwrap();
        assert_eq!(aws.region.as_deref(), Some("eu-west-1"));
        assert_eq!(aws.access_key_id.as_deref(), Some("AKIAEXAMPLE"));
        assert_eq!(aws.session_token, None);

        let transcribe = config.transcribe.unwrap();
        assert_eq!(
            transcribe.language_options,
            Some(vec!["en-US".to_string(), "es-US".to_string()])
        );
        assert_eq!(transcribe.max_speaker_labels, Some(3));

        let poll = config.poll.unwrap();
        assert_eq!(poll.interval_seconds, Some(5));
        assert_eq!(poll.backoff.as_deref(), Some("exponential"));
        assert_eq!(poll.timeout_seconds, None);

        assert_eq!(
            config.translate.unwrap().target_language.as_deref(),
            Some("es")
        );

        let model = config.model.unwrap();
        assert_eq!(model.model_id.as_deref(), Some("anthropic.claude-v2:1"));
        assert_eq!(model.min_summary_chars, Some(200));
        assert_eq!(model.temperature, Some(0.5));

        assert_eq!(
            config.artifacts.unwrap().traits_prefix.as_deref(),
            Some("traits")
        );
    }

    #[test]
    fn test_yaml_config_empty() {
        let config: YamlConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.aws.is_none());
        assert!(config.model.is_none());
    }

    #[test]
    fn test_yaml_from_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("handler.yaml");
        fs::write(&path, "model:\n  model_id: \"custom-model\"\n").unwrap();

        let config = YamlConfig::from_file(&path).unwrap();
        assert_eq!(
            config.model.unwrap().model_id.as_deref(),
            Some("custom-model")
        );
    }

    #[test]
    fn test_yaml_from_missing_file() {
        let err = YamlConfig::from_file(Path::new("/nonexistent/handler.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
