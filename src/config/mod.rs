//! Configuration module for the transcription handler
//!
//! This module handles handler configuration from various sources: .env files, YAML files,
//! and environment variables. Priority: YAML > ENV vars > .env values > defaults.
//!
//! # Modules
//! - `yaml`: YAML configuration file loading
//! - `env`: Environment variable loading
//! - `merge`: Merging YAML and environment configurations
//! - `validation`: Configuration validation logic
//! - `utils`: Utility functions for configuration parsing
//!
//! # Example
//! ```rust,no_run
//! use callscribe::config::HandlerConfig;
//! use std::path::PathBuf;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! // Load from environment variables only
//! let config = HandlerConfig::from_env()?;
//!
//! // Load from YAML file with environment variable base
//! let config = HandlerConfig::from_file(&PathBuf::from("handler.yaml"))?;
//!
//! println!("Summarizing with {}", config.model_id);
//! # Ok(())
//! # }
//! ```

use std::path::Path;

mod env;
mod merge;
mod utils;
mod validation;
mod yaml;

pub use yaml::YamlConfig;

use crate::core::job::{DEFAULT_LANGUAGE_OPTIONS, DEFAULT_MAX_SPEAKER_LABELS, PollPolicy};
use crate::core::storage::{ArtifactKeys, S3Credentials};
use crate::core::summary::{DEFAULT_MIN_SUMMARY_CHARS, DEFAULT_MODEL_ID, ModelParameters};

pub const DEFAULT_BEDROCK_REGION: &str = "us-east-1";
pub const DEFAULT_SOURCE_LANGUAGE: &str = "auto";
pub const DEFAULT_TARGET_LANGUAGE: &str = "en";

/// Handler configuration
///
/// Contains everything one invocation needs besides the event itself:
/// - AWS region and optional explicit credentials
/// - Transcribe job settings and the poll policy
/// - Translation languages
/// - Bedrock model, sampling parameters and the summary gate
/// - Artifact key prefixes
#[derive(Debug, Clone)]
pub struct HandlerConfig {
    // AWS settings
    /// Region for Transcribe, Translate and S3 (None: SDK default chain)
    pub aws_region: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub aws_session_token: Option<String>,

    // Transcribe
    pub language_options: Vec<String>,
    pub max_speaker_labels: i32,
    pub poll: PollPolicy,

    // Translate
    pub source_language: String,
    pub target_language: String,

    // Bedrock
    /// Region of the Bedrock runtime endpoint
    pub bedrock_region: String,
    pub model_id: String,
    pub model_parameters: ModelParameters,
    /// Translated transcripts at or below this many characters are not summarized
    pub min_summary_chars: usize,

    // Artifacts
    pub artifact_keys: ArtifactKeys,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            aws_region: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
            aws_session_token: None,
            language_options: DEFAULT_LANGUAGE_OPTIONS
                .iter()
                .map(|s| s.to_string())
                .collect(),
            max_speaker_labels: DEFAULT_MAX_SPEAKER_LABELS,
            poll: PollPolicy::default(),
            source_language: DEFAULT_SOURCE_LANGUAGE.to_string(),
            target_language: DEFAULT_TARGET_LANGUAGE.to_string(),
            bedrock_region: DEFAULT_BEDROCK_REGION.to_string(),
            model_id: DEFAULT_MODEL_ID.to_string(),
            model_parameters: ModelParameters::default(),
            min_summary_chars: DEFAULT_MIN_SUMMARY_CHARS,
            artifact_keys: ArtifactKeys::default(),
        }
    }
}

/// Implement Drop to zeroize secret fields when HandlerConfig is dropped.
impl Drop for HandlerConfig {
    fn drop(&mut self) {
        use zeroize::Zeroize;

        if let Some(ref mut key) = self.aws_access_key_id {
            key.zeroize();
        }
        if let Some(ref mut secret) = self.aws_secret_access_key {
            secret.zeroize();
        }
        if let Some(ref mut token) = self.aws_session_token {
            token.zeroize();
        }
    }
}

impl HandlerConfig {
    /// Load configuration from environment variables only
    ///
    /// Priority order (highest to lowest):
    /// 1. Environment variables (actual ENV vars override .env values)
    /// 2. .env file values (loaded in main.rs)
    /// 3. Default values
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        let config = merge::merge_config(None)?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Load configuration from a YAML file with environment variable base
    ///
    /// Priority order (highest to lowest):
    /// 1. YAML file values
    /// 2. Environment variables (actual ENV vars override .env values)
    /// 3. .env file values
    /// 4. Default values
    ///
    /// # Errors
    /// Returns an error if:
    /// - The YAML file cannot be read or is malformed
    /// - Environment variables have invalid formats
    /// - Configuration validation fails
    pub fn from_file(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        let yaml_config = yaml::YamlConfig::from_file(path)?;
        let config = merge::merge_config(Some(yaml_config))?;
        validation::validate_config(&config)?;
        Ok(config)
    }

    /// Explicit credentials, when both key id and secret are configured.
    pub fn s3_credentials(&self) -> Option<S3Credentials> {
        match (&self.aws_access_key_id, &self.aws_secret_access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Some(S3Credentials {
                access_key_id: access_key_id.clone(),
                secret_access_key: secret_access_key.clone(),
                session_token: self.aws_session_token.clone(),
            }),
            _ => None,
        }
    }
}
