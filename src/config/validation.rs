use super::HandlerConfig;

/// Transcribe accepts between 2 and 30 speaker labels.
const SPEAKER_LABEL_RANGE: std::ops::RangeInclusive<i32> = 2..=30;

/// Validate a merged configuration.
pub(crate) fn validate_config(config: &HandlerConfig) -> Result<(), String> {
    if config.language_options.is_empty() {
        return Err("At least one transcription language option is required".to_string());
    }
    if !SPEAKER_LABEL_RANGE.contains(&config.max_speaker_labels) {
        return Err(format!(
            "max_speaker_labels must be between {} and {}, got {}",
            SPEAKER_LABEL_RANGE.start(),
            SPEAKER_LABEL_RANGE.end(),
            config.max_speaker_labels
        ));
    }
    if config.target_language.is_empty() {
        return Err("Translation target language must not be empty".to_string());
    }
    if config.model_id.is_empty() {
        return Err("Model id must not be empty".to_string());
    }
    validate_credentials(
        &config.aws_access_key_id,
        &config.aws_secret_access_key,
    )?;
    config.poll.validate()?;
    config.model_parameters.validate()?;
    Ok(())
}

/// Explicit credentials must come as a pair.
fn validate_credentials(
    access_key_id: &Option<String>,
    secret_access_key: &Option<String>,
) -> Result<(), String> {
    match (access_key_id, secret_access_key) {
        (Some(_), None) => Err("aws.access_key_id is set without aws.secret_access_key".into()),
        (None, Some(_)) => Err("aws.secret_access_key is set without aws.access_key_id".into()),
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&HandlerConfig::default()).is_ok());
    }

    #[test]
    fn test_empty_language_options_rejected() {
        let mut config = HandlerConfig::default();
        config.language_options.clear();
        assert!(validate_config(&config).unwrap_err().contains("language"));
    }

    #[test]
    fn test_speaker_labels_out_of_range() {
        let mut config = HandlerConfig::default();
        config.max_speaker_labels = 1;
        assert!(validate_config(&config).is_err());
        config.max_speaker_labels = 31;
        assert!(validate_config(&config).is_err());
        config.max_speaker_labels = 30;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_half_credentials_rejected() {
        let mut config = HandlerConfig::default();
        config.aws_access_key_id = Some("AKIA".to_string());
        assert!(validate_config(&config).unwrap_err().contains("secret_access_key"));
    }

    #[test]
    fn test_invalid_sampling_rejected() {
        let mut config = HandlerConfig::default();
        config.model_parameters.top_p = 2.0;
        assert!(validate_config(&config).unwrap_err().contains("top_p"));
    }
}
