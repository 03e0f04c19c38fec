use std::time::Duration;

use super::HandlerConfig;
use super::env::apply_env;
use super::yaml::YamlConfig;
use crate::core::job::Backoff;

/// Build the final configuration: defaults, then environment, then YAML.
pub(crate) fn merge_config(yaml: Option<YamlConfig>) -> Result<HandlerConfig, String> {
    let mut config = HandlerConfig::default();
    apply_env(&mut config)?;

    if let Some(yaml) = yaml {
        apply_yaml(&mut config, yaml);
    }

    Ok(config)
}

fn apply_yaml(config: &mut HandlerConfig, yaml: YamlConfig) {
    if let Some(aws) = yaml.aws {
        if aws.region.is_some() {
            config.aws_region = aws.region;
        }
        if aws.access_key_id.is_some() {
            config.aws_access_key_id = aws.access_key_id;
        }
        if aws.secret_access_key.is_some() {
            config.aws_secret_access_key = aws.secret_access_key;
        }
        if aws.session_token.is_some() {
            config.aws_session_token = aws.session_token;
        }
    }

    if let Some(transcribe) = yaml.transcribe {
        if let Some(languages) = transcribe.language_options {
            config.language_options = languages;
        }
        if let Some(max) = transcribe.max_speaker_labels {
            config.max_speaker_labels = max;
        }
    }

    if let Some(poll) = yaml.poll {
        if let Some(secs) = poll.interval_seconds {
            config.poll.interval = Duration::from_secs(secs);
        }
        if let Some(secs) = poll.max_interval_seconds {
            config.poll.max_interval = Duration::from_secs(secs);
        }
        if let Some(backoff) = poll.backoff {
            config.poll.backoff = Backoff::from_str_or_default(&backoff);
        }
        if let Some(attempts) = poll.max_attempts {
            config.poll.max_attempts = attempts;
        }
        if let Some(secs) = poll.timeout_seconds {
            config.poll.timeout = Duration::from_secs(secs);
        }
    }

    if let Some(translate) = yaml.translate {
        if let Some(source) = translate.source_language {
            config.source_language = source;
        }
        if let Some(target) = translate.target_language {
            config.target_language = target;
        }
    }

    if let Some(model) = yaml.model {
        if let Some(region) = model.region {
            config.bedrock_region = region;
        }
        if let Some(model_id) = model.model_id {
            config.model_id = model_id;
        }
        if let Some(min) = model.min_summary_chars {
            config.min_summary_chars = min;
        }
        let params = &mut config.model_parameters;
        if let Some(max_tokens) = model.max_tokens_to_sample {
            params.max_tokens_to_sample = max_tokens;
        }
        if let Some(temperature) = model.temperature {
            params.temperature = temperature;
        }
        if let Some(top_k) = model.top_k {
            params.top_k = top_k;
        }
        if let Some(top_p) = model.top_p {
            params.top_p = top_p;
        }
        if let Some(stop) = model.stop_sequences {
            params.stop_sequences = stop;
        }
    }

    if let Some(artifacts) = yaml.artifacts {
        if let Some(prefix) = artifacts.results_prefix {
            config.artifact_keys.results_prefix = prefix;
        }
        if let Some(prefix) = artifacts.summary_prefix {
            config.artifact_keys.summary_prefix = prefix;
        }
        if let Some(prefix) = artifacts.traits_prefix {
            config.artifact_keys.traits_prefix = prefix;
        }
    }
}
