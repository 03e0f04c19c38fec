use std::time::Duration;

use super::HandlerConfig;
use super::utils::{env_var, parse_env, parse_list};
use crate::core::job::Backoff;

/// Apply environment variables on top of `config`.
///
/// AWS credentials are not read here; `AWS_ACCESS_KEY_ID` and friends are
/// left to the SDK default credential chain.
pub(crate) fn apply_env(config: &mut HandlerConfig) -> Result<(), String> {
    if let Some(region) = env_var("AWS_REGION").or_else(|| env_var("AWS_DEFAULT_REGION")) {
        config.aws_region = Some(region);
    }

    // Transcribe
    if let Some(languages) = env_var("TRANSCRIBE_LANGUAGE_OPTIONS") {
        config.language_options = parse_list(&languages);
    }
    if let Some(max) = parse_env::<i32>("TRANSCRIBE_MAX_SPEAKERS")? {
        config.max_speaker_labels = max;
    }

    // Polling
    if let Some(secs) = parse_env::<u64>("POLL_INTERVAL_SECONDS")? {
        config.poll.interval = Duration::from_secs(secs);
    }
    if let Some(secs) = parse_env::<u64>("POLL_MAX_INTERVAL_SECONDS")? {
        config.poll.max_interval = Duration::from_secs(secs);
    }
    if let Some(backoff) = env_var("POLL_BACKOFF") {
        config.poll.backoff = Backoff::from_str_or_default(&backoff);
    }
    if let Some(attempts) = parse_env::<u32>("POLL_MAX_ATTEMPTS")? {
        config.poll.max_attempts = attempts;
    }
    if let Some(secs) = parse_env::<u64>("POLL_TIMEOUT_SECONDS")? {
        config.poll.timeout = Duration::from_secs(secs);
    }

    // Translate
    if let Some(source) = env_var("TRANSLATE_SOURCE_LANGUAGE") {
        config.source_language = source;
    }
    if let Some(target) = env_var("TRANSLATE_TARGET_LANGUAGE") {
        config.target_language = target;
    }

    // Bedrock
    if let Some(region) = env_var("BEDROCK_REGION") {
        config.bedrock_region = region;
    }
    if let Some(model_id) = env_var("BEDROCK_MODEL_ID") {
        config.model_id = model_id;
    }
    if let Some(min) = parse_env::<usize>("SUMMARY_MIN_CHARS")? {
        config.min_summary_chars = min;
    }

    // Artifacts
    if let Some(prefix) = env_var("RESULTS_PREFIX") {
        config.artifact_keys.results_prefix = prefix;
    }
    if let Some(prefix) = env_var("SUMMARY_PREFIX") {
        config.artifact_keys.summary_prefix = prefix;
    }
    if let Some(prefix) = env_var("TRAITS_PREFIX") {
        config.artifact_keys.traits_prefix = prefix;
    }

    Ok(())
}
