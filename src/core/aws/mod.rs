//! AWS-backed implementations of the pipeline service traits.
//!
//! # Authentication
//!
//! AWS credentials can be provided via:
//! 1. Explicit `aws_access_key_id` / `aws_secret_access_key` in the handler config
//! 2. Environment variables: `AWS_ACCESS_KEY_ID`, `AWS_SECRET_ACCESS_KEY`, `AWS_SESSION_TOKEN`
//! 3. AWS credentials file (`~/.aws/credentials`)
//! 4. The Lambda execution role

mod bedrock;
mod transcribe;
mod translate;

pub use bedrock::BedrockTextGenerator;
pub use transcribe::{AwsTranscribeJobs, fetch_transcript_document};
pub use translate::AwsTranslator;

use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::Credentials;

use crate::config::HandlerConfig;

/// Provider name reported for explicitly configured credentials.
const CREDENTIALS_PROVIDER_NAME: &str = "callscribe";

/// Load the shared SDK configuration.
///
/// Explicit credentials from the config take precedence over the default
/// credential chain (environment, profile, execution role).
pub async fn load_sdk_config(config: &HandlerConfig) -> SdkConfig {
    let mut loader = aws_config::defaults(BehaviorVersion::latest());

    if let Some(region) = &config.aws_region {
        loader = loader.region(Region::new(region.clone()));
    }

    if let (Some(access_key), Some(secret_key)) =
        (&config.aws_access_key_id, &config.aws_secret_access_key)
    {
        let credentials = Credentials::new(
            access_key,
            secret_key,
            config.aws_session_token.clone(),
            None, // Expiration
            CREDENTIALS_PROVIDER_NAME,
        );
        loader = loader.credentials_provider(credentials);
    }

    loader.load().await
}
