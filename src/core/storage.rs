//! Artifact keys and the object_store-backed artifact writers.
//!
//! Three JSON artifacts are written per processed upload, each under its own
//! prefix and named after the uploaded object key:
//!
//! - `{summary_prefix}/{key}.json`: the summary as a JSON string
//! - `{results_prefix}/{key}.json`: `{"transcripts": [...]}`
//! - `{traits_prefix}/{key}.json`: `{"traits": "..."}`

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use object_store::aws::{AmazonS3, AmazonS3Builder};
use object_store::memory::InMemory;
use object_store::{ObjectStore, PutPayload, path::Path as ObjectPath};
use serde_json::json;
use tracing::{debug, info};

use crate::core::services::ArtifactStore;
use crate::core::transcript::TranscriptResult;
use crate::errors::{PipelineError, PipelineResult};

pub const DEFAULT_RESULTS_PREFIX: &str = "transcription_results";
pub const DEFAULT_SUMMARY_PREFIX: &str = "transcription_summary";
pub const DEFAULT_TRAITS_PREFIX: &str = "patient_traits";

/// Join a prefix and an object key into an artifact key.
fn build_artifact_key(prefix: &str, object_key: &str) -> String {
    let prefix = prefix.trim().trim_end_matches('/');
    if prefix.is_empty() {
        format!("{}.json", object_key)
    } else {
        format!("{}/{}.json", prefix, object_key)
    }
}

/// Key prefixes of the three artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactKeys {
    pub results_prefix: String,
    pub summary_prefix: String,
    pub traits_prefix: String,
}

impl Default for ArtifactKeys {
    fn default() -> Self {
        Self {
            results_prefix: DEFAULT_RESULTS_PREFIX.to_string(),
            summary_prefix: DEFAULT_SUMMARY_PREFIX.to_string(),
            traits_prefix: DEFAULT_TRAITS_PREFIX.to_string(),
        }
    }
}

impl ArtifactKeys {
    pub fn results(&self, object_key: &str) -> String {
        build_artifact_key(&self.results_prefix, object_key)
    }

    pub fn summary(&self, object_key: &str) -> String {
        build_artifact_key(&self.summary_prefix, object_key)
    }

    pub fn traits(&self, object_key: &str) -> String {
        build_artifact_key(&self.traits_prefix, object_key)
    }

    /// Check that all three artifact keys for `object_key` are writable
    /// object paths. Empty, `.` and `..` segments are rejected.
    pub fn check_writable(&self, object_key: &str) -> PipelineResult<()> {
        for key in [
            self.summary(object_key),
            self.results(object_key),
            self.traits(object_key),
        ] {
            ObjectPath::parse(&key).map_err(|e| {
                PipelineError::InvalidEvent(format!(
                    "object key '{}' cannot be stored as artifact '{}': {}",
                    object_key, key, e
                ))
            })?;
        }
        Ok(())
    }
}

pub fn summary_body(summary: &str) -> PipelineResult<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(summary)?))
}

pub fn results_body(results: &TranscriptResult) -> PipelineResult<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(results)?))
}

pub fn traits_body(traits: &str) -> PipelineResult<Bytes> {
    Ok(Bytes::from(serde_json::to_vec(&json!({ "traits": traits }))?))
}

fn parse_object_path(bucket: &str, key: &str) -> PipelineResult<ObjectPath> {
    ObjectPath::parse(key).map_err(|e| PipelineError::Storage {
        bucket: bucket.to_string(),
        key: key.to_string(),
        error: format!("invalid object path: {}", e),
    })
}

// =============================================================================
// S3
// =============================================================================

/// Static credentials overriding the environment credential chain.
#[derive(Debug, Clone)]
pub struct S3Credentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

/// Writes artifacts to S3. The bucket comes from each upload event, so a
/// bucket-scoped store is built per write.
#[derive(Debug, Clone, Default)]
pub struct S3ArtifactStore {
    region: Option<String>,
    credentials: Option<S3Credentials>,
}

impl S3ArtifactStore {
    pub fn new(region: Option<String>, credentials: Option<S3Credentials>) -> Self {
        Self {
            region,
            credentials,
        }
    }

    fn store_for(&self, bucket: &str) -> PipelineResult<AmazonS3> {
        // from_env picks up AWS_ACCESS_KEY_ID/AWS_SESSION_TOKEN set by the Lambda runtime
        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);
        if let Some(region) = &self.region {
            builder = builder.with_region(region);
        }
        if let Some(creds) = &self.credentials {
            builder = builder
                .with_access_key_id(&creds.access_key_id)
                .with_secret_access_key(&creds.secret_access_key);
            if let Some(token) = &creds.session_token {
                builder = builder.with_token(token);
            }
        }
        builder.build().map_err(|e| PipelineError::Storage {
            bucket: bucket.to_string(),
            key: String::new(),
            error: format!("failed to configure S3 store: {}", e),
        })
    }
}

#[async_trait]
impl ArtifactStore for S3ArtifactStore {
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> PipelineResult<()> {
        let store = self.store_for(bucket)?;
        let path = parse_object_path(bucket, key)?;
        let size = body.len();

        debug!(bucket, key, size, "Writing artifact");
        store
            .put(&path, PutPayload::from(body))
            .await
            .map_err(|e| PipelineError::Storage {
                bucket: bucket.to_string(),
                key: key.to_string(),
                error: e.to_string(),
            })?;

        info!("Artifact uploaded to S3: s3://{}/{}", bucket, key);
        Ok(())
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Artifact store backed by one [`InMemory`] object store per bucket.
/// Keeps the write order for inspection.
#[derive(Debug, Default)]
pub struct InMemoryArtifactStore {
    buckets: Mutex<HashMap<String, Arc<InMemory>>>,
    writes: Mutex<Vec<(String, String)>>,
}

impl InMemoryArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn bucket(&self, bucket: &str) -> Arc<InMemory> {
        let mut buckets = self.buckets.lock().unwrap_or_else(|e| e.into_inner());
        buckets
            .entry(bucket.to_string())
            .or_insert_with(|| Arc::new(InMemory::new()))
            .clone()
    }

    /// `(bucket, key)` pairs in the order they were written.
    pub fn writes(&self) -> Vec<(String, String)> {
        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Read back an artifact, `None` when it was never written.
    pub async fn get(&self, bucket: &str, key: &str) -> PipelineResult<Option<Bytes>> {
        let store = self.bucket(bucket);
        let path = parse_object_path(bucket, key)?;
        let storage_error = |e: object_store::Error| PipelineError::Storage {
            bucket: bucket.to_string(),
            key: key.to_string(),
            error: e.to_string(),
        };

        match store.get(&path).await {
            Ok(result) => Ok(Some(result.bytes().await.map_err(storage_error)?)),
            Err(object_store::Error::NotFound { .. }) => Ok(None),
            Err(e) => Err(storage_error(e)),
        }
    }
}

#[async_trait]
impl ArtifactStore for InMemoryArtifactStore {
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> PipelineResult<()> {
        let store = self.bucket(bucket);
        let path = parse_object_path(bucket, key)?;
        store
            .put(&path, PutPayload::from(body))
            .await
            .map_err(|e| PipelineError::Storage {
                bucket: bucket.to_string(),
                key: key.to_string(),
                error: e.to_string(),
            })?;

        self.writes
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((bucket.to_string(), key.to_string()));
        Ok(())
    }
}
