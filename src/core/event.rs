//! S3 upload notification intake.

use serde::{Deserialize, Serialize};

use crate::errors::{PipelineError, PipelineResult};

/// S3 event notification as delivered to the function.
///
/// Only the fields the pipeline reads are modeled; everything else in the
/// notification is ignored.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct S3Event {
    #[serde(rename = "Records", default)]
    pub records: Vec<S3EventRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3EventRecord {
    #[serde(rename = "eventName", default, skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    pub s3: S3Entity,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Entity {
    pub bucket: S3Bucket,
    pub object: S3Object,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Bucket {
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct S3Object {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
}

/// Location of the uploaded recording.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedObject {
    pub bucket: String,
    pub key: String,
}

impl S3Event {
    /// Build a single-record event, mostly useful for local invocation.
    pub fn single(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            records: vec![S3EventRecord {
                event_name: Some("ObjectCreated:Put".to_string()),
                s3: S3Entity {
                    bucket: S3Bucket { name: bucket.into() },
                    object: S3Object {
                        key: key.into(),
                        size: None,
                    },
                },
            }],
        }
    }

    /// Bucket and key of the first record. The key is used exactly as
    /// delivered.
    pub fn uploaded_object(&self) -> PipelineResult<UploadedObject> {
        let record = self
            .records
            .first()
            .ok_or_else(|| PipelineError::InvalidEvent("event contains no records".to_string()))?;

        let bucket = record.s3.bucket.name.trim();
        if bucket.is_empty() {
            return Err(PipelineError::InvalidEvent("empty bucket name".to_string()));
        }
        if record.s3.object.key.is_empty() {
            return Err(PipelineError::InvalidEvent("empty object key".to_string()));
        }

        Ok(UploadedObject {
            bucket: bucket.to_string(),
            key: record.s3.object.key.clone(),
        })
    }
}
