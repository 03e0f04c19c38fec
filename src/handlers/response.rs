use serde::{Deserialize, Serialize};

pub const COMPLETE_MESSAGE: &str = "Transcription complete";
pub const JOB_FAILED_MESSAGE: &str = "Transcription job failed";

/// Value returned to the Lambda caller.
///
/// `body` holds the JSON encoding of the message, so the string itself is
/// quoted (`"\"Transcription complete\""`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandlerResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub body: String,
}

impl HandlerResponse {
    fn with_message(status_code: u16, message: &str) -> Self {
        Self {
            status_code,
            body: serde_json::Value::String(message.to_string()).to_string(),
        }
    }

    pub fn complete() -> Self {
        Self::with_message(200, COMPLETE_MESSAGE)
    }

    pub fn job_failed() -> Self {
        Self::with_message(500, JOB_FAILED_MESSAGE)
    }

    pub fn is_success(&self) -> bool {
        self.status_code == 200
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_response_serialization() {
        let json = serde_json::to_value(HandlerResponse::complete()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"statusCode": 200, "body": "\"Transcription complete\""})
        );
    }

    #[test]
    fn test_job_failed_response() {
        let response = HandlerResponse::job_failed();
        assert_eq!(response.status_code, 500);
        assert_eq!(response.body, "\"Transcription job failed\"");
        assert!(!response.is_success());
    }
}
