//! Lambda runtime entry point.

use std::sync::Arc;

use lambda_runtime::{Error, LambdaEvent, service_fn};
use tracing::{error, info};

use crate::core::event::S3Event;
use crate::handlers::pipeline::TranscriptionPipeline;
use crate::handlers::response::HandlerResponse;

/// Handle one invocation. The Lambda request id doubles as the job name.
pub async fn handle_lambda_event(
    pipeline: &TranscriptionPipeline,
    event: LambdaEvent<S3Event>,
) -> Result<HandlerResponse, Error> {
    let LambdaEvent { payload, context } = event;
    let request_id = context.request_id;

    match pipeline.handle(&payload, &request_id).await {
        Ok(response) => {
            info!(
                request_id = %request_id,
                status_code = response.status_code,
                "Invocation finished"
            );
            Ok(response)
        }
        Err(e) => {
            error!(request_id = %request_id, error = %e, "Invocation failed");
            Err(e.into())
        }
    }
}

/// Serve invocations until the runtime shuts down.
pub async fn run(pipeline: Arc<TranscriptionPipeline>) -> Result<(), Error> {
    lambda_runtime::run(service_fn(move |event: LambdaEvent<S3Event>| {
        let pipeline = Arc::clone(&pipeline);
        async move { handle_lambda_event(&pipeline, event).await }
    }))
    .await
}
