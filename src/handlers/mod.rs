pub mod lambda;
pub mod pipeline;
pub mod response;

pub use pipeline::{PipelineServices, TranscriptionPipeline};
pub use response::HandlerResponse;
