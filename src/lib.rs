pub mod config;
pub mod core;
pub mod errors;
pub mod handlers;

// Re-export commonly used items for convenience
pub use config::HandlerConfig;
pub use core::*;
pub use errors::{PipelineError, PipelineResult};
pub use handlers::{HandlerResponse, PipelineServices, TranscriptionPipeline};
