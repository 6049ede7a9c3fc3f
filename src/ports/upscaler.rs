use crate::domain::pipeline::ToolStatus;
use crate::error::PipelineError;
use async_trait::async_trait;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Upscaler: Send + Sync {
    /// Run the upscaler over `input`, writing `output`.
    /// Only a failure to launch is an error; the exit status is returned as-is.
    async fn upscale(&self, input: &Path, output: &Path) -> Result<ToolStatus, PipelineError>;
}
