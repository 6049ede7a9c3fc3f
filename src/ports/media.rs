use crate::error::PipelineError;
use async_trait::async_trait;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Trimmer: Send + Sync {
    /// Cut `input` to its first `duration` seconds and write the result to `output`.
    async fn trim(&self, input: &Path, output: &Path, duration: i64) -> Result<(), PipelineError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Deinterlacer: Send + Sync {
    /// Write a progressive copy of `input` to `output`.
    async fn deinterlace(&self, input: &Path, output: &Path) -> Result<(), PipelineError>;
}
