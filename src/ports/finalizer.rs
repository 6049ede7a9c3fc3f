use crate::domain::av::probe::MediaInfo;
use crate::domain::pipeline::FinalizeSummary;
use crate::error::PipelineError;
use async_trait::async_trait;
use std::path::Path;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Finalizer: Send + Sync {
    /// Decode `source` and capture its frame rate, frame count and audio layout.
    async fn inspect(&self, source: &Path) -> Result<MediaInfo, PipelineError>;

    /// Rewrite the frames of `source` into `output` using the rate captured by `inspect`.
    async fn finalize(
        &self,
        source: &Path,
        output: &Path,
        info: &MediaInfo,
    ) -> Result<FinalizeSummary, PipelineError>;
}
