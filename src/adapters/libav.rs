use crate::domain::av::probe::{self, MediaInfo};
use crate::domain::av::reencode::reencode_into;
use crate::domain::pipeline::FinalizeSummary;
use crate::error::PipelineError;
use crate::ports::finalizer::Finalizer;
use async_trait::async_trait;
use std::path::Path;

/// Decodes and re-encodes in-process through ffmpeg-next.
#[derive(Clone, Copy, Debug, Default)]
pub struct LibavFinalizer;

impl LibavFinalizer {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Finalizer for LibavFinalizer {
    async fn inspect(&self, source: &Path) -> Result<MediaInfo, PipelineError> {
        probe::inspect(source).await
    }

    async fn finalize(
        &self,
        source: &Path,
        output: &Path,
        info: &MediaInfo,
    ) -> Result<FinalizeSummary, PipelineError> {
        reencode_into(source, output, info).await
    }
}
