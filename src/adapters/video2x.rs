use crate::domain::pipeline::ToolStatus;
use crate::error::PipelineError;
use crate::ports::upscaler::Upscaler;
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use tokio::process::Command as TokioCommand;
use tracing::debug;

/// External upscaler invoked as `<bin> --input <in> --output <out>`.
#[derive(Clone, Debug)]
pub struct Video2x {
    bin: String,
}

impl Video2x {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    pub fn args(input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "--input".into(),
            input.into(),
            "--output".into(),
            output.into(),
        ]
    }
}

impl Default for Video2x {
    fn default() -> Self {
        Self::new("video2x")
    }
}

#[async_trait]
impl Upscaler for Video2x {
    async fn upscale(&self, input: &Path, output: &Path) -> Result<ToolStatus, PipelineError> {
        let args = Self::args(input, output);
        debug!(tool = %self.bin, ?args, "Running upscaler");

        // Output is left on the terminal so the upscaler's progress stays visible.
        let status = TokioCommand::new(&self.bin).args(&args).status().await?;
        Ok(ToolStatus::from(status))
    }
}
