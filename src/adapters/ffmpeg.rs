use crate::error::PipelineError;
use crate::ports::media::{Deinterlacer, Trimmer};
use async_trait::async_trait;
use std::ffi::OsString;
use std::path::Path;
use tokio::process::Command as TokioCommand;
use tracing::debug;

/// Trimming and deinterlacing through the ffmpeg command line.
#[derive(Clone, Debug)]
pub struct FfmpegCli {
    bin: String,
}

impl FfmpegCli {
    pub fn new(bin: impl Into<String>) -> Self {
        Self { bin: bin.into() }
    }

    pub fn trim_args(input: &Path, output: &Path, duration: i64) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-t".into(),
            duration.to_string().into(),
            "-i".into(),
            input.into(),
            output.into(),
        ]
    }

    pub fn deinterlace_args(input: &Path, output: &Path) -> Vec<OsString> {
        vec![
            "-y".into(),
            "-i".into(),
            input.into(),
            "-vf".into(),
            "yadif".into(),
            output.into(),
        ]
    }

    async fn run(&self, args: Vec<OsString>) -> Result<(), PipelineError> {
        debug!(tool = %self.bin, ?args, "Running ffmpeg");

        let output = TokioCommand::new(&self.bin).args(&args).output().await?;

        if !output.status.success() {
            return Err(PipelineError::ToolFailed {
                tool: self.bin.clone(),
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }

        debug!(
            stderr = %String::from_utf8_lossy(&output.stderr),
            "ffmpeg finished"
        );
        Ok(())
    }
}

impl Default for FfmpegCli {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

#[async_trait]
impl Trimmer for FfmpegCli {
    async fn trim(&self, input: &Path, output: &Path, duration: i64) -> Result<(), PipelineError> {
        self.run(Self::trim_args(input, output, duration)).await
    }
}

#[async_trait]
impl Deinterlacer for FfmpegCli {
    async fn deinterlace(&self, input: &Path, output: &Path) -> Result<(), PipelineError> {
        self.run(Self::deinterlace_args(input, output)).await
    }
}
