use crate::domain::pipeline::PipelineConfig;
use clap::Parser;
use std::path::PathBuf;

/// Trim, deinterlace and upscale a video with external tools.
#[derive(Parser, Debug)]
#[command(name = "vidscale", version)]
pub struct Cli {
    /// Path to the input video file.
    pub input_video: PathBuf,

    /// Duration in seconds for processing.
    #[arg(long, allow_hyphen_values = true)]
    pub duration: Option<i64>,

    /// Deinterlace the video.
    #[arg(long)]
    pub deinterlace: bool,

    /// Double the frame rate by interpolating frames (currently disabled).
    #[arg(long = "double-fps")]
    pub double_fps: bool,
}

impl From<Cli> for PipelineConfig {
    fn from(cli: Cli) -> Self {
        PipelineConfig {
            input: cli.input_video,
            duration: cli.duration,
            deinterlace: cli.deinterlace,
            double_fps: cli.double_fps,
        }
    }
}
