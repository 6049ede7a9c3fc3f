use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::ExitStatus;

/// Container extension every intermediate and final file gets.
pub const OUTPUT_EXTENSION: &str = "mp4";

pub const FRAME_INTERPOLATION_NOTICE: &str = "Frame interpolation is currently disabled.";

/// Suffix appended to the base name of a file by each producing stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Trim,
    Deinterlace,
    Upscale,
}

impl Stage {
    pub fn suffix(&self) -> &'static str {
        match self {
            Stage::Trim => "trimmed",
            Stage::Deinterlace => "deinterlaced",
            Stage::Upscale => "upscaled",
        }
    }
}

/// Path of the file `stage` writes when it reads `input`.
///
/// The extension of `input` is dropped, `-<suffix>.mp4` is appended and the
/// parent directory is kept: `dir/clip.mkv` becomes `dir/clip-upscaled.mp4`.
pub fn stage_path(input: &Path, stage: Stage) -> PathBuf {
    let mut name: OsString = input.file_stem().map(OsString::from).unwrap_or_default();
    name.push("-");
    name.push(stage.suffix());
    name.push(".");
    name.push(OUTPUT_EXTENSION);
    input.with_file_name(name)
}

/// Options resolved from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub input: PathBuf,
    /// Trim length in seconds, handed to ffmpeg as-is.
    pub duration: Option<i64>,
    pub deinterlace: bool,
    pub double_fps: bool,
}

impl PipelineConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            duration: None,
            deinterlace: false,
            double_fps: false,
        }
    }

    /// Duration the trim stage should cut to. Zero means no trim.
    pub fn trim_duration(&self) -> Option<i64> {
        self.duration.filter(|&d| d != 0)
    }
}

/// Outcome of an external process whose exit status is reported but not enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolStatus {
    pub success: bool,
    pub code: Option<i32>,
}

impl ToolStatus {
    pub fn ok() -> Self {
        Self {
            success: true,
            code: Some(0),
        }
    }

    pub fn failed(code: Option<i32>) -> Self {
        Self {
            success: false,
            code,
        }
    }
}

impl From<ExitStatus> for ToolStatus {
    fn from(status: ExitStatus) -> Self {
        Self {
            success: status.success(),
            code: status.code(),
        }
    }
}

/// What the finalize stage wrote.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalizeSummary {
    pub output: PathBuf,
    pub frames: u64,
    /// Frame rate as (numerator, denominator)
    pub frame_rate: (i32, i32),
    pub audio_streams: usize,
    /// Codec names of source audio streams the output container could not hold
    pub skipped_audio: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PipelineReport {
    pub output: PathBuf,
    pub upscale: ToolStatus,
    pub summary: FinalizeSummary,
    pub notices: Vec<&'static str>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_path_replaces_extension() {
        let path = stage_path(Path::new("clip.mp4"), Stage::Trim);
        assert_eq!(path, PathBuf::from("clip-trimmed.mp4"));
    }

    #[test]
    fn test_stage_path_forces_mp4() {
        let path = stage_path(Path::new("videos/take.mkv"), Stage::Upscale);
        assert_eq!(path, PathBuf::from("videos/take-upscaled.mp4"));
    }

    #[test]
    fn test_stage_path_without_extension() {
        let path = stage_path(Path::new("noext"), Stage::Deinterlace);
        assert_eq!(path, PathBuf::from("noext-deinterlaced.mp4"));
    }

    #[test]
    fn test_stage_path_only_strips_last_extension() {
        let path = stage_path(Path::new("/tmp/show.s01e01.avi"), Stage::Trim);
        assert_eq!(path, PathBuf::from("/tmp/show.s01e01-trimmed.mp4"));
    }

    #[test]
    fn test_stage_path_chains() {
        let trimmed = stage_path(Path::new("clip.mp4"), Stage::Trim);
        let upscaled = stage_path(&trimmed, Stage::Upscale);
        assert_eq!(upscaled, PathBuf::from("clip-trimmed-upscaled.mp4"));
    }

    #[test]
    fn test_zero_duration_skips_trim() {
        let mut config = PipelineConfig::new("clip.mp4");
        assert_eq!(config.trim_duration(), None);

        config.duration = Some(0);
        assert_eq!(config.trim_duration(), None);

        config.duration = Some(10);
        assert_eq!(config.trim_duration(), Some(10));

        config.duration = Some(-3);
        assert_eq!(config.trim_duration(), Some(-3));
    }
}
