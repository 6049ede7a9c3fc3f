//! Error types for the pipeline.

use ffmpeg_next as ffmpeg;
use std::fmt;
use std::path::PathBuf;

#[derive(Debug)]
pub enum PipelineError {
    Io(std::io::Error),
    ToolFailed {
        tool: String,
        code: Option<i32>,
        stderr: String,
    },
    Media(ffmpeg::Error),
    UnknownFrameRate(PathBuf),
    Task(tokio::task::JoinError),
}

impl fmt::Display for PipelineError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineError::Io(e) => write!(f, "IO error: {}", e),
            PipelineError::ToolFailed { tool, code, stderr } => {
                match code {
                    Some(code) => write!(f, "{} exited with status {}", tool, code)?,
                    None => write!(f, "{} was terminated by a signal", tool)?,
                }
                if !stderr.trim().is_empty() {
                    write!(f, ": {}", stderr.trim())?;
                }
                Ok(())
            }
            PipelineError::Media(e) => write!(f, "Media error: {}", e),
            PipelineError::UnknownFrameRate(path) => {
                write!(f, "No usable frame rate in {:?}", path)
            }
            PipelineError::Task(e) => write!(f, "Blocking task failed: {}", e),
        }
    }
}

impl std::error::Error for PipelineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PipelineError::Io(e) => Some(e),
            PipelineError::Media(e) => Some(e),
            PipelineError::Task(e) => Some(e),
            PipelineError::ToolFailed { .. } | PipelineError::UnknownFrameRate(_) => None,
        }
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(err: std::io::Error) -> Self {
        PipelineError::Io(err)
    }
}

impl From<ffmpeg::Error> for PipelineError {
    fn from(err: ffmpeg::Error) -> Self {
        PipelineError::Media(err)
    }
}

impl From<tokio::task::JoinError> for PipelineError {
    fn from(err: tokio::task::JoinError) -> Self {
        PipelineError::Task(err)
    }
}
