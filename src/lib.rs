//! Vidscale - Video trim, deinterlace and upscale pipeline
//!
//! Hexagonal Architecture:
//! - domain/: Stage naming, pipeline data, libav decoding and re-encoding
//! - ports/: Trait definitions for the external collaborators
//! - adapters/: ffmpeg CLI, upscaler process, libav finalizer
//! - application/: The stage sequence
//! - cli, config: Command line and environment configuration

pub mod adapters;
pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod ports;

pub use application::pipeline::PipelineService;
pub use domain::pipeline::{PipelineConfig, PipelineReport};
pub use error::PipelineError;
