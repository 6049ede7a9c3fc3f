//! Adapters - Concrete implementations of the ports.

pub mod ffmpeg;
pub mod libav;
pub mod video2x;
