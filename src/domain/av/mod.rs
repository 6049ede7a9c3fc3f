//! Audio/Video domain modules (libav through ffmpeg-next).

pub mod probe;
pub mod reencode;
