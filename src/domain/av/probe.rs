use crate::error::PipelineError;
use ffmpeg_next as ffmpeg;
use std::path::{Path, PathBuf};
use tokio::task;

/// Decoded properties of a source clip, captured before it is handed to the upscaler.
#[derive(Debug, Clone, PartialEq)]
pub struct MediaInfo {
    pub path: PathBuf,
    /// Frame rate as (numerator, denominator)
    pub frame_rate: (i32, i32),
    pub frames: u64,
    pub width: u32,
    pub height: u32,
    pub audio_streams: usize,
}

impl MediaInfo {
    pub fn fps(&self) -> f64 {
        self.frame_rate.0 as f64 / self.frame_rate.1 as f64
    }
}

/// Average frame rate of the stream, or its base rate when the average is unset.
pub(crate) fn stream_frame_rate(stream: &ffmpeg::Stream) -> Option<ffmpeg::Rational> {
    [stream.avg_frame_rate(), stream.rate()]
        .into_iter()
        .find(|rate| rate.numerator() > 0 && rate.denominator() > 0)
}

/// Decode every frame of the best video stream in `path`.
pub async fn inspect(path: &Path) -> Result<MediaInfo, PipelineError> {
    let source = path.to_path_buf();
    task::spawn_blocking(move || inspect_blocking(&source)).await?
}

fn inspect_blocking(source: &Path) -> Result<MediaInfo, PipelineError> {
    ffmpeg::init()?;

    let mut ictx = ffmpeg::format::input(&source)?;

    let audio_streams = ictx
        .streams()
        .filter(|stream| stream.parameters().medium() == ffmpeg::media::Type::Audio)
        .count();

    let (stream_index, frame_rate, mut decoder) = {
        let input_stream = ictx
            .streams()
            .best(ffmpeg::media::Type::Video)
            .ok_or(ffmpeg::Error::StreamNotFound)?;
        let frame_rate = stream_frame_rate(&input_stream)
            .ok_or_else(|| PipelineError::UnknownFrameRate(source.to_path_buf()))?;
        let context_decoder =
            ffmpeg::codec::context::Context::from_parameters(input_stream.parameters())?;
        (
            input_stream.index(),
            frame_rate,
            context_decoder.decoder().video()?,
        )
    };

    let mut frames: u64 = 0;
    let mut decoded_frame = ffmpeg::util::frame::Video::empty();

    for (stream, packet) in ictx.packets() {
        if stream.index() == stream_index {
            decoder.send_packet(&packet)?;
            while decoder.receive_frame(&mut decoded_frame).is_ok() {
                frames += 1;
            }
        }
    }
    decoder.send_eof()?;
    while decoder.receive_frame(&mut decoded_frame).is_ok() {
        frames += 1;
    }

    Ok(MediaInfo {
        path: source.to_path_buf(),
        frame_rate: (frame_rate.numerator(), frame_rate.denominator()),
        frames,
        width: decoder.width(),
        height: decoder.height(),
        audio_streams,
    })
}
