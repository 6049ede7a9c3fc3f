use super::probe::MediaInfo;
use crate::domain::pipeline::FinalizeSummary;
use crate::error::PipelineError;
use ffmpeg_next as ffmpeg;
use std::path::{Path, PathBuf};
use tokio::task;
use tracing::warn;

/// Re-encode the video frames of `source` into `output` at the frame rate in `info`.
///
/// Audio streams are copied without re-encoding; streams whose codec the output
/// container cannot hold are dropped and listed in the summary. `output` is
/// truncated first, so whatever was written there before is replaced.
pub async fn reencode_into(
    source: &Path,
    output: &Path,
    info: &MediaInfo,
) -> Result<FinalizeSummary, PipelineError> {
    let source = source.to_path_buf();
    let output = output.to_path_buf();
    let frame_rate = ffmpeg::Rational::new(info.frame_rate.0, info.frame_rate.1);

    task::spawn_blocking(move || reencode_blocking(&source, &output, frame_rate)).await?
}

/// Decoder, scaler and encoder for the single video stream being rewritten.
struct FrameWriter {
    decoder: ffmpeg::codec::decoder::Video,
    scaler: ffmpeg::software::scaling::context::Context,
    encoder: ffmpeg::codec::encoder::video::Encoder,
    stream_index: usize,
    encoder_time_base: ffmpeg::Rational,
    stream_time_base: ffmpeg::Rational,
    frames: u64,
}

impl FrameWriter {
    fn send_packet(
        &mut self,
        packet: &ffmpeg::Packet,
        octx: &mut ffmpeg::format::context::Output,
    ) -> Result<(), ffmpeg::Error> {
        self.decoder.send_packet(packet)?;
        self.drain_decoder(octx)
    }

    fn drain_decoder(
        &mut self,
        octx: &mut ffmpeg::format::context::Output,
    ) -> Result<(), ffmpeg::Error> {
        let mut decoded_frame = ffmpeg::util::frame::Video::empty();
        while self.decoder.receive_frame(&mut decoded_frame).is_ok() {
            let mut converted = ffmpeg::util::frame::Video::empty();
            self.scaler.run(&decoded_frame, &mut converted)?;
            // Sequential timestamps in 1/fps units.
            converted.set_pts(Some(self.frames as i64));
            converted.set_kind(ffmpeg::picture::Type::None);
            self.encoder.send_frame(&converted)?;
            self.frames += 1;
            self.drain_encoder(octx)?;
        }
        Ok(())
    }

    fn drain_encoder(
        &mut self,
        octx: &mut ffmpeg::format::context::Output,
    ) -> Result<(), ffmpeg::Error> {
        let mut encoded = ffmpeg::Packet::empty();
        while self.encoder.receive_packet(&mut encoded).is_ok() {
            encoded.set_stream(self.stream_index);
            encoded.rescale_ts(self.encoder_time_base, self.stream_time_base);
            encoded.write_interleaved(octx)?;
        }
        Ok(())
    }

    fn finish(&mut self, octx: &mut ffmpeg::format::context::Output) -> Result<u64, ffmpeg::Error> {
        self.decoder.send_eof()?;
        self.drain_decoder(octx)?;
        self.encoder.send_eof()?;
        self.drain_encoder(octx)?;
        Ok(self.frames)
    }
}

/// Whether the muxer behind `octx` can store `codec` without re-encoding.
fn container_accepts(octx: &ffmpeg::format::context::Output, codec: ffmpeg::codec::Id) -> bool {
    // FF_COMPLIANCE_NORMAL
    const COMPLIANCE_NORMAL: i32 = 0;
    unsafe {
        ffmpeg::ffi::avformat_query_codec(octx.format().as_ptr(), codec.into(), COMPLIANCE_NORMAL)
            == 1
    }
}

fn reencode_blocking(
    source: &PathBuf,
    output: &PathBuf,
    frame_rate: ffmpeg::Rational,
) -> Result<FinalizeSummary, PipelineError> {
    ffmpeg::init()?;

    let mut ictx = ffmpeg::format::input(source)?;
    let mut octx = ffmpeg::format::output(output)?;

    let (video_index, decoder) = {
        let input_stream = ictx
            .streams()
            .best(ffmpeg::media::Type::Video)
            .ok_or(ffmpeg::Error::StreamNotFound)?;
        let context_decoder =
            ffmpeg::codec::context::Context::from_parameters(input_stream.parameters())?;
        (input_stream.index(), context_decoder.decoder().video()?)
    };

    // MPEG-4 part 2 is built into every libavcodec, H.264 needs libx264.
    let codec = ffmpeg::encoder::find(ffmpeg::codec::Id::H264)
        .or_else(|| ffmpeg::encoder::find(ffmpeg::codec::Id::MPEG4))
        .ok_or(ffmpeg::Error::EncoderNotFound)?;
    let global_header = octx
        .format()
        .flags()
        .contains(ffmpeg::format::Flags::GLOBAL_HEADER);
    let encoder_time_base = frame_rate.invert();

    let mut encoder = ffmpeg::codec::context::Context::new_with_codec(codec)
        .encoder()
        .video()?;
    encoder.set_width(decoder.width());
    encoder.set_height(decoder.height());
    encoder.set_aspect_ratio(decoder.aspect_ratio());
    encoder.set_format(ffmpeg::format::Pixel::YUV420P);
    encoder.set_frame_rate(Some(frame_rate));
    encoder.set_time_base(encoder_time_base);
    if global_header {
        encoder.set_flags(ffmpeg::codec::Flags::GLOBAL_HEADER);
    }
    let encoder = encoder.open_with(ffmpeg::Dictionary::new())?;

    let video_out = {
        let mut ost = octx.add_stream(codec)?;
        ost.set_parameters(&encoder);
        ost.set_time_base(encoder_time_base);
        ost.index()
    };

    // Input stream index -> output stream index for the copied audio.
    let mut audio_map: Vec<Option<usize>> = vec![None; ictx.nb_streams() as usize];
    let mut skipped_audio = Vec::new();
    for ist in ictx.streams() {
        if ist.parameters().medium() != ffmpeg::media::Type::Audio {
            continue;
        }
        let codec_id = ist.parameters().id();
        if !container_accepts(&octx, codec_id) {
            warn!(
                stream = ist.index(),
                codec = codec_id.name(),
                output = ?output,
                "Audio codec not supported by output container, dropping stream"
            );
            skipped_audio.push(codec_id.name().to_string());
            continue;
        }
        let mut ost = octx.add_stream(ffmpeg::encoder::find(ffmpeg::codec::Id::None))?;
        ost.set_parameters(ist.parameters());
        // Let the muxer pick a tag valid for the output container.
        unsafe {
            (*ost.parameters().as_mut_ptr()).codec_tag = 0;
        }
        audio_map[ist.index()] = Some(ost.index());
    }

    octx.set_metadata(ictx.metadata().to_owned());
    octx.write_header()?;

    let stream_time_base = octx
        .stream(video_out)
        .ok_or(ffmpeg::Error::StreamNotFound)?
        .time_base();

    let scaler = ffmpeg::software::scaling::context::Context::get(
        decoder.format(),
        decoder.width(),
        decoder.height(),
        ffmpeg::format::Pixel::YUV420P,
        decoder.width(),
        decoder.height(),
        ffmpeg::software::scaling::flag::Flags::BILINEAR,
    )?;

    let mut writer = FrameWriter {
        decoder,
        scaler,
        encoder,
        stream_index: video_out,
        encoder_time_base,
        stream_time_base,
        frames: 0,
    };

    for (stream, mut packet) in ictx.packets() {
        let index = stream.index();
        if index == video_index {
            writer.send_packet(&packet, &mut octx)?;
        } else if let Some(Some(out_index)) = audio_map.get(index).copied() {
            let out_time_base = octx
                .stream(out_index)
                .ok_or(ffmpeg::Error::StreamNotFound)?
                .time_base();
            packet.rescale_ts(stream.time_base(), out_time_base);
            packet.set_position(-1);
            packet.set_stream(out_index);
            packet.write_interleaved(&mut octx)?;
        }
    }

    let frames = writer.finish(&mut octx)?;
    octx.write_trailer()?;

    Ok(FinalizeSummary {
        output: output.clone(),
        frames,
        frame_rate: (frame_rate.numerator(), frame_rate.denominator()),
        audio_streams: audio_map.iter().flatten().count(),
        skipped_audio,
    })
}
