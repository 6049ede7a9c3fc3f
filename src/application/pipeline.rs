use crate::domain::pipeline::{
    stage_path, PipelineConfig, PipelineReport, Stage, FRAME_INTERPOLATION_NOTICE,
};
use crate::error::PipelineError;
use crate::ports::finalizer::Finalizer;
use crate::ports::media::{Deinterlacer, Trimmer};
use crate::ports::upscaler::Upscaler;
use tracing::{info, warn};

pub struct PipelineService<T, D, U, F> {
    trimmer: T,
    deinterlacer: D,
    upscaler: U,
    finalizer: F,
}

impl<T, D, U, F> PipelineService<T, D, U, F>
where
    T: Trimmer,
    D: Deinterlacer,
    U: Upscaler,
    F: Finalizer,
{
    pub fn new(trimmer: T, deinterlacer: D, upscaler: U, finalizer: F) -> Self {
        Self {
            trimmer,
            deinterlacer,
            upscaler,
            finalizer,
        }
    }

    /// Run every enabled stage in order, each one reading the file the previous one wrote.
    pub async fn run(&self, config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
        let mut current = config.input.clone();
        let mut notices = Vec::new();

        // 1. Trim
        if let Some(duration) = config.trim_duration() {
            let trimmed = stage_path(&current, Stage::Trim);
            info!(input = ?current, output = ?trimmed, duration, "Trimming");
            self.trimmer.trim(&current, &trimmed, duration).await?;
            current = trimmed;
        }

        // 2. Deinterlace
        if config.deinterlace {
            let deinterlaced = stage_path(&current, Stage::Deinterlace);
            info!(input = ?current, output = ?deinterlaced, "Deinterlacing");
            self.deinterlacer.deinterlace(&current, &deinterlaced).await?;
            current = deinterlaced;
        }

        // 3. Load the pre-upscale source
        let media = self.finalizer.inspect(&current).await?;
        info!(
            source = ?current,
            fps = media.fps(),
            frames = media.frames,
            "Loaded source"
        );

        // 4. Upscale
        let upscaled = stage_path(&current, Stage::Upscale);
        info!(input = ?current, output = ?upscaled, "Upscaling");
        let upscale = self.upscaler.upscale(&current, &upscaled).await?;
        if !upscale.success {
            warn!(code = ?upscale.code, "Upscaler exited unsuccessfully, continuing");
        }

        // 5. Frame rate
        if config.double_fps {
            println!("{}", FRAME_INTERPOLATION_NOTICE);
            warn!("--double-fps requested but frame interpolation is disabled");
            notices.push(FRAME_INTERPOLATION_NOTICE);
        }

        // 6. Write the source frames at their original rate over the upscaled file
        let summary = self.finalizer.finalize(&current, &upscaled, &media).await?;
        info!(
            output = ?summary.output,
            frames = summary.frames,
            audio_streams = summary.audio_streams,
            "Finalized"
        );

        println!("Output video saved as {}", upscaled.display());

        Ok(PipelineReport {
            output: upscaled,
            upscale,
            summary,
            notices,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::av::probe::MediaInfo;
    use crate::domain::pipeline::{FinalizeSummary, ToolStatus};
    use crate::ports::finalizer::MockFinalizer;
    use crate::ports::media::{MockDeinterlacer, MockTrimmer};
    use crate::ports::upscaler::MockUpscaler;
    use mockall::Sequence;
    use std::path::{Path, PathBuf};

    fn media_info(path: &Path) -> MediaInfo {
        MediaInfo {
            path: path.to_path_buf(),
            frame_rate: (25, 1),
            frames: 250,
            width: 720,
            height: 576,
            audio_streams: 1,
        }
    }

    fn summary_for(output: &Path, info: &MediaInfo) -> FinalizeSummary {
        FinalizeSummary {
            output: output.to_path_buf(),
            frames: info.frames,
            frame_rate: info.frame_rate,
            audio_streams: info.audio_streams,
            skipped_audio: Vec::new(),
        }
    }

    /// Finalizer that inspects and finalizes `source`, once each, in that order.
    fn expect_finalizer(finalizer: &mut MockFinalizer, seq: &mut Sequence, source: &'static str) {
        finalizer
            .expect_inspect()
            .withf(move |path| path == Path::new(source))
            .times(1)
            .in_sequence(seq)
            .returning(|path| Ok(media_info(path)));
        finalizer
            .expect_finalize()
            .withf(move |path, _, info| path == Path::new(source) && info.path == Path::new(source))
            .times(1)
            .in_sequence(seq)
            .returning(|_, output, info| Ok(summary_for(output, info)));
    }

    #[tokio::test]
    async fn test_no_flags_upscales_input_once() {
        let mut seq = Sequence::new();
        let mut trimmer = MockTrimmer::new();
        trimmer.expect_trim().never();
        let mut deinterlacer = MockDeinterlacer::new();
        deinterlacer.expect_deinterlace().never();
        let mut upscaler = MockUpscaler::new();
        let mut finalizer = MockFinalizer::new();

        finalizer
            .expect_inspect()
            .times(1)
            .in_sequence(&mut seq)
            .returning(|path| Ok(media_info(path)));
        upscaler
            .expect_upscale()
            .withf(|input, output| {
                input == Path::new("clip.mp4") && output == Path::new("clip-upscaled.mp4")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(ToolStatus::ok()));
        finalizer
            .expect_finalize()
            .withf(|source, output, _| {
                source == Path::new("clip.mp4") && output == Path::new("clip-upscaled.mp4")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, output, info| Ok(summary_for(output, info)));

        let service = PipelineService::new(trimmer, deinterlacer, upscaler, finalizer);
        let report = service.run(&PipelineConfig::new("clip.mp4")).await.unwrap();

        assert_eq!(report.output, PathBuf::from("clip-upscaled.mp4"));
        assert_eq!(report.summary.output, report.output);
        assert!(report.notices.is_empty());
    }

    #[tokio::test]
    async fn test_duration_trims_before_upscale() {
        let mut seq = Sequence::new();
        let mut trimmer = MockTrimmer::new();
        let mut deinterlacer = MockDeinterlacer::new();
        deinterlacer.expect_deinterlace().never();
        let mut upscaler = MockUpscaler::new();
        let mut finalizer = MockFinalizer::new();

        trimmer
            .expect_trim()
            .withf(|input, output, duration| {
                input == Path::new("clip.mp4")
                    && output == Path::new("clip-trimmed.mp4")
                    && *duration == 10
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));

        let mut finalizer_seq = Sequence::new();
        expect_finalizer(&mut finalizer, &mut finalizer_seq, "clip-trimmed.mp4");

        upscaler
            .expect_upscale()
            .withf(|input, output| {
                input == Path::new("clip-trimmed.mp4")
                    && output == Path::new("clip-trimmed-upscaled.mp4")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(ToolStatus::ok()));

        let mut config = PipelineConfig::new("clip.mp4");
        config.duration = Some(10);

        let service = PipelineService::new(trimmer, deinterlacer, upscaler, finalizer);
        let report = service.run(&config).await.unwrap();

        assert_eq!(report.output, PathBuf::from("clip-trimmed-upscaled.mp4"));
        assert_eq!(
            report.summary.output,
            PathBuf::from("clip-trimmed-upscaled.mp4")
        );
    }

    #[tokio::test]
    async fn test_zero_duration_does_not_trim() {
        let mut seq = Sequence::new();
        let mut trimmer = MockTrimmer::new();
        trimmer.expect_trim().never();
        let mut deinterlacer = MockDeinterlacer::new();
        deinterlacer.expect_deinterlace().never();
        let mut upscaler = MockUpscaler::new();
        let mut finalizer = MockFinalizer::new();

        expect_finalizer(&mut finalizer, &mut seq, "clip.mp4");
        upscaler
            .expect_upscale()
            .withf(|input, _| input == Path::new("clip.mp4"))
            .times(1)
            .returning(|_, _| Ok(ToolStatus::ok()));

        let mut config = PipelineConfig::new("clip.mp4");
        config.duration = Some(0);

        let service = PipelineService::new(trimmer, deinterlacer, upscaler, finalizer);
        let report = service.run(&config).await.unwrap();
        assert_eq!(report.output, PathBuf::from("clip-upscaled.mp4"));
    }

    #[tokio::test]
    async fn test_deinterlace_chains_after_trim() {
        let mut seq = Sequence::new();
        let mut trimmer = MockTrimmer::new();
        let mut deinterlacer = MockDeinterlacer::new();
        let mut upscaler = MockUpscaler::new();
        let mut finalizer = MockFinalizer::new();

        trimmer
            .expect_trim()
            .withf(|input, output, _| {
                input == Path::new("in/clip.mkv") && output == Path::new("in/clip-trimmed.mp4")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        deinterlacer
            .expect_deinterlace()
            .withf(|input, output| {
                input == Path::new("in/clip-trimmed.mp4")
                    && output == Path::new("in/clip-trimmed-deinterlaced.mp4")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(()));
        finalizer
            .expect_inspect()
            .withf(|path| path == Path::new("in/clip-trimmed-deinterlaced.mp4"))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|path| Ok(media_info(path)));
        upscaler
            .expect_upscale()
            .withf(|input, output| {
                input == Path::new("in/clip-trimmed-deinterlaced.mp4")
                    && output == Path::new("in/clip-trimmed-deinterlaced-upscaled.mp4")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(ToolStatus::ok()));
        finalizer
            .expect_finalize()
            .withf(|source, output, _| {
                source == Path::new("in/clip-trimmed-deinterlaced.mp4")
                    && output == Path::new("in/clip-trimmed-deinterlaced-upscaled.mp4")
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, output, info| Ok(summary_for(output, info)));

        let config = PipelineConfig {
            input: PathBuf::from("in/clip.mkv"),
            duration: Some(3),
            deinterlace: true,
            double_fps: false,
        };

        let service = PipelineService::new(trimmer, deinterlacer, upscaler, finalizer);
        let report = service.run(&config).await.unwrap();
        assert_eq!(
            report.output,
            PathBuf::from("in/clip-trimmed-deinterlaced-upscaled.mp4")
        );
    }

    #[tokio::test]
    async fn test_double_fps_only_emits_notice() {
        let mut seq = Sequence::new();
        let mut trimmer = MockTrimmer::new();
        trimmer.expect_trim().never();
        let mut deinterlacer = MockDeinterlacer::new();
        deinterlacer.expect_deinterlace().never();
        let mut upscaler = MockUpscaler::new();
        let mut finalizer = MockFinalizer::new();

        expect_finalizer(&mut finalizer, &mut seq, "clip.mp4");
        upscaler
            .expect_upscale()
            .times(1)
            .returning(|_, _| Ok(ToolStatus::ok()));

        let mut config = PipelineConfig::new("clip.mp4");
        config.double_fps = true;

        let service = PipelineService::new(trimmer, deinterlacer, upscaler, finalizer);
        let report = service.run(&config).await.unwrap();

        assert_eq!(report.notices, vec![FRAME_INTERPOLATION_NOTICE]);
        assert_eq!(report.summary.frames, 250);
        assert_eq!(report.summary.frame_rate, (25, 1));
    }

    #[tokio::test]
    async fn test_failed_upscale_is_ignored() {
        let mut seq = Sequence::new();
        let mut upscaler = MockUpscaler::new();
        let mut finalizer = MockFinalizer::new();

        expect_finalizer(&mut finalizer, &mut seq, "clip.mp4");
        upscaler
            .expect_upscale()
            .times(1)
            .returning(|_, _| Ok(ToolStatus::failed(Some(2))));

        let service = PipelineService::new(
            MockTrimmer::new(),
            MockDeinterlacer::new(),
            upscaler,
            finalizer,
        );
        let report = service.run(&PipelineConfig::new("clip.mp4")).await.unwrap();

        assert_eq!(report.upscale, ToolStatus::failed(Some(2)));
        assert_eq!(report.output, PathBuf::from("clip-upscaled.mp4"));
    }

    #[tokio::test]
    async fn test_trim_failure_stops_pipeline() {
        let mut trimmer = MockTrimmer::new();
        trimmer.expect_trim().times(1).returning(|_, _, _| {
            Err(PipelineError::ToolFailed {
                tool: "ffmpeg".to_string(),
                code: Some(1),
                stderr: "clip.mp4: No such file or directory".to_string(),
            })
        });
        let mut deinterlacer = MockDeinterlacer::new();
        deinterlacer.expect_deinterlace().never();
        let mut upscaler = MockUpscaler::new();
        upscaler.expect_upscale().never();
        let mut finalizer = MockFinalizer::new();
        finalizer.expect_inspect().never();
        finalizer.expect_finalize().never();

        let config = PipelineConfig {
            input: PathBuf::from("clip.mp4"),
            duration: Some(10),
            deinterlace: true,
            double_fps: false,
        };

        let service = PipelineService::new(trimmer, deinterlacer, upscaler, finalizer);
        let result = service.run(&config).await;
        assert!(matches!(result, Err(PipelineError::ToolFailed { .. })));
    }

    #[tokio::test]
    async fn test_upscaler_launch_failure_propagates() {
        let mut upscaler = MockUpscaler::new();
        upscaler.expect_upscale().times(1).returning(|_, _| {
            Err(std::io::Error::new(std::io::ErrorKind::NotFound, "video2x").into())
        });
        let mut finalizer = MockFinalizer::new();
        finalizer
            .expect_inspect()
            .times(1)
            .returning(|path| Ok(media_info(path)));
        finalizer.expect_finalize().never();

        let service = PipelineService::new(
            MockTrimmer::new(),
            MockDeinterlacer::new(),
            upscaler,
            finalizer,
        );
        let result = service.run(&PipelineConfig::new("clip.mp4")).await;
        assert!(matches!(result, Err(PipelineError::Io(_))));
    }
}
