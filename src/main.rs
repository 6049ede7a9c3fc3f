use clap::Parser;
use vidscale::adapters::{ffmpeg::FfmpegCli, libav::LibavFinalizer, video2x::Video2x};
use vidscale::application::pipeline::PipelineService;
use vidscale::cli::Cli;
use vidscale::config::ToolConfig;
use vidscale::domain::pipeline::PipelineConfig;

#[tokio::main]
async fn main() {
    let tools = ToolConfig::from_env();
    let config = PipelineConfig::from(Cli::parse());

    tracing_subscriber::fmt::init();

    let ffmpeg = FfmpegCli::new(&tools.ffmpeg_bin);
    let pipeline = PipelineService::new(
        ffmpeg.clone(),
        ffmpeg,
        Video2x::new(&tools.upscaler_bin),
        LibavFinalizer::new(),
    );

    if let Err(e) = pipeline.run(&config).await {
        tracing::error!("{}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
