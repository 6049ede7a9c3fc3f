//! Configuration for the external tools.

use std::env;

/// Names (or paths) of the executables the adapters spawn.
#[derive(Clone, Debug)]
pub struct ToolConfig {
    /// ffmpeg binary used for trimming and deinterlacing
    pub ffmpeg_bin: String,
    /// Upscaler binary, called with `--input` and `--output`
    pub upscaler_bin: String,
}

impl ToolConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Overlay the variables `lookup` knows about on the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        Self {
            ffmpeg_bin: lookup("FFMPEG_BIN").unwrap_or(defaults.ffmpeg_bin),
            upscaler_bin: lookup("UPSCALER_BIN").unwrap_or(defaults.upscaler_bin),
        }
    }
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            ffmpeg_bin: String::from("ffmpeg"),
            upscaler_bin: String::from("video2x"),
        }
    }
}
