//! Domain layer - Stage naming, pipeline data and libav work.

// Video decoding and re-encoding
pub mod av;

// Pipeline options, stage paths and reports
pub mod pipeline;
