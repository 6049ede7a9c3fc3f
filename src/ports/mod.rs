//! Ports - Traits for the external collaborators of the pipeline.

pub mod finalizer;
pub mod media;
pub mod upscaler;
