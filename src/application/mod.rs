//! Application layer - The stage sequence, written against the ports.

pub mod pipeline;
