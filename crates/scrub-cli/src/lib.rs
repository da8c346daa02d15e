//! CLI library components for the sales cleaning pipeline.

pub mod logging;
