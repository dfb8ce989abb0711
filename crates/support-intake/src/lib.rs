//! Needs intake core: turns a questionnaire answer set into an emergency support
//! estimate and a short list of nearby assistance resources.

pub mod config;
pub mod error;
pub mod intake;
pub mod telemetry;
