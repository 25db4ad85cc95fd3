//! Core library components.
//!
//! Everything an experiment needs apart from terminal output: the platform
//! seam, polling, the secret lease, orchestration and log classification.

pub mod classify;
pub mod config;
pub mod constants;
pub mod experiment;
pub mod lease;
pub mod log;
pub mod markers;
pub mod matrix;
pub mod orchestrator;
pub mod platform;
pub mod poll;
pub mod transform;
pub mod workflows;
