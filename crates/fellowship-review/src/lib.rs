//! Admin review backend for fellowship applications.
//!
//! The [`review`] module holds the stage-aware questionnaire resolver and the view models
//! built on top of it; [`config`], [`telemetry`], and [`error`] carry the service plumbing.

pub mod config;
pub mod error;
pub mod review;
pub mod telemetry;
