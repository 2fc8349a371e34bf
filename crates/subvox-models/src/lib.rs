//! Shared data models for the Subvox backend.
//!
//! This crate provides Serde-serializable types for:
//! - Jobs and their lifecycle states
//! - Processing options (translation, subtitle burn-in)

pub mod job;
pub mod options;

// Re-export common types
pub use job::{InvalidTransition, Job, JobId, JobStatus};
pub use options::ProcessingOptions;
