//! Per-job pipeline workers.
//!
//! The [`Dispatcher`] accepts a validated submission, creates the job
//! record, and launches one owning task per job. That task runs the
//! [`pipeline`], is the only writer of its job's status, and commits every
//! transition to the store before the next external call, so status
//! readers always see the most recently entered state.

pub mod config;
pub mod context;
pub mod dispatcher;
pub mod error;
pub mod pipeline;

pub use config::WorkerConfig;
pub use context::WorkerContext;
pub use dispatcher::Dispatcher;
pub use error::{StageError, StageResult};
