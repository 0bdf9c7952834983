//! CLI Layer
//!
//! Command dispatch, progress animation, and console output.

pub mod commands;
pub mod output;
pub mod progress;

pub use commands::{TaskInput, run_task};
pub use output::Output;
pub use progress::ProgressIndicator;
