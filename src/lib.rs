//! CodeQuill - AI Code Assistant CLI
//!
//! Sends code tasks (completion, test generation, translation, optimization,
//! security review, documentation) to a hosted LLM service, as one-shot or
//! streamed calls.
//!
//! The reusable core is a resilient request/response layer:
//!
//! - **Token Estimator**: pre-flight limit checks (`ai::tokenizer`)
//! - **Input Validator**: size and language checks (`ai::validate`)
//! - **Retry Executor**: bounded retries with exponential backoff and
//!   observable warning events (`ai::retry`)
//! - **Stream Accumulator**: ordered fragment assembly with observer
//!   fan-out and partial-output preservation (`ai::stream`)
//! - **Progress Indicator**: instance-owned cosmetic spinner
//!   (`cli::progress`)
//!
//! ## Quick Start
//!
//! ```ignore
//! use codequill::ai::{MessagesClient, RetryExecutor, RetryPolicy};
//! use codequill::{config::ConfigLoader, tasks};
//!
//! let config = ConfigLoader::load()?;
//! let client = MessagesClient::new(&config.api)?;
//! let executor = RetryExecutor::new(config.retry.policy());
//! let request = tasks::optimize(code, "rust", 4000);
//! let response = executor.run(|| client.complete(&request)).await?;
//! ```

pub mod ai;
pub mod cli;
pub mod config;
pub mod constants;
pub mod tasks;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{ApiConfig, Config, ConfigLoader, RetryConfig};
pub use types::{ApiError, ErrorCategory, ErrorClassifier, QuillError, Result};

pub use ai::{
    AccumulatedText, CompletionBackend, CompletionResponse, FragmentObserver, MessagesClient,
    RetryEvent, RetryExecutor, RetryPolicy, StreamAccumulator, StreamEvent, TaskRequest,
    TokenCounter, TokenUsage, ValidationReport, next_retry_event, validate,
};

pub use tasks::TaskKind;
