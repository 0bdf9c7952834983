//! Resilient LLM Call Layer
//!
//! The reusable utilities that make raw API calls robust: token estimation,
//! input validation, retry with backoff, and streaming accumulation.

pub mod client;
pub mod retry;
pub mod stream;
pub mod tokenizer;
pub mod validate;

pub use client::{
    CompletionBackend, CompletionResponse, MessagesClient, StreamEvent, TaskRequest, TokenUsage,
    text_delta,
};
pub use retry::{RetryEvent, RetryExecutor, RetryPolicy, next_retry_event};
pub use stream::{AccumulatedText, FragmentObserver, StreamAccumulator};
pub use tokenizer::TokenCounter;
pub use validate::{ValidationReport, is_recognized_language, validate};
