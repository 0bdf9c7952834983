//! Core Types
//!
//! Shared types used across the application.

pub mod error;

pub use error::{ApiError, ErrorCategory, ErrorClassifier, QuillError, Result};
