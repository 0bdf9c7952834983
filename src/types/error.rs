//! Unified Error Type System
//!
//! Centralized error types for the entire application.
//! Provides error classification for retry decisions.
//!
//! ## Error Categories
//!
//! - **Transient**: Temporary server issues (retry)
//! - **RateLimit**: API rate limiting (wait and retry)
//! - **Auth**: Authentication failures (fail fast)
//! - **Network**: Connectivity issues (retry with backoff)
//! - **BadRequest**: Malformed request (fail fast, fix request)
//!
//! ## Design Principles
//!
//! - Single unified error type (QuillError) for the entire application
//! - Category-based routing for retry decisions
//! - Partial stream output is preserved on mid-stream failure
//! - No panic/unwrap - all errors surface to the caller

use std::time::Duration;
use thiserror::Error;

// =============================================================================
// Error Categories
// =============================================================================

/// API error categories for retry decisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Rate limited - wait then retry
    RateLimit,
    /// Authentication failed - fail fast, don't retry
    Auth,
    /// Network/connectivity issues - retry with backoff
    Network,
    /// Temporary server issues - retry
    Transient,
    /// Invalid request - don't retry, fix request
    BadRequest,
    /// Unknown error - don't retry automatically
    Unknown,
}

impl std::fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::RateLimit => write!(f, "RATE_LIMIT"),
            Self::Auth => write!(f, "AUTH"),
            Self::Network => write!(f, "NETWORK"),
            Self::Transient => write!(f, "TRANSIENT"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

impl ErrorCategory {
    /// Check if this category is worth retrying
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::RateLimit | Self::Network | Self::Transient)
    }
}

// =============================================================================
// API Error
// =============================================================================

/// Structured API error with category and retry hints
#[derive(Debug, Clone)]
pub struct ApiError {
    /// Error category for retry decisions
    pub category: ErrorCategory,
    /// Detailed error message
    pub message: String,
    /// Suggested wait time before retry (from retry-after, if present)
    pub retry_after: Option<Duration>,
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.category, self.message)
    }
}

impl std::error::Error for ApiError {}

impl ApiError {
    /// Create a new API error
    pub fn new(category: ErrorCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            message: message.into(),
            retry_after: None,
        }
    }

    /// Add suggested retry delay
    pub fn retry_after(mut self, duration: Duration) -> Self {
        self.retry_after = Some(duration);
        self
    }

    /// Check if this error is worth retrying
    pub fn is_retryable(&self) -> bool {
        self.category.is_retryable()
    }
}

// =============================================================================
// Error Classifier
// =============================================================================

/// Error classifier for retry routing
pub struct ErrorClassifier;

impl ErrorClassifier {
    /// Classify an error message from the remote service
    pub fn classify(message: &str) -> ApiError {
        let lower = message.to_lowercase();

        // Rate limiting patterns
        if lower.contains("rate limit")
            || lower.contains("429")
            || lower.contains("too many requests")
            || lower.contains("quota exceeded")
        {
            return ApiError::new(ErrorCategory::RateLimit, message)
                .retry_after(Duration::from_secs(30));
        }

        // Authentication patterns
        if lower.contains("auth")
            || lower.contains("401")
            || lower.contains("403")
            || lower.contains("api key")
            || lower.contains("invalid key")
            || lower.contains("unauthorized")
            || lower.contains("permission denied")
        {
            return ApiError::new(ErrorCategory::Auth, message);
        }

        // Network patterns
        if lower.contains("network")
            || lower.contains("connection")
            || lower.contains("dns")
            || lower.contains("timeout")
            || lower.contains("timed out")
            || lower.contains("unreachable")
        {
            return ApiError::new(ErrorCategory::Network, message)
                .retry_after(Duration::from_secs(5));
        }

        // Server-side issues that may resolve
        if lower.contains("500")
            || lower.contains("502")
            || lower.contains("503")
            || lower.contains("504")
            || lower.contains("server error")
            || lower.contains("internal error")
            || lower.contains("overloaded")
            || lower.contains("temporary")
        {
            return ApiError::new(ErrorCategory::Transient, message)
                .retry_after(Duration::from_secs(2));
        }

        // Bad request patterns
        if lower.contains("400")
            || lower.contains("bad request")
            || lower.contains("invalid")
            || lower.contains("malformed")
        {
            return ApiError::new(ErrorCategory::BadRequest, message);
        }

        ApiError::new(ErrorCategory::Unknown, message)
    }

    /// Classify an HTTP status code directly (more accurate than string matching)
    pub fn classify_http_status(status: u16, message: &str) -> ApiError {
        match status {
            429 => ApiError::new(ErrorCategory::RateLimit, message)
                .retry_after(Duration::from_secs(30)),
            401 | 403 => ApiError::new(ErrorCategory::Auth, message),
            400 | 404 | 422 => ApiError::new(ErrorCategory::BadRequest, message),
            // 500 series are transient - can retry
            500 | 502 | 503 | 504 | 529 => ApiError::new(ErrorCategory::Transient, message)
                .retry_after(Duration::from_secs(5)),
            _ => ApiError::new(ErrorCategory::Unknown, message),
        }
    }

    /// Classify a reqwest transport error
    pub fn classify_transport(err: &reqwest::Error) -> ApiError {
        if err.is_timeout() {
            ApiError::new(ErrorCategory::Network, format!("Request timed out: {}", err))
                .retry_after(Duration::from_secs(5))
        } else if err.is_connect() {
            ApiError::new(ErrorCategory::Network, format!("Connection failed: {}", err))
                .retry_after(Duration::from_secs(5))
        } else {
            ApiError::new(ErrorCategory::Unknown, err.to_string())
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum QuillError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Configuration and Validation
    // -------------------------------------------------------------------------
    /// Required credential missing or configuration invalid. Fatal, never retried.
    #[error("Config error: {0}")]
    Config(String),

    /// Input failed validation. The operation is never attempted.
    #[error("Validation failed: {0}")]
    Validation(String),

    // -------------------------------------------------------------------------
    // Remote Service Errors
    // -------------------------------------------------------------------------
    /// Structured API error with category and retry hints
    #[error("API error: {0}")]
    Api(ApiError),

    /// Mid-stream failure. The partial buffer assembled before the failure
    /// is preserved for diagnostics.
    #[error("Stream error: {message} ({} chars received)", .partial.chars().count())]
    Stream { message: String, partial: String },

    /// Operation timeout with context
    #[error("Timeout after {duration:?}: {operation}")]
    Timeout {
        operation: String,
        duration: Duration,
    },
}

impl From<ApiError> for QuillError {
    fn from(err: ApiError) -> Self {
        QuillError::Api(err)
    }
}

pub type Result<T> = std::result::Result<T, QuillError>;

// =============================================================================
// Helper Functions
// =============================================================================

impl QuillError {
    /// Create a timeout error
    pub fn timeout(operation: impl Into<String>, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a stream error carrying the partial buffer
    pub fn stream(message: impl Into<String>, partial: impl Into<String>) -> Self {
        Self::Stream {
            message: message.into(),
            partial: partial.into(),
        }
    }

    /// Check if this error is recoverable (can be retried).
    ///
    /// Validation and configuration errors fail fast. Stream errors are not
    /// retried automatically since the partial output matters to the caller.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Api(e) => e.is_retryable(),
            Self::Timeout { .. } => true,
            _ => false,
        }
    }

    /// Partial output attached to this error, if any
    pub fn partial_output(&self) -> Option<&str> {
        match self {
            Self::Stream { partial, .. } => Some(partial),
            _ => None,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::RateLimit.to_string(), "RATE_LIMIT");
        assert_eq!(ErrorCategory::Auth.to_string(), "AUTH");
        assert_eq!(ErrorCategory::Transient.to_string(), "TRANSIENT");
    }

    #[test]
    fn test_error_category_retryable() {
        assert!(ErrorCategory::RateLimit.is_retryable());
        assert!(ErrorCategory::Network.is_retryable());
        assert!(ErrorCategory::Transient.is_retryable());
        assert!(!ErrorCategory::Auth.is_retryable());
        assert!(!ErrorCategory::BadRequest.is_retryable());
        assert!(!ErrorCategory::Unknown.is_retryable());
    }

    #[test]
    fn test_classify_rate_limit() {
        let err = ErrorClassifier::classify("Rate limit exceeded, please retry");
        assert_eq!(err.category, ErrorCategory::RateLimit);
        assert!(err.is_retryable());
        assert!(err.retry_after.is_some());
    }

    #[test]
    fn test_classify_auth() {
        let err = ErrorClassifier::classify("Invalid API key provided");
        assert_eq!(err.category, ErrorCategory::Auth);
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_classify_network() {
        let err = ErrorClassifier::classify("Connection timed out after 30s");
        assert_eq!(err.category, ErrorCategory::Network);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_classify_unknown() {
        let err = ErrorClassifier::classify("Something weird happened");
        assert_eq!(err.category, ErrorCategory::Unknown);
    }

    #[test]
    fn test_classify_http_status() {
        let rate_limit = ErrorClassifier::classify_http_status(429, "Rate limited");
        assert_eq!(rate_limit.category, ErrorCategory::RateLimit);

        let auth = ErrorClassifier::classify_http_status(401, "Unauthorized");
        assert_eq!(auth.category, ErrorCategory::Auth);

        let server_error = ErrorClassifier::classify_http_status(500, "Server error");
        assert_eq!(server_error.category, ErrorCategory::Transient);

        let overloaded = ErrorClassifier::classify_http_status(529, "Overloaded");
        assert_eq!(overloaded.category, ErrorCategory::Transient);
    }

    #[test]
    fn test_recoverable_routing() {
        assert!(QuillError::Api(ApiError::new(ErrorCategory::Transient, "x")).is_recoverable());
        assert!(QuillError::timeout("call", Duration::from_secs(1)).is_recoverable());
        assert!(!QuillError::Config("missing key".into()).is_recoverable());
        assert!(!QuillError::Validation("empty input".into()).is_recoverable());
        assert!(!QuillError::stream("closed", "partial").is_recoverable());
    }

    #[test]
    fn test_stream_error_preserves_partial() {
        let err = QuillError::stream("connection reset", "abcd");
        assert_eq!(err.partial_output(), Some("abcd"));
        assert!(err.to_string().contains("4 chars"));
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::new(ErrorCategory::RateLimit, "Too many requests");
        assert_eq!(err.to_string(), "[RATE_LIMIT] Too many requests");
    }
}
