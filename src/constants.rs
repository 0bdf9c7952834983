//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers should be defined here with documentation.

/// Input validation constants
pub mod validation {
    /// Maximum input size in characters (~100KB of source code)
    pub const MAX_INPUT_CHARS: usize = 100_000;

    /// Languages the prompt templates are tuned for. Anything else still
    /// works but downgrades confidence (advisory warning only).
    pub const RECOGNIZED_LANGUAGES: &[&str] = &[
        "javascript",
        "typescript",
        "python",
        "java",
        "cpp",
        "c",
        "csharp",
        "go",
        "rust",
        "php",
        "ruby",
        "swift",
        "kotlin",
        "scala",
        "html",
        "css",
        "sql",
        "bash",
        "powershell",
    ];
}

/// Token estimation constants
pub mod tokens {
    /// Heuristic ratio: roughly 4 characters per token for English/code text
    pub const CHARS_PER_TOKEN: usize = 4;

    /// Fraction of the token limit treated as safe for input, leaving
    /// headroom for the response
    pub const SAFETY_MARGIN: f64 = 0.8;

    /// Default maximum output tokens per request
    pub const DEFAULT_MAX_TOKENS: u32 = 4000;
}

/// Retry executor constants
pub mod retry {
    /// Default maximum attempts per operation
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Default initial delay before the first retry (milliseconds)
    pub const DEFAULT_INITIAL_DELAY_MS: u64 = 1000;

    /// Default backoff multiplier applied after each failed attempt
    pub const DEFAULT_BACKOFF_FACTOR: f64 = 2.0;
}

/// Network and API constants
pub mod network {
    /// Default request timeout (seconds)
    pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

    /// Default API base URL
    pub const DEFAULT_API_BASE: &str = "https://api.anthropic.com/v1";

    /// Default model
    pub const DEFAULT_MODEL: &str = "claude-3-5-sonnet-20241022";

    /// API version header value required by the messages endpoint
    pub const API_VERSION: &str = "2023-06-01";

    /// Default sampling temperature (low, for consistent code output)
    pub const DEFAULT_TEMPERATURE: f32 = 0.1;
}

/// Progress indicator constants
pub mod progress {
    /// Spinner animation period (milliseconds)
    pub const FRAME_PERIOD_MS: u64 = 100;

    /// Spinner animation glyphs
    pub const FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
}
