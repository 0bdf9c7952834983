//! Input Validation
//!
//! Validates a code payload before it is sent to the LLM.
//! Pure function of its inputs and the static recognized-language set.
//!
//! ## Rules (checked in order, first failure wins)
//!
//! 1. Trimmed code is non-empty
//! 2. Code is at most 100,000 characters
//! 3. Language membership is advisory only: an unrecognized language sets a
//!    flag but never fails validation

use crate::constants::validation::{MAX_INPUT_CHARS, RECOGNIZED_LANGUAGES};
use crate::types::{QuillError, Result};

/// Result of validating a code payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// Whether the input may be sent at all
    pub ok: bool,
    /// Why validation failed, when it did
    pub reason: Option<String>,
    /// Advisory flag: the language is outside the recognized set.
    /// Downgrades confidence, never blocks the call.
    pub unrecognized_language: bool,
}

impl ValidationReport {
    fn pass(unrecognized_language: bool) -> Self {
        Self {
            ok: true,
            reason: None,
            unrecognized_language,
        }
    }

    fn fail(reason: impl Into<String>) -> Self {
        Self {
            ok: false,
            reason: Some(reason.into()),
            unrecognized_language: false,
        }
    }

    /// Convert into a `Result`, for callers that treat failure as an error
    pub fn into_result(self) -> Result<Self> {
        if self.ok {
            Ok(self)
        } else {
            Err(QuillError::Validation(
                self.reason.unwrap_or_else(|| "invalid input".to_string()),
            ))
        }
    }
}

/// Validate a code payload and its language tag
pub fn validate(code: &str, language: &str) -> ValidationReport {
    if code.trim().is_empty() {
        return ValidationReport::fail("empty input");
    }

    if code.chars().count() > MAX_INPUT_CHARS {
        return ValidationReport::fail(format!(
            "input too large (max {} characters)",
            MAX_INPUT_CHARS
        ));
    }

    ValidationReport::pass(!is_recognized_language(language))
}

/// Check whether a language tag is in the recognized set
pub fn is_recognized_language(language: &str) -> bool {
    let lower = language.to_lowercase();
    RECOGNIZED_LANGUAGES.contains(&lower.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_input_fails() {
        let report = validate("", "rust");
        assert!(!report.ok);
        assert_eq!(report.reason.as_deref(), Some("empty input"));

        let whitespace = validate("   \n\t  ", "rust");
        assert!(!whitespace.ok);
    }

    #[test]
    fn test_oversized_input_fails() {
        let big = "x".repeat(MAX_INPUT_CHARS + 1);
        let report = validate(&big, "python");
        assert!(!report.ok);
        assert!(report.reason.unwrap().contains("too large"));

        // Exactly at the limit is fine
        let at_limit = "x".repeat(MAX_INPUT_CHARS);
        assert!(validate(&at_limit, "python").ok);
    }

    #[test]
    fn test_size_check_ignores_language() {
        let big = "x".repeat(MAX_INPUT_CHARS + 1);
        assert!(!validate(&big, "not-a-language").ok);
        assert!(!validate(&big, "rust").ok);
    }

    #[test]
    fn test_recognized_language_case_insensitive() {
        let report = validate("fn main() {}", "Rust");
        assert!(report.ok);
        assert!(!report.unrecognized_language);

        let upper = validate("SELECT 1", "SQL");
        assert!(!upper.unrecognized_language);
    }

    #[test]
    fn test_unrecognized_language_is_advisory() {
        let report = validate("IDENTIFICATION DIVISION.", "Cobol");
        assert!(report.ok);
        assert!(report.reason.is_none());
        assert!(report.unrecognized_language);
    }

    #[test]
    fn test_first_failure_wins() {
        // Empty beats oversized-language concerns
        let report = validate("", "Cobol");
        assert_eq!(report.reason.as_deref(), Some("empty input"));
        assert!(!report.unrecognized_language);
    }

    #[test]
    fn test_into_result() {
        assert!(validate("let x = 1;", "rust").into_result().is_ok());

        let err = validate("", "rust").into_result().unwrap_err();
        assert!(matches!(err, QuillError::Validation(_)));
    }

    #[test]
    fn test_is_recognized_language() {
        assert!(is_recognized_language("typescript"));
        assert!(is_recognized_language("TypeScript"));
        assert!(!is_recognized_language("fortran"));
    }
}
