//! Token Counting and Limit Checks
//!
//! Provides token estimation for pre-flight limit checks.
//!
//! ## Strategy
//! - Estimate token counts before sending to the LLM
//! - Warn (never block) when the input risks truncating the response
//!
//! The estimate is a fixed heuristic ratio (~4 characters per token for
//! English text and code), not a tokenizer. It gives a ballpark, which is
//! all the advisory check needs.

use tracing::warn;

use crate::constants::tokens::{CHARS_PER_TOKEN, SAFETY_MARGIN};

/// Token counter for pre-flight limit checks
#[derive(Debug, Clone, Copy, Default)]
pub struct TokenCounter;

impl TokenCounter {
    pub fn new() -> Self {
        Self
    }

    /// Estimate token count for a string: `ceil(chars / 4)`.
    ///
    /// Deterministic pure function; empty input estimates to zero.
    pub fn estimate(&self, text: &str) -> usize {
        text.chars().count().div_ceil(CHARS_PER_TOKEN)
    }

    /// Check whether the input fits the token limit with safety margin.
    ///
    /// Returns false when the estimate exceeds 80% of `max_tokens`, leaving
    /// room for the response. Advisory only: the caller should warn, not
    /// fail, and the call proceeds either way.
    pub fn within_budget(&self, text: &str, max_tokens: u32) -> bool {
        let estimated = self.estimate(text);
        let threshold = max_tokens as f64 * SAFETY_MARGIN;

        if estimated as f64 > threshold {
            warn!(
                estimated,
                max_tokens, "Input may exceed token limit, response may be truncated"
            );
            return false;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_estimate_basic() {
        let counter = TokenCounter::new();
        assert_eq!(counter.estimate(""), 0);
        assert_eq!(counter.estimate("hi"), 1); // 2 chars -> 1 token
        assert_eq!(counter.estimate("hello"), 2); // 5 chars -> 2 tokens
        assert_eq!(counter.estimate("hello world"), 3); // 11 chars -> 3 tokens
        assert_eq!(counter.estimate("abcd"), 1); // exact multiple
    }

    #[test]
    fn test_estimate_counts_chars_not_bytes() {
        let counter = TokenCounter::new();
        // 4 scalar values, 12 bytes
        assert_eq!(counter.estimate("日本語字"), 1);
    }

    #[test]
    fn test_within_budget_boundaries() {
        let counter = TokenCounter::new();
        // 100-token limit, 80-token threshold. 320 chars estimate to exactly 80.
        let at_threshold = "a".repeat(320);
        assert!(counter.within_budget(&at_threshold, 100));

        // 321 chars estimate to 81, just over the threshold
        let over = "a".repeat(321);
        assert!(!counter.within_budget(&over, 100));

        // 316 chars estimate to 79, just under
        let under = "a".repeat(316);
        assert!(counter.within_budget(&under, 100));
    }

    #[test]
    fn test_within_budget_empty_input() {
        let counter = TokenCounter::new();
        assert!(counter.within_budget("", 1));
    }

    proptest! {
        #[test]
        fn prop_estimate_matches_ceiling(s in ".*") {
            let counter = TokenCounter::new();
            let chars = s.chars().count();
            prop_assert_eq!(counter.estimate(&s), chars.div_ceil(4));
        }

        #[test]
        fn prop_estimate_monotone_under_append(s in ".*", t in ".*") {
            let counter = TokenCounter::new();
            let combined = format!("{}{}", s, t);
            prop_assert!(counter.estimate(&combined) >= counter.estimate(&s));
        }
    }
}
