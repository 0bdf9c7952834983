//! Code Task Prompts
//!
//! Prompt builders for the supported code tasks. Each builder produces an
//! immutable `TaskRequest` ready for the client; the instruction wording
//! lives here, away from the transport layer.

use crate::ai::TaskRequest;

/// Supported task kinds, mirrored by the CLI subcommands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    Complete,
    GenerateTests,
    Translate,
    Optimize,
    SecurityReview,
    Document,
}

impl TaskKind {
    /// Short label for status lines
    pub fn label(&self) -> &'static str {
        match self {
            Self::Complete => "completion",
            Self::GenerateTests => "test generation",
            Self::Translate => "translation",
            Self::Optimize => "optimization",
            Self::SecurityReview => "security review",
            Self::Document => "documentation",
        }
    }
}

/// Complete a partial code snippet
pub fn complete(code: &str, language: &str, max_tokens: u32) -> TaskRequest {
    TaskRequest::new(
        format!(
            "Complete this {} code. Provide only the completed code without explanation:",
            language
        ),
        max_tokens,
    )
    .with_code(code, language)
}

/// Generate unit tests for the given code
pub fn generate_tests(code: &str, language: &str, max_tokens: u32) -> TaskRequest {
    TaskRequest::new(
        format!(
            "Generate comprehensive unit tests for this {} code. \
             Cover normal cases, edge cases, and error conditions:",
            language
        ),
        max_tokens,
    )
    .with_code(code, language)
}

/// Translate code from one language to another
pub fn translate(code: &str, from: &str, to: &str, max_tokens: u32) -> TaskRequest {
    TaskRequest::new(
        format!(
            "Translate this {} code to {}. Maintain the same functionality \
             and use idiomatic {} patterns:",
            from, to, to
        ),
        max_tokens,
    )
    .with_code(code, from)
    .with_target_language(to)
}

/// Optimize code for performance and readability
pub fn optimize(code: &str, language: &str, max_tokens: u32) -> TaskRequest {
    TaskRequest::new(
        format!(
            "Optimize this {} code for performance and readability. \
             Explain the key improvements you make:",
            language
        ),
        max_tokens,
    )
    .with_code(code, language)
}

/// Analyze code for security vulnerabilities
pub fn security_review(code: &str, language: &str, max_tokens: u32) -> TaskRequest {
    TaskRequest::new(
        format!(
            "Analyze this {} code for security vulnerabilities. For each issue \
             found, state the severity and a concrete fix:",
            language
        ),
        max_tokens,
    )
    .with_code(code, language)
}

/// Generate documentation for the given code
pub fn document(code: &str, language: &str, max_tokens: u32) -> TaskRequest {
    TaskRequest::new(
        format!(
            "Generate comprehensive documentation for this {} code, \
             including usage examples and doc comments:",
            language
        ),
        max_tokens,
    )
    .with_code(code, language)
}
