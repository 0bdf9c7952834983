//! Console Output
//!
//! Styled status and result lines. A pure sink: nothing here feeds back
//! into the call path.

use std::io::Write;

use console::style;

pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        eprintln!("{} {}", style("⚠").yellow(), message);
    }

    /// Write a streamed fragment without a trailing newline
    pub fn fragment(&self, text: &str) {
        print!("{}", text);
        let _ = std::io::stdout().flush();
    }

    /// Map an error to its operator-facing message line
    pub fn report_error(&self, err: &crate::types::QuillError) {
        use crate::types::QuillError;
        match err {
            QuillError::Config(msg) => self.error(&format!("Configuration problem: {}", msg)),
            QuillError::Validation(msg) => self.error(&format!("Invalid input: {}", msg)),
            QuillError::Api(api) => self.error(&format!("Service error: {}", api)),
            QuillError::Stream { message, partial } => {
                self.error(&format!("Stream interrupted: {}", message));
                if !partial.is_empty() {
                    self.warning(&format!(
                        "Partial output ({} chars) was received before the failure",
                        partial.chars().count()
                    ));
                }
            }
            other => self.error(&format!("Unexpected error: {}", other)),
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
