//! Progress Spinner
//!
//! Cooperative, timer-driven spinner shown while a call is outstanding.
//! Purely cosmetic; it never blocks or delays the operation it decorates.
//!
//! Each indicator instance owns its own timer task handle. There is no
//! shared or global state: two indicators animate independently, and one
//! indicator never runs two timers (`start` is idempotent).

use console::{Term, style};
use tokio::task::JoinHandle;
use tokio::time::{Duration, interval};

use crate::constants::progress::{FRAME_PERIOD_MS, FRAMES};

/// Animated status-line spinner for long-running calls
pub struct ProgressIndicator {
    handle: Option<JoinHandle<()>>,
    term: Term,
}

impl Default for ProgressIndicator {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressIndicator {
    pub fn new() -> Self {
        Self {
            handle: None,
            term: Term::stderr(),
        }
    }

    /// Whether the spinner task is currently running
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Begin the animation. Idempotent: calling `start` while already
    /// running is a no-op, never a second timer.
    pub fn start(&mut self, message: &str) {
        if self.is_running() {
            return;
        }

        let term = self.term.clone();
        let message = message.to_string();

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval(Duration::from_millis(FRAME_PERIOD_MS));
            let mut frame = 0usize;
            loop {
                ticker.tick().await;
                let _ = term.write_str(&format!("\r{} {}...", FRAMES[frame], message));
                frame = (frame + 1) % FRAMES.len();
            }
        }));
    }

    /// Cancel the animation. With a final message, writes a completion
    /// line; without one, clears the status line. No-op when not running.
    pub fn stop(&mut self, final_message: Option<&str>) {
        let Some(handle) = self.handle.take() else {
            return;
        };
        handle.abort();

        match final_message {
            Some(message) => {
                let _ = self
                    .term
                    .write_line(&format!("\r{} {}", style("✓").green(), message));
            }
            None => {
                let _ = self.term.write_str("\r");
                let _ = self.term.clear_line();
            }
        }
    }
}

impl Drop for ProgressIndicator {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_start_is_idempotent() {
        let mut progress = ProgressIndicator::new();
        progress.start("working");
        assert!(progress.is_running());

        // Second start must not create a second timer
        progress.start("working again");
        assert!(progress.is_running());

        progress.stop(None);
        assert!(!progress.is_running());
        // The single stop fully stopped the single task
        progress.stop(None);
        assert!(!progress.is_running());
    }

    #[tokio::test]
    async fn test_stop_before_start_is_noop() {
        let mut progress = ProgressIndicator::new();
        progress.stop(None);
        progress.stop(Some("done"));
        assert!(!progress.is_running());
    }

    #[tokio::test]
    async fn test_restart_after_stop() {
        let mut progress = ProgressIndicator::new();
        progress.start("first");
        progress.stop(Some("first done"));
        assert!(!progress.is_running());

        progress.start("second");
        assert!(progress.is_running());
        progress.stop(None);
    }

    #[tokio::test]
    async fn test_drop_aborts_running_task() {
        let mut progress = ProgressIndicator::new();
        progress.start("working");
        assert!(progress.is_running());
        drop(progress);
        // Nothing to assert beyond no panic; the abort releases the timer
    }

    #[tokio::test]
    async fn test_independent_instances() {
        let mut a = ProgressIndicator::new();
        let mut b = ProgressIndicator::new();
        a.start("a");
        b.start("b");
        a.stop(None);
        assert!(!a.is_running());
        assert!(b.is_running());
        b.stop(None);
    }
}
