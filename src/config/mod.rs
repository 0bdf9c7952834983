//! Configuration
//!
//! Layered configuration: defaults, global file, project file, environment.

mod loader;
mod types;

pub use loader::{ConfigLoader, PROJECT_CONFIG_FILE};
pub use types::{ApiConfig, Config, RetryConfig};
