//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (~/.config/codequill/config.toml)
//! 3. Project config (./.codequill.toml)
//! 4. Environment variables (CODEQUILL_* prefix)

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use tracing::debug;

use super::types::Config;
use crate::types::{QuillError, Result};

/// Project config file name, looked up in the working directory
pub const PROJECT_CONFIG_FILE: &str = ".codequill.toml";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with the full resolution chain:
    /// defaults → global → project → env vars
    pub fn load() -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            debug!("Loading global config from: {}", global_path.display());
            figment = figment.merge(Toml::file(&global_path));
        }

        let project_path = PathBuf::from(PROJECT_CONFIG_FILE);
        if project_path.exists() {
            debug!("Loading project config from: {}", project_path.display());
            figment = figment.merge(Toml::file(&project_path));
        }

        // e.g. CODEQUILL_API_MODEL -> api.model
        figment = figment.merge(Env::prefixed("CODEQUILL_").split('_').lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| QuillError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a specific file only (defaults + that file)
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .extract()
            .map_err(|e| QuillError::Config(format!("Configuration error: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    /// Path to the global config file, if a home directory exists
    pub fn global_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "codequill")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[api]
model = "claude-3-opus-20240229"
max_tokens = 2000

[retry]
max_attempts = 5
"#
        )
        .unwrap();

        let config = ConfigLoader::load_from_file(file.path()).unwrap();
        assert_eq!(config.api.model, "claude-3-opus-20240229");
        assert_eq!(config.api.max_tokens, 2000);
        assert_eq!(config.retry.max_attempts, 5);
        // Untouched fields keep defaults
        assert_eq!(config.retry.initial_delay_ms, 1000);
    }

    #[test]
    fn test_load_from_missing_file_uses_defaults() {
        let config = ConfigLoader::load_from_file(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.api.max_tokens, 4000);
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::with_suffix(".toml").unwrap();
        writeln!(
            file,
            r#"
[retry]
max_attempts = 0
"#
        )
        .unwrap();

        let err = ConfigLoader::load_from_file(file.path()).unwrap_err();
        assert!(matches!(err, QuillError::Config(_)));
    }
}
