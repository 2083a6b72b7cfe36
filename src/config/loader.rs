//! Configuration loading from disk and environment.

use std::env;
use std::fs;
use std::path::Path;

use crate::config::schema::AppConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Overrides the API base URL.
pub const ENV_API_URL: &str = "TALENT_API_URL";
/// Overrides the session file path.
pub const ENV_SESSION_PATH: &str = "TALENT_SESSION_PATH";
/// Enables demo mode when set to `1` or `true`.
pub const ENV_DEMO_MODE: &str = "TALENT_DEMO_MODE";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: AppConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Load from `path` when given, otherwise start from defaults. Environment
/// overrides and validation apply either way.
pub fn load_or_default(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    match path {
        Some(path) => load_config(path),
        None => {
            let mut config = AppConfig::default();
            apply_env_overrides(&mut config);
            validate_config(&config).map_err(ConfigError::Validation)?;
            Ok(config)
        }
    }
}

fn apply_env_overrides(config: &mut AppConfig) {
    if let Ok(url) = env::var(ENV_API_URL) {
        tracing::debug!(base_url = %url, "API base URL overridden from environment");
        config.api.base_url = url;
    }
    if let Ok(path) = env::var(ENV_SESSION_PATH) {
        config.session.path = path;
    }
    if let Ok(flag) = env::var(ENV_DEMO_MODE) {
        config.demo_mode = matches!(flag.trim(), "1" | "true" | "TRUE" | "yes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [api]
            base_url = "https://talent.example.com/api"

            [upload]
            max_files = 4
            "#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.upload.max_files, 4);
        assert_eq!(config.upload.max_size_mb, 5);
    }

    #[test]
    fn test_invalid_file_lists_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [upload]
            max_files = 0
            chunk_size = 0
            "#
        )
        .unwrap();

        let err = load_config(file.path()).unwrap_err();
        let text = err.to_string();
        assert!(text.starts_with("Validation failed: "));
        assert!(text.contains("upload.max_files"));
        assert!(text.contains("upload.chunk_size"));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
