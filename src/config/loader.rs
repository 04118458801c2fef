//! Configuration loading from and saving to disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::config::schema::{AgentConfig, ConfigRecord};
use crate::config::validation::{validate_record, ValidationError};

/// File name used when no explicit path is given.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Error type for configuration loading and saving.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Parse error: {0}")]
    ParseToml(#[from] toml::de::Error),
    #[error("Serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
    #[error("cannot locate configuration file: {0}")]
    Locate(#[source] io::Error),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Persistence collaborator used by the lifecycle coordinator.
pub trait ConfigPersistence: Send + Sync {
    /// Load the persisted configuration.
    ///
    /// `Ok(None)` means nothing has been persisted yet; a malformed or
    /// invalid record is an error.
    fn load(&self) -> Result<Option<AgentConfig>, ConfigError>;

    /// Persist the configuration, replacing whatever was stored before.
    fn save(&self, config: &AgentConfig) -> Result<(), ConfigError>;

    /// Location of the persisted configuration.
    fn path(&self) -> &Path;
}

/// On-disk encoding, chosen from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` files are TOML, everything else is JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Configuration persisted as a single file.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    format: ConfigFormat,
}

impl ConfigFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let format = ConfigFormat::from_path(&path);
        Self { path, format }
    }

    /// `config.json` in the directory of the running executable.
    pub fn beside_executable() -> Result<Self, ConfigError> {
        Ok(Self::new(default_config_path()?))
    }

    pub fn format(&self) -> ConfigFormat {
        self.format
    }

    fn io_error(&self, source: io::Error) -> ConfigError {
        ConfigError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl ConfigPersistence for ConfigFile {
    fn load(&self) -> Result<Option<AgentConfig>, ConfigError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };

        let record: ConfigRecord = match self.format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        let config = validate_record(&record).map_err(ConfigError::Validation)?;
        Ok(Some(config))
    }

    fn save(&self, config: &AgentConfig) -> Result<(), ConfigError> {
        let record = ConfigRecord::from(config);
        let content = match self.format {
            ConfigFormat::Json => serde_json::to_string_pretty(&record)?,
            ConfigFormat::Toml => toml::to_string_pretty(&record)?,
        };

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        fs::write(&self.path, content).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), "Configuration saved");
        Ok(())
    }

    fn path(&self) -> &Path {
        &self.path
    }
}

/// Path of `config.json` next to the running executable.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let exe = std::env::current_exe().map_err(ConfigError::Locate)?;
    let dir = exe.parent().ok_or_else(|| {
        ConfigError::Locate(io::Error::new(
            io::ErrorKind::NotFound,
            "executable has no parent directory",
        ))
    })?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = ConfigFile::new(dir.path().join("config.json"));
        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn loads_json_with_defaults_for_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "port": 8123, "autostart": true }"#).unwrap();

        let config = ConfigFile::new(&path).load().unwrap().unwrap();
        assert_eq!(config.port, 8123);
        assert_eq!(config.shutdown_timeout_secs, 10);
        assert!(config.autostart);
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ port: ").unwrap();

        let err = ConfigFile::new(&path).load().unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn invalid_port_is_a_validation_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "port": 70000 }"#).unwrap();

        let err = ConfigFile::new(&path).load().unwrap_err();
        match err {
            ConfigError::Validation(errors) => {
                assert_eq!(errors, vec![ValidationError::PortOutOfRange(70000)]);
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn save_writes_indented_json_that_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let file = ConfigFile::new(&path);
        let config = AgentConfig {
            port: 9001,
            shutdown_timeout_secs: 0,
            autostart: true,
        };

        file.save(&config).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\n  \"shutdown_timeout_sec\": 0"), "{raw}");
        assert_eq!(file.load().unwrap(), Some(config));
    }

    #[test]
    fn toml_extension_selects_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("agent.toml");
        fs::write(&path, "port = 7000\nshutdown_timeout_sec = -3\n").unwrap();

        let file = ConfigFile::new(&path);
        assert_eq!(file.format(), ConfigFormat::Toml);
        let config = file.load().unwrap().unwrap();
        assert_eq!(config.port, 7000);
        assert_eq!(config.shutdown_timeout_secs, 0);
    }

    #[test]
    fn default_path_ends_with_config_json() {
        let path = default_config_path().unwrap();
        assert_eq!(path.file_name().unwrap(), CONFIG_FILE_NAME);
    }
}
