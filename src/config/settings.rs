//! Application settings and paths.

use crate::error::{ConfigError, ConfigResult};
use crate::scanner::{ScanConfig, DEFAULT_WORKERS};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Application directory paths following the XDG Base Directory Specification.
#[derive(Debug, Clone)]
pub struct Paths {
    /// Configuration directory (~/.config/portcheck)
    pub config_dir: PathBuf,
}

impl Paths {
    /// Locate the configuration directory. Nothing is created on disk.
    pub fn new() -> ConfigResult<Self> {
        let project = ProjectDirs::from("com", "portcheck", "portcheck")
            .ok_or(ConfigError::DirectoryNotFound)?;

        Ok(Self {
            config_dir: project.config_dir().to_path_buf(),
        })
    }

    /// Get the path to the settings file.
    pub fn settings_file(&self) -> PathBuf {
        self.config_dir.join("settings.json")
    }
}

/// Application-wide settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    /// Number of probes running at once.
    pub workers: usize,
    /// TCP connect timeout in milliseconds.
    pub tcp_connect_timeout_ms: u64,
    /// Timeout for the first read on a connected TCP port, in milliseconds.
    pub tcp_read_timeout_ms: u64,
    /// Per-payload UDP reply timeout in milliseconds.
    pub udp_recv_timeout_ms: u64,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            tcp_connect_timeout_ms: 1000,
            tcp_read_timeout_ms: 1000,
            udp_recv_timeout_ms: 500,
        }
    }
}

impl AppSettings {
    /// Load settings from the default location, falling back to defaults
    /// when no settings file exists.
    pub fn load() -> ConfigResult<Self> {
        let file = Paths::new()?.settings_file();

        if !file.exists() {
            tracing::debug!("no settings file at {}, using defaults", file.display());
            return Ok(Self::default());
        }

        Self::load_from(&file)
    }

    /// Load settings from a specific file.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let settings: Self =
            serde_json::from_str(&content).map_err(|e| ConfigError::InvalidFormat(e.to_string()))?;
        tracing::debug!("loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Validate and convert into the scanner's configuration.
    pub fn scan_config(&self) -> ConfigResult<ScanConfig> {
        if self.workers == 0 {
            return Err(ConfigError::InvalidValue("workers must be at least 1".into()));
        }

        let timeouts = [
            ("tcp_connect_timeout_ms", self.tcp_connect_timeout_ms),
            ("tcp_read_timeout_ms", self.tcp_read_timeout_ms),
            ("udp_recv_timeout_ms", self.udp_recv_timeout_ms),
        ];
        if let Some((name, _)) = timeouts.iter().find(|(_, ms)| *ms == 0) {
            return Err(ConfigError::InvalidValue(format!("{} must be non-zero", name)));
        }

        Ok(ScanConfig::default()
            .with_workers(self.workers)
            .with_tcp_connect_timeout(Duration::from_millis(self.tcp_connect_timeout_ms))
            .with_tcp_read_timeout(Duration::from_millis(self.tcp_read_timeout_ms))
            .with_udp_recv_timeout(Duration::from_millis(self.udp_recv_timeout_ms)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_match_scanner_defaults() {
        let config = AppSettings::default().scan_config().unwrap();
        assert_eq!(config, ScanConfig::default());
        assert_eq!(config.workers, 10);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "workers": 32 }}"#).unwrap();

        let settings = AppSettings::load_from(file.path()).unwrap();
        assert_eq!(settings.workers, 32);
        assert_eq!(settings.udp_recv_timeout_ms, 500);
    }

    #[test]
    fn test_invalid_json() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "workers = 4").unwrap();

        let result = AppSettings::load_from(file.path());
        assert!(matches!(result, Err(ConfigError::InvalidFormat(_))));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = AppSettings::load_from(&dir.path().join("absent.json"));
        assert!(matches!(result, Err(ConfigError::ReadFailed { .. })));
    }

    #[test]
    fn test_zero_values_rejected() {
        let settings = AppSettings {
            workers: 0,
            ..AppSettings::default()
        };
        assert!(matches!(settings.scan_config(), Err(ConfigError::InvalidValue(_))));

        let settings = AppSettings {
            udp_recv_timeout_ms: 0,
            ..AppSettings::default()
        };
        let err = settings.scan_config().unwrap_err();
        assert_eq!(err.to_string(), "invalid setting: udp_recv_timeout_ms must be non-zero");
    }

    #[test]
    fn test_settings_serialization() {
        let settings = AppSettings::default();
        let json = serde_json::to_string(&settings).unwrap();
        let parsed: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, settings);
    }
}
