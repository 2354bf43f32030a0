//! Project configuration (sketch-tools.toml)
//!
//! Both tools run without a config file. When `sketch-tools.toml` is present
//! at the project root it can move the sketch layout and set serial defaults:
//!
//! ```toml
//! [layout]
//! env = "python/.env"
//! sketch = "sketch/sketch.ino"
//! output = "sketch/processed_sketch.ino"
//!
//! [serial]
//! port = "/dev/ttyACM0"
//! baud = 9600
//! timeout_secs = 1.0
//! ```

use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Config file name looked up at the project root
pub const CONFIG_FILE_NAME: &str = "sketch-tools.toml";

/// Default baud rate of the Arduino serial console
pub const DEFAULT_BAUD: u32 = 9600;

/// Default read timeout in seconds
pub const DEFAULT_TIMEOUT_SECS: f64 = 1.0;

/// Top-level config file contents
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub layout: LayoutConfig,
    pub serial: SerialConfig,
}

/// File locations relative to the project root
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// KEY=VALUE environment file
    pub env: PathBuf,
    /// Sketch template containing <<KEY>> placeholders
    pub sketch: PathBuf,
    /// Processed sketch written by apply-env
    pub output: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            env: PathBuf::from("python").join(".env"),
            sketch: PathBuf::from("sketch").join("sketch.ino"),
            output: PathBuf::from("sketch").join("processed_sketch.ino"),
        }
    }
}

/// Serial defaults for read-logs; command line flags take precedence
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SerialConfig {
    pub port: Option<String>,
    pub baud: u32,
    pub timeout_secs: f64,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            port: None,
            baud: DEFAULT_BAUD,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Serial settings for one read-logs run after applying command line flags
#[derive(Debug, Clone, PartialEq)]
pub struct SerialSettings {
    /// Explicit port; `None` means auto-detect
    pub port: Option<String>,
    pub baud: u32,
    pub timeout: Duration,
}

impl SerialConfig {
    /// Apply command line flags over the config file values. Flags win when
    /// given; the resulting timeout must be valid.
    pub fn with_overrides(
        &self,
        port: Option<String>,
        baud: Option<u32>,
        timeout_secs: Option<f64>,
    ) -> Result<SerialSettings> {
        Ok(SerialSettings {
            port: port.or_else(|| self.port.clone()),
            baud: baud.unwrap_or(self.baud),
            timeout: timeout_from_secs(timeout_secs.unwrap_or(self.timeout_secs))?,
        })
    }
}

impl Config {
    /// Parse config file content
    pub fn parse_content(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load a config file; a missing or malformed file is an error
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::parse_content(&content, path)?;
        log::debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load an explicit config file, or `<root>/sketch-tools.toml` when it
    /// exists, falling back to built-in defaults
    pub fn discover(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            Self::load(&candidate)
        } else {
            log::debug!("No {} under {}, using defaults", CONFIG_FILE_NAME, root.display());
            Ok(Self::default())
        }
    }
}

/// Resolved absolute-or-root-relative paths for one run of apply-env
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectLayout {
    pub env_path: PathBuf,
    pub sketch_path: PathBuf,
    pub output_path: PathBuf,
}

impl ProjectLayout {
    /// Join the configured paths onto `root`; absolute paths are kept as is
    pub fn resolve(root: &Path, layout: &LayoutConfig) -> Self {
        Self {
            env_path: root.join(&layout.env),
            sketch_path: root.join(&layout.sketch),
            output_path: root.join(&layout.output),
        }
    }
}

/// Convert a timeout in seconds into a `Duration`, rejecting zero, negative,
/// non-finite and out of range values
pub fn timeout_from_secs(secs: f64) -> Result<Duration> {
    if secs > 0.0 {
        match Duration::try_from_secs_f64(secs) {
            Ok(timeout) if !timeout.is_zero() => return Ok(timeout),
            _ => {}
        }
    }
    Err(Error::InvalidTimeout(secs))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_default_layout() {
        let layout = ProjectLayout::resolve(Path::new("/project"), &LayoutConfig::default());
        assert_eq!(layout.env_path, Path::new("/project/python/.env"));
        assert_eq!(layout.sketch_path, Path::new("/project/sketch/sketch.ino"));
        assert_eq!(
            layout.output_path,
            Path::new("/project/sketch/processed_sketch.ino")
        );
    }

    #[test]
    fn test_absolute_paths_kept() {
        let layout = LayoutConfig {
            env: PathBuf::from("/etc/device.env"),
            ..LayoutConfig::default()
        };
        let resolved = ProjectLayout::resolve(Path::new("/project"), &layout);
        assert_eq!(resolved.env_path, Path::new("/etc/device.env"));
    }

    #[test]
    fn test_parse_partial_config() {
        let content = r#"
[serial]
baud = 115200
"#;
        let config = Config::parse_content(content, Path::new("test.toml")).unwrap();
        assert_eq!(config.serial.baud, 115200);
        assert_eq!(config.serial.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(config.serial.port, None);
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let content = "[layout]\ntemplate = \"x.ino\"\n";
        let err = Config::parse_content(content, Path::new("bad.toml")).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn test_discover_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::discover(dir.path(), None).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_discover_reads_root_config() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[layout]\noutput = \"build/out.ino\"\n",
        )
        .unwrap();

        let config = Config::discover(dir.path(), None).unwrap();
        assert_eq!(config.layout.output, PathBuf::from("build/out.ino"));
        assert_eq!(config.layout.sketch, LayoutConfig::default().sketch);
    }

    #[test]
    fn test_explicit_config_must_exist() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = Config::discover(dir.path(), Some(missing.as_path())).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }

    #[test]
    fn test_timeout_validation() {
        assert_eq!(timeout_from_secs(1.0).unwrap(), Duration::from_secs(1));
        assert_eq!(timeout_from_secs(0.25).unwrap(), Duration::from_millis(250));
        assert!(timeout_from_secs(0.0).is_err());
        assert!(timeout_from_secs(-1.0).is_err());
        assert!(timeout_from_secs(f64::NAN).is_err());
        assert!(timeout_from_secs(f64::INFINITY).is_err());
        assert!(timeout_from_secs(1e30).is_err());
    }

    #[test]
    fn test_flags_override_serial_config() {
        let config = SerialConfig {
            port: Some("/dev/ttyUSB0".to_string()),
            baud: 115200,
            timeout_secs: 2.0,
        };

        let settings = config
            .with_overrides(Some("COM3".to_string()), Some(57600), Some(0.5))
            .unwrap();

        assert_eq!(settings.port.as_deref(), Some("COM3"));
        assert_eq!(settings.baud, 57600);
        assert_eq!(settings.timeout, Duration::from_millis(500));
    }

    #[test]
    fn test_serial_config_used_without_flags() {
        let config = SerialConfig {
            port: Some("/dev/ttyUSB0".to_string()),
            baud: 115200,
            timeout_secs: 2.0,
        };

        let settings = config.with_overrides(None, None, None).unwrap();

        assert_eq!(settings.port.as_deref(), Some("/dev/ttyUSB0"));
        assert_eq!(settings.baud, 115200);
        assert_eq!(settings.timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_builtin_serial_defaults() {
        let settings = SerialConfig::default()
            .with_overrides(None, None, None)
            .unwrap();

        assert_eq!(settings.port, None);
        assert_eq!(settings.baud, 9600);
        assert_eq!(settings.timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_invalid_timeout_flag_rejected() {
        let config = SerialConfig::default();

        let err = config.with_overrides(None, None, Some(0.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidTimeout(t) if t == 0.0));

        let err = config.with_overrides(None, None, Some(-3.0)).unwrap_err();
        assert!(matches!(err, Error::InvalidTimeout(_)));
    }

    #[test]
    fn test_invalid_timeout_in_config_rejected() {
        let config = SerialConfig {
            timeout_secs: -1.0,
            ..SerialConfig::default()
        };
        assert!(config.with_overrides(None, None, None).is_err());
        // A valid flag replaces the bad config value
        assert!(config.with_overrides(None, None, Some(1.0)).is_ok());
    }
}
