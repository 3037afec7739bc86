//! Run configuration loaded from TOML and CLI flags.
//!
//! Every knob has a default matching the reference workflow; a config file
//! is optional and CLI flags override whatever it provides.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sampler::SampleLimits;

/// Default RNG seed threaded through sampling and training.
pub const DEFAULT_SEED: u64 = 13;

/// Fully resolved configuration for one pipeline run.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Input spreadsheet path.
    pub input: PathBuf,
    /// Worksheet name; `None` selects the first sheet.
    pub sheet: Option<String>,
    /// Seed for the deterministic random source.
    pub seed: u64,
    /// Few-shot sampling caps.
    pub limits: SampleLimits,
    /// Where to write the HTML summary; `None` derives it from the output.
    pub report: Option<PathBuf>,
}

/// Optional values read from a TOML config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileConfig {
    /// Input spreadsheet path.
    #[serde(default)]
    pub input: Option<PathBuf>,
    /// Worksheet name.
    #[serde(default)]
    pub sheet: Option<String>,
    /// RNG seed.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Few-shot sampling caps.
    #[serde(default)]
    pub limits: SampleLimits,
    /// HTML summary destination.
    #[serde(default)]
    pub report: Option<PathBuf>,
}

/// Errors that may occur while loading a config file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("Failed to read config file {path}: {source}")]
    Read {
        /// Config file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The config file is not valid TOML.
    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        /// Config file path.
        path: PathBuf,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
}

/// Load optional settings from a TOML file.
pub fn load_file(path: &Path) -> Result<FileConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

impl RunConfig {
    /// Build a run configuration from an input path plus file defaults.
    pub fn from_parts(input: PathBuf, file: FileConfig) -> Self {
        Self {
            input,
            sheet: file.sheet,
            seed: file.seed.unwrap_or(DEFAULT_SEED),
            limits: file.limits,
            report: file.report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_full_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
input = "Reviews_Arabic.xlsx"
sheet = "Merged"
seed = 7

[limits]
global = 800
arabic = 900
english = 400
"#,
        )
        .unwrap();
        let file = load_file(&path).unwrap();
        assert_eq!(file.input, Some(PathBuf::from("Reviews_Arabic.xlsx")));
        assert_eq!(file.sheet.as_deref(), Some("Merged"));
        assert_eq!(file.seed, Some(7));
        assert_eq!(file.limits.global, 800);
        assert_eq!(file.limits.arabic, 900);
        assert_eq!(file.limits.english, 400);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "seed = 21\n").unwrap();
        let file = load_file(&path).unwrap();
        let config = RunConfig::from_parts(PathBuf::from("reviews.xlsx"), file);
        assert_eq!(config.seed, 21);
        assert_eq!(config.limits.global, 1000);
        assert_eq!(config.limits.arabic, 1000);
        assert_eq!(config.limits.english, 500);
        assert!(config.sheet.is_none());
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "seed = [not valid").unwrap();
        let err = load_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
