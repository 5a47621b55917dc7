//! Run configuration: shot count, RNG seed, and optional noise.
//!
//! Loaded from JSON with [`RunConfig::from_json`]; the binary merges its
//! command-line flags over whatever the file provides.
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::backend::StateVectorBackend;
use crate::core::NoiseChannel;
use crate::error::ConfigError;

/// Shot count used when none is configured.
pub const DEFAULT_SHOTS: u64 = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Number of circuit executions.
    pub shots: u64,
    /// Seed for reproducible sampling; `None` draws from OS entropy.
    pub seed: Option<u64>,
    /// Channel applied after every gate.
    pub noise: Option<NoiseChannel>,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig { shots: DEFAULT_SHOTS, seed: None, noise: None }
    }
}

impl RunConfig {
    /// Load and validate a configuration from a JSON file.
    pub fn from_json(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        let cfg: RunConfig = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Write this configuration as pretty-printed JSON, creating parent
    /// directories if necessary.
    pub fn to_json(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::FileRead {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::invalid_value("(serialization)", e.to_string()))?;
        std::fs::write(path, json).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shots == 0 {
            return Err(ConfigError::invalid_value("shots", "must be > 0"));
        }
        if let Some(channel) = self.noise {
            channel
                .validate()
                .map_err(|e| ConfigError::invalid_value("noise", format!("{channel}: {e}")))?;
        }
        Ok(())
    }

    /// Backend described by this configuration.
    pub fn backend(&self) -> StateVectorBackend {
        let mut backend = StateVectorBackend::new();
        if let Some(seed) = self.seed {
            backend = backend.with_seed(seed);
        }
        if let Some(channel) = self.noise {
            backend = backend.with_noise(channel);
        }
        backend
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Backend;
    use tempfile::tempdir;

    #[test]
    fn default_config_is_valid() {
        let cfg = RunConfig::default();
        assert_eq!(cfg.shots, 100);
        cfg.validate().expect("default config should be valid");
    }

    #[test]
    fn json_round_trip() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("nested").join("run.json");

        let original = RunConfig {
            shots: 512,
            seed: Some(7),
            noise: Some(NoiseChannel::Depolarizing { prob: 0.01 }),
        };
        original.to_json(&path).expect("serialization should succeed");
        let loaded = RunConfig::from_json(&path).expect("deserialization should succeed");
        assert_eq!(loaded, original);
    }

    #[test]
    fn missing_fields_take_defaults() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("run.json");
        std::fs::write(&path, r#"{"seed": 3}"#).unwrap();
        let cfg = RunConfig::from_json(&path).unwrap();
        assert_eq!(cfg.shots, DEFAULT_SHOTS);
        assert_eq!(cfg.seed, Some(3));
        assert!(cfg.noise.is_none());
    }

    #[test]
    fn zero_shots_rejected() {
        let cfg = RunConfig { shots: 0, ..RunConfig::default() };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidValue { field: "shots", .. })));
    }

    #[test]
    fn out_of_range_noise_rejected() {
        let cfg = RunConfig {
            noise: Some(NoiseChannel::AmplitudeDamping { gamma: 1.5 }),
            ..RunConfig::default()
        };
        assert!(matches!(cfg.validate(), Err(ConfigError::InvalidValue { field: "noise", .. })));
    }

    #[test]
    fn noise_rejection_carries_channel_reason() {
        let cfg = RunConfig {
            noise: Some(NoiseChannel::BitFlip { prob: -0.1 }),
            ..RunConfig::default()
        };
        let err = cfg.validate().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid value for `noise`: bit-flip(p=-0.1): noise probability -0.1 is outside [0, 1]"
        );
    }

    #[test]
    fn missing_file_is_file_read_error() {
        let tmp = tempdir().unwrap();
        let err = RunConfig::from_json(&tmp.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, ConfigError::FileRead { .. }));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let tmp = tempdir().unwrap();
        let path = tmp.path().join("bad.json");
        std::fs::write(&path, "{ shots: ").unwrap();
        assert!(matches!(RunConfig::from_json(&path), Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn backend_carries_seed_and_noise() {
        let cfg = RunConfig {
            shots: 10,
            seed: Some(11),
            noise: Some(NoiseChannel::BitFlip { prob: 0.1 }),
        };
        let backend = cfg.backend();
        assert_eq!(backend.seed(), Some(11));
        assert_eq!(backend.name(), "statevector-noisy");
    }
}
