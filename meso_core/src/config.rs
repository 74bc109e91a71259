//! Configuration file support for Mesoplan.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/mesoplan/config.toml`.
//! These are planning policy knobs, not per-cycle data: per-cycle data
//! arrives through [`crate::mesocycle::PlanningInputs`].

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Planning engine configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct PlanningConfig {
    #[serde(default)]
    pub volume: VolumeConfig,

    #[serde(default)]
    pub progression: ProgressionConfig,
}

/// Volume seeding configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VolumeConfig {
    /// Sets per exercise for a week with no usable history.
    #[serde(default = "default_seed_sets")]
    pub seed_sets: u32,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self {
            seed_sets: default_seed_sets(),
        }
    }
}

/// Progression parameters configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProgressionConfig {
    /// Target reps-in-reserve stamped on deload sets.
    #[serde(default = "default_deload_rir")]
    pub deload_rir: u32,
}

impl Default for ProgressionConfig {
    fn default() -> Self {
        Self {
            deload_rir: default_deload_rir(),
        }
    }
}

// Default value functions
fn default_seed_sets() -> u32 {
    2
}

fn default_deload_rir() -> u32 {
    4
}

impl PlanningConfig {
    /// Load configuration from the standard config path
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: PlanningConfig = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        let base = dirs::config_dir().unwrap_or_else(|| {
            let home = std::env::var("HOME")
                .expect("HOME environment variable not set");
            PathBuf::from(home).join(".config")
        });
        base.join("mesoplan").join("config.toml")
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = PlanningConfig::default();
        assert_eq!(config.volume.seed_sets, 2);
        assert_eq!(config.progression.deload_rir, 4);
    }

    #[test]
    fn test_config_roundtrip() {
        let config = PlanningConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let parsed: PlanningConfig = toml::from_str(&toml_str).unwrap();

        assert_eq!(config.volume.seed_sets, parsed.volume.seed_sets);
        assert_eq!(config.progression.deload_rir, parsed.progression.deload_rir);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[volume]
seed_sets = 3
"#;
        let config: PlanningConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.volume.seed_sets, 3);
        assert_eq!(config.progression.deload_rir, 4); // default
    }

    #[test]
    fn test_save_and_reload() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");

        let mut config = PlanningConfig::default();
        config.progression.deload_rir = 3;
        config.save_to(&path).unwrap();

        let reloaded = PlanningConfig::load_from(&path).unwrap();
        assert_eq!(reloaded.progression.deload_rir, 3);
    }
}
