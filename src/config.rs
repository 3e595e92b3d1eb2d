use std::path::PathBuf;

use figment::{providers::Env, Figment};
use serde::Deserialize;

use crate::entity::player::Steering;
use crate::error::ConfigError;

/// The prefix every configuration variable carries, e.g. `ZOMBIE_RACE_SEED`.
pub const ENV_PREFIX: &str = "ZOMBIE_RACE_";

/// Runtime configuration, read from the environment.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    /// Seed for the world generator. The same seed always builds the same track.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Window pixels per LCD pixel in the desktop emulator.
    #[serde(default = "default_scale")]
    pub scale: u32,
    /// Serial device to send telemetry frames to. Telemetry is off when unset.
    #[serde(default)]
    pub serial: Option<PathBuf>,
    #[serde(default)]
    pub steering: Steering,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            scale: default_scale(),
            serial: None,
            steering: Steering::default(),
        }
    }
}

fn default_seed() -> u64 {
    100
}

fn default_scale() -> u32 {
    8
}

impl Config {
    /// Extracts the configuration from any figment, validating it.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Config = figment.extract().map_err(Box::new)?;
        if config.scale == 0 {
            return Err(ConfigError::Invalid(Box::new(figment::Error::from(
                "scale must be at least 1".to_string(),
            ))));
        }
        Ok(config)
    }
}

/// Loads the configuration from `ZOMBIE_RACE_*` environment variables.
pub fn load_config() -> Result<Config, ConfigError> {
    Config::from_figment(Figment::new().merge(Env::prefixed(ENV_PREFIX)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::from_figment(Figment::new()).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.seed, 100);
        assert_eq!(config.steering, Steering::SpeedScaled);
    }

    #[test]
    fn test_overrides() {
        let figment = Figment::new()
            .merge(("seed", 7))
            .merge(("steering", "fixed-unit"))
            .merge(("serial", "/dev/ttyACM0"));
        let config = Config::from_figment(figment).unwrap();
        assert_eq!(config.seed, 7);
        assert_eq!(config.steering, Steering::FixedUnit);
        assert_eq!(config.serial, Some(PathBuf::from("/dev/ttyACM0")));
        assert_eq!(config.scale, 8);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Config::from_figment(Figment::new().merge(("steering", "sideways"))).is_err());
        assert!(Config::from_figment(Figment::new().merge(("scale", 0))).is_err());
    }
}
