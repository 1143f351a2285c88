use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::pet::STAT_MAX;

pub const CONFIG_ENV_VAR: &str = "PETSTAGE_CONFIG";
pub const SEED_ENV_VAR: &str = "PETSTAGE_SEED";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config json at {json_path}: {source}")]
    Parse {
        json_path: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid config value {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
    #[error("environment variable {var} has invalid value {value:?}")]
    EnvVar { var: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialStats {
    pub hunger: u8,
    pub cleanliness: u8,
    pub happiness: u8,
    pub energy: u8,
}

impl Default for InitialStats {
    fn default() -> Self {
        Self {
            hunger: 50,
            cleanliness: 100,
            happiness: 50,
            energy: 100,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PetConfig {
    pub seed: u64,
    pub initial_stats: InitialStats,
    pub needs_check_interval_ms: u64,
    pub decay_interval_ms: u64,
    pub food_spawn_interval_ms: u64,
    pub waste_spawn_interval_ms: u64,
    pub food_lifetime_ms: u64,
    pub fade_out_ms: u64,
    pub collect_delay_ms: u64,
    pub reaction_ms: u64,
    pub speech_ms: u64,
    pub sleep_seconds: u32,
    pub sleep_tick_ms: u64,
    pub max_food_items: usize,
    pub spawn_margin_px: f32,
}

impl Default for PetConfig {
    fn default() -> Self {
        Self {
            seed: 0x5EED_CAFE,
            initial_stats: InitialStats::default(),
            needs_check_interval_ms: 5_000,
            decay_interval_ms: 10_000,
            food_spawn_interval_ms: 20_000,
            waste_spawn_interval_ms: 180_000,
            food_lifetime_ms: 5_000,
            fade_out_ms: 500,
            collect_delay_ms: 300,
            reaction_ms: 1_500,
            speech_ms: 3_000,
            sleep_seconds: 30,
            sleep_tick_ms: 1_000,
            max_food_items: 5,
            spawn_margin_px: 20.0,
        }
    }
}

impl PetConfig {
    pub fn needs_check_interval(&self) -> Duration {
        Duration::from_millis(self.needs_check_interval_ms)
    }

    pub fn decay_interval(&self) -> Duration {
        Duration::from_millis(self.decay_interval_ms)
    }

    pub fn food_spawn_interval(&self) -> Duration {
        Duration::from_millis(self.food_spawn_interval_ms)
    }

    pub fn waste_spawn_interval(&self) -> Duration {
        Duration::from_millis(self.waste_spawn_interval_ms)
    }

    pub fn food_lifetime(&self) -> Duration {
        Duration::from_millis(self.food_lifetime_ms)
    }

    pub fn fade_out(&self) -> Duration {
        Duration::from_millis(self.fade_out_ms)
    }

    pub fn collect_delay(&self) -> Duration {
        Duration::from_millis(self.collect_delay_ms)
    }

    pub fn reaction(&self) -> Duration {
        Duration::from_millis(self.reaction_ms)
    }

    pub fn speech(&self) -> Duration {
        Duration::from_millis(self.speech_ms)
    }

    pub fn sleep_tick(&self) -> Duration {
        Duration::from_millis(self.sleep_tick_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub drag_threshold_px: f32,
    pub hold_to_drag_ms: u64,
    pub color_picker_radius: u32,
    pub color_poll_interval_ms: u64,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            drag_threshold_px: 3.0,
            hold_to_drag_ms: 400,
            color_picker_radius: 20,
            color_poll_interval_ms: 30,
        }
    }
}

impl InputConfig {
    pub fn hold_to_drag(&self) -> Duration {
        Duration::from_millis(self.hold_to_drag_ms)
    }

    pub fn color_poll_interval(&self) -> Duration {
        Duration::from_millis(self.color_poll_interval_ms)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageConfig {
    pub pet: PetConfig,
    pub input: InputConfig,
}

impl StageConfig {
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let mut deserializer = serde_json::Deserializer::from_str(raw);
        let config: StageConfig = serde_path_to_error::deserialize(&mut deserializer).map_err(
            |error| {
                let json_path = error.path().to_string();
                ConfigError::Parse {
                    json_path,
                    source: error.into_inner(),
                }
            },
        )?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Defaults, overlaid by the file named in `PETSTAGE_CONFIG` and then by
    /// `PETSTAGE_SEED`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => {
                let path = PathBuf::from(path.trim());
                info!(path = %path.display(), "config_file_selected");
                Self::load_from_path(&path)?
            }
            _ => Self::default(),
        };

        if let Ok(raw) = env::var(SEED_ENV_VAR) {
            config.pet.seed = parse_seed(&raw).ok_or(ConfigError::EnvVar {
                var: SEED_ENV_VAR,
                value: raw,
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let pet = &self.pet;
        let periods = [
            ("pet.needs_check_interval_ms", pet.needs_check_interval_ms),
            ("pet.decay_interval_ms", pet.decay_interval_ms),
            ("pet.food_spawn_interval_ms", pet.food_spawn_interval_ms),
            ("pet.waste_spawn_interval_ms", pet.waste_spawn_interval_ms),
            ("pet.sleep_tick_ms", pet.sleep_tick_ms),
            ("input.color_poll_interval_ms", self.input.color_poll_interval_ms),
        ];
        for (field, value) in periods {
            if value == 0 {
                return Err(invalid(field, "period must be greater than zero"));
            }
        }

        if pet.max_food_items == 0 {
            return Err(invalid("pet.max_food_items", "must allow at least one item"));
        }
        if !pet.spawn_margin_px.is_finite() || pet.spawn_margin_px < 0.0 {
            return Err(invalid("pet.spawn_margin_px", "must be a finite, non-negative number"));
        }

        let stats = pet.initial_stats;
        let initial = [
            ("pet.initial_stats.hunger", stats.hunger),
            ("pet.initial_stats.cleanliness", stats.cleanliness),
            ("pet.initial_stats.happiness", stats.happiness),
            ("pet.initial_stats.energy", stats.energy),
        ];
        for (field, value) in initial {
            if value > STAT_MAX {
                return Err(invalid(field, format!("expected 0..={STAT_MAX}, got {value}")));
            }
        }

        let threshold = self.input.drag_threshold_px;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(invalid(
                "input.drag_threshold_px",
                "must be a finite, non-negative number",
            ));
        }

        Ok(())
    }
}

fn invalid(field: &'static str, message: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        message: message.into(),
    }
}

fn parse_seed(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("0x") {
        Some(hex) => u64::from_str_radix(hex, 16).ok(),
        None => trimmed.parse().ok(),
    }
}
