//! Simulation config (RON)

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::logger::LogLevel;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    #[error("fixed_hz must be finite and positive, got {0}")]
    InvalidTickRate(f32),
}

/// Параметры симуляции
#[derive(Resource, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Частота тика для `step()` (Hz)
    pub fixed_hz: f32,
    /// Минимальный уровень логов
    pub log_level: LogLevel,
    /// Убирать мёртвых из live-группы в конце тика
    pub retire_dead: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            fixed_hz: 60.0,
            log_level: LogLevel::Info,
            retire_dead: true,
        }
    }
}

impl SimulationConfig {
    pub fn from_ron_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = ron::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.fixed_hz.is_finite() || self.fixed_hz <= 0.0 {
            return Err(ConfigError::InvalidTickRate(self.fixed_hz));
        }
        Ok(())
    }

    /// Delta одного тика (секунды)
    pub fn fixed_delta(&self) -> f32 {
        1.0 / self.fixed_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.fixed_hz, 60.0);
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.retire_dead);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_ron_uses_defaults() {
        let config = SimulationConfig::from_ron_str("(fixed_hz: 30.0, log_level: Debug)").unwrap();
        assert_eq!(config.fixed_hz, 30.0);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(config.retire_dead);
        assert!((config.fixed_delta() - 1.0 / 30.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_invalid_tick_rate() {
        let err = SimulationConfig::from_ron_str("(fixed_hz: 0.0)").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidTickRate(hz) if hz == 0.0));
    }

    #[test]
    fn test_parse_error() {
        let err = SimulationConfig::from_ron_str("(fixed_hz: ").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
