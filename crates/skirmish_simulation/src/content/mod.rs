//! Content registry: UnitTypeId → UnitType
//!
//! Явная именованная регистрация вместо позиционного lookup в глобальной content table.
//! Встроенные типы: dagger, titan. Дополнительные: из RON (`load_ron`).

use bevy::prelude::*;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::ai::UnitState;

pub mod unit_type;

pub use unit_type::{builtin, BodyStats, UnitType, UnitTypeId, WeaponSpec};

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("unknown unit type `{0}`")]
    UnknownUnitType(String),

    #[error("unit type `{0}` is already registered")]
    Duplicate(String),

    #[error("unit type `{id}` is invalid: {reason}")]
    Invalid { id: String, reason: String },

    #[error("failed to parse unit types: {0}")]
    Parse(#[from] ron::error::SpannedError),
}

/// Реестр типов юнитов (BTreeMap: детерминированный порядок `ids`)
#[derive(Resource, Debug, Clone, Default)]
pub struct UnitTypeRegistry {
    types: BTreeMap<UnitTypeId, UnitType>,
}

impl UnitTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for unit_type in builtin::all() {
            let id = unit_type.id.clone();
            if let Err(err) = registry.register(unit_type) {
                crate::logger::log_error(&format!("Content: builtin unit type `{}` rejected: {}", id, err));
            }
        }
        registry
    }

    pub fn register(&mut self, unit_type: UnitType) -> Result<(), ContentError> {
        validate(&unit_type)?;

        if self.types.contains_key(&unit_type.id) {
            return Err(ContentError::Duplicate(unit_type.id.to_string()));
        }

        crate::logger::log(&format!(
            "Content: registered unit type `{}` (health {}, weapon {})",
            unit_type.id, unit_type.health, unit_type.weapon.name
        ));
        self.types.insert(unit_type.id.clone(), unit_type);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Result<&UnitType, ContentError> {
        self.types
            .get(&UnitTypeId::from(id))
            .ok_or_else(|| ContentError::UnknownUnitType(id.to_string()))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.types.contains_key(&UnitTypeId::from(id))
    }

    pub fn ids(&self) -> impl Iterator<Item = &UnitTypeId> {
        self.types.keys()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Загрузить список типов из RON. Все или ничего: при ошибке реестр не меняется.
    pub fn load_ron(&mut self, source: &str) -> Result<usize, ContentError> {
        let unit_types: Vec<UnitType> = ron::from_str(source)?;

        let mut staged = self.clone();
        for unit_type in &unit_types {
            staged.register(unit_type.clone())?;
        }

        *self = staged;
        Ok(unit_types.len())
    }
}

fn validate(unit_type: &UnitType) -> Result<(), ContentError> {
    let invalid = |reason: &str| ContentError::Invalid {
        id: unit_type.id.to_string(),
        reason: reason.to_string(),
    };

    if unit_type.id.as_str().is_empty() {
        return Err(invalid("empty id"));
    }
    if !unit_type.health.is_finite() {
        return Err(invalid("health must be finite"));
    }
    if !unit_type.weapon.range.is_finite() || unit_type.weapon.range < 0.0 {
        return Err(invalid("weapon range must be finite and non-negative"));
    }
    if unit_type.start_state == UnitState::Dead {
        return Err(invalid("start state cannot be dead"));
    }
    Ok(())
}
