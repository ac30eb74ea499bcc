//! UnitType: неизменяемый blueprint юнита

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::ai::UnitState;
use crate::components::{Health, Team, Unit};

/// Стабильный строковый id типа (вместо позиционного индекса в content table)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitTypeId(String);

impl UnitTypeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for UnitTypeId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for UnitTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Физические статы (копируются в юнит, движение вне scope)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyStats {
    pub max_velocity: f32,
    pub speed: f32,
    pub drag: f32,
    pub hitsize: f32,
    pub mass: f32,
}

/// Оружие: range используется target oracle, length: вынос ствола
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeaponSpec {
    pub name: String,
    pub length: f32,
    pub range: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnitType {
    pub id: UnitTypeId,
    pub body: BodyStats,
    /// Базовое здоровье (= max_health экземпляра)
    pub health: f32,
    pub weapon: WeaponSpec,
    #[serde(default)]
    pub start_state: UnitState,
}

impl UnitType {
    /// Factory: свежий detached юнит для команды
    pub fn create(&self, team: Team) -> Unit {
        Unit::new(
            self.id.clone(),
            team,
            Health::new(self.health),
            self.body,
            self.weapon.clone(),
            self.start_state,
        )
    }
}

/// Встроенные архетипы
pub mod builtin {
    use super::*;

    pub const DAGGER: &str = "dagger";
    pub const TITAN: &str = "titan";

    pub fn dagger() -> UnitType {
        UnitType {
            id: UnitTypeId::new(DAGGER),
            body: BodyStats {
                max_velocity: 1.1,
                speed: 0.2,
                drag: 0.4,
                hitsize: 8.0,
                mass: 1.75,
            },
            health: 130.0,
            weapon: WeaponSpec {
                name: "chain-blaster".to_string(),
                length: 1.5,
                range: 100.0,
            },
            start_state: UnitState::Attack,
        }
    }

    pub fn titan() -> UnitType {
        UnitType {
            id: UnitTypeId::new(TITAN),
            body: BodyStats {
                max_velocity: 0.8,
                speed: 0.22,
                drag: 0.4,
                hitsize: 9.0,
                mass: 3.5,
            },
            health: 460.0,
            weapon: WeaponSpec {
                name: "flamethrower".to_string(),
                length: 1.0,
                range: 70.0,
            },
            start_state: UnitState::Attack,
        }
    }

    pub fn all() -> Vec<UnitType> {
        vec![dagger(), titan()]
    }
}
