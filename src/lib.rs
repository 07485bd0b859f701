//! Vitality - wound, bleeding and consciousness simulation
//!
//! Converts damage events into wounds, advances wounds and circulation on
//! each scheduler tick, and reports what lifecycle state an entity should be
//! in. Strategies are loaded once from TOML and selected per entity kind.

pub mod anatomy;
pub mod condition;
pub mod core;
pub mod damage;
pub mod effects;
pub mod entity;
pub mod formula;
pub mod narrative;
pub mod severity;
pub mod simulation;
pub mod status;
pub mod strategy;
pub mod wounds;

pub use crate::core::error::{HealthError, Result};
pub use crate::core::types::{BodypartId, EntityId, ItemId, StrategyId, Tick, WoundId};
pub use damage::{DamageEvent, DamageType};
pub use entity::Entity;
pub use severity::SeverityTier;
pub use status::HealthVerdict;
pub use strategy::{EvalContext, HealthStrategy, StrategyKind, StrategyRegistry};
pub use wounds::{HealChannel, Outcome, Wound};
