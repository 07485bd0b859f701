//! Physiological state the health engine reads and writes on an entity

use serde::{Deserialize, Serialize};

use crate::simulation::constants::BREATH_RECOVERY_PER_TICK;

/// Circulating fluid and blood pooled where it should not be
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BloodState {
    /// Litres in circulation, excluding additives
    pub current: f64,
    /// Litres pooled in the lungs and trachea
    pub airway_pool: f64,
    /// Litres pooled in the stomach and gut
    pub digestive_pool: f64,
}

impl BloodState {
    pub fn full(capacity: f64) -> Self {
        Self {
            current: capacity,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreathState {
    pub needs_to_breathe: bool,
    /// False when strangled, in vacuum, or the airway is crushed
    pub can_breathe: bool,
    pub submerged: bool,
    /// Ticks the breath has been held
    pub held_ticks: u32,
    /// Ticks before suffocation starts doing harm
    pub max_held_ticks: u32,
}

impl Default for BreathState {
    fn default() -> Self {
        Self {
            needs_to_breathe: true,
            can_breathe: true,
            submerged: false,
            held_ticks: 0,
            max_held_ticks: 30,
        }
    }
}

impl BreathState {
    pub fn not_breathing() -> Self {
        Self {
            needs_to_breathe: false,
            ..Self::default()
        }
    }

    pub fn is_blocked(&self) -> bool {
        self.needs_to_breathe && (!self.can_breathe || self.submerged)
    }

    pub fn is_suffocating(&self) -> bool {
        self.is_blocked() && self.held_ticks > self.max_held_ticks
    }

    /// 0.0 = fresh lungs, 1.0 = out of held breath
    pub fn held_ratio(&self) -> f64 {
        if self.max_held_ticks == 0 {
            return if self.held_ticks > 0 { 1.0 } else { 0.0 };
        }
        (self.held_ticks as f64 / self.max_held_ticks as f64).min(1.0)
    }

    /// Advance breath holding by one tick
    pub fn advance(&mut self) {
        if self.is_blocked() {
            self.held_ticks = self.held_ticks.saturating_add(1);
        } else {
            self.held_ticks = self.held_ticks.saturating_sub(BREATH_RECOVERY_PER_TICK);
        }
    }
}

/// How hard the entity is working; drives bleed rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExertionLevel {
    /// Suspended animation; nothing bleeds
    Stasis,
    Rest,
    Low,
    #[default]
    Normal,
    Heavy,
    VeryHeavy,
    Extreme,
}

impl ExertionLevel {
    pub fn bleed_multiplier(&self) -> f64 {
        match self {
            ExertionLevel::Stasis => 0.0,
            ExertionLevel::Rest => 0.8,
            ExertionLevel::Low => 0.9,
            ExertionLevel::Normal => 1.0,
            ExertionLevel::Heavy => 1.25,
            ExertionLevel::VeryHeavy => 1.5,
            ExertionLevel::Extreme => 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_held_breath_accumulates_when_blocked() {
        let mut breath = BreathState {
            submerged: true,
            ..BreathState::default()
        };
        for _ in 0..31 {
            breath.advance();
        }
        assert_eq!(breath.held_ticks, 31);
        assert!(breath.is_suffocating());
    }

    #[test]
    fn test_breath_recovers() {
        let mut breath = BreathState {
            held_ticks: 10,
            ..BreathState::default()
        };
        breath.advance();
        assert_eq!(breath.held_ticks, 7);
        assert!(!breath.is_suffocating());
    }

    #[test]
    fn test_non_breathers_never_suffocate() {
        let mut breath = BreathState {
            submerged: true,
            ..BreathState::not_breathing()
        };
        for _ in 0..100 {
            breath.advance();
        }
        assert_eq!(breath.held_ticks, 0);
    }

    #[test]
    fn test_stasis_stops_bleeding() {
        assert_eq!(ExertionLevel::Stasis.bleed_multiplier(), 0.0);
        assert!(ExertionLevel::Extreme.bleed_multiplier() > ExertionLevel::Rest.bleed_multiplier());
    }
}
