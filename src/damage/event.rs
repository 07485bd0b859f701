//! Damage events as produced by combat and environment systems

use serde::{Deserialize, Serialize};

use super::DamageType;
use crate::core::error::{HealthError, Result};
use crate::core::types::{BodypartId, EntityId, ItemId};

/// A single instance of incoming harm. Transient; turned into wound
/// mutations by the damage applier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    pub damage: f64,
    pub pain: f64,
    pub stun: f64,
    pub damage_type: DamageType,
    /// `None` means the blow found nothing to hurt
    pub bodypart: Option<BodypartId>,
    /// Object that may lodge in the wound (arrow, bullet, tooth)
    pub lodgable: Option<ItemId>,
    pub actor: Option<EntityId>,
    pub tool: Option<ItemId>,
}

impl DamageEvent {
    pub fn new(damage_type: DamageType, damage: f64, bodypart: Option<BodypartId>) -> Self {
        Self {
            damage,
            pain: damage,
            stun: 0.0,
            damage_type,
            bodypart,
            lodgable: None,
            actor: None,
            tool: None,
        }
    }

    pub fn with_pain(mut self, pain: f64) -> Self {
        self.pain = pain;
        self
    }

    pub fn with_stun(mut self, stun: f64) -> Self {
        self.stun = stun;
        self
    }

    pub fn with_lodgable(mut self, item: ItemId) -> Self {
        self.lodgable = Some(item);
        self
    }

    pub fn with_origin(mut self, actor: Option<EntityId>, tool: Option<ItemId>) -> Self {
        self.actor = actor;
        self.tool = tool;
        self
    }

    /// Reject values that would poison wound accumulators
    pub fn validate(&self) -> Result<()> {
        for (field, value) in [
            ("damage", self.damage),
            ("pain", self.pain),
            ("stun", self.stun),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(HealthError::InvalidDamage { field, value });
            }
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.damage <= 0.0 && self.pain <= 0.0 && self.stun <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_rejected() {
        let event = DamageEvent::new(DamageType::Slashing, f64::NAN, None);
        assert!(matches!(
            event.validate(),
            Err(HealthError::InvalidDamage { field: "damage", .. })
        ));
    }

    #[test]
    fn test_infinite_stun_rejected() {
        let event = DamageEvent::new(DamageType::Crushing, 1.0, None).with_stun(f64::INFINITY);
        assert!(matches!(
            event.validate(),
            Err(HealthError::InvalidDamage { field: "stun", .. })
        ));
    }

    #[test]
    fn test_negative_pain_rejected() {
        let event = DamageEvent::new(DamageType::Crushing, 1.0, None).with_pain(-1.0);
        assert!(event.validate().is_err());
    }

    #[test]
    fn test_zero_event_is_empty() {
        let event = DamageEvent::new(DamageType::Slashing, 0.0, None);
        assert!(event.validate().is_ok());
        assert!(event.is_empty());
    }
}
