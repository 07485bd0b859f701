//! Oxygen starvation from a failing heart, blood loss, contaminated blood
//! and blocked breathing

use serde::{Deserialize, Serialize};

use super::constants::{
    BLOOD_HYPOXIA_EXPONENT, BLOOD_HYPOXIA_SCALE, CONTAMINATION_HYPOXIA_SCALE,
    HEART_HYPOXIA_FUNCTION, HYPOXIA_DAMAGE_PER_PRESSURE, SUFFOCATION_PRESSURE,
};
use crate::anatomy::OrganKind;
use crate::core::config::Thresholds;
use crate::core::types::BodypartId;
use crate::damage::applier::apply_systemic;
use crate::damage::DamageType;
use crate::effects::AdditiveConsequence;
use crate::entity::Entity;

/// Contributions to hypoxia pressure for one tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HypoxiaPressure {
    pub heart: f64,
    pub blood: f64,
    pub contamination: f64,
    pub suffocation: f64,
}

impl HypoxiaPressure {
    pub fn total(&self) -> f64 {
        self.heart + self.blood + self.contamination + self.suffocation
    }
}

pub fn hypoxia_pressure(entity: &Entity, thresholds: &Thresholds) -> HypoxiaPressure {
    let mut pressure = HypoxiaPressure::default();

    if entity.body.organs().any(|(_, k)| k == OrganKind::Heart) {
        let heart = entity.organ_function(OrganKind::Heart);
        if heart < HEART_HYPOXIA_FUNCTION {
            pressure.heart = (HEART_HYPOXIA_FUNCTION - heart) / HEART_HYPOXIA_FUNCTION;
        }
    }

    if entity.blood_capacity() > 0.0 {
        let ratio = entity.blood_ratio();
        let cutoff = thresholds.hypoxia_blood_ratio;
        if ratio < cutoff {
            let deficit = (cutoff - ratio) / cutoff;
            pressure.blood = BLOOD_HYPOXIA_SCALE * deficit.powf(BLOOD_HYPOXIA_EXPONENT);
        }

        let replacement = entity.additive_ratio(AdditiveConsequence::BloodReplacement);
        let hydration = entity.additive_ratio(AdditiveConsequence::Hydrating);
        let excess = (replacement - thresholds.replacement_hypoxia_ratio).max(0.0)
            + (hydration - thresholds.hydration_hypoxia_ratio).max(0.0);
        pressure.contamination = CONTAMINATION_HYPOXIA_SCALE * excess;
    }

    if entity.breath.is_suffocating() {
        pressure.suffocation = SUFFOCATION_PRESSURE;
    }

    pressure
}

/// Every organ takes hypoxia damage weighted by its own sensitivity
pub fn apply_hypoxia(entity: &mut Entity, pressure: f64) {
    if pressure <= 0.0 {
        return;
    }
    let targets: Vec<(BodypartId, f64)> = entity
        .body
        .organs()
        .map(|(part, _)| (part.id, part.hypoxia_sensitivity))
        .collect();
    for (organ, sensitivity) in targets {
        let damage = pressure * HYPOXIA_DAMAGE_PER_PRESSURE * sensitivity;
        apply_systemic(entity, organ, DamageType::Hypoxia, damage);
    }
}
