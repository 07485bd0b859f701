//! Tissue die-off from toxins in the blood, and organ-gated clearance

use super::constants::{ADDITIVE_CLEARANCE_PER_TICK, DEADLY_DIE_OFF_WEIGHT, DIE_OFF_PER_LITRE};
use crate::anatomy::OrganKind;
use crate::core::types::BodypartId;
use crate::damage::applier::apply_systemic;
use crate::damage::DamageType;
use crate::effects::AdditiveConsequence;
use crate::entity::Entity;

/// Cellular damage each non-brain organ takes this tick
pub fn die_off_amount(entity: &Entity) -> f64 {
    let effects = &entity.effects;
    let toxic = effects.additive_volume(AdditiveConsequence::Harmful)
        + DEADLY_DIE_OFF_WEIGHT * effects.additive_volume(AdditiveConsequence::Deadly)
        + effects.additive_volume(AdditiveConsequence::KidneyWaste);
    toxic * DIE_OFF_PER_LITRE
}

pub fn apply_die_off(entity: &mut Entity) -> f64 {
    let amount = die_off_amount(entity);
    if amount <= 0.0 {
        return 0.0;
    }
    let organs: Vec<BodypartId> = entity
        .body
        .organs()
        .filter(|(_, kind)| *kind != OrganKind::Brain)
        .map(|(part, _)| part.id)
        .collect();
    for organ in organs {
        apply_systemic(entity, organ, DamageType::Cellular, amount);
    }
    amount
}

/// Clear additives at a rate set by the function of the organ responsible
pub fn decay_additives(entity: &mut Entity) {
    let rates: Vec<f64> = entity
        .effects
        .additives
        .iter()
        .map(|a| ADDITIVE_CLEARANCE_PER_TICK * entity.organ_function(a.consequence.clearing_organ()))
        .collect();
    for (additive, rate) in entity.effects.additives.iter_mut().zip(rates) {
        additive.clear(rate);
    }
    entity.effects.additives.retain(|a| !a.is_spent());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::anatomy::BodyPlan;

    fn humanoid() -> Entity {
        Entity::new("Aldric", Arc::new(BodyPlan::humanoid()))
    }

    #[test]
    fn test_deadly_weighs_four_times() {
        let mut entity = humanoid();
        entity.effects.inject(AdditiveConsequence::Harmful, 0.1);
        entity.effects.inject(AdditiveConsequence::Deadly, 0.1);
        assert!((die_off_amount(&entity) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_die_off_spares_brain() {
        let mut entity = humanoid();
        entity.effects.inject(AdditiveConsequence::Harmful, 0.2);
        apply_die_off(&mut entity);
        let brain = entity.body.part_by_name("brain").unwrap().id;
        let heart = entity.body.part_by_name("heart").unwrap().id;
        assert_eq!(entity.part_damage(brain), 0.0);
        assert!((entity.part_damage(heart) - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_decay_removes_spent_additives() {
        let mut entity = humanoid();
        entity.effects.inject(AdditiveConsequence::Hydrating, 0.004);
        decay_additives(&mut entity);
        assert!(entity.effects.additives.is_empty());
    }

    #[test]
    fn test_failed_liver_stops_clearing_poison() {
        let mut entity = humanoid();
        let liver = entity.body.part_by_name("liver").unwrap().id;
        apply_systemic(&mut entity, liver, DamageType::Cellular, 30.0);
        entity.effects.inject(AdditiveConsequence::Harmful, 0.3);
        decay_additives(&mut entity);
        assert_eq!(entity.effects.additive_volume(AdditiveConsequence::Harmful), 0.3);
    }
}
