//! Lifecycle verdicts: a pure decision ladder over wounds, organs and effects
//!
//! Rungs are checked top to bottom and the first match wins. The order is
//! load-bearing: a dead brain outranks a stopped heart, and an imposed
//! consciousness effect outranks pain and stun.

use serde::{Deserialize, Serialize};

use crate::anatomy::OrganKind;
use crate::effects::Marker;
use crate::entity::Entity;
use crate::strategy::{EvalContext, HealthStrategy, StrategyKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthVerdict {
    #[default]
    None,
    Unconscious,
    PassOut,
    Paralyzed,
    Dead,
}

impl HealthVerdict {
    /// The caller should stop ticking this entity
    pub fn ends_processing(&self) -> bool {
        *self == HealthVerdict::Dead
    }
}

/// Heart function at which the heart is considered stopped
pub fn heart_stopped(function: f64) -> bool {
    function <= 0.0
}

/// Power core function at which a machine shuts down
pub fn power_failed(function: f64) -> bool {
    function <= 0.0
}

/// A vital organ the body actually has and that no longer works
fn organ_destroyed(entity: &Entity, kind: OrganKind) -> bool {
    entity.body.organs().any(|(_, k)| k == kind) && entity.organ_function(kind) <= 0.0
}

pub(crate) fn heart_has_stopped(entity: &Entity) -> bool {
    entity.body.organs().any(|(_, k)| k == OrganKind::Heart)
        && heart_stopped(entity.organ_function(OrganKind::Heart))
}

pub(crate) fn power_has_failed(entity: &Entity) -> bool {
    entity.body.organs().any(|(_, k)| k == OrganKind::PowerCore)
        && power_failed(entity.organ_function(OrganKind::PowerCore))
}

pub fn evaluate(strategy: &HealthStrategy, entity: &Entity, ctx: EvalContext<'_>) -> HealthVerdict {
    if entity.dead {
        return HealthVerdict::Dead;
    }

    match &strategy.kind {
        StrategyKind::Inanimate => {
            if damage_is_lethal(strategy, entity, ctx) {
                return HealthVerdict::Dead;
            }
            HealthVerdict::None
        }
        StrategyKind::Construct(_) => {
            if damage_is_lethal(strategy, entity, ctx) {
                return HealthVerdict::Dead;
            }
            imposed(entity, ctx).unwrap_or_default()
        }
        StrategyKind::Robot(_) => evaluate_robot(strategy, entity, ctx),
        StrategyKind::Organic(_) => evaluate_organic(strategy, entity, ctx),
    }
}

fn evaluate_organic(strategy: &HealthStrategy, entity: &Entity, ctx: EvalContext<'_>) -> HealthVerdict {
    let thresholds = &strategy.thresholds;

    if organ_destroyed(entity, OrganKind::Brain) {
        return HealthVerdict::Dead;
    }
    if damage_is_lethal(strategy, entity, ctx) {
        return HealthVerdict::Dead;
    }
    if entity.blood_capacity() > 0.0 && entity.blood_ratio() <= thresholds.blood_death_ratio {
        return HealthVerdict::Dead;
    }
    if let Some(verdict) = imposed(entity, ctx) {
        return verdict;
    }
    if heart_has_stopped(entity) {
        return HealthVerdict::Unconscious;
    }

    let prevent_pass_out = entity.effects.has_marker(Marker::PreventPassOut, ctx.tick);
    if !prevent_pass_out {
        let max_pain = strategy.max_pain(entity, ctx);
        let pain = entity.effects.effective_pain(entity.total_pain(), ctx.tick);
        if max_pain > 0.0 && pain >= max_pain {
            return HealthVerdict::PassOut;
        }
        if stunned(strategy, entity, ctx) {
            return HealthVerdict::Unconscious;
        }
    }

    let anesthesia = entity.effects.anesthesia(ctx.tick);
    if anesthesia > thresholds.anesthesia_lethal {
        return HealthVerdict::Dead;
    }
    if anesthesia > thresholds.anesthesia_unconscious {
        return HealthVerdict::Unconscious;
    }

    HealthVerdict::None
}

fn evaluate_robot(strategy: &HealthStrategy, entity: &Entity, ctx: EvalContext<'_>) -> HealthVerdict {
    if organ_destroyed(entity, OrganKind::Brain) {
        return HealthVerdict::Dead;
    }
    if damage_is_lethal(strategy, entity, ctx) {
        return HealthVerdict::Dead;
    }
    if let Some(verdict) = imposed(entity, ctx) {
        return verdict;
    }
    if power_has_failed(entity) {
        return HealthVerdict::Unconscious;
    }
    if !entity.effects.has_marker(Marker::PreventPassOut, ctx.tick) && stunned(strategy, entity, ctx) {
        return HealthVerdict::Unconscious;
    }
    if entity.blood_capacity() > 0.0
        && entity.blood_ratio() <= strategy.thresholds.hydraulic_paralysis_ratio
    {
        return HealthVerdict::Paralyzed;
    }
    HealthVerdict::None
}

fn damage_is_lethal(strategy: &HealthStrategy, entity: &Entity, ctx: EvalContext<'_>) -> bool {
    let max_hp = strategy.max_hp(entity, ctx);
    max_hp > 0.0 && entity.total_damage() >= max_hp * strategy.thresholds.max_hp_grace
}

fn stunned(strategy: &HealthStrategy, entity: &Entity, ctx: EvalContext<'_>) -> bool {
    let max_stun = strategy.max_stun(entity, ctx);
    max_stun > 0.0 && entity.total_stun() >= max_stun
}

fn imposed(entity: &Entity, ctx: EvalContext<'_>) -> Option<HealthVerdict> {
    entity.effects.consciousness_verdict(ctx.tick)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::anatomy::BodyPlan;
    use crate::core::types::BodypartId;
    use crate::damage::applier::apply_systemic;
    use crate::damage::DamageType;
    use crate::effects::{Anesthetic, ConsciousnessEffect};
    use crate::strategy::testing;

    fn humanoid() -> Entity {
        Entity::new("Aldric", Arc::new(BodyPlan::humanoid()))
    }

    fn part(entity: &Entity, name: &str) -> BodypartId {
        entity.body.part_by_name(name).unwrap().id
    }

    fn verdict(strategy: &HealthStrategy, entity: &Entity) -> HealthVerdict {
        evaluate(strategy, entity, EvalContext::at(0))
    }

    #[test]
    fn test_dead_flag_wins_for_every_kind() {
        let mut entity = humanoid();
        entity.dead = true;
        for strategy in [
            testing::organic(),
            testing::robot(),
            testing::construct(),
            testing::inanimate(),
        ] {
            assert_eq!(verdict(&strategy, &entity), HealthVerdict::Dead);
        }
    }

    #[test]
    fn test_dead_brain_outranks_stopped_heart() {
        let strategy = testing::organic();
        let mut entity = humanoid();
        let heart = part(&entity, "heart");
        apply_systemic(&mut entity, heart, DamageType::Cellular, 30.0);
        assert_eq!(verdict(&strategy, &entity), HealthVerdict::Unconscious);
        let brain = part(&entity, "brain");
        apply_systemic(&mut entity, brain, DamageType::Hypoxia, 20.0);
        assert_eq!(verdict(&strategy, &entity), HealthVerdict::Dead);
    }

    #[test]
    fn test_imposed_verdict_outranks_pain() {
        let strategy = testing::organic();
        let mut entity = humanoid();
        let torso = part(&entity, "torso");
        apply_systemic(&mut entity, torso, DamageType::Cellular, 5.0);
        entity.wound_mut(entity.wounds()[0].id).unwrap().current_pain = 500.0;
        assert_eq!(verdict(&strategy, &entity), HealthVerdict::PassOut);
        entity.effects.add_consciousness(
            ConsciousnessEffect {
                verdict: HealthVerdict::Paralyzed,
                source: "venom".to_string(),
            },
            None,
        );
        assert_eq!(verdict(&strategy, &entity), HealthVerdict::Paralyzed);
    }

    #[test]
    fn test_stun_knocks_out_unless_prevented() {
        let strategy = testing::organic();
        let mut entity = humanoid();
        let torso = part(&entity, "torso");
        apply_systemic(&mut entity, torso, DamageType::Cellular, 1.0);
        entity.wound_mut(entity.wounds()[0].id).unwrap().current_stun = 100.0;
        assert_eq!(verdict(&strategy, &entity), HealthVerdict::Unconscious);
        entity.effects.add_marker(Marker::PreventPassOut, None);
        assert_eq!(verdict(&strategy, &entity), HealthVerdict::None);
    }

    #[test]
    fn test_anesthesia_cutoffs() {
        let strategy = testing::organic();
        let mut entity = humanoid();
        entity.effects.add_anesthetic(Anesthetic { intensity: 2.0 }, None);
        assert_eq!(verdict(&strategy, &entity), HealthVerdict::None);
        entity.effects.add_anesthetic(Anesthetic { intensity: 0.5 }, None);
        assert_eq!(verdict(&strategy, &entity), HealthVerdict::Unconscious);
        entity.effects.add_anesthetic(Anesthetic { intensity: 50.0 }, None);
        assert_eq!(verdict(&strategy, &entity), HealthVerdict::Dead);
    }

    #[test]
    fn test_robot_ladder() {
        let strategy = testing::robot();
        let mut entity = Entity::new("R-7", Arc::new(BodyPlan::android()));
        assert_eq!(verdict(&strategy, &entity), HealthVerdict::None);

        entity.blood.current = 0.75;
        assert_eq!(verdict(&strategy, &entity), HealthVerdict::Paralyzed);

        let core = part(&entity, "power core");
        let id = entity.allocate_wound_id();
        entity.push_wound(crate::wounds::Wound::new(
            id,
            entity.id,
            Some(core),
            crate::wounds::WoundKind::Mechanical,
            DamageType::Electrical,
            crate::wounds::Harm::damage_only(40.0),
        ));
        assert_eq!(verdict(&strategy, &entity), HealthVerdict::Unconscious);
    }

    #[test]
    fn test_construct_ignores_pain_and_blood() {
        let strategy = testing::construct();
        let mut entity = humanoid();
        entity.blood.current = 0.0;
        assert_eq!(verdict(&strategy, &entity), HealthVerdict::None);
    }

    #[test]
    fn test_only_dead_ends_processing() {
        assert!(HealthVerdict::Dead.ends_processing());
        assert!(!HealthVerdict::Unconscious.ends_processing());
        assert!(!HealthVerdict::None.ends_processing());
    }

    #[test]
    fn test_stopped_predicates_share_cutoff() {
        assert!(heart_stopped(0.0));
        assert!(!heart_stopped(0.01));
        assert!(power_failed(-0.5));
        assert!(!power_failed(0.2));
    }
}
