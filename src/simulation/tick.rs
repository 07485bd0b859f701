//! Per-entity health tick
//!
//! Organic order: bleeding -> death bookkeeping -> hypoxia -> die-off ->
//! status. Machines only leak fluid; objects only prune effects.

use rand::RngCore;

use super::bleeding::{bleed_internally, bleed_wounds, still_bleeding};
use super::contamination::{apply_die_off, decay_additives};
use super::hypoxia::{apply_hypoxia, hypoxia_pressure};
use super::TickReport;
use crate::entity::{Entity, ExertionLevel};
use crate::narrative::NarrativeSink;
use crate::status::{self, HealthVerdict};
use crate::strategy::{EvalContext, HealthStrategy, StrategyKind};
use crate::wounds::BleedStatus;

pub fn perform_health_tick(
    strategy: &HealthStrategy,
    entity: &mut Entity,
    ctx: EvalContext<'_>,
    rng: &mut dyn RngCore,
    narrative: &mut dyn NarrativeSink,
) -> TickReport {
    entity.effects.prune_expired(ctx.tick);

    let mut report = TickReport::default();
    let finished = match &strategy.kind {
        StrategyKind::Organic(_) => organic_tick(strategy, entity, ctx, rng, &mut report),
        StrategyKind::Robot(_) => robot_tick(strategy, entity, ctx, &mut report),
        StrategyKind::Construct(_) | StrategyKind::Inanimate => false,
    };
    if !finished {
        report.verdict = status::evaluate(strategy, entity, ctx);
    }

    for event in &report.narrative_events {
        if let Err(e) = narrative.emit(entity.id, event.clone()) {
            tracing::warn!("{}: narrative dropped: {}", entity.name, e);
        }
    }
    report
}

/// Returns true when the tick ended early with a Dead verdict
fn organic_tick(
    strategy: &HealthStrategy,
    entity: &mut Entity,
    ctx: EvalContext<'_>,
    rng: &mut dyn RngCore,
    report: &mut TickReport,
) -> bool {
    if entity.effective_blood_volume() > 0.0 && entity.exertion != ExertionLevel::Stasis {
        report.blood_lost =
            bleed_wounds(strategy, entity, ctx.tick, &mut report.narrative_events);
        report.internal_blood_lost =
            bleed_internally(entity, rng, &mut report.narrative_events);
    }

    let bled_out = entity.blood_capacity() > 0.0 && entity.blood.current <= 0.0;
    if bled_out || (entity.dead && !still_bleeding(entity)) {
        finalise_death(entity);
        report.verdict = HealthVerdict::Dead;
        return true;
    }

    entity.breath.advance();
    let pressure = hypoxia_pressure(entity, &strategy.thresholds);
    report.hypoxia = pressure.total();
    apply_hypoxia(entity, report.hypoxia);

    report.die_off = apply_die_off(entity);
    decay_additives(entity);
    false
}

/// Hydraulic leak only; a dead flag is left to the status ladder
fn robot_tick(
    strategy: &HealthStrategy,
    entity: &mut Entity,
    ctx: EvalContext<'_>,
    report: &mut TickReport,
) -> bool {
    if entity.blood.current > 0.0 && entity.exertion != ExertionLevel::Stasis {
        report.blood_lost =
            bleed_wounds(strategy, entity, ctx.tick, &mut report.narrative_events);
    }
    false
}

fn finalise_death(entity: &mut Entity) {
    entity.blood.current = entity.blood.current.max(0.0);
    entity.blood.airway_pool = 0.0;
    entity.blood.digestive_pool = 0.0;
    for wound in entity.wounds_mut() {
        wound.bleed = BleedStatus::NotBleeding;
    }
    entity.effects.internal_bleeds.clear();
    tracing::debug!("{}: death finalised", entity.name);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use crate::anatomy::BodyPlan;
    use crate::damage::{DamageEvent, DamageType};
    use crate::effects::AdditiveConsequence;
    use crate::narrative::{NarrativeError, NarrativeEvent, NarrativeLog};
    use crate::strategy::testing;

    fn humanoid() -> Entity {
        Entity::new("Aldric", Arc::new(BodyPlan::humanoid()))
    }

    struct BrokenSink;

    impl NarrativeSink for BrokenSink {
        fn emit(
            &mut self,
            _entity: crate::core::types::EntityId,
            event: NarrativeEvent,
        ) -> Result<(), NarrativeError> {
            Err(NarrativeError::MissingTemplate(format!("{:?}", event)))
        }
    }

    fn slash(strategy: &HealthStrategy, entity: &mut Entity, part: &str, damage: f64) {
        let part = entity.body.part_by_name(part).unwrap().id;
        let event = DamageEvent::new(DamageType::Slashing, damage, Some(part)).with_pain(0.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        strategy
            .suffer_damage(entity, &event, EvalContext::at(0), &mut rng)
            .unwrap();
    }

    #[test]
    fn test_healthy_tick_is_quiet() {
        let strategy = testing::organic();
        let mut entity = humanoid();
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut log = NarrativeLog::new();
        let report =
            strategy.perform_health_tick(&mut entity, EvalContext::at(1), &mut rng, &mut log);
        assert_eq!(report.verdict, HealthVerdict::None);
        assert_eq!(report.blood_lost, 0.0);
        assert_eq!(report.hypoxia, 0.0);
        assert!(log.events.is_empty());
    }

    #[test]
    fn test_narrative_failure_does_not_abort_tick() {
        let strategy = testing::organic();
        let mut entity = humanoid();
        slash(&strategy, &mut entity, "torso", 40.0);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let report =
            strategy.perform_health_tick(&mut entity, EvalContext::at(1), &mut rng, &mut BrokenSink);
        assert!(report.blood_lost > 0.0);
        assert_eq!(report.narrative_events.len(), 1);
        assert!(entity.blood.current < 5.0);
    }

    #[test]
    fn test_stasis_stops_bleeding() {
        let strategy = testing::organic();
        let mut entity = humanoid();
        slash(&strategy, &mut entity, "torso", 40.0);
        entity.exertion = ExertionLevel::Stasis;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut log = NarrativeLog::new();
        let report =
            strategy.perform_health_tick(&mut entity, EvalContext::at(1), &mut rng, &mut log);
        assert_eq!(report.blood_lost, 0.0);
        assert_eq!(entity.blood.current, 5.0);
    }

    #[test]
    fn test_dead_flag_while_bleeding_keeps_corpse_physiology() {
        let strategy = testing::organic();
        let mut entity = humanoid();
        slash(&strategy, &mut entity, "torso", 60.0);
        entity.dead = true;
        entity.effects.inject(AdditiveConsequence::Deadly, 1.0);
        let before = entity.effects.additive_volume(AdditiveConsequence::Deadly);
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut log = NarrativeLog::new();
        let report =
            strategy.perform_health_tick(&mut entity, EvalContext::at(1), &mut rng, &mut log);
        assert_eq!(report.verdict, HealthVerdict::Dead);
        assert!(report.blood_lost > 0.0);
        assert!(report.die_off > 0.0);
        assert!(entity.effects.additive_volume(AdditiveConsequence::Deadly) < before);
    }

    #[test]
    fn test_dead_flag_without_bleeding_finalises() {
        let strategy = testing::organic();
        let mut entity = humanoid();
        entity.dead = true;
        entity.blood.airway_pool = 0.05;
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut log = NarrativeLog::new();
        let report =
            strategy.perform_health_tick(&mut entity, EvalContext::at(1), &mut rng, &mut log);
        assert_eq!(report.verdict, HealthVerdict::Dead);
        assert_eq!(entity.blood.airway_pool, 0.0);
    }

    #[test]
    fn test_objects_only_prune() {
        let strategy = testing::inanimate();
        let mut entity = Entity::new("table", Arc::new(BodyPlan::object(40.0)));
        entity
            .effects
            .add_marker(crate::effects::Marker::PreventPassOut, Some(1));
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let mut log = NarrativeLog::new();
        let report =
            strategy.perform_health_tick(&mut entity, EvalContext::at(1), &mut rng, &mut log);
        assert_eq!(report.verdict, HealthVerdict::None);
        assert!(entity.effects.markers.is_empty());
    }
}
