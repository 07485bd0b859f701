//! External wound bleeding and organ-attached internal bleeding

use std::sync::Arc;

use rand::{Rng, RngCore};

use super::constants::{
    COUGH_THRESHOLD, INTERNAL_BLEED_GROWTH, INTERNAL_BLEED_RESOLVED, INTERNAL_BLEED_TAPER_CHANCE,
    INTERNAL_BLEED_TAPER_FACTOR, VOMIT_THRESHOLD,
};
use crate::core::types::{BodypartId, Tick};
use crate::effects::Marker;
use crate::entity::Entity;
use crate::narrative::NarrativeEvent;
use crate::strategy::HealthStrategy;

/// Bleed every wound in creation order and subtract the loss from the
/// entity's blood. Returns litres lost.
pub fn bleed_wounds(
    strategy: &HealthStrategy,
    entity: &mut Entity,
    tick: Tick,
    events: &mut Vec<NarrativeEvent>,
) -> f64 {
    let body = Arc::clone(&entity.body);
    let capacity = entity.blood_capacity();
    let exertion = entity.exertion;
    let mut remaining = entity.blood.current.max(0.0);
    let mut lost = 0.0;
    let mut visible = 0.0;
    let mut worst: Option<(BodypartId, f64)> = None;

    for wound in entity.wounds_mut() {
        if !wound.is_bleeding() {
            continue;
        }
        let severity = strategy.severity_of(wound, &body);
        let outcome = wound.bleed(severity, remaining, exertion, capacity);
        remaining -= outcome.volume;
        lost += outcome.volume;
        if outcome.visible {
            visible += outcome.volume;
            if let Some(part) = wound.bodypart {
                if worst.map_or(true, |(_, v)| outcome.volume > v) {
                    worst = Some((part, outcome.volume));
                }
            }
        }
    }

    entity.blood.current = remaining.max(0.0);

    if visible > 0.0 && !entity.effects.has_marker(Marker::SuppressBleedMessage, tick) {
        events.push(NarrativeEvent::Bleeding {
            bodypart: worst.map(|(part, _)| part),
            volume: visible,
        });
    }
    lost
}

/// Resolve internal bleeds: lose blood into the airway or gut, then grow
/// or taper each bleed. Returns litres lost.
pub fn bleed_internally(
    entity: &mut Entity,
    rng: &mut dyn RngCore,
    events: &mut Vec<NarrativeEvent>,
) -> f64 {
    let body = Arc::clone(&entity.body);
    let mut remaining = entity.blood.current.max(0.0);
    let mut lost = 0.0;

    for bleed in entity.effects.internal_bleeds.iter_mut() {
        let volume = bleed.rate.min(remaining);
        remaining -= volume;
        lost += volume;

        if let Some(organ) = body.part(bleed.organ).and_then(|p| p.organ()) {
            if organ.drains_to_airway() {
                entity.blood.airway_pool += volume;
            } else if organ.drains_to_gut() {
                entity.blood.digestive_pool += volume;
            }
        }

        bleed.rate *= 1.0 + INTERNAL_BLEED_GROWTH;
        if rng.gen::<f64>() < INTERNAL_BLEED_TAPER_CHANCE {
            bleed.rate *= INTERNAL_BLEED_TAPER_FACTOR;
        }
    }

    let name = &entity.name;
    entity.effects.internal_bleeds.retain(|bleed| {
        let open = bleed.rate >= INTERNAL_BLEED_RESOLVED;
        if !open {
            tracing::debug!("{}: internal bleed in {:?} resolved", name, bleed.organ);
        }
        open
    });
    entity.blood.current = remaining.max(0.0);

    if entity.blood.airway_pool >= COUGH_THRESHOLD {
        events.push(NarrativeEvent::Cough {
            volume: entity.blood.airway_pool,
        });
        entity.blood.airway_pool = 0.0;
    }
    if entity.blood.digestive_pool >= VOMIT_THRESHOLD {
        events.push(NarrativeEvent::Vomit {
            volume: entity.blood.digestive_pool,
        });
        entity.blood.digestive_pool = 0.0;
    }
    lost
}

/// Anything still losing fluid, wound or internal
pub fn still_bleeding(entity: &Entity) -> bool {
    entity.wounds().iter().any(|w| w.is_bleeding()) || !entity.effects.internal_bleeds.is_empty()
}
