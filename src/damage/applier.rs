//! Turns damage events into wound mutations
//!
//! Each strategy kind has its own filtering and merging policy. Lodging is
//! rolled afterwards against whichever wound ended up primary.

use rand::{Rng, RngCore};

use super::{DamageEvent, DamageType};
use crate::anatomy::Bodypart;
use crate::core::error::Result;
use crate::core::types::{BodypartId, WoundId};
use crate::entity::Entity;
use crate::formula::FormulaParams;
use crate::simulation::constants::INTERNAL_BLEED_PER_DAMAGE;
use crate::strategy::{EvalContext, HealthStrategy, OrganicConfig, StrategyKind};
use crate::wounds::{Harm, Wound, WoundKind};

pub fn suffer_damage(
    strategy: &HealthStrategy,
    entity: &mut Entity,
    event: &DamageEvent,
    ctx: EvalContext<'_>,
    rng: &mut dyn RngCore,
) -> Result<Option<WoundId>> {
    event.validate()?;

    let Some(part_id) = event.bodypart else {
        return Ok(None);
    };
    if event.is_empty() {
        return Ok(None);
    }
    let Some(part) = entity.body.part(part_id).cloned() else {
        tracing::debug!(
            "{}: no bodypart {:?} on '{}' body, damage absorbed",
            entity.name,
            part_id,
            entity.body.name
        );
        return Ok(None);
    };

    let primary = match &strategy.kind {
        StrategyKind::Inanimate | StrategyKind::Construct(_) => {
            if rejects(strategy, event) {
                return Ok(None);
            }
            new_wound(entity, event, &part, WoundKind::Simple, Harm::damage_only(event.damage))
        }
        StrategyKind::Robot(_) => {
            if rejects(strategy, event) {
                return Ok(None);
            }
            let harm = Harm {
                damage: event.damage,
                stun: event.stun,
                ..Harm::default()
            };
            let id = new_wound(entity, event, &part, WoundKind::Mechanical, harm);
            if let Some(wound) = id.and_then(|id| entity.wound_mut(id)) {
                if event.damage_type.causes_bleeding() && event.damage > 0.0 && part.is_external() {
                    wound.start_bleeding();
                }
            }
            id
        }
        StrategyKind::Organic(config) => apply_organic(config, entity, event, &part, rng),
    };

    if let Some(id) = primary {
        roll_lodging(strategy, entity, event, id, ctx, rng);
    }
    Ok(primary)
}

fn rejects(strategy: &HealthStrategy, event: &DamageEvent) -> bool {
    if event.damage_type.living_tissue_only() {
        tracing::trace!(
            "{} strategy '{}' ignores {:?} damage",
            strategy.kind.label(),
            strategy.name,
            event.damage_type
        );
        return true;
    }
    false
}

fn new_wound(
    entity: &mut Entity,
    event: &DamageEvent,
    part: &Bodypart,
    kind: WoundKind,
    harm: Harm,
) -> Option<WoundId> {
    if harm.is_zero() {
        return None;
    }
    let id = entity.allocate_wound_id();
    let wound = Wound::new(id, entity.id, Some(part.id), kind, event.damage_type, harm)
        .with_origin(event.actor, event.tool);
    Some(entity.push_wound(wound))
}

fn apply_organic(
    config: &OrganicConfig,
    entity: &mut Entity,
    event: &DamageEvent,
    part: &Bodypart,
    rng: &mut dyn RngCore,
) -> Option<WoundId> {
    let harm = Harm {
        damage: event.damage,
        pain: event.pain,
        stun: event.stun,
        shock: event.damage * event.damage_type.shock_fraction(),
    };

    let mut tissue = harm;
    let mut fracture = None;

    let bone = if event.damage_type.is_blunt() {
        entity.body.bone_for(part.id).cloned()
    } else {
        None
    };
    if let Some(bone) = bone {
        let broken = if part.is_bone() {
            tissue = Harm::default();
            harm
        } else {
            let fraction = config.fracture_fraction;
            tissue.damage = harm.damage * (1.0 - fraction);
            tissue.pain = harm.pain * (1.0 - fraction);
            Harm {
                damage: harm.damage * fraction,
                pain: harm.pain * fraction,
                ..Harm::default()
            }
        };
        fracture = apply_fracture(config, entity, event, &bone, broken, rng);
    }

    let primary = if tissue.is_zero() {
        None
    } else {
        apply_tissue(entity, event, part, tissue)
    };
    primary.or(fracture)
}

fn apply_fracture(
    config: &OrganicConfig,
    entity: &mut Entity,
    event: &DamageEvent,
    bone: &Bodypart,
    broken: Harm,
    rng: &mut dyn RngCore,
) -> Option<WoundId> {
    if broken.is_zero() {
        return None;
    }
    let existing = entity
        .wounds_at(bone.id)
        .find(|w| w.kind == WoundKind::Fracture)
        .map(|w| w.id);

    if let Some(id) = existing {
        if rng.gen::<f64>() < config.fracture_merge_chance {
            if let Some(wound) = entity.wound_mut(id) {
                wound.suffer_additional_damage(broken, event.damage_type);
                return Some(id);
            }
        }
    }
    new_wound(entity, event, bone, WoundKind::Fracture, broken)
}

fn apply_tissue(
    entity: &mut Entity,
    event: &DamageEvent,
    part: &Bodypart,
    harm: Harm,
) -> Option<WoundId> {
    if event.damage_type.merges() {
        let existing = entity
            .wounds_at(part.id)
            .find(|w| w.kind == WoundKind::Organic && w.damage_type == event.damage_type)
            .map(|w| w.id);
        if let Some(wound) = existing.and_then(|id| entity.wound_mut(id)) {
            wound.suffer_additional_damage(harm, event.damage_type);
            return existing;
        }
    }

    let id = new_wound(entity, event, part, WoundKind::Organic, harm)?;
    let is_organ = part.organ().is_some();
    if let Some(wound) = entity.wound_mut(id) {
        wound.use_percentage_severity = is_organ;
        if event.damage_type.causes_bleeding() && harm.damage > 0.0 && part.is_external() {
            wound.start_bleeding();
        }
    }
    if is_organ && event.damage_type.causes_bleeding() && harm.damage > 0.0 {
        entity
            .effects
            .start_internal_bleed(part.id, harm.damage * INTERNAL_BLEED_PER_DAMAGE);
    }
    Some(id)
}

/// Harm the body does to itself (hypoxia, tissue die-off). Merging types
/// fold into the existing wound at that part.
pub(crate) fn apply_systemic(
    entity: &mut Entity,
    part: BodypartId,
    damage_type: DamageType,
    damage: f64,
) -> Option<WoundId> {
    if !(damage.is_finite() && damage > 0.0) {
        return None;
    }
    let part = entity.body.part(part).cloned()?;
    let event = DamageEvent::new(damage_type, damage, Some(part.id)).with_pain(0.0);
    apply_tissue(entity, &event, &part, Harm::damage_only(damage))
}

fn roll_lodging(
    strategy: &HealthStrategy,
    entity: &mut Entity,
    event: &DamageEvent,
    wound: WoundId,
    ctx: EvalContext<'_>,
    rng: &mut dyn RngCore,
) {
    let Some(item) = event.lodgable else {
        return;
    };
    if !event.damage_type.can_lodge() {
        return;
    }

    let params = FormulaParams::new()
        .with("damage", event.damage)
        .with("type", event.damage_type.code());
    let chance = ctx.evaluator.evaluate(&strategy.lodge, &params);
    let roll: f64 = rng.gen_range(0.0..100.0);
    if roll >= chance {
        return;
    }
    let lodged = match entity.wound_mut(wound) {
        Some(target) if target.lodged.is_none() => {
            target.lodged = Some(item);
            true
        }
        _ => false,
    };
    if lodged {
        tracing::debug!("{}: {:?} lodged in wound {:?}", entity.name, item, wound);
    }
}
