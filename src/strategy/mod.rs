//! Health strategies: one physiological model per kind of entity
//!
//! A strategy is loaded once from TOML, validated, and treated as immutable.
//! Every operation dispatches on `StrategyKind` with an exhaustive match.

pub mod kind;
pub mod registry;
pub mod schema;
#[cfg(test)]
pub(crate) mod testing;

pub use kind::{ConstructConfig, OrganicConfig, RobotConfig, StrategyKind};
pub use registry::StrategyRegistry;
pub use schema::StrategyDef;

use rand::RngCore;

use crate::anatomy::BodyPlan;
use crate::condition::{self, PromptFormat};
use crate::core::config::Thresholds;
use crate::core::error::{HealthError, Result};
use crate::core::types::{StrategyId, Tick, WoundId};
use crate::damage::{applier, DamageEvent};
use crate::entity::Entity;
use crate::formula::{ExpressionEvaluator, Formula, FormulaEvaluator};
use crate::narrative::NarrativeSink;
use crate::severity::{SeverityTable, SeverityTier};
use crate::simulation::{self, TickReport};
use crate::status::{self, HealthVerdict};
use crate::wounds::{healing_params, HealChannel, Outcome, Wound};

/// What every strategy operation needs besides the entity
#[derive(Clone, Copy)]
pub struct EvalContext<'a> {
    pub tick: Tick,
    pub evaluator: &'a dyn FormulaEvaluator,
}

impl<'a> EvalContext<'a> {
    pub fn new(tick: Tick, evaluator: &'a dyn FormulaEvaluator) -> Self {
        Self { tick, evaluator }
    }
}

impl EvalContext<'static> {
    /// Context using the built-in expression evaluator
    pub fn at(tick: Tick) -> Self {
        Self {
            tick,
            evaluator: &ExpressionEvaluator,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HealthStrategy {
    pub id: StrategyId,
    pub name: String,
    /// Absolute damage to tier
    pub severity: SeverityTable,
    /// Damage as a fraction of location life to tier
    pub percentage_severity: SeverityTable,
    /// Chance (0-100) that a lodgable object sticks
    pub lodge: Formula,
    pub max_hp: Formula,
    pub heal_damage: Formula,
    pub thresholds: Thresholds,
    pub kind: StrategyKind,
}

impl HealthStrategy {
    // === DAMAGE ===

    /// Turn a damage event into a new or merged wound
    pub fn suffer_damage(
        &self,
        entity: &mut Entity,
        event: &DamageEvent,
        ctx: EvalContext<'_>,
        rng: &mut dyn RngCore,
    ) -> Result<Option<WoundId>> {
        applier::suffer_damage(self, entity, event, ctx, rng)
    }

    // === TICK ===

    pub fn perform_health_tick(
        &self,
        entity: &mut Entity,
        ctx: EvalContext<'_>,
        rng: &mut dyn RngCore,
        narrative: &mut dyn NarrativeSink,
    ) -> TickReport {
        simulation::perform_health_tick(self, entity, ctx, rng, narrative)
    }

    pub fn evaluate_status(&self, entity: &Entity, ctx: EvalContext<'_>) -> HealthVerdict {
        status::evaluate(self, entity, ctx)
    }

    // === SEVERITY ===

    fn table(&self, use_percentage: bool) -> &SeverityTable {
        if use_percentage && !self.percentage_severity.is_empty() {
            &self.percentage_severity
        } else {
            &self.severity
        }
    }

    /// Tier of a raw value; falls back to the absolute table when there is
    /// no percentage table
    pub fn classify(&self, value: f64, use_percentage: bool) -> SeverityTier {
        self.table(use_percentage).classify(value)
    }

    /// Derived severity of a wound on `body`
    pub fn severity_of(&self, wound: &Wound, body: &BodyPlan) -> SeverityTier {
        if wound.use_percentage_severity && !self.percentage_severity.is_empty() {
            let life = wound
                .bodypart
                .and_then(|id| body.part(id))
                .map(|part| part.max_life)
                .filter(|life| *life > 0.0);
            if let Some(life) = life {
                return self.percentage_severity.classify(wound.current_damage / life);
            }
        }
        self.severity.classify(wound.current_damage)
    }

    /// Lowest value that classifies as `tier`
    pub fn severity_floor(&self, tier: SeverityTier, use_percentage: bool) -> Result<f64> {
        let percentage = use_percentage && !self.percentage_severity.is_empty();
        let floor = self
            .table(use_percentage)
            .floor(tier)
            .ok_or(HealthError::UndefinedSeverity { tier })?;
        Ok(if percentage { floor } else { floor.max(0.0) })
    }

    /// First value above `tier`
    pub fn severity_ceiling(&self, tier: SeverityTier, use_percentage: bool) -> Result<f64> {
        let percentage = use_percentage && !self.percentage_severity.is_empty();
        let ceiling = self
            .table(use_percentage)
            .ceiling(tier)
            .ok_or(HealthError::UndefinedSeverity { tier })?;
        Ok(if percentage { ceiling } else { ceiling.max(1.0) })
    }

    // === DERIVED QUERIES ===

    fn eval_traits(&self, formula: &Formula, entity: &Entity, ctx: EvalContext<'_>) -> f64 {
        ctx.evaluator.evaluate(formula, &entity.trait_params()).max(0.0)
    }

    pub fn max_hp(&self, entity: &Entity, ctx: EvalContext<'_>) -> f64 {
        self.eval_traits(&self.max_hp, entity, ctx)
    }

    /// 0 for kinds that cannot be stunned
    pub fn max_stun(&self, entity: &Entity, ctx: EvalContext<'_>) -> f64 {
        self.kind
            .max_stun()
            .map_or(0.0, |f| self.eval_traits(f, entity, ctx))
    }

    /// 0 for kinds that feel no pain
    pub fn max_pain(&self, entity: &Entity, ctx: EvalContext<'_>) -> f64 {
        self.kind
            .max_pain()
            .map_or(0.0, |f| self.eval_traits(f, entity, ctx))
    }

    pub fn is_critically_injured(&self, entity: &Entity, ctx: EvalContext<'_>) -> bool {
        if self.kind.is_living() && status::heart_has_stopped(entity) {
            return true;
        }
        let max_hp = self.max_hp(entity, ctx);
        max_hp > 0.0 && entity.total_damage() / max_hp >= self.thresholds.critical_injury_ratio
    }

    /// Debuff fed into skill checks: percent of max HP lost, scaled down by
    /// the strategy's penalty divisor
    pub fn wound_penalty_for(&self, entity: &Entity, ctx: EvalContext<'_>) -> f64 {
        let Some(penalty) = self.kind.penalty() else {
            return 0.0;
        };
        let divisor = self.eval_traits(penalty, entity, ctx);
        let max_hp = self.max_hp(entity, ctx);
        if divisor <= 0.0 || max_hp <= 0.0 {
            return 0.0;
        }
        (entity.total_damage() / max_hp * 100.0) / divisor
    }

    // === HEALING ===

    /// Amount one healing opportunity removes from `channel` of `wound`
    pub fn get_healing_tick_amount(
        &self,
        wound: &Wound,
        outcome: Outcome,
        channel: HealChannel,
        ctx: EvalContext<'_>,
    ) -> f64 {
        let formula = match channel {
            HealChannel::Damage => Some(&self.heal_damage),
            HealChannel::Pain => self.kind.heal_pain(),
            HealChannel::Stun => self.kind.heal_stun(),
            HealChannel::Shock => None,
        };
        formula.map_or(0.0, |f| {
            ctx.evaluator
                .evaluate(f, &healing_params(wound, outcome))
                .max(0.0)
        })
    }

    // === PRESENTATION ===

    pub fn report_condition_prompt(
        &self,
        entity: &Entity,
        format: PromptFormat,
        ctx: EvalContext<'_>,
    ) -> String {
        condition::report(self, entity, format, ctx)
    }
}
