//! Condition prompts rendered from current health ratios
//!
//! Flags use the same predicates as the status evaluator, so a heart that
//! knocks an entity out is always reported as cardiac arrest.

use serde::{Deserialize, Serialize};

use crate::anatomy::CirculatoryFluid;
use crate::entity::Entity;
use crate::status::{heart_has_stopped, power_has_failed};
use crate::strategy::{EvalContext, HealthStrategy, StrategyKind};

const BAR_WIDTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PromptFormat {
    /// Glyph bars
    #[default]
    Classic,
    /// One sentence per channel
    Full,
    /// Only what is wrong
    FullBrief,
}

impl std::str::FromStr for PromptFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "classic" => Ok(PromptFormat::Classic),
            "full" => Ok(PromptFormat::Full),
            "brief" | "full_brief" | "fullbrief" => Ok(PromptFormat::FullBrief),
            other => Err(format!("unknown prompt format '{}'", other)),
        }
    }
}

/// Ratios and flags behind a prompt; channels a kind lacks are `None`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Condition {
    /// 1.0 = unhurt
    pub health: f64,
    pub pain: Option<f64>,
    pub stun: Option<f64>,
    /// Blood or hydraulic fluid over capacity
    pub fluid: Option<f64>,
    /// 0.0 = fresh lungs, 1.0 = out of breath
    pub breath: Option<f64>,
    pub cardiac_arrest: bool,
    pub power_failure: bool,
    pub suffocating: bool,
    pub drowning: bool,
}

impl Condition {
    pub fn assess(strategy: &HealthStrategy, entity: &Entity, ctx: EvalContext<'_>) -> Self {
        let max_hp = strategy.max_hp(entity, ctx);
        let health = if max_hp > 0.0 {
            (1.0 - entity.total_damage() / max_hp).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let mut condition = Condition {
            health,
            ..Condition::default()
        };

        let ratio = |value: f64, max: f64| if max > 0.0 { (value / max).max(0.0) } else { 0.0 };

        match &strategy.kind {
            StrategyKind::Inanimate | StrategyKind::Construct(_) => {}
            StrategyKind::Robot(_) => {
                condition.stun = Some(ratio(entity.total_stun(), strategy.max_stun(entity, ctx)));
                if entity.body.fluid == CirculatoryFluid::Hydraulic {
                    condition.fluid = Some(entity.blood_ratio());
                }
                condition.power_failure = power_has_failed(entity);
            }
            StrategyKind::Organic(_) => {
                let pain = entity.effects.effective_pain(entity.total_pain(), ctx.tick);
                condition.pain = Some(ratio(pain, strategy.max_pain(entity, ctx)));
                condition.stun = Some(ratio(entity.total_stun(), strategy.max_stun(entity, ctx)));
                if entity.blood_capacity() > 0.0 {
                    condition.fluid = Some(entity.blood_ratio());
                }
                if entity.breath.needs_to_breathe {
                    condition.breath = Some(entity.breath.held_ratio());
                }
                condition.cardiac_arrest = heart_has_stopped(entity);
                let out_of_air = entity.breath.is_suffocating();
                condition.drowning = out_of_air && entity.breath.submerged;
                condition.suffocating = out_of_air && !entity.breath.submerged;
            }
        }
        condition
    }

    fn flags(&self) -> Vec<&'static str> {
        let mut flags = Vec::new();
        if self.cardiac_arrest {
            flags.push("cardiac arrest");
        }
        if self.power_failure {
            flags.push("power failure");
        }
        if self.drowning {
            flags.push("drowning");
        }
        if self.suffocating {
            flags.push("suffocating");
        }
        flags
    }
}

pub fn report(
    strategy: &HealthStrategy,
    entity: &Entity,
    format: PromptFormat,
    ctx: EvalContext<'_>,
) -> String {
    let condition = Condition::assess(strategy, entity, ctx);
    match format {
        PromptFormat::Classic => classic(&condition),
        PromptFormat::Full => full(&condition),
        PromptFormat::FullBrief => brief(&condition),
    }
}

fn bar(ratio: f64) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * BAR_WIDTH as f64).round() as usize).min(BAR_WIDTH);
    format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
}

fn classic(c: &Condition) -> String {
    let mut parts = vec![format!("HP {}", bar(c.health))];
    if let Some(pain) = c.pain {
        parts.push(format!("Pain {}", bar(pain)));
    }
    if let Some(stun) = c.stun {
        parts.push(format!("Stun {}", bar(stun)));
    }
    if let Some(fluid) = c.fluid {
        parts.push(format!("Fluid {}", bar(fluid)));
    }
    if let Some(breath) = c.breath {
        parts.push(format!("Air {}", bar(1.0 - breath)));
    }
    for flag in c.flags() {
        parts.push(format!("<{}>", flag.to_uppercase()));
    }
    parts.join(" ")
}

fn health_phrase(health: f64) -> &'static str {
    match health {
        h if h >= 1.0 => "unhurt",
        h if h >= 0.8 => "lightly wounded",
        h if h >= 0.5 => "wounded",
        h if h >= 0.25 => "badly wounded",
        h if h > 0.1 => "gravely wounded",
        _ => "at death's door",
    }
}

fn pain_phrase(pain: f64) -> Option<&'static str> {
    match pain {
        p if p >= 1.0 => Some("in unbearable pain"),
        p if p >= 0.6 => Some("in severe pain"),
        p if p >= 0.3 => Some("in pain"),
        p if p > 0.0 => Some("sore"),
        _ => None,
    }
}

fn stun_phrase(stun: f64) -> Option<&'static str> {
    match stun {
        s if s >= 1.0 => Some("knocked senseless"),
        s if s >= 0.6 => Some("reeling"),
        s if s >= 0.3 => Some("dazed"),
        _ => None,
    }
}

fn fluid_phrase(fluid: f64) -> Option<&'static str> {
    match fluid {
        f if f >= 0.9 => None,
        f if f >= 0.75 => Some("pale from lost fluid"),
        f if f >= 0.6 => Some("weak from lost fluid"),
        _ => Some("critically drained of fluid"),
    }
}

fn breath_phrase(breath: f64) -> Option<&'static str> {
    match breath {
        b if b >= 1.0 => Some("out of breath"),
        b if b >= 0.5 => Some("straining for air"),
        b if b > 0.0 => Some("holding your breath"),
        _ => None,
    }
}

fn problems(c: &Condition) -> Vec<&'static str> {
    let mut found: Vec<&'static str> = [
        c.pain.and_then(pain_phrase),
        c.stun.and_then(stun_phrase),
        c.fluid.and_then(fluid_phrase),
        c.breath.and_then(breath_phrase),
    ]
    .into_iter()
    .flatten()
    .collect();
    found.extend(c.flags());
    found
}

fn full(c: &Condition) -> String {
    let mut sentences = vec![format!("You are {}.", health_phrase(c.health))];
    for problem in problems(c) {
        sentences.push(format!("You are {}.", problem));
    }
    if sentences.len() == 1 && c.health >= 1.0 {
        sentences.push("You feel fine.".to_string());
    }
    sentences.join(" ")
}

fn brief(c: &Condition) -> String {
    let mut items = Vec::new();
    if c.health < 1.0 {
        items.push(health_phrase(c.health));
    }
    items.extend(problems(c));
    if items.is_empty() {
        return "healthy".to_string();
    }
    items.join(", ")
}
