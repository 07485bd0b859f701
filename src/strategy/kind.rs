//! Strategy kinds and the configuration each one carries
//!
//! The set is closed. A physiological model that needs a formula holds it
//! directly, so a strategy that loaded successfully can never be missing one.

use super::schema::KindDef;
use crate::formula::Formula;

/// Animated constructs: golems, animated armour
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructConfig {
    pub penalty: Formula,
}

/// Hydraulic machines with a positronic brain and a power core
#[derive(Debug, Clone, PartialEq)]
pub struct RobotConfig {
    pub max_stun: Formula,
    pub heal_stun: Formula,
    pub penalty: Formula,
}

/// Living creatures with blood, organs and bones
#[derive(Debug, Clone, PartialEq)]
pub struct OrganicConfig {
    pub max_stun: Formula,
    pub max_pain: Formula,
    pub heal_pain: Formula,
    pub heal_stun: Formula,
    pub penalty: Formula,
    /// Portion of blunt damage to a limb that goes to the bone
    pub fracture_fraction: f64,
    /// Chance (0-1) that a new fracture merges into an existing one
    pub fracture_merge_chance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum StrategyKind {
    /// Objects; hit points only
    Inanimate,
    Construct(ConstructConfig),
    Robot(RobotConfig),
    Organic(OrganicConfig),
}

impl StrategyKind {
    /// The `kind` key this strategy was declared with
    pub fn def(&self) -> KindDef {
        match self {
            StrategyKind::Inanimate => KindDef::Inanimate,
            StrategyKind::Construct(_) => KindDef::Construct,
            StrategyKind::Robot(_) => KindDef::Robot,
            StrategyKind::Organic(_) => KindDef::Organic,
        }
    }

    pub fn label(&self) -> &'static str {
        self.def().label()
    }

    /// Does damage to this kind hurt living tissue?
    pub fn is_living(&self) -> bool {
        matches!(self, StrategyKind::Organic(_))
    }

    pub fn penalty(&self) -> Option<&Formula> {
        match self {
            StrategyKind::Inanimate => None,
            StrategyKind::Construct(c) => Some(&c.penalty),
            StrategyKind::Robot(r) => Some(&r.penalty),
            StrategyKind::Organic(o) => Some(&o.penalty),
        }
    }

    pub fn max_stun(&self) -> Option<&Formula> {
        match self {
            StrategyKind::Robot(r) => Some(&r.max_stun),
            StrategyKind::Organic(o) => Some(&o.max_stun),
            _ => None,
        }
    }

    pub fn max_pain(&self) -> Option<&Formula> {
        match self {
            StrategyKind::Organic(o) => Some(&o.max_pain),
            _ => None,
        }
    }

    pub fn heal_pain(&self) -> Option<&Formula> {
        match self {
            StrategyKind::Organic(o) => Some(&o.heal_pain),
            _ => None,
        }
    }

    pub fn heal_stun(&self) -> Option<&Formula> {
        match self {
            StrategyKind::Robot(r) => Some(&r.heal_stun),
            StrategyKind::Organic(o) => Some(&o.heal_stun),
            _ => None,
        }
    }
}
