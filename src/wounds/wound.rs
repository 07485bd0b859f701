//! The wound record: one accumulator of harm at one location

use serde::{Deserialize, Serialize};

use crate::core::types::{BodypartId, EntityId, ItemId, WoundId};
use crate::damage::DamageType;
use crate::entity::ExertionLevel;
use crate::severity::SeverityTier;
use crate::simulation::constants::{bleed_rate, clot_ticks};

use super::HealChannel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WoundKind {
    /// Damage only; objects and constructs
    Simple,
    /// Living tissue with pain, stun and shock
    Organic,
    /// Broken bone
    Fracture,
    /// Machine damage; may leak hydraulic fluid
    Mechanical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BleedStatus {
    #[default]
    NotBleeding,
    Bleeding,
    Clotted,
}

/// Amounts added to a wound in one go
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Harm {
    pub damage: f64,
    pub pain: f64,
    pub stun: f64,
    pub shock: f64,
}

impl Harm {
    pub fn damage_only(damage: f64) -> Self {
        Self {
            damage,
            ..Self::default()
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            damage: self.damage * factor,
            pain: self.pain * factor,
            stun: self.stun * factor,
            shock: self.shock * factor,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.damage <= 0.0 && self.pain <= 0.0 && self.stun <= 0.0 && self.shock <= 0.0
    }
}

/// Fluid lost by one wound in one tick
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BleedOutcome {
    pub volume: f64,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wound {
    pub id: WoundId,
    pub owner: EntityId,
    pub bodypart: Option<BodypartId>,
    pub kind: WoundKind,
    pub original_damage: f64,
    pub current_damage: f64,
    pub current_pain: f64,
    pub current_stun: f64,
    pub current_shock: f64,
    pub damage_type: DamageType,
    pub lodged: Option<ItemId>,
    pub actor_origin: Option<EntityId>,
    pub tool_origin: Option<ItemId>,
    /// Classify against the percentage table, normalised by location life
    pub use_percentage_severity: bool,
    pub bleed: BleedStatus,
    /// Ticks spent bleeding since the wound last opened
    pub bleed_ticks: u32,
}

impl Wound {
    pub fn new(
        id: WoundId,
        owner: EntityId,
        bodypart: Option<BodypartId>,
        kind: WoundKind,
        damage_type: DamageType,
        harm: Harm,
    ) -> Self {
        Self {
            id,
            owner,
            bodypart,
            kind,
            original_damage: harm.damage,
            current_damage: harm.damage,
            current_pain: harm.pain,
            current_stun: harm.stun,
            current_shock: harm.shock,
            damage_type,
            lodged: None,
            actor_origin: None,
            tool_origin: None,
            use_percentage_severity: matches!(kind, WoundKind::Fracture),
            bleed: BleedStatus::NotBleeding,
            bleed_ticks: 0,
        }
    }

    pub fn with_origin(mut self, actor: Option<EntityId>, tool: Option<ItemId>) -> Self {
        self.actor_origin = actor;
        self.tool_origin = tool;
        self
    }

    /// Accumulate more harm of `damage_type` into this wound
    pub fn suffer_additional_damage(&mut self, harm: Harm, damage_type: DamageType) {
        self.original_damage += harm.damage;
        self.current_damage += harm.damage;
        self.current_pain += harm.pain;
        self.current_stun += harm.stun;
        self.current_shock += harm.shock;

        let can_reopen = matches!(self.kind, WoundKind::Organic | WoundKind::Mechanical);
        if can_reopen
            && self.bleed == BleedStatus::Clotted
            && damage_type.causes_bleeding()
            && harm.damage > 0.0
        {
            self.bleed = BleedStatus::Bleeding;
            self.bleed_ticks = 0;
        }
    }

    pub fn start_bleeding(&mut self) {
        self.bleed = BleedStatus::Bleeding;
        self.bleed_ticks = 0;
    }

    pub fn is_bleeding(&self) -> bool {
        self.bleed == BleedStatus::Bleeding
    }

    /// Lose fluid for one tick.
    ///
    /// Only wounds opened on external locations are ever set bleeding, so
    /// anything that leaks is visible.
    pub fn bleed(
        &mut self,
        severity: SeverityTier,
        blood_total: f64,
        exertion: ExertionLevel,
        capacity: f64,
    ) -> BleedOutcome {
        if !self.is_bleeding() || blood_total <= 0.0 || capacity <= 0.0 {
            return BleedOutcome::default();
        }

        let base = bleed_rate(severity);
        if base <= 0.0 {
            self.bleed = BleedStatus::Clotted;
            return BleedOutcome::default();
        }

        let pressure = (blood_total / capacity).clamp(0.0, 1.0);
        let volume = (base * exertion.bleed_multiplier() * pressure).min(blood_total);

        self.bleed_ticks += 1;
        if let Some(limit) = clot_ticks(severity) {
            if self.bleed_ticks >= limit {
                self.bleed = BleedStatus::Clotted;
            }
        }

        BleedOutcome {
            volume,
            visible: volume > 0.0,
        }
    }

    /// Subtract a healing amount from one channel, flooring at zero
    pub fn apply_healing(&mut self, channel: HealChannel, amount: f64) {
        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        let slot = match channel {
            HealChannel::Damage => &mut self.current_damage,
            HealChannel::Pain => &mut self.current_pain,
            HealChannel::Stun => &mut self.current_stun,
            HealChannel::Shock => &mut self.current_shock,
        };
        *slot = (*slot - amount).max(0.0);
    }

    /// Pull out whatever is lodged in the wound
    pub fn remove_lodged(&mut self) -> Option<ItemId> {
        self.lodged.take()
    }

    pub fn is_healed(&self) -> bool {
        self.current_damage <= 0.0
            && self.current_pain <= 0.0
            && self.current_stun <= 0.0
            && self.current_shock <= 0.0
            && self.lodged.is_none()
    }
}
