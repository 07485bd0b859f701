//! The health-bearing entity: anatomy, wounds, effects and physiology

pub mod state;

use std::sync::Arc;

use ahash::AHashMap;

pub use state::{BloodState, BreathState, ExertionLevel};

use crate::anatomy::{BodyPlan, CirculatoryFluid, OrganKind};
use crate::core::types::{BodypartId, EntityId, WoundId};
use crate::effects::{AdditiveConsequence, EffectSet};
use crate::formula::FormulaParams;
use crate::wounds::{HealChannel, Wound};

#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub body: Arc<BodyPlan>,
    /// Attributes handed to strategy formulas by name
    pub traits: AHashMap<String, f64>,
    wounds: Vec<Wound>,
    pub effects: EffectSet,
    pub blood: BloodState,
    pub breath: BreathState,
    pub exertion: ExertionLevel,
    /// Set externally when something else has already killed the entity
    pub dead: bool,
    next_wound_id: u64,
}

impl Entity {
    pub fn new(name: &str, body: Arc<BodyPlan>) -> Self {
        let breath = match body.fluid {
            CirculatoryFluid::Blood => BreathState::default(),
            _ => BreathState::not_breathing(),
        };
        Self {
            id: EntityId::new(),
            name: name.to_string(),
            blood: BloodState::full(body.fluid_capacity),
            body,
            traits: AHashMap::new(),
            wounds: Vec::new(),
            effects: EffectSet::new(),
            breath,
            exertion: ExertionLevel::default(),
            dead: false,
            next_wound_id: 1,
        }
    }

    pub fn with_trait(mut self, name: &str, value: f64) -> Self {
        self.traits.insert(name.to_string(), value);
        self
    }

    /// Traits as formula parameters
    pub fn trait_params(&self) -> FormulaParams {
        let mut params = FormulaParams::new();
        params.extend(self.traits.iter());
        params
    }

    // === WOUNDS ===

    /// Wounds in creation order
    pub fn wounds(&self) -> &[Wound] {
        &self.wounds
    }

    pub fn wound(&self, id: WoundId) -> Option<&Wound> {
        self.wounds.iter().find(|w| w.id == id)
    }

    pub fn wound_mut(&mut self, id: WoundId) -> Option<&mut Wound> {
        self.wounds.iter_mut().find(|w| w.id == id)
    }

    pub(crate) fn wounds_mut(&mut self) -> &mut [Wound] {
        &mut self.wounds
    }

    pub fn wounds_at(&self, part: BodypartId) -> impl Iterator<Item = &Wound> {
        self.wounds.iter().filter(move |w| w.bodypart == Some(part))
    }

    pub(crate) fn allocate_wound_id(&mut self) -> WoundId {
        let id = WoundId(self.next_wound_id);
        self.next_wound_id += 1;
        id
    }

    pub(crate) fn push_wound(&mut self, wound: Wound) -> WoundId {
        let id = wound.id;
        self.wounds.push(wound);
        id
    }

    /// Apply a healing amount to one wound; false if the wound is gone
    pub fn heal_wound(&mut self, id: WoundId, channel: HealChannel, amount: f64) -> bool {
        match self.wound_mut(id) {
            Some(wound) => {
                wound.apply_healing(channel, amount);
                true
            }
            None => false,
        }
    }

    /// Drop fully healed wounds, returning them
    pub fn remove_healed_wounds(&mut self) -> Vec<Wound> {
        let (healed, open): (Vec<_>, Vec<_>) =
            self.wounds.drain(..).partition(|w| w.is_healed());
        self.wounds = open;
        healed
    }

    pub fn total_damage(&self) -> f64 {
        self.wounds.iter().map(|w| w.current_damage).sum()
    }

    pub fn total_pain(&self) -> f64 {
        self.wounds.iter().map(|w| w.current_pain).sum()
    }

    pub fn total_stun(&self) -> f64 {
        self.wounds.iter().map(|w| w.current_stun).sum()
    }

    pub fn total_shock(&self) -> f64 {
        self.wounds.iter().map(|w| w.current_shock).sum()
    }

    pub fn part_damage(&self, part: BodypartId) -> f64 {
        self.wounds_at(part).map(|w| w.current_damage).sum()
    }

    // === ANATOMY ===

    /// Combined function of every organ of `kind`, 0.0 when there is none
    pub fn organ_function(&self, kind: OrganKind) -> f64 {
        let total: f64 = self
            .body
            .organs()
            .filter(|(_, k)| *k == kind)
            .map(|(part, _)| {
                if part.max_life <= 0.0 {
                    return 0.0;
                }
                (1.0 - self.part_damage(part.id) / part.max_life).clamp(0.0, 1.0)
            })
            .sum();
        total.min(1.0)
    }

    pub fn is_bone(&self, part: BodypartId) -> bool {
        self.body.part(part).is_some_and(|p| p.is_bone())
    }

    // === CIRCULATION ===

    pub fn blood_capacity(&self) -> f64 {
        self.body.fluid_capacity
    }

    /// Own blood plus anything injected that adds volume
    pub fn effective_blood_volume(&self) -> f64 {
        let expanders: f64 = self
            .effects
            .additives
            .iter()
            .filter(|a| a.consequence.expands_volume())
            .map(|a| a.volume)
            .sum();
        self.blood.current + expanders
    }

    /// Effective volume over capacity; 1.0 for bodies with no circulation
    pub fn blood_ratio(&self) -> f64 {
        let capacity = self.blood_capacity();
        if capacity <= 0.0 {
            return 1.0;
        }
        self.effective_blood_volume() / capacity
    }

    /// Portion of circulating fluid that is `consequence`
    pub fn additive_ratio(&self, consequence: AdditiveConsequence) -> f64 {
        let capacity = self.blood_capacity();
        if capacity <= 0.0 {
            return 0.0;
        }
        self.effects.additive_volume(consequence) / capacity
    }
}
