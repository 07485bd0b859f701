//! Effects an entity carries that the health engine reads and writes
//!
//! Each category lives in its own typed collection so callers never have to
//! scan a heterogeneous effect list.

pub mod additive;

use serde::{Deserialize, Serialize};

pub use additive::{AdditiveConsequence, BloodAdditive};

use crate::core::types::{BodypartId, Tick};
use crate::status::HealthVerdict;

/// An effect that may stop applying at a given tick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Timed<T> {
    pub effect: T,
    /// First tick at which the effect no longer applies
    pub expires_at: Option<Tick>,
}

impl<T> Timed<T> {
    pub fn permanent(effect: T) -> Self {
        Self {
            effect,
            expires_at: None,
        }
    }

    pub fn until(effect: T, expires_at: Tick) -> Self {
        Self {
            effect,
            expires_at: Some(expires_at),
        }
    }

    pub fn applies_at(&self, tick: Tick) -> bool {
        self.expires_at.map_or(true, |t| tick < t)
    }
}

/// Flags other systems set to change how wounds behave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Marker {
    /// Bleeding still happens but no message is produced
    SuppressBleedMessage,
    /// Pain and stun cannot knock the entity out
    PreventPassOut,
}

/// Externally imposed loss of consciousness (sleep spells, chokeholds)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsciousnessEffect {
    pub verdict: HealthVerdict,
    pub source: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Analgesic {
    /// Multiplies felt pain
    pub multiplier: f64,
    /// Subtracted after the multiplier
    pub flat: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anesthetic {
    pub intensity: f64,
}

/// Bleeding inside an organ, independent of any wound
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InternalBleed {
    pub organ: BodypartId,
    /// Litres lost per tick
    pub rate: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectSet {
    pub additives: Vec<BloodAdditive>,
    pub internal_bleeds: Vec<InternalBleed>,
    pub consciousness: Vec<Timed<ConsciousnessEffect>>,
    pub markers: Vec<Timed<Marker>>,
    pub analgesics: Vec<Timed<Analgesic>>,
    pub anesthetics: Vec<Timed<Anesthetic>>,
}

impl EffectSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every timed effect that no longer applies
    pub fn prune_expired(&mut self, tick: Tick) {
        self.consciousness.retain(|e| e.applies_at(tick));
        self.markers.retain(|e| e.applies_at(tick));
        self.analgesics.retain(|e| e.applies_at(tick));
        self.anesthetics.retain(|e| e.applies_at(tick));
    }

    // === MARKERS ===

    pub fn add_marker(&mut self, marker: Marker, expires_at: Option<Tick>) {
        self.markers.push(Timed {
            effect: marker,
            expires_at,
        });
    }

    pub fn remove_marker(&mut self, marker: Marker) {
        self.markers.retain(|m| m.effect != marker);
    }

    pub fn has_marker(&self, marker: Marker, tick: Tick) -> bool {
        self.markers
            .iter()
            .any(|m| m.effect == marker && m.applies_at(tick))
    }

    // === CONSCIOUSNESS ===

    pub fn add_consciousness(&mut self, effect: ConsciousnessEffect, expires_at: Option<Tick>) {
        self.consciousness.push(Timed { effect, expires_at });
    }

    pub fn remove_consciousness(&mut self, source: &str) {
        self.consciousness.retain(|c| c.effect.source != source);
    }

    /// Verdict of the earliest registered consciousness effect that applies
    pub fn consciousness_verdict(&self, tick: Tick) -> Option<HealthVerdict> {
        self.consciousness
            .iter()
            .find(|c| c.applies_at(tick))
            .map(|c| c.effect.verdict)
    }

    // === DRUGS ===

    pub fn add_analgesic(&mut self, analgesic: Analgesic, expires_at: Option<Tick>) {
        self.analgesics.push(Timed {
            effect: analgesic,
            expires_at,
        });
    }

    pub fn add_anesthetic(&mut self, anesthetic: Anesthetic, expires_at: Option<Tick>) {
        self.anesthetics.push(Timed {
            effect: anesthetic,
            expires_at,
        });
    }

    /// Pain after analgesic multipliers, then flat reductions, floored at 0
    pub fn effective_pain(&self, raw: f64, tick: Tick) -> f64 {
        let active = self.analgesics.iter().filter(|a| a.applies_at(tick));
        let (multiplier, flat) = active.fold((1.0, 0.0), |(m, f), a| {
            (m * a.effect.multiplier, f + a.effect.flat)
        });
        (raw * multiplier - flat).max(0.0)
    }

    pub fn anesthesia(&self, tick: Tick) -> f64 {
        self.anesthetics
            .iter()
            .filter(|a| a.applies_at(tick))
            .map(|a| a.effect.intensity)
            .sum()
    }

    // === CIRCULATION ===

    /// Add a substance to the blood, merging with any of the same kind
    pub fn inject(&mut self, consequence: AdditiveConsequence, volume: f64) {
        if !(volume.is_finite() && volume > 0.0) {
            return;
        }
        match self
            .additives
            .iter_mut()
            .find(|a| a.consequence == consequence)
        {
            Some(existing) => existing.volume += volume,
            None => self.additives.push(BloodAdditive {
                consequence,
                volume,
            }),
        }
    }

    pub fn additive_volume(&self, consequence: AdditiveConsequence) -> f64 {
        self.additives
            .iter()
            .filter(|a| a.consequence == consequence)
            .map(|a| a.volume)
            .sum()
    }

    pub fn start_internal_bleed(&mut self, organ: BodypartId, rate: f64) {
        if !(rate.is_finite() && rate > 0.0) {
            return;
        }
        match self.internal_bleeds.iter_mut().find(|b| b.organ == organ) {
            Some(existing) => existing.rate += rate,
            None => self.internal_bleeds.push(InternalBleed { organ, rate }),
        }
    }
}
