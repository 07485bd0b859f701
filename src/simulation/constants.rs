//! Physiology constants - all tunable values in one place
//!
//! Volumes are litres, rates are per tick.

use crate::severity::SeverityTier;

// Wound bleeding
pub fn bleed_rate(severity: SeverityTier) -> f64 {
    match severity {
        SeverityTier::None | SeverityTier::Superficial | SeverityTier::Minor => 0.0,
        SeverityTier::Small => 0.005,
        SeverityTier::Moderate => 0.015,
        SeverityTier::Severe => 0.04,
        SeverityTier::VerySevere => 0.08,
        SeverityTier::Grievous => 0.15,
        SeverityTier::Horrifying => 0.3,
    }
}

/// Bleeding ticks before a wound clots; `None` never clots unaided
pub fn clot_ticks(severity: SeverityTier) -> Option<u32> {
    match severity {
        SeverityTier::None | SeverityTier::Superficial | SeverityTier::Minor => Some(0),
        SeverityTier::Small => Some(6),
        SeverityTier::Moderate => Some(12),
        SeverityTier::Severe => Some(30),
        SeverityTier::VerySevere | SeverityTier::Grievous | SeverityTier::Horrifying => None,
    }
}

// Internal bleeding
pub const INTERNAL_BLEED_PER_DAMAGE: f64 = 0.002;
pub const INTERNAL_BLEED_GROWTH: f64 = 0.02;
pub const INTERNAL_BLEED_TAPER_CHANCE: f64 = 0.15;
pub const INTERNAL_BLEED_TAPER_FACTOR: f64 = 0.5;
pub const INTERNAL_BLEED_RESOLVED: f64 = 0.0005;

// Pooled blood
pub const COUGH_THRESHOLD: f64 = 0.1;
pub const VOMIT_THRESHOLD: f64 = 0.25;

// Hypoxia
pub const HEART_HYPOXIA_FUNCTION: f64 = 0.5;
pub const BLOOD_HYPOXIA_SCALE: f64 = 5.0;
pub const BLOOD_HYPOXIA_EXPONENT: f64 = 2.0;
pub const CONTAMINATION_HYPOXIA_SCALE: f64 = 2.0;
pub const SUFFOCATION_PRESSURE: f64 = 1.0;
pub const HYPOXIA_DAMAGE_PER_PRESSURE: f64 = 0.5;
pub const BREATH_RECOVERY_PER_TICK: u32 = 3;

// Contamination
pub const DIE_OFF_PER_LITRE: f64 = 1.0;
pub const DEADLY_DIE_OFF_WEIGHT: f64 = 4.0;
/// Litres an organ at full function clears per tick
pub const ADDITIVE_CLEARANCE_PER_TICK: f64 = 0.005;
