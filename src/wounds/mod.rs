//! Wound records and healing

pub mod healing;
pub mod wound;

pub use healing::{healing_params, HealChannel, Outcome};
pub use wound::{BleedOutcome, BleedStatus, Harm, Wound, WoundKind};
