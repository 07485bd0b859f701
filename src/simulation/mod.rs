//! Time-dependent physiology driven by the scheduler's ticks

pub mod bleeding;
pub mod constants;
pub mod contamination;
pub mod hypoxia;
pub mod tick;

use serde::{Deserialize, Serialize};

pub use hypoxia::HypoxiaPressure;
pub use tick::perform_health_tick;

use crate::narrative::NarrativeEvent;
use crate::status::HealthVerdict;

/// What happened to one entity during one tick
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickReport {
    pub verdict: HealthVerdict,
    /// Litres lost through wounds
    pub blood_lost: f64,
    /// Litres lost to internal bleeding
    pub internal_blood_lost: f64,
    /// Total hypoxia pressure applied
    pub hypoxia: f64,
    /// Cellular damage dealt to each non-brain organ
    pub die_off: f64,
    pub narrative_events: Vec<NarrativeEvent>,
}
