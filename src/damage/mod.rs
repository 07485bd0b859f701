//! Incoming harm: damage types, events and the per-strategy applier

pub mod applier;
pub mod event;
pub mod kind;

pub use event::DamageEvent;
pub use kind::DamageType;
