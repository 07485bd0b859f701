//! Anatomy queried by the health engine
//!
//! Body plans are owned elsewhere in the simulation; this crate only reads
//! them.

pub mod body;

pub use body::{BodyPlan, BodyPlanBuilder, Bodypart, BodypartKind, CirculatoryFluid, OrganKind};
