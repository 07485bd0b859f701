//! Narrative side effects of physiology.
//!
//! The engine decides that something noteworthy happened and which kind of
//! message it is; a sink decides how (or whether) to show it.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::{BodypartId, EntityId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NarrativeEvent {
    /// Visible blood loss this tick
    Bleeding {
        bodypart: Option<BodypartId>,
        volume: f64,
    },
    /// Blood coughed up from the airway
    Cough { volume: f64 },
    /// Blood vomited from the digestive tract
    Vomit { volume: f64 },
}

#[derive(Error, Debug)]
pub enum NarrativeError {
    #[error("No template for {0}")]
    MissingTemplate(String),

    #[error("Narrative channel closed")]
    ChannelClosed,
}

pub trait NarrativeSink {
    fn emit(&mut self, entity: EntityId, event: NarrativeEvent) -> Result<(), NarrativeError>;
}

/// Collects every event in order
#[derive(Debug, Clone, Default)]
pub struct NarrativeLog {
    pub events: Vec<(EntityId, NarrativeEvent)>,
}

impl NarrativeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_entity(&self, entity: EntityId) -> impl Iterator<Item = &NarrativeEvent> {
        self.events
            .iter()
            .filter(move |(id, _)| *id == entity)
            .map(|(_, event)| event)
    }
}

impl NarrativeSink for NarrativeLog {
    fn emit(&mut self, entity: EntityId, event: NarrativeEvent) -> Result<(), NarrativeError> {
        self.events.push((entity, event));
        Ok(())
    }
}

/// Drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardNarrative;

impl NarrativeSink for DiscardNarrative {
    fn emit(&mut self, _entity: EntityId, _event: NarrativeEvent) -> Result<(), NarrativeError> {
        Ok(())
    }
}
