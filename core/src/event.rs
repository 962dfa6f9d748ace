//! Domain events emitted by the contract.
//!
//! RULE: An event is emitted only after the state change it describes
//! has been committed. A failed call emits nothing.

use crate::types::Height;
use serde::{Deserialize, Serialize};

/// Every event the contract emits.
/// Variants are added over time, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContractEvent {
    RandomNumberGenerated {
        values: Vec<i32>,
    },
}

impl ContractEvent {
    /// The event name as the host ledger knows it.
    pub fn name(&self) -> &'static str {
        match self {
            Self::RandomNumberGenerated { .. } => "RandomNumberGenerated",
        }
    }
}

/// The event log entry as persisted to SQLite.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventLogEntry {
    pub id:         Option<i64>,
    pub height:     Height,
    pub event_type: String,
    pub payload:    String, // JSON-serialized ContractEvent
}

impl EventLogEntry {
    pub fn from_event(height: Height, event: &ContractEvent) -> serde_json::Result<Self> {
        Ok(Self {
            id: None,
            height,
            event_type: event.name().to_string(),
            payload: serde_json::to_string(event)?,
        })
    }

    pub fn decode(&self) -> serde_json::Result<ContractEvent> {
        serde_json::from_str(&self.payload)
    }
}
