//! The contract's view of its host ledger.
//!
//! RULE: The contract talks to the outside world only through the three
//! traits below. Production hosts supply their own implementations;
//! the ones in this module back the runner and the tests.

use crate::{
    event::ContractEvent,
    rng::HeightRng,
    types::{Height, Identity},
};
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex},
};

/// Answers "who deployed the contract at this address?".
pub trait DeploymentRegistry: Send {
    fn deploying_authority(&self, contract: &Identity) -> Option<Identity>;
}

/// Per-height unpredictable digests supplied by consensus.
pub trait RandomnessSource: Send {
    /// The digest for `height`, or `None` while it is not yet final.
    /// An empty vec is treated the same as `None` by the contract.
    fn digest_for_height(&self, height: Height) -> Option<Vec<u8>>;

    /// Host hook: consensus has finalized every height up to `height`.
    /// Sources that are always final ignore it.
    fn finalize_through(&mut self, _height: Height) {}
}

/// Fire-and-forget event transport.
pub trait EventSink: Send {
    fn emit(&self, event: &ContractEvent);
}

// ── Deployment registry ─────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct StaticRegistry {
    authors: BTreeMap<Identity, Identity>,
}

impl StaticRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_author(mut self, contract: Identity, author: Identity) -> Self {
        self.authors.insert(contract, author);
        self
    }
}

impl DeploymentRegistry for StaticRegistry {
    fn deploying_authority(&self, contract: &Identity) -> Option<Identity> {
        self.authors.get(contract).cloned()
    }
}

// ── Randomness ──────────────────────────────────────────────────────

/// Fixed digests keyed by height. Heights without an entry are not final.
#[derive(Debug, Clone, Default)]
pub struct StaticDigests {
    digests: BTreeMap<Height, Vec<u8>>,
}

impl StaticDigests {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_digest(mut self, height: Height, digest: Vec<u8>) -> Self {
        self.digests.insert(height, digest);
        self
    }
}

impl RandomnessSource for StaticDigests {
    fn digest_for_height(&self, height: Height) -> Option<Vec<u8>> {
        self.digests.get(&height).cloned()
    }
}

/// Deterministic beacon: every height has a digest derived from the
/// master seed, published once the height has been finalized.
#[derive(Debug, Clone)]
pub struct SimulatedBeacon {
    master_seed:       u64,
    finalized_through: Option<Height>,
}

impl SimulatedBeacon {
    pub fn new(master_seed: u64) -> Self {
        Self {
            master_seed,
            finalized_through: None,
        }
    }

    pub fn finalized_through(&self) -> Option<Height> {
        self.finalized_through
    }
}

impl RandomnessSource for SimulatedBeacon {
    fn digest_for_height(&self, height: Height) -> Option<Vec<u8>> {
        match self.finalized_through {
            Some(final_height) if height <= final_height => {
                Some(HeightRng::new(self.master_seed, height).digest().to_vec())
            }
            _ => None,
        }
    }

    fn finalize_through(&mut self, height: Height) {
        // Finality never moves backwards.
        if self.finalized_through.is_none_or(|h| height > h) {
            self.finalized_through = Some(height);
        }
    }
}

// ── Event sinks ─────────────────────────────────────────────────────

/// Writes every event through the `log` facade.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &ContractEvent) {
        match event {
            ContractEvent::RandomNumberGenerated { values } => {
                log::info!("event {}: {values:?}", event.name());
            }
        }
    }
}

/// Collects events in memory. Clones share the same buffer, so a test
/// can keep one handle and give the other to the contract.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    events: Arc<Mutex<Vec<ContractEvent>>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ContractEvent> {
        self.events
            .lock()
            .map(|events| events.clone())
            .unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &ContractEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: &str) -> Identity {
        Identity::parse(raw).unwrap()
    }

    #[test]
    fn registry_reports_known_author_only() {
        let registry = StaticRegistry::new().with_author(id("c1"), id("alice"));
        assert_eq!(registry.deploying_authority(&id("c1")), Some(id("alice")));
        assert_eq!(registry.deploying_authority(&id("c2")), None);
    }

    #[test]
    fn beacon_publishes_only_final_heights() {
        let mut beacon = SimulatedBeacon::new(42);
        assert_eq!(beacon.digest_for_height(1), None);

        beacon.finalize_through(10);
        let d10 = beacon.digest_for_height(10).unwrap();
        assert_eq!(d10.len(), 32);
        assert_eq!(beacon.digest_for_height(11), None);

        // Going backwards is ignored.
        beacon.finalize_through(5);
        assert_eq!(beacon.finalized_through(), Some(10));
        assert_eq!(beacon.digest_for_height(10), Some(d10));
    }

    #[test]
    fn recording_sink_shares_buffer_between_clones() {
        let sink = RecordingSink::new();
        let handle = sink.clone();
        sink.emit(&ContractEvent::RandomNumberGenerated { values: vec![1] });
        assert_eq!(handle.events().len(), 1);
    }
}
