use crate::types::Identity;
use anyhow::Context;
use serde::{Deserialize, Serialize};

/// The contract's persisted configuration.
///
/// Before `Initialize` this is the default: no admin, zero bounds,
/// not initialized. Reads return it as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractConfig {
    pub admin:       Option<Identity>,
    pub max_value:   i32,
    pub max_count:   i32,
    pub initialized: bool,
}

// ── Host settings ─────────────────────────────────────────────────

fn default_beacon_seed() -> u64 {
    0x5EED_0000_0000_0001
}

fn default_auto_finalize() -> bool {
    true
}

/// Settings the host harness needs to stand a contract up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractSettings {
    /// Address the contract is deployed at.
    pub contract_address: Identity,
    /// Identity the deployment registry reports as the deployer.
    pub deployer:         Identity,
    /// Master seed for the simulated randomness beacon.
    #[serde(default = "default_beacon_seed")]
    pub beacon_seed:      u64,
    /// Finalize the beacon through each call's height before dispatch.
    #[serde(default = "default_auto_finalize")]
    pub auto_finalize:    bool,
}

impl ContractSettings {
    /// Load from a JSON settings file.
    /// In tests, use ContractSettings::default_test().
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read settings file {path}"))?;
        let settings: ContractSettings = serde_json::from_str(&content)
            .with_context(|| format!("Malformed settings file {path}"))?;
        Ok(settings)
    }

    /// Settings with hardcoded defaults for use in tests.
    pub fn default_test() -> Self {
        Self {
            contract_address: Identity::parse("contract-random").expect("valid test identity"),
            deployer:         Identity::parse("deployer").expect("valid test identity"),
            beacon_seed:      default_beacon_seed(),
            auto_finalize:    true,
        }
    }
}
