use crate::{
    context::RequestContext,
    contract::RandomContract,
    error::ContractResult,
    types::{Height, Identity},
};
use serde::{Deserialize, Serialize};

/// Every operation a host can submit to the contract.
/// Variants are added over time, never removed or reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "cmd", rename_all = "snake_case")]
pub enum ContractCommand {
    // ── Configuration & access guard ──────────────
    Initialize {
        caller:    Identity,
        height:    Height,
        max_value: i32,
        max_count: i32,
    },
    SetAdmin {
        caller:    Identity,
        height:    Height,
        new_admin: String,
    },
    SetMaxValue {
        caller:    Identity,
        height:    Height,
        max_value: i32,
    },
    SetMaxCount {
        caller:    Identity,
        height:    Height,
        max_count: i32,
    },
    GetAdmin,
    GetMaxValue,
    GetMaxCount,
    IsInitialized,

    // ── Sampler ───────────────────────────────────
    Generate {
        caller:    Identity,
        height:    Height,
        key:       String,
        max_value: i32,
        count:     i32,
    },
    GetSample {
        key: String,
    },
    VerifySample {
        key: String,
    },
}

impl ContractCommand {
    /// Height the command executes at, for mutating commands.
    pub fn height(&self) -> Option<Height> {
        match self {
            Self::Initialize { height, .. }
            | Self::SetAdmin { height, .. }
            | Self::SetMaxValue { height, .. }
            | Self::SetMaxCount { height, .. }
            | Self::Generate { height, .. } => Some(*height),
            _ => None,
        }
    }
}

/// What a successful command returns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CommandReply {
    Done,
    Admin(Option<Identity>),
    Bound(i32),
    Flag(bool),
    Values(Vec<i32>),
    Sample(Option<Vec<i32>>),
}

/// Route a command to the matching contract operation.
pub fn execute(contract: &mut RandomContract, command: ContractCommand) -> ContractResult<CommandReply> {
    let reply = match command {
        ContractCommand::Initialize { caller, height, max_value, max_count } => {
            contract.initialize(&RequestContext::new(caller, height), max_value, max_count)?;
            CommandReply::Done
        }
        ContractCommand::SetAdmin { caller, height, new_admin } => {
            contract.set_admin(&RequestContext::new(caller, height), &new_admin)?;
            CommandReply::Done
        }
        ContractCommand::SetMaxValue { caller, height, max_value } => {
            contract.set_max_value(&RequestContext::new(caller, height), max_value)?;
            CommandReply::Done
        }
        ContractCommand::SetMaxCount { caller, height, max_count } => {
            contract.set_max_count(&RequestContext::new(caller, height), max_count)?;
            CommandReply::Done
        }
        ContractCommand::GetAdmin => CommandReply::Admin(contract.admin()?),
        ContractCommand::GetMaxValue => CommandReply::Bound(contract.max_value()?),
        ContractCommand::GetMaxCount => CommandReply::Bound(contract.max_count()?),
        ContractCommand::IsInitialized => CommandReply::Flag(contract.is_initialized()?),
        ContractCommand::Generate { caller, height, key, max_value, count } => {
            let ctx = RequestContext::new(caller, height);
            CommandReply::Values(contract.generate(&ctx, key.as_bytes(), max_value, count)?)
        }
        ContractCommand::GetSample { key } => CommandReply::Sample(contract.sample(key.as_bytes())?),
        ContractCommand::VerifySample { key } => {
            CommandReply::Flag(contract.verify_sample(key.as_bytes())?)
        }
    };
    Ok(reply)
}
