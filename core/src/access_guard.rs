//! Configuration & access guard checks.
//!
//! RULE: Every check here is a pure function of the current config and
//! the request. Nothing in this module touches the store, so a failed
//! check can never leave partial state behind.
//!
//! Reads are lenient (defaults before initialization); writes are strict.

use crate::{
    config::ContractConfig,
    error::{ContractError, ContractResult},
    types::{display_key, Identity},
};

/// Longest accepted sample key, in bytes.
pub const MAX_KEY_LEN: usize = 100;

/// `Initialize` may run once, and only for the deploying authority.
pub fn check_initialize(
    config: &ContractConfig,
    caller: &Identity,
    deploying_authority: Option<&Identity>,
    max_value: i32,
    max_count: i32,
) -> ContractResult<()> {
    if config.initialized {
        return Err(ContractError::AlreadyInitialized);
    }
    match deploying_authority {
        Some(author) if author == caller => {}
        Some(author) => {
            return Err(ContractError::PermissionDenied {
                reason: format!("'{caller}' is not the contract author '{author}'"),
            });
        }
        None => {
            return Err(ContractError::PermissionDenied {
                reason: "deployment registry has no author for this contract".into(),
            });
        }
    }
    check_bound("max value limit", max_value)?;
    check_bound("max random number count", max_count)?;
    Ok(())
}

/// Only the current admin may mutate configuration.
pub fn check_admin(config: &ContractConfig, caller: &Identity) -> ContractResult<()> {
    match &config.admin {
        Some(admin) if admin == caller => Ok(()),
        _ => Err(ContractError::PermissionDenied {
            reason: format!("only admin can perform this action, caller is '{caller}'"),
        }),
    }
}

pub fn parse_admin(raw: &str) -> ContractResult<Identity> {
    Identity::parse(raw).map_err(|reason| ContractError::InvalidArgument {
        reason: format!("invalid admin address: {reason}"),
    })
}

pub fn check_bound(name: &str, value: i32) -> ContractResult<()> {
    if value > 0 {
        Ok(())
    } else {
        Err(ContractError::InvalidArgument {
            reason: format!("invalid {name} {value}: must be > 0"),
        })
    }
}

pub fn check_key(key: &[u8]) -> ContractResult<()> {
    if key.len() > MAX_KEY_LEN {
        log::debug!("rejecting key '{}': {} bytes", display_key(key), key.len());
        return Err(ContractError::InvalidKey {
            len:   key.len(),
            limit: MAX_KEY_LEN,
        });
    }
    Ok(())
}

/// Bound checks for `Generate`, in order: range first, then count.
pub fn check_request(config: &ContractConfig, max_value: i32, count: i32) -> ContractResult<()> {
    if max_value <= 0 || max_value > config.max_value {
        return Err(ContractError::InvalidRange {
            requested: max_value,
            limit:     config.max_value,
        });
    }
    // max_value > 0 here, so the count limit is positive whenever the
    // config is initialized.
    let count_limit = config.max_count.min(max_value);
    if count <= 0 || count > count_limit {
        return Err(ContractError::InvalidCount {
            requested: count,
            limit:     count_limit,
        });
    }
    Ok(())
}
