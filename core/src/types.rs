//! Shared primitive types used across the contract.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A ledger height. Supplied by the host with every call.
pub type Height = i64;

/// The caller-supplied seed. Used verbatim as the record key.
pub type SampleKey = Vec<u8>;

/// Longest accepted identity, in bytes.
pub const MAX_IDENTITY_LEN: usize = 128;

/// An account identity on the host ledger.
///
/// Well-formed means: non-empty, at most `MAX_IDENTITY_LEN` bytes,
/// no whitespace or control characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identity(String);

impl Identity {
    pub fn parse(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            return Err("identity is empty".into());
        }
        if raw.len() > MAX_IDENTITY_LEN {
            return Err(format!(
                "identity is {} bytes, limit is {MAX_IDENTITY_LEN}",
                raw.len()
            ));
        }
        if raw.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(format!("identity '{raw}' contains whitespace or control characters"));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Identity {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Identity> for String {
    fn from(id: Identity) -> Self {
        id.0
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Human-readable rendering of a key for logs and error messages.
pub fn display_key(key: &[u8]) -> String {
    String::from_utf8_lossy(key).into_owned()
}
