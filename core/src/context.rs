//! Per-call request context.
//!
//! RULE: The contract never reads "who is calling" or "what height is
//! it" from anywhere but this struct. The host builds one per call.

use crate::types::{Height, Identity};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestContext {
    pub caller: Identity,
    pub height: Height,
}

impl RequestContext {
    pub fn new(caller: Identity, height: Height) -> Self {
        Self { caller, height }
    }
}
