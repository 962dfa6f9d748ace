use crate::{sampler::SampleError, types::Height};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("No permission: {reason}")]
    PermissionDenied { reason: String },

    #[error("Already initialized")]
    AlreadyInitialized,

    #[error("Invalid argument: {reason}")]
    InvalidArgument { reason: String },

    #[error("Invalid hash length: key is {len} bytes, limit is {limit}")]
    InvalidKey { len: usize, limit: usize },

    #[error("Invalid max value {requested}: must be within 1..={limit}")]
    InvalidRange { requested: i32, limit: i32 },

    #[error("Invalid random number count {requested}: must be within 1..={limit}")]
    InvalidCount { requested: i32, limit: i32 },

    #[error("Random number already generated for key '{key}'")]
    DuplicateKey { key: String },

    #[error("Still preparing randomness for height {height}, retry later")]
    RandomnessUnavailable { height: Height },

    #[error("Failed to generate random numbers: {accepted} of {requested} distinct values before the retry budget ran out")]
    GenerationExhausted { accepted: usize, requested: i32 },

    #[error("No sample recorded for key '{key}'")]
    NotFound { key: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ContractError {
    /// Stable snake_case name of the error kind, used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Database(_)                  => "database",
            Self::Serialization(_)             => "serialization",
            Self::PermissionDenied { .. }      => "permission_denied",
            Self::AlreadyInitialized           => "already_initialized",
            Self::InvalidArgument { .. }       => "invalid_argument",
            Self::InvalidKey { .. }            => "invalid_key",
            Self::InvalidRange { .. }          => "invalid_range",
            Self::InvalidCount { .. }          => "invalid_count",
            Self::DuplicateKey { .. }          => "duplicate_key",
            Self::RandomnessUnavailable { .. } => "randomness_unavailable",
            Self::GenerationExhausted { .. }   => "generation_exhausted",
            Self::NotFound { .. }              => "not_found",
            Self::Other(_)                     => "other",
        }
    }
}

impl From<SampleError> for ContractError {
    fn from(err: SampleError) -> Self {
        match err {
            SampleError::NonPositiveRange { max_value } => Self::InvalidRange {
                requested: max_value,
                limit: i32::MAX,
            },
            SampleError::CountOutOfRange { count, max_value } => Self::InvalidCount {
                requested: count,
                limit: max_value.max(0),
            },
            SampleError::Exhausted { accepted, requested } => Self::GenerationExhausted {
                accepted,
                requested,
            },
        }
    }
}

pub type ContractResult<T> = Result<T, ContractError>;
