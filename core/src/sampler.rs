//! Deterministic hash-chain sampler.
//!
//! RULE: Everything in this module is pure. Same seed, same external
//! digest, same bounds: same output, on every node, forever.
//!
//! The chain:
//!   seed_digest = H(seed)
//!   link_0      = H(seed_digest XOR external)
//!   link_i+1    = H(seed_digest XOR link_i)
//!
//! Candidate i is the first four bytes of link_i read as a big-endian
//! signed 32-bit word, absolute value with wraparound, reduced into
//! [0, max_value). Changing any step changes every stored result, so
//! none of this may be "tidied up".

use sha2::{Digest, Sha256};
use thiserror::Error;

pub const DIGEST_LEN: usize = 32;

pub type Digest32 = [u8; DIGEST_LEN];

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SampleError {
    #[error("max value {max_value} is not positive")]
    NonPositiveRange { max_value: i32 },

    #[error("count {count} is outside 1..={max_value}")]
    CountOutOfRange { count: i32, max_value: i32 },

    #[error("retry budget exhausted with {accepted} of {requested} distinct values")]
    Exhausted { accepted: usize, requested: i32 },
}

pub fn hash_bytes(bytes: &[u8]) -> Digest32 {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hasher.finalize().into()
}

/// Byte-wise XOR over the longer operand; the shorter one is zero-padded.
pub fn xor_bytes(a: &[u8], b: &[u8]) -> Vec<u8> {
    let len = a.len().max(b.len());
    (0..len)
        .map(|i| a.get(i).copied().unwrap_or(0) ^ b.get(i).copied().unwrap_or(0))
        .collect()
}

pub fn xor_and_hash(a: &[u8], b: &[u8]) -> Digest32 {
    hash_bytes(&xor_bytes(a, b))
}

/// First four bytes as a signed big-endian word, absolute value.
/// `i32::MIN` wraps to itself.
pub fn raw_candidate(link: &Digest32) -> i32 {
    i32::from_be_bytes([link[0], link[1], link[2], link[3]]).wrapping_abs()
}

/// Reduce a raw candidate into [0, max_value).
///
/// For every non-negative raw value this equals the truncating `%`.
/// The only negative raw value is the wrapped `i32::MIN`, which the
/// euclidean remainder keeps inside the range.
pub fn reduce(raw: i32, max_value: i32) -> i32 {
    debug_assert!(max_value > 0, "max_value must be > 0");
    raw.rem_euclid(max_value)
}

/// Infinite stream of chain links, starting at link_0.
#[derive(Debug, Clone)]
pub struct HashChain {
    seed_digest: Digest32,
    link:        Digest32,
}

impl HashChain {
    pub fn new(seed: &[u8], external_digest: &[u8]) -> Self {
        let seed_digest = hash_bytes(seed);
        let link = xor_and_hash(&seed_digest, external_digest);
        Self { seed_digest, link }
    }

    /// Candidate values in [0, max_value), one per link.
    pub fn candidates(self, max_value: i32) -> impl Iterator<Item = i32> {
        self.map(move |link| reduce(raw_candidate(&link), max_value))
    }
}

impl Iterator for HashChain {
    type Item = Digest32;

    fn next(&mut self) -> Option<Digest32> {
        let current = self.link;
        self.link = xor_and_hash(&self.seed_digest, &current);
        Some(current)
    }
}

/// Accept candidates in order, skipping values already accepted.
///
/// Every duplicate spends one unit of a budget equal to `count`.
/// Spending the last unit fails the draw, so at most `count - 1`
/// duplicates are tolerated.
pub fn collect_distinct<I>(candidates: I, count: usize) -> Result<Vec<i32>, SampleError>
where
    I: IntoIterator<Item = i32>,
{
    let mut accepted: Vec<i32> = Vec::with_capacity(count);
    if count == 0 {
        return Ok(accepted);
    }
    let mut duplicates = 0usize;

    for candidate in candidates {
        if accepted.contains(&candidate) {
            duplicates += 1;
            if duplicates >= count {
                break;
            }
            continue;
        }
        accepted.push(candidate);
        if accepted.len() == count {
            return Ok(accepted);
        }
    }

    Err(SampleError::Exhausted {
        accepted: accepted.len(),
        requested: i32::try_from(count).unwrap_or(i32::MAX),
    })
}

/// Draw `count` distinct integers in [0, max_value) from the chain
/// seeded by `seed` and `external_digest`.
pub fn sample_distinct(
    seed: &[u8],
    external_digest: &[u8],
    max_value: i32,
    count: i32,
) -> Result<Vec<i32>, SampleError> {
    if max_value <= 0 {
        return Err(SampleError::NonPositiveRange { max_value });
    }
    if count <= 0 || count > max_value {
        return Err(SampleError::CountOutOfRange { count, max_value });
    }

    let chain = HashChain::new(seed, external_digest);
    // count > 0 was checked above.
    collect_distinct(chain.candidates(max_value), count as usize)
}
