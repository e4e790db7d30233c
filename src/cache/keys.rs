//! Cache key composition.
//!
//! Factor values are ordered by factor name, joined with [`FACTOR_SEPARATOR`],
//! ASCII upper-cased as a whole and hashed with SHA-256.

use std::fmt;

use sha2::{Digest, Sha256};

use super::factor::FactorResult;

/// Separator placed between factor values.
pub const FACTOR_SEPARATOR: char = '|';

/// Hex-encoded SHA-256 digest identifying a resolver result variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ResolverCacheKey(String);

impl ResolverCacheKey {
    /// Hash an already canonicalized factor string.
    pub fn from_canonical(canonical: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(canonical.as_bytes());
        Self(hex::encode(hasher.finalize()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ResolverCacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ResolverCacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Build the canonical string hashed into a key.
///
/// Factors are sorted by name (byte-wise); equal names fall back to the value
/// so duplicates cannot make the result depend on registration order.
pub fn canonicalize(mut factors: Vec<FactorResult>) -> String {
    factors.sort_unstable();

    let mut joined = String::new();
    for (index, factor) in factors.iter().enumerate() {
        if index > 0 {
            joined.push(FACTOR_SEPARATOR);
        }
        joined.push_str(&factor.value);
    }
    joined.make_ascii_uppercase();
    joined
}

/// Compose a key from the factors that resolved successfully.
///
/// Returns `None` when no factor survived.
pub fn compose(factors: Vec<FactorResult>) -> Option<ResolverCacheKey> {
    if factors.is_empty() {
        return None;
    }
    Some(ResolverCacheKey::from_canonical(&canonicalize(factors)))
}
