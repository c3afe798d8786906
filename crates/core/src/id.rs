//! Opaque record identifiers.

use core::str::FromStr;

use rand::RngCore;
use rand::rngs::OsRng;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Number of random bytes behind an identifier (hex encoded → 16 chars).
const ID_BYTES: usize = 8;

/// Identifier of an item or movement.
///
/// Generated from the OS CSPRNG; collisions are treated as negligible and no
/// uniqueness check is performed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Create a new random identifier.
    pub fn generate() -> Self {
        let mut bytes = [0u8; ID_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for RecordId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.len() != ID_BYTES * 2 {
            return Err(DomainError::field("id", format!("id must be {} hex characters", ID_BYTES * 2)));
        }
        hex::decode(s).map_err(|e| DomainError::field("id", format!("id is not valid hex: {e}")))?;
        Ok(Self(s.to_ascii_lowercase()))
    }
}
