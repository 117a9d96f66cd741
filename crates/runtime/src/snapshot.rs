//! Opaque session snapshots.
//!
//! A snapshot is the bincode encoding of a [`CombatSession`] plus a hex
//! SHA-256 digest of those bytes. Callers store and hand back the whole
//! value; restoring recomputes the digest before decoding.

use combat_core::CombatSession;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{Result, RuntimeError};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    bytes: Vec<u8>,
    digest: String,
}

impl SessionSnapshot {
    /// Encodes the full session, including status effects and buffered events.
    pub fn capture(session: &CombatSession) -> Result<Self> {
        let bytes = bincode::serialize(session).map_err(RuntimeError::Snapshot)?;
        let digest = digest_hex(&bytes);
        Ok(Self { bytes, digest })
    }

    /// Decodes the session after checking the digest.
    pub fn restore(&self) -> Result<CombatSession> {
        self.verify()?;
        bincode::deserialize(&self.bytes).map_err(RuntimeError::Snapshot)
    }

    pub fn verify(&self) -> Result<()> {
        let actual = digest_hex(&self.bytes);
        if actual != self.digest {
            return Err(RuntimeError::DigestMismatch {
                expected: self.digest.clone(),
                actual,
            });
        }
        Ok(())
    }

    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

fn digest_hex(bytes: &[u8]) -> String {
    hex::encode(Sha256::digest(bytes))
}
