//! Certificates are the opaque keys handed out by a [`Store`](crate::Store).
//!
//! A certificate binds together the commitment to the blob contents, the
//! location of the blob in its backend and the original blob length. Its byte
//! form is `[version, body..]` where the body is the wire encoding of
//! [`Certificate`].
pub mod codec;

// crates
use serde::{Deserialize, Serialize};
use serde_with::{serde_as, Bytes};
// internal
use crate::blob::BlobHash;
use crate::store::BackendKind;

/// Size of a compressed BLS12-381 G1 point.
pub const KZG_COMMITMENT_SIZE: usize = 48;
/// Quorum ids are a `u8`, a locator never lists more than this many.
pub const MAX_QUORUMS: usize = 256;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CertificateVersion {
    V0 = 0,
}

impl CertificateVersion {
    pub const LATEST: Self = Self::V0;
}

impl TryFrom<u8> for CertificateVersion {
    type Error = u8;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::V0),
            other => Err(other),
        }
    }
}

#[serde_as]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Commitment {
    /// Compressed KZG commitment to the blob polynomial
    Kzg(#[serde_as(as = "Bytes")] [u8; KZG_COMMITMENT_SIZE]),
    /// Plain content hash, used by the in-memory backend
    ContentHash(BlobHash),
}

/// Where the DA network keeps a confirmed blob.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NetworkLocator {
    pub batch_header_hash: [u8; 32],
    pub blob_index: u32,
    pub reference_block_number: u32,
    pub quorum_numbers: Vec<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Locator {
    Network(NetworkLocator),
    Memory { key: BlobHash },
}

impl Locator {
    #[must_use]
    pub const fn backend(&self) -> BackendKind {
        match self {
            Self::Network(_) => BackendKind::Network,
            Self::Memory { .. } => BackendKind::Memory,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Certificate {
    commitment: Commitment,
    locator: Locator,
    blob_length: u64,
}

impl Certificate {
    #[must_use]
    pub const fn new(commitment: Commitment, locator: Locator, blob_length: u64) -> Self {
        Self {
            commitment,
            locator,
            blob_length,
        }
    }

    #[must_use]
    pub const fn commitment(&self) -> &Commitment {
        &self.commitment
    }

    #[must_use]
    pub const fn locator(&self) -> &Locator {
        &self.locator
    }

    #[must_use]
    pub const fn blob_length(&self) -> u64 {
        self.blob_length
    }

    /// Hex form used by the HTTP front end and in logs.
    #[must_use]
    pub fn to_hex(&self) -> String {
        const_hex::encode_prefixed(codec::encode(self))
    }
}
