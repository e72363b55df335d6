// crates
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize, SerializationError};
use da_core::KZG_COMMITMENT_SIZE;
use da_kzgrs::{Commitment, KzgRsError, Proof, MAX_CHUNK_SIZE};

/// Opening of a single evaluation of a committed blob polynomial.
///
/// `index` addresses a point of the evaluation domain of size `domain_size`. The value opened at
/// that point is the `index`-th chunk of the encoded blob (see [`crate::encoder`]).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ElementProof {
    pub index: usize,
    pub domain_size: usize,
    pub proof: Proof,
}

/// Bytes carried by each evaluation of the blob polynomial.
pub const CHUNK_SIZE: usize = MAX_CHUNK_SIZE;

pub fn commitment_to_bytes(
    commitment: &Commitment,
) -> Result<[u8; KZG_COMMITMENT_SIZE], KzgRsError> {
    let mut buff = [0u8; KZG_COMMITMENT_SIZE];
    commitment.serialize_compressed(&mut buff[..])?;
    Ok(buff)
}

/// Decodes a compressed G1 commitment. Points off the curve or outside the prime order subgroup
/// are rejected, and so is any encoding other than the canonical 48 bytes of the point, such as
/// junk after an infinity flag.
pub fn commitment_from_bytes(bytes: &[u8]) -> Result<Commitment, KzgRsError> {
    if bytes.len() != KZG_COMMITMENT_SIZE {
        return Err(SerializationError::InvalidData.into());
    }
    let commitment = Commitment::deserialize_compressed(bytes)?;
    if commitment_to_bytes(&commitment)? != bytes {
        return Err(SerializationError::InvalidData.into());
    }
    Ok(commitment)
}
