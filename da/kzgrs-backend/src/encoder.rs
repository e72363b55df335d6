// std
use std::sync::Arc;

// crates
use ark_poly::EvaluationDomain;
use da_core::KZG_COMMITMENT_SIZE;
use da_kzgrs::{
    bytes_to_polynomial, commit_polynomial, evaluation_domain, generate_element_proof, Commitment,
    Evaluations, GlobalParameters, KzgRsError, Polynomial, PolynomialEvaluationDomain,
};

// internal
use crate::common::{commitment_to_bytes, ElementProof, CHUNK_SIZE};

/// Bytes at the start of the header chunk holding the blob length.
const LENGTH_PREFIX_SIZE: usize = std::mem::size_of::<u64>();

#[derive(Debug, thiserror::Error)]
pub enum EncoderError {
    #[error("Blob of {size} bytes exceeds the {max} bytes the setup can commit to")]
    BlobTooLarge { size: usize, max: usize },
    #[error("Setup parameters are empty")]
    EmptySetup,
    #[error(transparent)]
    Kzg(#[from] KzgRsError),
}

pub struct EncodedBlob {
    /// Header chunk followed by the blob, zero padded to a whole number of chunks.
    pub padded: Vec<u8>,
    pub evaluations: Evaluations,
    pub polynomial: Polynomial,
    pub commitment: Commitment,
    pub domain: PolynomialEvaluationDomain,
}

impl EncodedBlob {
    /// Chunk opened at `index`. Points past the padded data evaluate to zero and yield an empty
    /// chunk.
    pub fn chunk(&self, index: usize) -> &[u8] {
        let start = (index * CHUNK_SIZE).min(self.padded.len());
        let end = (start + CHUNK_SIZE).min(self.padded.len());
        &self.padded[start..end]
    }

    pub fn domain_size(&self) -> usize {
        self.domain.size()
    }

    pub fn commitment_bytes(&self) -> Result<[u8; KZG_COMMITMENT_SIZE], KzgRsError> {
        commitment_to_bytes(&self.commitment)
    }
}

/// Commits blobs as polynomials in evaluation form.
///
/// Evaluation `0` is a header chunk carrying the blob length as a little endian `u64`. The blob
/// follows in chunks of [`CHUNK_SIZE`] bytes. The domain is the smallest power of two holding every
/// chunk. Committing the length keeps blobs that only differ by trailing zeroes apart.
#[derive(Clone)]
pub struct BlobEncoder {
    global_parameters: Arc<GlobalParameters>,
    max_blob_size: usize,
}

impl BlobEncoder {
    pub fn new(global_parameters: Arc<GlobalParameters>) -> Result<Self, EncoderError> {
        let max_blob_size =
            max_blob_size(&global_parameters).ok_or(EncoderError::EmptySetup)?;
        Ok(Self {
            global_parameters,
            max_blob_size,
        })
    }

    pub fn global_parameters(&self) -> &GlobalParameters {
        &self.global_parameters
    }

    pub const fn max_blob_size(&self) -> usize {
        self.max_blob_size
    }

    fn pad(blob: &[u8]) -> Vec<u8> {
        let chunks = 1 + blob.len().div_ceil(CHUNK_SIZE);
        let mut padded = vec![0u8; chunks * CHUNK_SIZE];
        padded[..LENGTH_PREFIX_SIZE].copy_from_slice(&(blob.len() as u64).to_le_bytes());
        padded[CHUNK_SIZE..CHUNK_SIZE + blob.len()].copy_from_slice(blob);
        padded
    }

    pub fn encode(&self, blob: &[u8]) -> Result<EncodedBlob, EncoderError> {
        if blob.len() > self.max_blob_size {
            return Err(EncoderError::BlobTooLarge {
                size: blob.len(),
                max: self.max_blob_size,
            });
        }
        let padded = Self::pad(blob);
        let domain = evaluation_domain(padded.len() / CHUNK_SIZE)?;
        let (evaluations, polynomial) = bytes_to_polynomial::<CHUNK_SIZE>(&padded, domain)?;
        let commitment = commit_polynomial(&polynomial, &self.global_parameters)?;
        Ok(EncodedBlob {
            padded,
            evaluations,
            polynomial,
            commitment,
            domain,
        })
    }

    pub fn commitment(&self, blob: &[u8]) -> Result<Commitment, EncoderError> {
        Ok(self.encode(blob)?.commitment)
    }

    pub fn element_proof(
        &self,
        encoded: &EncodedBlob,
        index: usize,
    ) -> Result<ElementProof, EncoderError> {
        let proof = generate_element_proof(
            index,
            &encoded.polynomial,
            &encoded.evaluations,
            &self.global_parameters,
            encoded.domain,
        )?;
        Ok(ElementProof {
            index,
            domain_size: encoded.domain_size(),
            proof,
        })
    }
}

/// Largest blob committable with `global_parameters`, `None` if the setup holds no powers.
///
/// The evaluation domain is a power of two no larger than the number of powers available, and one
/// of its points is taken by the header chunk.
pub fn max_blob_size(global_parameters: &GlobalParameters) -> Option<usize> {
    let powers = global_parameters.powers_of_g.len();
    if powers == 0 {
        return None;
    }
    let capacity = 1usize << powers.ilog2();
    Some((capacity - 1) * CHUNK_SIZE)
}
