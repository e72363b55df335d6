// std
use std::sync::Arc;

// crates
use ark_poly::EvaluationDomain;
use da_kzgrs::{
    evaluation_domain, field_element_from_bytes_le, verify_element_proof, GlobalParameters,
};
use tracing::debug;

// internal
use crate::common::{commitment_from_bytes, commitment_to_bytes, ElementProof, CHUNK_SIZE};
use crate::encoder::{BlobEncoder, EncoderError};

/// Reasons an input is refused before any commitment comparison takes place.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("Blob of {size} bytes exceeds the {max} bytes the setup can commit to")]
    BlobTooLarge { size: usize, max: usize },
    #[error("Invalid commitment: {0}")]
    Commitment(String),
    #[error("Chunk of {0} bytes does not fit a field element")]
    Chunk(usize),
    #[error("Unsupported evaluation domain of size {0}")]
    Domain(usize),
    #[error("Element index {index} is out of a domain of size {domain_size}")]
    IndexOutOfDomain { index: usize, domain_size: usize },
}

#[derive(Debug, thiserror::Error)]
pub enum VerifierError {
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] InputError),
    #[error("Setup parameters unavailable: {0}")]
    SetupUnavailable(String),
    #[error("Commitment does not open to the provided data")]
    VerificationFailed,
}

impl From<EncoderError> for VerifierError {
    fn from(error: EncoderError) -> Self {
        match error {
            EncoderError::BlobTooLarge { size, max } => InputError::BlobTooLarge { size, max }.into(),
            EncoderError::EmptySetup => Self::SetupUnavailable("no powers of g".to_string()),
            EncoderError::Kzg(error) => Self::SetupUnavailable(error.to_string()),
        }
    }
}

/// Checks blobs against KZG commitments, either whole or one element at a time.
#[derive(Clone)]
pub struct DaVerifier {
    encoder: BlobEncoder,
}

impl DaVerifier {
    pub fn new(global_parameters: Arc<GlobalParameters>) -> Result<Self, VerifierError> {
        Ok(Self {
            encoder: BlobEncoder::new(global_parameters)?,
        })
    }

    pub fn encoder(&self) -> &BlobEncoder {
        &self.encoder
    }

    pub const fn max_blob_size(&self) -> usize {
        self.encoder.max_blob_size()
    }

    /// Verifies `data` against the compressed `commitment`.
    ///
    /// Without a proof `data` is the whole blob and its commitment is recomputed. With a proof
    /// `data` is the single chunk opened by it.
    pub fn verify(
        &self,
        data: &[u8],
        commitment: &[u8],
        proof: Option<&ElementProof>,
    ) -> Result<(), VerifierError> {
        let decoded = commitment_from_bytes(commitment)
            .map_err(|e| InputError::Commitment(e.to_string()))?;
        let valid = match proof {
            None => {
                let recomputed = commitment_to_bytes(&self.encoder.commitment(data)?)
                    .map_err(EncoderError::from)?;
                recomputed.as_slice() == commitment
            }
            Some(proof) => self.verify_element(data, &decoded, proof)?,
        };
        if valid {
            Ok(())
        } else {
            debug!(len = data.len(), partial = proof.is_some(), "commitment mismatch");
            Err(VerifierError::VerificationFailed)
        }
    }

    /// Same as [`Self::verify`] with a mismatch reported as `false`. Malformed inputs and setup
    /// failures are still errors.
    pub fn is_valid(
        &self,
        data: &[u8],
        commitment: &[u8],
        proof: Option<&ElementProof>,
    ) -> Result<bool, VerifierError> {
        match self.verify(data, commitment, proof) {
            Ok(()) => Ok(true),
            Err(VerifierError::VerificationFailed) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn verify_element(
        &self,
        chunk: &[u8],
        commitment: &da_kzgrs::Commitment,
        proof: &ElementProof,
    ) -> Result<bool, VerifierError> {
        if chunk.len() > CHUNK_SIZE {
            return Err(InputError::Chunk(chunk.len()).into());
        }
        let max_domain_size = self.max_blob_size() / CHUNK_SIZE + 1;
        if proof.domain_size == 0 || proof.domain_size > max_domain_size {
            return Err(InputError::Domain(proof.domain_size).into());
        }
        let domain = evaluation_domain(proof.domain_size)
            .map_err(|_| InputError::Domain(proof.domain_size))?;
        if domain.size() != proof.domain_size {
            return Err(InputError::Domain(proof.domain_size).into());
        }
        if proof.index >= proof.domain_size {
            return Err(InputError::IndexOutOfDomain {
                index: proof.index,
                domain_size: proof.domain_size,
            }
            .into());
        }
        let element = field_element_from_bytes_le(chunk)
            .map_err(|_| InputError::Chunk(chunk.len()))?;
        Ok(verify_element_proof(
            proof.index,
            &element,
            commitment,
            &proof.proof,
            domain,
            self.encoder.global_parameters(),
        ))
    }
}
