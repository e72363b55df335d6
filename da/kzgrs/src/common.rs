// std
use std::io;
// crates
use ark_bls12_381::fr::Fr;
use ark_ff::Zero;
use ark_poly::domain::general::GeneralEvaluationDomain;
use ark_poly::evaluations::univariate::Evaluations;
use ark_poly::univariate::DensePolynomial;
use ark_poly::EvaluationDomain;
use num_bigint::BigUint;
use thiserror::Error;
// internal
use crate::{FieldElement, MAX_CHUNK_SIZE};

#[derive(Error, Debug)]
pub enum KzgRsError {
    #[error("Data isn't properly padded, data len must match modulus {expected_modulus} but it is {current_size}")]
    UnpaddedDataError {
        expected_modulus: usize,
        current_size: usize,
    },
    #[error("ChunkSize should be <= 31 (bytes), got {0}")]
    ChunkSizeTooBig(usize),
    #[error("Cannot build an evaluation domain of size {0}")]
    DomainUnavailable(usize),
    #[error("Element index {index} is out of a domain of size {domain_size}")]
    IndexOutOfDomain { index: usize, domain_size: usize },
    #[error(transparent)]
    PolyCommitError(#[from] ark_poly_commit::Error),
    #[error("Denominator polynomial cannot be zero")]
    DivisionByZeroPolynomial,
    #[error("Global parameters (de)serialization failed: {0}")]
    Serialization(#[from] ark_serialize::SerializationError),
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Smallest power of two domain holding at least `size` evaluations.
pub fn evaluation_domain(size: usize) -> Result<GeneralEvaluationDomain<Fr>, KzgRsError> {
    GeneralEvaluationDomain::new(size).ok_or(KzgRsError::DomainUnavailable(size))
}

/// Transform chunks of bytes (of size `CHUNK_SIZE`) into `Fr` which are considered evaluations of a
/// polynomial. Evaluations past the end of `data` are zero.
pub fn bytes_to_evaluations<const CHUNK_SIZE: usize>(
    data: &[u8],
    domain: GeneralEvaluationDomain<Fr>,
) -> Evaluations<Fr> {
    assert!((data.len() % CHUNK_SIZE).is_zero());
    let mut evals: Vec<Fr> = data
        .chunks(CHUNK_SIZE)
        // use little endian for convenience as shortening 1 byte (<32 supported)
        // do not matter in this endianness
        .map(field_element_from_bytes_le_unchecked)
        .collect();
    evals.resize(domain.size().max(evals.len()), Fr::zero());
    Evaluations::from_vec_and_domain(evals, domain)
}

/// Transform chunks of bytes (of size `CHUNK_SIZE`) into `Fr` which are considered evaluations of a
/// polynomial. Then use FFT to transform that polynomial into coefficient form.
/// `CHUNK_SIZE` needs to be 31 (bytes) or less, otherwise it cannot be encoded.
/// The input data need to be padded, so it fits in a len modulus of `CHUNK_SIZE`.
/// Returns the polynomial in evaluation form and in coefficient form
pub fn bytes_to_polynomial<const CHUNK_SIZE: usize>(
    data: &[u8],
    domain: GeneralEvaluationDomain<Fr>,
) -> Result<(Evaluations<Fr>, DensePolynomial<Fr>), KzgRsError> {
    if CHUNK_SIZE > MAX_CHUNK_SIZE {
        return Err(KzgRsError::ChunkSizeTooBig(CHUNK_SIZE));
    }
    if data.len() % CHUNK_SIZE != 0 {
        return Err(KzgRsError::UnpaddedDataError {
            expected_modulus: CHUNK_SIZE,
            current_size: data.len(),
        });
    }
    if data.len() / CHUNK_SIZE > domain.size() {
        return Err(KzgRsError::DomainUnavailable(data.len() / CHUNK_SIZE));
    }
    let evals = bytes_to_evaluations::<CHUNK_SIZE>(data, domain);
    let coefficients = evals.interpolate_by_ref();
    Ok((evals, coefficients))
}

/// Transform up to [`MAX_CHUNK_SIZE`] little endian bytes into a field element.
///
/// Longer inputs are rejected rather than reduced, so every accepted input maps
/// to a distinct element.
pub fn field_element_from_bytes_le(b: &[u8]) -> Result<FieldElement, KzgRsError> {
    if b.len() > MAX_CHUNK_SIZE {
        return Err(KzgRsError::ChunkSizeTooBig(b.len()));
    }
    Ok(field_element_from_bytes_le_unchecked(b))
}

fn field_element_from_bytes_le_unchecked(b: &[u8]) -> FieldElement {
    FieldElement::from(BigUint::from_bytes_le(b))
}
