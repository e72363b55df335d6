pub mod common;
pub mod global_parameters;
pub mod kzg;

use std::mem;

use ark_bls12_381::{Bls12_381, Fr};
use ark_poly::univariate::DensePolynomial;
use ark_poly::GeneralEvaluationDomain;
use ark_poly_commit::kzg10;

pub use common::{
    bytes_to_evaluations, bytes_to_polynomial, evaluation_domain, field_element_from_bytes_le,
    KzgRsError,
};
pub use global_parameters::{
    global_parameters_from_file, global_parameters_from_randomness, global_parameters_to_file,
    max_polynomial_degree,
};
pub use kzg::{commit_polynomial, generate_element_proof, verify_element_proof};

pub type Commitment = kzg10::Commitment<Bls12_381>;
pub type Proof = kzg10::Proof<Bls12_381>;
pub type FieldElement = ark_bls12_381::Fr;
pub type Polynomial = DensePolynomial<Fr>;
pub type Evaluations = ark_poly::Evaluations<Fr>;
pub type PolynomialEvaluationDomain = GeneralEvaluationDomain<Fr>;

pub type GlobalParameters = kzg10::UniversalParams<Bls12_381>;

pub const BYTES_PER_FIELD_ELEMENT: usize = mem::size_of::<Fr>();
/// Largest chunk that always maps into the scalar field without reduction.
pub const MAX_CHUNK_SIZE: usize = BYTES_PER_FIELD_ELEMENT - 1;
