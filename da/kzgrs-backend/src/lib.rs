pub mod common;
pub mod encoder;
pub mod global;
pub mod verifier;

pub use common::{commitment_from_bytes, commitment_to_bytes, ElementProof};
pub use encoder::{BlobEncoder, EncodedBlob, EncoderError};
pub use verifier::{DaVerifier, InputError, VerifierError};
pub use da_kzgrs::KzgRsError;
pub use global::{load_global_parameters, SetupConfig};
