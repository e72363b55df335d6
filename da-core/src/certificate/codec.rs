// crates
use thiserror::Error;
// internal
use super::{Certificate, CertificateVersion};
use crate::wire;

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Certificate is empty")]
    Empty,
    #[error("Unsupported certificate version {0}")]
    UnsupportedVersion(u8),
    #[error("Certificate body is malformed: {0}")]
    Malformed(#[from] wire::Error),
}

/// Encode a certificate with the latest version byte in front.
///
/// Certificates holding at most [`MAX_QUORUMS`](super::MAX_QUORUMS) quorums stay far below the
/// wire size limit.
#[must_use]
pub fn encode(certificate: &Certificate) -> Vec<u8> {
    let body =
        wire::serialize(certificate).expect("Certificate shouldn't fail to be serialized");
    let mut bytes = Vec::with_capacity(body.len() + 1);
    bytes.push(CertificateVersion::LATEST as u8);
    bytes.extend_from_slice(&body);
    bytes
}

/// Decode a certificate, dispatching on its version byte.
///
/// Unknown versions are rejected without looking at the body.
pub fn decode(bytes: &[u8]) -> Result<Certificate, DecodeError> {
    let (&version, body) = bytes.split_first().ok_or(DecodeError::Empty)?;
    match CertificateVersion::try_from(version).map_err(DecodeError::UnsupportedVersion)? {
        CertificateVersion::V0 => Ok(wire::deserialize(body)?),
    }
}
