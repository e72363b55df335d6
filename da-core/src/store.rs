// std
use std::fmt;
// crates
use thiserror::Error;
use tokio_util::sync::CancellationToken;
// internal
use crate::certificate::codec::DecodeError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackendKind {
    Memory,
    Network,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Memory => write!(f, "memory"),
            Self::Network => write!(f, "network"),
        }
    }
}

#[derive(Debug, Error)]
pub enum MalformedInput {
    #[error("Blob of {size} bytes exceeds the maximum of {max} bytes")]
    BlobTooLarge { size: usize, max: usize },
    #[error(transparent)]
    Certificate(#[from] DecodeError),
    #[error("Certificate was issued by the {found} backend, this store is {expected}")]
    WrongBackend {
        expected: BackendKind,
        found: BackendKind,
    },
    #[error("Invalid commitment: {0}")]
    Commitment(String),
}

/// Coarse classification of [`StoreError`], used for logging and for the
/// front end's status mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    MalformedInput,
    DispersalRejected,
    DispersalTimedOut,
    RetrievalTimedOut,
    BlobNotFound,
    IntegrityViolation,
    SetupUnavailable,
    Cancelled,
    Network,
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Malformed input: {0}")]
    MalformedInput(#[from] MalformedInput),
    #[error("Dispersal rejected by the network: {0}")]
    DispersalRejected(String),
    #[error("Dispersal not confirmed after {attempts} attempts")]
    DispersalTimedOut { attempts: u32 },
    #[error("Retrieval did not succeed after {attempts} attempts")]
    RetrievalTimedOut { attempts: u32 },
    #[error("Blob not found")]
    BlobNotFound,
    #[error("Integrity violation: {0}")]
    IntegrityViolation(String),
    #[error("Verifier setup unavailable: {0}")]
    SetupUnavailable(String),
    #[error("Operation cancelled")]
    Cancelled,
    #[error("Network error: {0}")]
    Network(String),
}

impl StoreError {
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::MalformedInput(_) => ErrorKind::MalformedInput,
            Self::DispersalRejected(_) => ErrorKind::DispersalRejected,
            Self::DispersalTimedOut { .. } => ErrorKind::DispersalTimedOut,
            Self::RetrievalTimedOut { .. } => ErrorKind::RetrievalTimedOut,
            Self::BlobNotFound => ErrorKind::BlobNotFound,
            Self::IntegrityViolation(_) => ErrorKind::IntegrityViolation,
            Self::SetupUnavailable(_) => ErrorKind::SetupUnavailable,
            Self::Cancelled => ErrorKind::Cancelled,
            Self::Network(_) => ErrorKind::Network,
        }
    }
}

impl From<DecodeError> for StoreError {
    fn from(error: DecodeError) -> Self {
        Self::MalformedInput(MalformedInput::Certificate(error))
    }
}

/// Put/get capability exposed to the front end.
///
/// `put` returns the encoded certificate for the stored blob, `get` takes such
/// a certificate and only ever returns the exact bytes that were put.
/// Cancelling `cancel` makes in-flight calls return [`StoreError::Cancelled`].
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    fn backend(&self) -> BackendKind;

    /// Largest blob accepted by `put`.
    fn max_blob_size(&self) -> usize;

    async fn put(&self, blob: &[u8], cancel: &CancellationToken) -> Result<Vec<u8>, StoreError>;

    async fn get(
        &self,
        certificate: &[u8],
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, StoreError>;
}
