pub mod http;
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// crates
use da_core::NetworkLocator;
use serde::{Deserialize, Serialize};

/// Handle returned by the network on submission, used to poll the dispersal status.
pub type RequestId = String;

/// What the network reports once a blob has been included in a batch.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispersalInfo {
    /// Compressed commitment computed by the network.
    pub commitment: Vec<u8>,
    pub locator: NetworkLocator,
    pub blob_length: u64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlobStatus {
    Processing,
    Confirmed(DispersalInfo),
    Finalized(DispersalInfo),
    Failed(String),
    InsufficientSignatures,
}

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Worth retrying: connection failures, timeouts, overloaded or failing servers.
    #[error("Transient network failure: {0}")]
    Transient(String),
    #[error("Not found")]
    NotFound,
    /// The network refused the request and will refuse it again.
    #[error("Rejected: {0}")]
    Rejected(String),
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Transport towards the DA network. Implementations perform a single request per call and
/// leave retries, polling and deadlines to [`crate::DaClient`].
#[async_trait::async_trait]
pub trait DaNetworkBackend: Send + Sync {
    async fn disperse_blob(&self, blob: &[u8]) -> Result<RequestId, BackendError>;

    async fn blob_status(&self, request_id: &RequestId) -> Result<BlobStatus, BackendError>;

    async fn retrieve_blob(&self, locator: &NetworkLocator) -> Result<Vec<u8>, BackendError>;
}

#[async_trait::async_trait]
impl<T: DaNetworkBackend + ?Sized> DaNetworkBackend for std::sync::Arc<T> {
    async fn disperse_blob(&self, blob: &[u8]) -> Result<RequestId, BackendError> {
        (**self).disperse_blob(blob).await
    }

    async fn blob_status(&self, request_id: &RequestId) -> Result<BlobStatus, BackendError> {
        (**self).blob_status(request_id).await
    }

    async fn retrieve_blob(&self, locator: &NetworkLocator) -> Result<Vec<u8>, BackendError> {
        (**self).retrieve_blob(locator).await
    }
}
