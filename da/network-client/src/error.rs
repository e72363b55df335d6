use da_core::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum DaClientError {
    #[error("Dispersal rejected: {0}")]
    DispersalRejected(String),
    #[error("Dispersal not confirmed after {attempts} attempts")]
    DispersalTimedOut { attempts: u32 },
    #[error("Retrieval failed after {attempts} attempts")]
    RetrievalTimedOut { attempts: u32 },
    #[error("Blob not found")]
    BlobNotFound,
    #[error("Cancelled")]
    Cancelled,
    #[error("Network error: {0}")]
    Network(String),
}

impl From<DaClientError> for StoreError {
    fn from(error: DaClientError) -> Self {
        match error {
            DaClientError::DispersalRejected(reason) => Self::DispersalRejected(reason),
            DaClientError::DispersalTimedOut { attempts } => Self::DispersalTimedOut { attempts },
            DaClientError::RetrievalTimedOut { attempts } => Self::RetrievalTimedOut { attempts },
            DaClientError::BlobNotFound => Self::BlobNotFound,
            DaClientError::Cancelled => Self::Cancelled,
            DaClientError::Network(reason) => Self::Network(reason),
        }
    }
}
