pub mod backend;
mod backoff;
pub mod client;
pub mod error;
pub mod settings;

pub use backend::{BackendError, BlobStatus, DaNetworkBackend, DispersalInfo, RequestId};
pub use client::DaClient;
pub use error::DaClientError;
pub use settings::{DaClientSettings, RetrySettings};
