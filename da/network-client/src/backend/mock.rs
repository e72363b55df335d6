//! Scripted in-process stand-in for the DA network.
// std
use std::collections::HashMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
// crates
use da_core::{content_hash, NetworkLocator};
use parking_lot::Mutex;
// internal
use super::{BackendError, BlobStatus, DaNetworkBackend, DispersalInfo, RequestId};

pub type CommitFn = Arc<dyn Fn(&[u8]) -> Vec<u8> + Send + Sync>;
pub type TamperFn = Arc<dyn Fn(&mut Vec<u8>) + Send + Sync>;

struct PendingBlob {
    blob: Vec<u8>,
    blob_index: u32,
    polls: u32,
}

/// Test double for [`DaNetworkBackend`].
///
/// By default every submission is accepted and reported as confirmed on its first status poll,
/// with a commitment computed by the configured commit function (the content hash if unset).
/// Builder methods script failures. Counters record every call made, including failing ones.
pub struct MockNetworkBackend {
    commit: CommitFn,
    confirm_after: Option<u32>,
    finalize_after: Option<u32>,
    reject: Option<String>,
    terminal_status: Option<BlobStatus>,
    transient_dispersals: u32,
    transient_polls: u32,
    transient_retrievals: u32,
    retrieval_not_found: bool,
    tamper_retrieval: Option<TamperFn>,
    tamper_commitment: bool,
    pending: Mutex<HashMap<RequestId, PendingBlob>>,
    stored: Mutex<HashMap<NetworkLocator, Vec<u8>>>,
    disperse_calls: AtomicU32,
    status_calls: AtomicU32,
    retrieve_calls: AtomicU32,
}

impl Default for MockNetworkBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockNetworkBackend {
    #[must_use]
    pub fn new() -> Self {
        Self {
            commit: Arc::new(|blob: &[u8]| content_hash(blob).to_vec()),
            confirm_after: Some(1),
            finalize_after: None,
            reject: None,
            terminal_status: None,
            transient_dispersals: 0,
            transient_polls: 0,
            transient_retrievals: 0,
            retrieval_not_found: false,
            tamper_retrieval: None,
            tamper_commitment: false,
            pending: Mutex::new(HashMap::new()),
            stored: Mutex::new(HashMap::new()),
            disperse_calls: AtomicU32::new(0),
            status_calls: AtomicU32::new(0),
            retrieve_calls: AtomicU32::new(0),
        }
    }

    #[must_use]
    pub fn with_commitment(
        mut self,
        commit: impl Fn(&[u8]) -> Vec<u8> + Send + Sync + 'static,
    ) -> Self {
        self.commit = Arc::new(commit);
        self
    }

    /// Report `Confirmed` from the `polls`-th successful status poll on.
    #[must_use]
    pub fn confirm_after(mut self, polls: u32) -> Self {
        self.confirm_after = Some(polls);
        self
    }

    #[must_use]
    pub fn never_confirm(mut self) -> Self {
        self.confirm_after = None;
        self
    }

    /// Report `Finalized` from the `polls`-th successful status poll on.
    #[must_use]
    pub fn finalize_after(mut self, polls: u32) -> Self {
        self.finalize_after = Some(polls);
        self
    }

    #[must_use]
    pub fn reject(mut self, reason: impl Into<String>) -> Self {
        self.reject = Some(reason.into());
        self
    }

    /// Answer every status poll with `status`.
    #[must_use]
    pub fn terminal_status(mut self, status: BlobStatus) -> Self {
        self.terminal_status = Some(status);
        self
    }

    #[must_use]
    pub fn transient_dispersals(mut self, failures: u32) -> Self {
        self.transient_dispersals = failures;
        self
    }

    #[must_use]
    pub fn transient_polls(mut self, failures: u32) -> Self {
        self.transient_polls = failures;
        self
    }

    #[must_use]
    pub fn transient_retrievals(mut self, failures: u32) -> Self {
        self.transient_retrievals = failures;
        self
    }

    #[must_use]
    pub fn retrieval_not_found(mut self) -> Self {
        self.retrieval_not_found = true;
        self
    }

    /// Alter blobs on their way back from the network.
    #[must_use]
    pub fn tamper_retrieval(
        mut self,
        tamper: impl Fn(&mut Vec<u8>) + Send + Sync + 'static,
    ) -> Self {
        self.tamper_retrieval = Some(Arc::new(tamper));
        self
    }

    /// Report a commitment to different bytes than the ones submitted.
    #[must_use]
    pub fn tamper_commitment(mut self) -> Self {
        self.tamper_commitment = true;
        self
    }

    pub fn disperse_calls(&self) -> u32 {
        self.disperse_calls.load(Ordering::SeqCst)
    }

    pub fn status_calls(&self) -> u32 {
        self.status_calls.load(Ordering::SeqCst)
    }

    pub fn retrieve_calls(&self) -> u32 {
        self.retrieve_calls.load(Ordering::SeqCst)
    }

    fn dispersal_info(&self, pending: &PendingBlob) -> DispersalInfo {
        let commitment = if self.tamper_commitment {
            let mut other = pending.blob.clone();
            other.push(0);
            (self.commit)(&other)
        } else {
            (self.commit)(&pending.blob)
        };
        DispersalInfo {
            commitment,
            locator: NetworkLocator {
                batch_header_hash: content_hash(&pending.blob),
                blob_index: pending.blob_index,
                reference_block_number: 1,
                quorum_numbers: vec![0, 1],
            },
            blob_length: pending.blob.len() as u64,
        }
    }
}

#[async_trait::async_trait]
impl DaNetworkBackend for MockNetworkBackend {
    async fn disperse_blob(&self, blob: &[u8]) -> Result<RequestId, BackendError> {
        let call = self.disperse_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(reason) = &self.reject {
            return Err(BackendError::Rejected(reason.clone()));
        }
        if call <= self.transient_dispersals {
            return Err(BackendError::Transient("disperser unavailable".into()));
        }
        let request_id = format!("request-{call}");
        self.pending.lock().insert(
            request_id.clone(),
            PendingBlob {
                blob: blob.to_vec(),
                blob_index: call,
                polls: 0,
            },
        );
        Ok(request_id)
    }

    async fn blob_status(&self, request_id: &RequestId) -> Result<BlobStatus, BackendError> {
        let call = self.status_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.transient_polls {
            return Err(BackendError::Transient("status unavailable".into()));
        }
        if let Some(status) = &self.terminal_status {
            return Ok(status.clone());
        }
        let mut pending = self.pending.lock();
        let blob = pending.get_mut(request_id).ok_or(BackendError::NotFound)?;
        blob.polls += 1;
        let Some(confirm_after) = self.confirm_after else {
            return Ok(BlobStatus::Processing);
        };
        if blob.polls < confirm_after {
            return Ok(BlobStatus::Processing);
        }
        let info = self.dispersal_info(blob);
        self.stored
            .lock()
            .insert(info.locator.clone(), blob.blob.clone());
        match self.finalize_after {
            Some(finalize_after) if blob.polls >= finalize_after => Ok(BlobStatus::Finalized(info)),
            _ => Ok(BlobStatus::Confirmed(info)),
        }
    }

    async fn retrieve_blob(&self, locator: &NetworkLocator) -> Result<Vec<u8>, BackendError> {
        let call = self.retrieve_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call <= self.transient_retrievals {
            return Err(BackendError::Transient("retriever unavailable".into()));
        }
        if self.retrieval_not_found {
            return Err(BackendError::NotFound);
        }
        let mut blob = self
            .stored
            .lock()
            .get(locator)
            .cloned()
            .ok_or(BackendError::NotFound)?;
        if let Some(tamper) = &self.tamper_retrieval {
            tamper(&mut blob);
        }
        Ok(blob)
    }
}
