// std
use std::future::Future;
use std::time::Duration;
// crates
use da_core::NetworkLocator;
use tokio::time::{sleep, sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
// internal
use crate::backend::{BackendError, BlobStatus, DaNetworkBackend, DispersalInfo, RequestId};
use crate::backoff::Backoff;
use crate::error::DaClientError;
use crate::settings::DaClientSettings;

/// Progress of a single dispersal.
///
/// `Submitting` retries transient submission failures, `Pending` polls the network until the blob
/// is included. Both phases count their own attempts against the retry ceiling.
enum DispersalState {
    Submitting {
        attempts: u32,
        backoff: Backoff,
    },
    Pending {
        request_id: RequestId,
        attempts: u32,
        backoff: Backoff,
        delay: Duration,
    },
    Confirmed(DispersalInfo),
    Failed(DaClientError),
}

/// Drives dispersal and retrieval against a [`DaNetworkBackend`].
///
/// Retries, polling and deadlines live here. Commitments are not checked by the client.
pub struct DaClient<B> {
    backend: B,
    settings: DaClientSettings,
}

impl<B: DaNetworkBackend> DaClient<B> {
    pub const fn new(backend: B, settings: DaClientSettings) -> Self {
        Self { backend, settings }
    }

    /// Submits `blob` and polls until the network includes it.
    #[instrument(skip_all, fields(blob_len = blob.len()))]
    pub async fn disperse(
        &self,
        blob: &[u8],
        cancel: &CancellationToken,
    ) -> Result<DispersalInfo, DaClientError> {
        let deadline = Instant::now() + self.settings.dispersal_timeout;
        let mut state = DispersalState::Submitting {
            attempts: 0,
            backoff: Backoff::new(&self.settings.retry),
        };
        loop {
            state = match state {
                DispersalState::Submitting { attempts, backoff } => {
                    self.submit(blob, attempts, backoff, deadline, cancel).await
                }
                DispersalState::Pending {
                    request_id,
                    attempts,
                    backoff,
                    delay,
                } => {
                    self.poll(request_id, attempts, backoff, delay, deadline, cancel)
                        .await
                }
                DispersalState::Confirmed(info) => return Ok(info),
                DispersalState::Failed(error) => return Err(error),
            };
        }
    }

    async fn submit(
        &self,
        blob: &[u8],
        attempts: u32,
        mut backoff: Backoff,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> DispersalState {
        let attempts = attempts + 1;
        let timed_out = DaClientError::DispersalTimedOut { attempts };
        let response = match guarded(cancel, deadline, timed_out, self.backend.disperse_blob(blob))
            .await
        {
            Ok(response) => response,
            Err(error) => return DispersalState::Failed(error),
        };
        match response {
            Ok(request_id) => {
                info!(%request_id, "Blob submitted for dispersal");
                DispersalState::Pending {
                    request_id,
                    attempts: 0,
                    backoff: Backoff::new(&self.settings.retry),
                    delay: self.settings.poll_interval,
                }
            }
            Err(BackendError::Transient(reason)) => {
                warn!(attempt = attempts, %reason, "Blob submission failed");
                if attempts >= self.settings.max_attempts() {
                    return DispersalState::Failed(DaClientError::DispersalTimedOut { attempts });
                }
                let timed_out = DaClientError::DispersalTimedOut { attempts };
                match guarded(cancel, deadline, timed_out, sleep(backoff.next_delay())).await {
                    Ok(()) => DispersalState::Submitting { attempts, backoff },
                    Err(error) => DispersalState::Failed(error),
                }
            }
            Err(BackendError::Rejected(reason)) => {
                DispersalState::Failed(DaClientError::DispersalRejected(reason))
            }
            Err(BackendError::NotFound) => DispersalState::Failed(
                DaClientError::DispersalRejected("disperser endpoint not found".into()),
            ),
            Err(BackendError::InvalidResponse(reason)) => {
                DispersalState::Failed(DaClientError::Network(reason))
            }
        }
    }

    async fn poll(
        &self,
        request_id: RequestId,
        attempts: u32,
        mut backoff: Backoff,
        delay: Duration,
        deadline: Instant,
        cancel: &CancellationToken,
    ) -> DispersalState {
        let timed_out = DaClientError::DispersalTimedOut { attempts };
        if let Err(error) = guarded(cancel, deadline, timed_out, sleep(delay)).await {
            return DispersalState::Failed(error);
        }
        let attempts = attempts + 1;
        let timed_out = DaClientError::DispersalTimedOut { attempts };
        let status = match guarded(
            cancel,
            deadline,
            timed_out,
            self.backend.blob_status(&request_id),
        )
        .await
        {
            Ok(status) => status,
            Err(error) => return DispersalState::Failed(error),
        };

        let delay = match status {
            Ok(BlobStatus::Processing) => {
                debug!(%request_id, attempt = attempts, "Blob still processing");
                backoff.reset();
                self.settings.poll_interval
            }
            Ok(BlobStatus::Confirmed(info)) if !self.settings.wait_for_finalization => {
                info!(%request_id, attempt = attempts, "Blob dispersal confirmed");
                return DispersalState::Confirmed(info);
            }
            Ok(BlobStatus::Confirmed(_)) => {
                debug!(%request_id, attempt = attempts, "Blob confirmed, waiting for finalization");
                backoff.reset();
                self.settings.poll_interval
            }
            Ok(BlobStatus::Finalized(info)) => {
                info!(%request_id, attempt = attempts, "Blob dispersal finalized");
                return DispersalState::Confirmed(info);
            }
            Ok(BlobStatus::Failed(reason)) => {
                return DispersalState::Failed(DaClientError::DispersalRejected(reason))
            }
            Ok(BlobStatus::InsufficientSignatures) => {
                return DispersalState::Failed(DaClientError::DispersalRejected(
                    "insufficient signatures".into(),
                ))
            }
            Err(BackendError::Transient(reason)) => {
                warn!(%request_id, attempt = attempts, %reason, "Blob status poll failed");
                backoff.next_delay()
            }
            Err(BackendError::NotFound) => {
                return DispersalState::Failed(DaClientError::DispersalRejected(format!(
                    "unknown dispersal request {request_id}"
                )))
            }
            Err(BackendError::Rejected(reason)) => {
                return DispersalState::Failed(DaClientError::DispersalRejected(reason))
            }
            Err(BackendError::InvalidResponse(reason)) => {
                return DispersalState::Failed(DaClientError::Network(reason))
            }
        };

        if attempts >= self.settings.max_attempts() {
            warn!(%request_id, attempts, "Blob dispersal not confirmed, giving up");
            return DispersalState::Failed(DaClientError::DispersalTimedOut { attempts });
        }
        DispersalState::Pending {
            request_id,
            attempts,
            backoff,
            delay,
        }
    }

    /// Fetches the raw bytes stored under `locator`. A missing blob is final.
    #[instrument(skip_all, fields(blob_index = locator.blob_index))]
    pub async fn retrieve(
        &self,
        locator: &NetworkLocator,
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, DaClientError> {
        let deadline = Instant::now() + self.settings.retrieval_timeout;
        let mut backoff = Backoff::new(&self.settings.retry);
        let mut attempts = 0;
        loop {
            attempts += 1;
            let timed_out = DaClientError::RetrievalTimedOut { attempts };
            match guarded(cancel, deadline, timed_out, self.backend.retrieve_blob(locator)).await? {
                Ok(blob) => {
                    debug!(attempt = attempts, blob_len = blob.len(), "Blob retrieved");
                    return Ok(blob);
                }
                Err(BackendError::NotFound) => return Err(DaClientError::BlobNotFound),
                Err(BackendError::Rejected(reason) | BackendError::InvalidResponse(reason)) => {
                    return Err(DaClientError::Network(reason))
                }
                Err(BackendError::Transient(reason)) => {
                    warn!(attempt = attempts, %reason, "Blob retrieval failed");
                    if attempts >= self.settings.max_attempts() {
                        return Err(DaClientError::RetrievalTimedOut { attempts });
                    }
                }
            }
            let timed_out = DaClientError::RetrievalTimedOut { attempts };
            guarded(cancel, deadline, timed_out, sleep(backoff.next_delay())).await?;
        }
    }
}

/// Runs `future` unless `cancel` fires or `deadline` passes first. Cancellation wins ties so a
/// caller's cancel is never reported as a timeout.
async fn guarded<T>(
    cancel: &CancellationToken,
    deadline: Instant,
    on_deadline: DaClientError,
    future: impl Future<Output = T>,
) -> Result<T, DaClientError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(DaClientError::Cancelled),
        () = sleep_until(deadline) => Err(on_deadline),
        output = future => Ok(output),
    }
}
