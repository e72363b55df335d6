// std
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
// crates
use da_core::{
    check_blob_size, content_hash, decode, encode, BackendKind, BlobHash, Certificate, Commitment,
    Locator, MalformedInput, Store, StoreError,
};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemStoreSettings {
    pub max_blob_size: usize,
    /// Entries older than this are gone. Kept forever when unset.
    #[serde(default, with = "humantime_serde")]
    pub expiration: Option<Duration>,
}

struct Entry {
    blob: Vec<u8>,
    stored_at: Instant,
}

/// Content addressed in-process store. Certificates carry the blob hash both as commitment and
/// as key, no commitment scheme is involved.
pub struct MemStore {
    blobs: RwLock<HashMap<BlobHash, Entry>>,
    settings: MemStoreSettings,
}

impl MemStore {
    #[must_use]
    pub fn new(settings: MemStoreSettings) -> Self {
        Self {
            blobs: RwLock::new(HashMap::new()),
            settings,
        }
    }

    fn is_expired(&self, entry: &Entry, now: Instant) -> bool {
        self.settings
            .expiration
            .is_some_and(|expiration| now.duration_since(entry.stored_at) >= expiration)
    }

    /// Drops expired entries, returning how many were removed.
    pub async fn prune_expired(&self) -> usize {
        if self.settings.expiration.is_none() {
            return 0;
        }
        let now = Instant::now();
        let mut blobs = self.blobs.write().await;
        let before = blobs.len();
        blobs.retain(|_, entry| !self.is_expired(entry, now));
        let pruned = before - blobs.len();
        if pruned > 0 {
            debug!(pruned, remaining = blobs.len(), "Pruned expired blobs");
        }
        pruned
    }

    /// Prunes every `interval` until `cancel` fires.
    pub fn spawn_pruner(
        self: Arc<Self>,
        interval: Duration,
        cancel: CancellationToken,
    ) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    () = cancel.cancelled() => {
                        info!("Memstore pruner stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        self.prune_expired().await;
                    }
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.blobs.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait::async_trait]
impl Store for MemStore {
    fn backend(&self) -> BackendKind {
        BackendKind::Memory
    }

    fn max_blob_size(&self) -> usize {
        self.settings.max_blob_size
    }

    async fn put(&self, blob: &[u8], cancel: &CancellationToken) -> Result<Vec<u8>, StoreError> {
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        check_blob_size(blob, self.settings.max_blob_size)?;
        let key = content_hash(blob);
        self.blobs.write().await.insert(
            key,
            Entry {
                blob: blob.to_vec(),
                stored_at: Instant::now(),
            },
        );
        let certificate = Certificate::new(
            Commitment::ContentHash(key),
            Locator::Memory { key },
            blob.len() as u64,
        );
        debug!(blob_len = blob.len(), "Blob stored in memory");
        Ok(encode(&certificate))
    }

    async fn get(
        &self,
        certificate: &[u8],
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, StoreError> {
        if cancel.is_cancelled() {
            return Err(StoreError::Cancelled);
        }
        let certificate = decode(certificate)?;
        let Locator::Memory { key } = certificate.locator() else {
            return Err(MalformedInput::WrongBackend {
                expected: BackendKind::Memory,
                found: certificate.locator().backend(),
            }
            .into());
        };
        let Commitment::ContentHash(hash) = certificate.commitment() else {
            return Err(
                MalformedInput::Commitment("expected a content hash commitment".into()).into(),
            );
        };

        let blobs = self.blobs.read().await;
        let entry = blobs.get(key).ok_or(StoreError::BlobNotFound)?;
        if self.is_expired(entry, Instant::now()) {
            return Err(StoreError::BlobNotFound);
        }
        if content_hash(&entry.blob) != *hash || entry.blob.len() as u64 != certificate.blob_length()
        {
            error!(
                target: "da_proxy::integrity",
                backend = %BackendKind::Memory,
                "Stored blob does not match its certificate"
            );
            return Err(StoreError::IntegrityViolation(
                "stored blob does not match the certificate".into(),
            ));
        }
        Ok(entry.blob.clone())
    }
}
