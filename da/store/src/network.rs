// crates
use da_core::{
    check_blob_size, decode, encode, BackendKind, Certificate, Commitment, Locator,
    MalformedInput, Store, StoreError, KZG_COMMITMENT_SIZE, MAX_QUORUMS,
};
use da_kzgrs_backend::{commitment_from_bytes, DaVerifier, InputError, VerifierError};
use da_network_client::{DaClient, DaClientSettings, DaNetworkBackend};
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkStoreSettings {
    pub max_blob_size: usize,
    #[serde(default)]
    pub client: DaClientSettings,
}

/// Store backed by the DA network. Nothing leaves `get` without matching the commitment carried
/// by its certificate.
pub struct NetworkStore<B> {
    client: DaClient<B>,
    verifier: DaVerifier,
    max_blob_size: usize,
}

impl<B: DaNetworkBackend> NetworkStore<B> {
    /// The effective size bound is the smaller of the configured one and what the setup can
    /// commit to.
    pub fn new(backend: B, verifier: DaVerifier, settings: NetworkStoreSettings) -> Self {
        let max_blob_size = settings.max_blob_size.min(verifier.max_blob_size());
        Self {
            client: DaClient::new(backend, settings.client),
            verifier,
            max_blob_size,
        }
    }
}

fn integrity_violation(reason: impl Into<String>) -> StoreError {
    let reason = reason.into();
    error!(target: "da_proxy::integrity", backend = %BackendKind::Network, %reason, "Integrity violation");
    StoreError::IntegrityViolation(reason)
}

fn setup_error(error: &VerifierError) -> StoreError {
    StoreError::SetupUnavailable(error.to_string())
}

#[async_trait::async_trait]
impl<B: DaNetworkBackend> Store for NetworkStore<B> {
    fn backend(&self) -> BackendKind {
        BackendKind::Network
    }

    fn max_blob_size(&self) -> usize {
        self.max_blob_size
    }

    async fn put(&self, blob: &[u8], cancel: &CancellationToken) -> Result<Vec<u8>, StoreError> {
        check_blob_size(blob, self.max_blob_size)?;
        let info = self.client.disperse(blob, cancel).await?;

        if info.blob_length != blob.len() as u64 {
            return Err(integrity_violation(format!(
                "network reports {} bytes for a blob of {}",
                info.blob_length,
                blob.len()
            )));
        }
        if info.locator.quorum_numbers.len() > MAX_QUORUMS {
            return Err(StoreError::Network(format!(
                "network locator lists {} quorums",
                info.locator.quorum_numbers.len()
            )));
        }
        let commitment: [u8; KZG_COMMITMENT_SIZE] =
            info.commitment.as_slice().try_into().map_err(|_| {
                integrity_violation(format!(
                    "network returned a {} bytes commitment",
                    info.commitment.len()
                ))
            })?;
        match self.verifier.verify(blob, &commitment, None) {
            Ok(()) => {}
            Err(VerifierError::VerificationFailed) => {
                return Err(integrity_violation(
                    "network commitment does not match the dispersed blob",
                ))
            }
            Err(VerifierError::MalformedInput(InputError::Commitment(reason))) => {
                return Err(integrity_violation(format!(
                    "network returned an invalid commitment: {reason}"
                )))
            }
            Err(VerifierError::MalformedInput(input)) => {
                return Err(MalformedInput::Commitment(input.to_string()).into())
            }
            Err(error @ VerifierError::SetupUnavailable(_)) => return Err(setup_error(&error)),
        }

        let certificate = Certificate::new(
            Commitment::Kzg(commitment),
            Locator::Network(info.locator),
            blob.len() as u64,
        );
        info!(
            blob_len = blob.len(),
            certificate = %certificate.to_hex(),
            "Blob dispersed"
        );
        Ok(encode(&certificate))
    }

    async fn get(
        &self,
        certificate: &[u8],
        cancel: &CancellationToken,
    ) -> Result<Vec<u8>, StoreError> {
        let certificate = decode(certificate)?;
        let Locator::Network(locator) = certificate.locator() else {
            return Err(MalformedInput::WrongBackend {
                expected: BackendKind::Network,
                found: certificate.locator().backend(),
            }
            .into());
        };
        let Commitment::Kzg(commitment) = certificate.commitment() else {
            return Err(MalformedInput::Commitment("expected a KZG commitment".into()).into());
        };
        commitment_from_bytes(commitment)
            .map_err(|e| MalformedInput::Commitment(e.to_string()))?;
        let blob_length = usize::try_from(certificate.blob_length()).unwrap_or(usize::MAX);
        if blob_length > self.max_blob_size {
            return Err(MalformedInput::BlobTooLarge {
                size: blob_length,
                max: self.max_blob_size,
            }
            .into());
        }

        let blob = self.client.retrieve(locator, cancel).await?;
        if blob.len() != blob_length {
            return Err(integrity_violation(format!(
                "retrieved {} bytes, certificate commits to {blob_length}",
                blob.len()
            )));
        }
        match self.verifier.verify(&blob, commitment, None) {
            Ok(()) => Ok(blob),
            Err(VerifierError::VerificationFailed) => Err(integrity_violation(
                "retrieved blob does not match the certificate commitment",
            )),
            Err(VerifierError::MalformedInput(InputError::BlobTooLarge { size, max })) => {
                Err(MalformedInput::BlobTooLarge { size, max }.into())
            }
            Err(VerifierError::MalformedInput(input)) => {
                Err(MalformedInput::Commitment(input.to_string()).into())
            }
            Err(error @ VerifierError::SetupUnavailable(_)) => Err(setup_error(&error)),
        }
    }
}
