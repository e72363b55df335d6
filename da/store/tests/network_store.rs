use std::sync::{Arc, LazyLock};
use std::time::Duration;

use da_core::{
    decode, encode, BackendKind, Certificate, Commitment, ErrorKind, Locator, MalformedInput,
    NetworkLocator, Store, StoreError,
};
use da_kzgrs::{global_parameters_from_randomness, GlobalParameters};
use da_kzgrs_backend::{BlobEncoder, DaVerifier};
use da_network_client::backend::mock::MockNetworkBackend;
use da_network_client::{DaClientSettings, RetrySettings};
use da_store::{MemStore, MemStoreSettings, NetworkStore, NetworkStoreSettings};
use rand::{thread_rng, Rng, RngCore};
use tokio_util::sync::CancellationToken;

const MAX_DEGREE: usize = 127;
const SETUP_MAX_BLOB_SIZE: usize = 127 * 31;

static GLOBAL_PARAMETERS: LazyLock<Arc<GlobalParameters>> = LazyLock::new(|| {
    let mut rng = thread_rng();
    Arc::new(global_parameters_from_randomness(MAX_DEGREE, &mut rng).unwrap())
});

fn network() -> MockNetworkBackend {
    let encoder = BlobEncoder::new(Arc::clone(&GLOBAL_PARAMETERS)).unwrap();
    MockNetworkBackend::new().with_commitment(move |blob| {
        encoder
            .encode(blob)
            .unwrap()
            .commitment_bytes()
            .unwrap()
            .to_vec()
    })
}

fn settings(max_blob_size: usize) -> NetworkStoreSettings {
    NetworkStoreSettings {
        max_blob_size,
        client: DaClientSettings {
            poll_interval: Duration::from_secs(1),
            dispersal_timeout: Duration::from_secs(60),
            retrieval_timeout: Duration::from_secs(60),
            retry: RetrySettings {
                max_attempts: 3,
                initial_backoff: Duration::from_millis(100),
                max_backoff: Duration::from_secs(1),
            },
            wait_for_finalization: false,
        },
    }
}

fn store(
    network: MockNetworkBackend,
    max_blob_size: usize,
) -> (Arc<MockNetworkBackend>, NetworkStore<Arc<MockNetworkBackend>>) {
    let network = Arc::new(network);
    let verifier = DaVerifier::new(Arc::clone(&GLOBAL_PARAMETERS)).unwrap();
    let store = NetworkStore::new(Arc::clone(&network), verifier, settings(max_blob_size));
    (network, store)
}

fn rand_blob(size: usize) -> Vec<u8> {
    let mut blob = vec![0u8; size];
    thread_rng().fill_bytes(&mut blob);
    blob
}

#[tokio::test(start_paused = true)]
async fn put_get_roundtrip() {
    let (_, store) = store(network(), 4096);
    let cancel = CancellationToken::new();
    let mut sizes = vec![0, 1, 31, 32, 1000, SETUP_MAX_BLOB_SIZE];
    sizes.extend((0..4).map(|_| thread_rng().gen_range(0..=SETUP_MAX_BLOB_SIZE)));
    for size in sizes {
        let blob = rand_blob(size);
        let certificate = store.put(&blob, &cancel).await.unwrap();
        assert_eq!(store.get(&certificate, &cancel).await.unwrap(), blob, "{size} bytes");

        let decoded = decode(&certificate).unwrap();
        assert_eq!(decoded.blob_length(), size as u64);
        assert!(matches!(decoded.commitment(), Commitment::Kzg(_)));
        assert_eq!(decoded.locator().backend(), BackendKind::Network);
    }
}

#[tokio::test(start_paused = true)]
async fn max_blob_size_is_bounded_by_setup() {
    let (_, large) = store(network(), 1 << 20);
    assert_eq!(large.max_blob_size(), SETUP_MAX_BLOB_SIZE);
    let (_, small) = store(network(), 100);
    assert_eq!(small.max_blob_size(), 100);
}

#[tokio::test(start_paused = true)]
async fn oversized_blob_never_reaches_the_network() {
    let (network, store) = store(network(), 1000);
    let error = store
        .put(&rand_blob(1001), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        StoreError::MalformedInput(MalformedInput::BlobTooLarge {
            size: 1001,
            max: 1000
        })
    ));
    assert_eq!(network.disperse_calls(), 0);
    assert_eq!(network.status_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn tampered_retrieval_is_an_integrity_violation() {
    let network = network().tamper_retrieval(|blob| {
        if let Some(byte) = blob.last_mut() {
            *byte ^= 0x01;
        }
    });
    let (_, store) = store(network, 4096);
    let cancel = CancellationToken::new();
    let certificate = store.put(&rand_blob(500), &cancel).await.unwrap();
    let error = store.get(&certificate, &cancel).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::IntegrityViolation);
}

#[tokio::test(start_paused = true)]
async fn truncated_retrieval_is_an_integrity_violation() {
    let network = network().tamper_retrieval(|blob| {
        blob.pop();
    });
    let (_, store) = store(network, 4096);
    let cancel = CancellationToken::new();
    let certificate = store.put(&rand_blob(64), &cancel).await.unwrap();
    let error = store.get(&certificate, &cancel).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::IntegrityViolation);
}

#[tokio::test(start_paused = true)]
async fn wrong_network_commitment_fails_put() {
    let (_, store) = store(network().tamper_commitment(), 4096);
    let error = store
        .put(&rand_blob(64), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::IntegrityViolation);
}

#[tokio::test(start_paused = true)]
async fn non_canonical_network_commitment_fails_put() {
    // the empty blob commits to the identity, this is the same point with junk after its flags
    let network = network().with_commitment(|_| {
        let mut commitment = vec![0u8; 48];
        commitment[0] = 0xc0;
        commitment[47] = 1;
        commitment
    });
    let (_, store) = store(network, 4096);
    let error = store.put(&[], &CancellationToken::new()).await.unwrap_err();
    assert_eq!(error.kind(), ErrorKind::IntegrityViolation);
}

#[tokio::test(start_paused = true)]
async fn missing_blob_is_not_retried() {
    let (network, store) = store(network().retrieval_not_found(), 4096);
    let cancel = CancellationToken::new();
    let certificate = store.put(&rand_blob(64), &cancel).await.unwrap();
    let error = store.get(&certificate, &cancel).await.unwrap_err();
    assert!(matches!(error, StoreError::BlobNotFound));
    assert_eq!(network.retrieve_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn unconfirmed_dispersal_times_out() {
    let (network, store) = store(network().never_confirm(), 4096);
    let error = store
        .put(&rand_blob(64), &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(error, StoreError::DispersalTimedOut { attempts: 3 }));
    assert_eq!(network.status_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn rejected_dispersal() {
    let (network, store) = store(network().reject("quorum not met"), 4096);
    let error = store
        .put(&rand_blob(64), &CancellationToken::new())
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::DispersalRejected);
    assert_eq!(network.disperse_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn memory_certificate_is_refused() {
    let memstore = MemStore::new(MemStoreSettings {
        max_blob_size: 1024,
        expiration: None,
    });
    let cancel = CancellationToken::new();
    let certificate = memstore.put(b"blob", &cancel).await.unwrap();

    let (network, store) = store(network(), 4096);
    let error = store.get(&certificate, &cancel).await.unwrap_err();
    assert!(matches!(
        error,
        StoreError::MalformedInput(MalformedInput::WrongBackend {
            expected: BackendKind::Network,
            found: BackendKind::Memory,
        })
    ));
    assert_eq!(network.retrieve_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn invalid_certificate_commitment_is_malformed() {
    let (network, store) = store(network(), 4096);
    let certificate = encode(&Certificate::new(
        Commitment::Kzg([0xff; 48]),
        Locator::Network(NetworkLocator {
            batch_header_hash: [0; 32],
            blob_index: 1,
            reference_block_number: 1,
            quorum_numbers: vec![0],
        }),
        10,
    ));
    let error = store
        .get(&certificate, &CancellationToken::new())
        .await
        .unwrap_err();
    assert!(matches!(
        error,
        StoreError::MalformedInput(MalformedInput::Commitment(_))
    ));
    assert_eq!(network.retrieve_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn truncated_certificate_is_malformed() {
    let (network, store) = store(network(), 4096);
    let cancel = CancellationToken::new();
    let certificate = store.put(&rand_blob(64), &cancel).await.unwrap();
    let error = store
        .get(&certificate[..certificate.len() - 1], &cancel)
        .await
        .unwrap_err();
    assert_eq!(error.kind(), ErrorKind::MalformedInput);
    assert_eq!(network.retrieve_calls(), 0);
}

#[tokio::test(start_paused = true)]
async fn cancelled_get() {
    let (network, store) = store(network(), 4096);
    let cancel = CancellationToken::new();
    let certificate = store.put(&rand_blob(64), &cancel).await.unwrap();
    cancel.cancel();
    let error = store.get(&certificate, &cancel).await.unwrap_err();
    assert!(matches!(error, StoreError::Cancelled));
    assert_eq!(network.retrieve_calls(), 0);
}
