pub mod blob;
pub mod certificate;
pub mod store;
pub mod wire;

pub use blob::{check_blob_size, content_hash, BlobHash};
pub use certificate::{
    codec::{decode, encode, DecodeError},
    Certificate, CertificateVersion, Commitment, Locator, NetworkLocator, KZG_COMMITMENT_SIZE,
    MAX_QUORUMS,
};
pub use store::{BackendKind, ErrorKind, MalformedInput, Store, StoreError};
