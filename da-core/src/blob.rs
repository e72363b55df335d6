// crates
use blake2::{digest::consts::U32, Blake2b, Digest as _};
// internal
use crate::store::MalformedInput;

pub type BlobHash = [u8; 32];

type Blake2b256 = Blake2b<U32>;

/// Blake2b-256 digest of the blob bytes.
#[must_use]
pub fn content_hash(data: &[u8]) -> BlobHash {
    Blake2b256::digest(data).into()
}

/// Reject blobs above `max` bytes.
pub fn check_blob_size(data: &[u8], max: usize) -> Result<(), MalformedInput> {
    if data.len() > max {
        return Err(MalformedInput::BlobTooLarge {
            size: data.len(),
            max,
        });
    }
    Ok(())
}
