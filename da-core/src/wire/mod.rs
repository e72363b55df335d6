//! Serializer for certificate bodies.
// bincode with fixed-width little endian integers and no trailing bytes, so
// the same value always maps to the same bytes.
pub(crate) mod bincode;
pub mod errors;

use ::bincode::Options as _;
use serde::{de::DeserializeOwned, Serialize};

pub use errors::Error;

use self::bincode::OPTIONS;

pub type Result<T> = std::result::Result<T, Error>;

/// Serialize an object directly into a new buffer
pub fn serialize<T: Serialize + ?Sized>(item: &T) -> Result<Vec<u8>> {
    OPTIONS.serialize(item).map_err(Error::Serialize)
}

/// Deserialize an object directly
///
/// Fails if `item` holds anything past the end of the encoded value.
pub fn deserialize<T: DeserializeOwned>(item: &[u8]) -> Result<T> {
    OPTIONS.deserialize(item).map_err(Error::Deserialize)
}
