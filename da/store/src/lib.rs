pub mod memory;
pub mod network;

pub use memory::{MemStore, MemStoreSettings};
pub use network::{NetworkStore, NetworkStoreSettings};
