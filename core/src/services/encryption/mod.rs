//! Encryption of the record snapshot at rest

pub mod snapshot_cipher;

pub use snapshot_cipher::{SnapshotCipher, SNAPSHOT_AAD};
