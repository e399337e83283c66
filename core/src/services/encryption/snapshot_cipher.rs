//! Snapshot encryption using AES-256-GCM

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Key, Nonce,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use rand::{rngs::OsRng, RngCore};

use crate::domain::entities::Record;
use crate::domain::snapshot;
use crate::errors::StoreError;

/// Associated data bound to every sealed snapshot
pub const SNAPSHOT_AAD: &[u8] = b"rotacode:records:v1";

const NONCE_LEN: usize = 12;
const TAG_LEN: usize = 16;

/// Seals and opens record snapshots.
///
/// A sealed blob is `base64(nonce || ciphertext || tag)` with a fresh random
/// nonce per seal.
pub struct SnapshotCipher {
    cipher: Aes256Gcm,
}

impl SnapshotCipher {
    pub fn new(key: &[u8; 32]) -> Self {
        let key = Key::<Aes256Gcm>::from_slice(key);
        Self {
            cipher: Aes256Gcm::new(key),
        }
    }

    /// Encrypt `plaintext` into a base64 blob
    pub fn seal(&self, plaintext: &str) -> Result<String, StoreError> {
        let mut nonce = [0u8; NONCE_LEN];
        OsRng.fill_bytes(&mut nonce);

        let ciphertext = self
            .cipher
            .encrypt(
                Nonce::from_slice(&nonce),
                Payload {
                    msg: plaintext.as_bytes(),
                    aad: SNAPSHOT_AAD,
                },
            )
            .map_err(|e| StoreError::write(format!("encryption failed: {}", e)))?;

        let mut blob = Vec::with_capacity(NONCE_LEN + ciphertext.len());
        blob.extend_from_slice(&nonce);
        blob.extend_from_slice(&ciphertext);
        Ok(BASE64.encode(blob))
    }

    /// Decrypt a blob produced by [`seal`](Self::seal)
    ///
    /// Wrong keys, truncation and tampering all surface as `StoreError::Corrupt`.
    pub fn open(&self, blob: &str) -> Result<String, StoreError> {
        let raw = BASE64
            .decode(blob.trim())
            .map_err(|e| StoreError::corrupt(format!("invalid base64: {}", e)))?;

        if raw.len() < NONCE_LEN + TAG_LEN {
            return Err(StoreError::corrupt("snapshot is truncated"));
        }
        let (nonce, ciphertext) = raw.split_at(NONCE_LEN);

        let plaintext = self
            .cipher
            .decrypt(
                Nonce::from_slice(nonce),
                Payload {
                    msg: ciphertext,
                    aad: SNAPSHOT_AAD,
                },
            )
            .map_err(|_| StoreError::corrupt("snapshot failed authentication"))?;

        String::from_utf8(plaintext)
            .map_err(|e| StoreError::corrupt(format!("snapshot is not UTF-8: {}", e)))
    }

    pub fn seal_records(&self, records: &[Record]) -> Result<String, StoreError> {
        self.seal(&snapshot::encode(records))
    }

    pub fn open_records(&self, blob: &str) -> Result<Vec<Record>, StoreError> {
        snapshot::decode(&self.open(blob)?)
    }
}

impl std::fmt::Debug for SnapshotCipher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnapshotCipher").finish_non_exhaustive()
    }
}
