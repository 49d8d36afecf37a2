//! Content hashes: the local format gate and SHA-256 file digests.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{ClientError, ClientResult};

/// Hex length of a SHA-256 digest.
pub const CONTENT_HASH_LEN: usize = 64;

/// Whether `input`, trimmed, is exactly 64 hex characters (either case).
///
/// Pure; used before any lookup so malformed input never reaches the network.
pub fn is_content_hash(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.len() == CONTENT_HASH_LEN && trimmed.bytes().all(|b| b.is_ascii_hexdigit())
}

/// A hash that passed [`is_content_hash`], stored lowercase.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    pub fn parse(input: &str) -> ClientResult<Self> {
        if input.trim().is_empty() {
            return Err(ClientError::validation("hash required"));
        }
        if !is_content_hash(input) {
            return Err(ClientError::validation(format!(
                "not a SHA-256 hex digest ({CONTENT_HASH_LEN} hex characters expected)"
            )));
        }
        Ok(Self(input.trim().to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for ContentHash {
    type Error = ClientError;

    fn try_from(value: String) -> ClientResult<Self> {
        Self::parse(&value)
    }
}

impl From<ContentHash> for String {
    fn from(value: ContentHash) -> Self {
        value.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

pub fn sha256_hex_reader<R: Read>(mut reader: R) -> std::io::Result<String> {
    let mut hasher = Sha256::new();
    let mut buf = [0_u8; 8192];

    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }

    Ok(hex::encode(hasher.finalize()))
}

pub fn sha256_hex_bytes(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// SHA-256 of a file's full contents.
pub fn digest_file(path: &Path) -> ClientResult<ContentHash> {
    let file = File::open(path).map_err(|e| ClientError::Io {
        message: format!("failed to open {}: {}", path.display(), e),
    })?;
    let hex = sha256_hex_reader(file).map_err(|e| ClientError::Io {
        message: format!("failed to read {}: {}", path.display(), e),
    })?;
    Ok(ContentHash(hex))
}

/// [`digest_file`] on the blocking pool.
pub async fn digest_file_async(path: &Path) -> ClientResult<ContentHash> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || digest_file(&path))
        .await
        .map_err(|e| ClientError::Io {
            message: format!("digest task failed: {e}"),
        })?
}

/// Digest of an in-memory buffer as a [`ContentHash`].
pub fn digest_bytes(bytes: &[u8]) -> ContentHash {
    ContentHash(sha256_hex_bytes(bytes))
}
