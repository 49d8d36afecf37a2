//! Request/response types for the backend protocol.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{ClientError, ClientResult};

/// Body of `POST /store`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreRequest {
    pub wallet: String,
    pub hash: String,
    pub name: String,

    /// Content identifier (IPFS), only when the file was pinned elsewhere.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cid: Option<String>,
}

/// Response of `POST /store`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreReceipt {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub tx_hash: Option<String>,
}

/// Body of `POST /retrieve`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetrieveRequest {
    pub wallet: String,
}

/// Body of `POST /revoke`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeRequest {
    pub wallet: String,
    pub hash: String,
}

/// Response of `POST /revoke`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RevokeReceipt {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub tx_hash: Option<String>,
}

/// Response of `GET /verify`.
///
/// Every field is optional on the wire; a body without `exists` reads as
/// unknown.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifyReport {
    #[serde(default)]
    pub exists: bool,

    #[serde(default)]
    pub owner: Option<String>,

    /// Unix seconds at which the hash was anchored.
    #[serde(default)]
    pub timestamp: Option<u64>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub cid: Option<String>,

    #[serde(default)]
    pub revoked: bool,
}

impl VerifyReport {
    /// Known to the backend and not revoked.
    pub fn is_authentic(&self) -> bool {
        self.exists && !self.revoked
    }
}

/// Response of `POST /upload`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReceipt {
    #[serde(default)]
    pub message: Option<String>,

    #[serde(default)]
    pub hash: Option<String>,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub cid: Option<String>,

    #[serde(default)]
    pub tx_hash: Option<String>,
}

/// Wallet address of the acting user.
///
/// Only emptiness is checked locally; the backend owns address validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    pub fn parse(input: &str) -> ClientResult<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(ClientError::validation("wallet address required"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = ClientError;

    fn try_from(value: String) -> ClientResult<Self> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(value: WalletAddress) -> Self {
        value.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the backend.
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

/// Backend used when nothing is configured (the local development server).
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

impl ClientConfig {
    /// Create config from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `VERICHAIN_API_BASE_URL` | Backend base URL |
    /// | `VERICHAIN_TIMEOUT` | Request timeout in seconds |
    pub fn from_env() -> Self {
        Self {
            url: std::env::var("VERICHAIN_API_BASE_URL")
                .ok()
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(default_api_url),
            timeout_secs: std::env::var("VERICHAIN_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
                .filter(|secs| *secs > 0)
                .unwrap_or_else(default_timeout),
        }
    }

    /// Set the base URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}
