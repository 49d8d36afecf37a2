//! Backend client for storing, listing, revoking and verifying documents.
//!
//! Public API: no status code knowledge. All HTTP/status mapping in http.rs.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use reqwest::multipart::{Form, Part};
use tracing::debug;

use crate::error::{ClientError, ClientResult};
use crate::normalize::normalize;
use crate::record::DocumentRecord;
use crate::types::{
    ClientConfig, RevokeReceipt, RevokeRequest, StoreReceipt, StoreRequest, UploadReceipt,
    VerifyReport,
};

mod helpers;
mod http;

use helpers::required;
use http::HttpBackend;

/// User-Agent sent with every request.
pub const CLIENT_USER_AGENT: &str = concat!("verichain-client/", env!("CARGO_PKG_VERSION"));

/// Client for the document backend.
#[derive(Debug, Clone)]
pub struct DocClient {
    http: HttpBackend,
}

impl DocClient {
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        if config.timeout_secs == 0 {
            return Err(ClientError::Config {
                message: "timeout must be at least one second".to_string(),
            });
        }
        let base_url = config.url.trim().trim_end_matches('/').to_string();
        url::Url::parse(&base_url).map_err(|e| ClientError::Config {
            message: format!("invalid API base URL {base_url:?}: {e}"),
        })?;

        let mut default_headers = HeaderMap::new();
        default_headers.insert(USER_AGENT, HeaderValue::from_static(CLIENT_USER_AGENT));

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .default_headers(default_headers)
            .build()
            .map_err(|e| ClientError::Network {
                message: format!("failed to create HTTP client: {}", e),
            })?;

        Ok(Self {
            http: HttpBackend {
                client,
                base_url,
                config,
            },
        })
    }

    pub fn from_env() -> ClientResult<Self> {
        Self::new(ClientConfig::from_env())
    }

    /// Anchor a hash for a wallet under a display name.
    pub async fn store(&self, wallet: &str, hash: &str, name: &str) -> ClientResult<StoreReceipt> {
        self.store_request(StoreRequest {
            wallet: wallet.to_string(),
            hash: hash.to_string(),
            name: name.to_string(),
            cid: None,
        })
        .await
    }

    /// [`store`](Self::store) with every field of the request, including `cid`.
    pub async fn store_request(&self, request: StoreRequest) -> ClientResult<StoreReceipt> {
        let request = StoreRequest {
            wallet: required("wallet", &request.wallet)?.to_string(),
            hash: required("hash", &request.hash)?.to_string(),
            name: required("name", &request.name)?.to_string(),
            cid: request.cid.filter(|cid| !cid.trim().is_empty()),
        };
        debug!(wallet = %request.wallet, hash = %request.hash, "storing document");

        self.http.post_json("store", &request, "store").await
    }

    /// All records stored for a wallet, normalized.
    pub async fn retrieve(&self, wallet: &str) -> ClientResult<Vec<DocumentRecord>> {
        let payload = self.retrieve_raw(wallet).await?;
        let records = normalize(&payload);
        debug!(count = records.len(), "normalized retrieve payload");
        Ok(records)
    }

    /// The retrieve payload exactly as the backend sent it.
    pub async fn retrieve_raw(&self, wallet: &str) -> ClientResult<serde_json::Value> {
        let wallet = required("wallet", wallet)?;
        self.http.retrieve(wallet).await
    }

    /// Mark a stored record revoked.
    pub async fn revoke(&self, wallet: &str, hash: &str) -> ClientResult<RevokeReceipt> {
        let request = RevokeRequest {
            wallet: required("wallet", wallet)?.to_string(),
            hash: required("hash", hash)?.to_string(),
        };
        debug!(wallet = %request.wallet, hash = %request.hash, "revoking document");

        let resource = format!("document {}", request.hash);
        self.http.post_json("revoke", &request, &resource).await
    }

    /// Ask the backend whether a hash is anchored.
    pub async fn verify_hash(&self, hash: &str) -> ClientResult<VerifyReport> {
        let hash = required("hash", hash)?;
        debug!(hash = %hash, "verifying hash");

        let resource = format!("hash {hash}");
        self.http
            .get_json("verify", &[("hash", hash)], &resource)
            .await
    }

    /// Send file bytes and let the backend hash and anchor them.
    pub async fn upload(
        &self,
        wallet: &str,
        file_name: &str,
        bytes: Vec<u8>,
        cid: Option<&str>,
    ) -> ClientResult<UploadReceipt> {
        let wallet = required("wallet", wallet)?.to_string();
        let file_name = required("file name", file_name)?.to_string();
        debug!(wallet = %wallet, file = %file_name, size = bytes.len(), "uploading document");

        let mut form = Form::new()
            .text("wallet", wallet)
            .part("file", Part::bytes(bytes).file_name(file_name));
        if let Some(cid) = cid.map(str::trim).filter(|c| !c.is_empty()) {
            form = form.text("cid", cid.to_string());
        }

        self.http.post_multipart("upload", form, "upload").await
    }

    pub fn base_url(&self) -> &str {
        &self.http.base_url
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.config.timeout_secs)
    }
}
