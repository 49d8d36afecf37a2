//! Client for the VeriChain document-hash backend.
//!
//! This crate provides:
//!
//! - HTTP client for the store / retrieve / revoke / verify / upload endpoints
//! - Normalization of the backend's assorted retrieve payload shapes
//! - A local format gate for SHA-256 content hashes, and file digests
//! - Headless upload, dashboard and verify flows with in-flight guards
//!
//! # Quick Start
//!
//! ```no_run
//! use verichain_client::{digest_file, DocClient};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = DocClient::from_env()?;
//!
//! let wallet = "0x5b38da6a701c568545dcfcb03fcb875f56beddc4";
//! let hash = digest_file(std::path::Path::new("diploma.pdf"))?;
//! client.store(wallet, hash.as_str(), "diploma.pdf").await?;
//!
//! for record in client.retrieve(wallet).await? {
//!     println!("{} {} {}", record.name, record.hash, record.status_label());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration
//!
//! | Environment Variable | Description |
//! |---------------------|-------------|
//! | `VERICHAIN_API_BASE_URL` | Backend base URL (default: `http://127.0.0.1:5000`) |
//! | `VERICHAIN_TIMEOUT` | Request timeout in seconds (default: 10) |

pub mod client;
pub mod error;
pub mod hash;
pub mod normalize;
pub mod record;
pub mod session;
pub mod types;

// Re-export main types
pub use client::{DocClient, CLIENT_USER_AGENT};
pub use error::{ClientError, ClientResult};
pub use hash::{
    digest_bytes, digest_file, digest_file_async, is_content_hash, sha256_hex_bytes,
    sha256_hex_reader, ContentHash, CONTENT_HASH_LEN,
};
pub use normalize::{normalize, Payload, DATA_NAME, STORED_DATA_NAME};
pub use record::{short, DocumentRecord, UNNAMED};
pub use session::{
    Dashboard, FetchState, HashLookup, InFlight, Outcome, SimulatedLookup, UploadFlow,
    UploadState, VerifyFlow, VerifyState, SIMULATED_LATENCY,
};
pub use types::{
    ClientConfig, RetrieveRequest, RevokeReceipt, RevokeRequest, StoreReceipt, StoreRequest,
    UploadReceipt, VerifyReport, WalletAddress, DEFAULT_API_URL,
};
