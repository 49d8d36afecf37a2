use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::client::DocClient;
use crate::error::{ClientError, ClientResult};
use crate::hash::{digest_file_async, ContentHash};
use crate::types::{StoreReceipt, StoreRequest};

use super::failure_message;
use super::guard::{InFlight, Outcome};

/// Name stored when the selected file has none.
const UNNAMED_FILE: &str = "unnamed";

/// Upload screen state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadState {
    Idle,
    Computing,
    Ready,
    Stored,
    Error,
}

#[derive(Debug)]
struct UploadView {
    file: Option<PathBuf>,
    hash: Option<ContentHash>,
    wallet: String,
    cid: Option<String>,
    state: UploadState,
    message: String,
}

/// Select a file, hash it locally, then anchor the hash for a wallet.
pub struct UploadFlow {
    client: DocClient,
    view: Mutex<UploadView>,
    computing: InFlight,
    storing: InFlight,
}

impl UploadFlow {
    pub fn new(client: DocClient) -> Self {
        Self {
            client,
            view: Mutex::new(UploadView {
                file: None,
                hash: None,
                wallet: String::new(),
                cid: None,
                state: UploadState::Idle,
                message: String::new(),
            }),
            computing: InFlight::new(),
            storing: InFlight::new(),
        }
    }

    pub fn with_wallet(self, wallet: &str) -> Self {
        self.set_wallet(wallet);
        self
    }

    pub fn set_wallet(&self, wallet: &str) {
        self.update(|view| view.wallet = wallet.trim().to_string());
    }

    pub fn set_cid(&self, cid: Option<&str>) {
        let cid = cid.map(str::trim).filter(|c| !c.is_empty()).map(String::from);
        self.update(|view| view.cid = cid);
    }

    /// Choose a file; any previous hash is discarded.
    pub fn select(&self, path: &Path) {
        let message = format!("File \"{}\" selected.", file_name(path));
        self.update(|view| {
            view.file = Some(path.to_path_buf());
            view.hash = None;
            view.state = UploadState::Idle;
            view.message = message;
        });
    }

    /// Use an already known hash instead of hashing a file.
    pub fn set_hash(&self, hash: ContentHash) {
        self.update(|view| {
            view.hash = Some(hash);
            view.state = UploadState::Ready;
        });
    }

    /// SHA-256 of the selected file.
    pub async fn compute(&self) -> Outcome<ClientResult<ContentHash>> {
        let Some(_ticket) = self.computing.try_begin() else {
            return Outcome::Ignored;
        };

        let Some(path) = self.read(|view| view.file.clone()) else {
            self.fail("Select a file first.");
            return Outcome::Completed(Err(ClientError::Validation {
                message: "no file selected".to_string(),
            }));
        };

        self.update(|view| {
            view.state = UploadState::Computing;
            view.message = "Computing SHA-256...".to_string();
        });

        let result = digest_file_async(&path).await;

        // The digest belongs to `path`; a select or clear in the meantime wins.
        let applied = self.update(|view| {
            if view.file.as_deref() != Some(path.as_path()) {
                return false;
            }
            match &result {
                Ok(hash) => {
                    view.hash = Some(hash.clone());
                    view.state = UploadState::Ready;
                    view.message = "Hash computed successfully!".to_string();
                }
                Err(_) => {
                    view.state = UploadState::Error;
                    view.message = "Failed to compute hash.".to_string();
                }
            }
            true
        });
        if !applied {
            debug!(file = %path.display(), "selection changed while hashing, dropping digest");
            return Outcome::Ignored;
        }

        match &result {
            Ok(hash) => info!(file = %path.display(), hash = %hash, "computed file digest"),
            Err(e) => warn!(file = %path.display(), error = %e, "failed to hash file"),
        }
        Outcome::Completed(result)
    }

    /// Store the computed hash under the selected file's name.
    pub async fn store(&self, name: Option<&str>) -> Outcome<ClientResult<StoreReceipt>> {
        let Some(_ticket) = self.storing.try_begin() else {
            return Outcome::Ignored;
        };

        let (hash, wallet, file, cid) = self.read(|view| {
            (
                view.hash.clone(),
                view.wallet.clone(),
                view.file.clone(),
                view.cid.clone(),
            )
        });
        let Some(hash) = hash else {
            self.fail("Compute the hash before storing.");
            return Outcome::Completed(Err(ClientError::Validation {
                message: "hash required".to_string(),
            }));
        };
        if wallet.is_empty() {
            self.fail("Please connect your wallet first.");
            return Outcome::Completed(Err(ClientError::Validation {
                message: "wallet address required".to_string(),
            }));
        }

        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(String::from)
            .or_else(|| file.as_deref().map(file_name))
            .unwrap_or_else(|| UNNAMED_FILE.to_string());

        self.set_message("Sending to backend...");
        let request = StoreRequest {
            wallet,
            hash: hash.to_string(),
            name,
            cid,
        };
        let outcome = match self.client.store_request(request).await {
            Ok(receipt) => {
                info!(hash = %hash, tx_hash = ?receipt.tx_hash, "document stored");
                let message = receipt
                    .message
                    .clone()
                    .unwrap_or_else(|| "Stored successfully!".to_string());
                self.update(|view| {
                    view.state = UploadState::Stored;
                    view.message = message;
                });
                Ok(receipt)
            }
            Err(e) => {
                warn!(hash = %hash, error = %e, "failed to store document");
                self.fail(&failure_message("Failed to store document", &e));
                Err(e)
            }
        };
        Outcome::Completed(outcome)
    }

    /// Forget the selected file and its hash.
    pub fn clear(&self) {
        self.update(|view| {
            view.file = None;
            view.hash = None;
            view.state = UploadState::Idle;
            view.message = "Cleared.".to_string();
        });
    }

    pub fn state(&self) -> UploadState {
        self.read(|view| view.state)
    }

    pub fn hash(&self) -> Option<ContentHash> {
        self.read(|view| view.hash.clone())
    }

    pub fn message(&self) -> String {
        self.read(|view| view.message.clone())
    }

    pub fn is_storing(&self) -> bool {
        self.storing.is_busy()
    }

    fn fail(&self, message: &str) {
        self.update(|view| {
            view.state = UploadState::Error;
            view.message = message.to_string();
        });
    }

    fn set_message(&self, message: &str) {
        self.update(|view| view.message = message.to_string());
    }

    fn update<T>(&self, f: impl FnOnce(&mut UploadView) -> T) -> T {
        let mut view = self.view.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut view)
    }

    fn read<T>(&self, f: impl FnOnce(&UploadView) -> T) -> T {
        let view = self.view.lock().unwrap_or_else(|e| e.into_inner());
        f(&view)
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| UNNAMED_FILE.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    use crate::hash::digest_bytes;
    use crate::types::ClientConfig;

    fn offline_flow() -> UploadFlow {
        let client = DocClient::new(ClientConfig::default().with_url("http://127.0.0.1:9"))
            .expect("client");
        UploadFlow::new(client)
    }

    #[tokio::test]
    async fn test_compute_requires_file() {
        let flow = offline_flow();
        let result = flow.compute().await.completed().expect("not ignored");

        assert!(matches!(result, Err(ClientError::Validation { .. })));
        assert_eq!(flow.state(), UploadState::Error);
        assert_eq!(flow.message(), "Select a file first.");
    }

    #[tokio::test]
    async fn test_compute_hashes_selected_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"contract v2").unwrap();

        let flow = offline_flow();
        flow.select(file.path());
        assert!(flow.message().starts_with("File \""));

        let hash = flow
            .compute()
            .await
            .completed()
            .expect("not ignored")
            .expect("digest");
        assert_eq!(hash, digest_bytes(b"contract v2"));
        assert_eq!(flow.state(), UploadState::Ready);
        assert_eq!(flow.hash(), Some(hash));
    }

    #[tokio::test]
    async fn test_store_requires_hash_then_wallet() {
        let flow = offline_flow();

        let result = flow.store(None).await.completed().expect("not ignored");
        assert!(matches!(result, Err(ClientError::Validation { .. })));
        assert_eq!(flow.message(), "Compute the hash before storing.");

        flow.set_hash(digest_bytes(b"x"));
        let result = flow.store(None).await.completed().expect("not ignored");
        assert!(matches!(result, Err(ClientError::Validation { .. })));
        assert_eq!(flow.message(), "Please connect your wallet first.");
        assert_eq!(flow.state(), UploadState::Error);
    }

    #[test]
    fn test_select_discards_previous_hash() {
        let flow = offline_flow();
        flow.set_hash(digest_bytes(b"x"));
        flow.select(Path::new("/tmp/report.pdf"));

        assert!(flow.hash().is_none());
        assert_eq!(flow.message(), "File \"report.pdf\" selected.");
        flow.clear();
        assert_eq!(flow.state(), UploadState::Idle);
    }

    #[tokio::test]
    async fn test_reselect_during_compute_drops_stale_digest() {
        let mut first = tempfile::NamedTempFile::new().unwrap();
        first.write_all(&vec![7u8; 32 * 1024 * 1024]).unwrap();
        let second = tempfile::NamedTempFile::new().unwrap();

        let flow = offline_flow();
        flow.select(first.path());

        let (outcome, ()) = tokio::join!(flow.compute(), async {
            tokio::task::yield_now().await;
            flow.select(second.path());
        });

        assert!(outcome.is_ignored());
        assert!(flow.hash().is_none());
        assert_eq!(flow.state(), UploadState::Idle);
        assert!(flow.message().starts_with("File \""));
    }

    #[tokio::test]
    async fn test_clear_during_compute_keeps_cleared_view() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&vec![1u8; 32 * 1024 * 1024]).unwrap();

        let flow = offline_flow();
        flow.select(file.path());

        let (outcome, ()) = tokio::join!(flow.compute(), async {
            tokio::task::yield_now().await;
            flow.clear();
        });

        assert!(outcome.is_ignored());
        assert!(flow.hash().is_none());
        assert_eq!(flow.message(), "Cleared.");
    }

    #[test]
    fn test_file_name_fallback() {
        assert_eq!(file_name(Path::new("/tmp/a.pdf")), "a.pdf");
        assert_eq!(file_name(Path::new("/")), "unnamed");
    }
}
