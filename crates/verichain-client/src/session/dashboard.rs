use std::sync::Mutex;

use tracing::{debug, info, warn};

use crate::client::DocClient;
use crate::error::{ClientError, ClientResult};
use crate::record::DocumentRecord;
use crate::types::RevokeReceipt;

use super::failure_message;
use super::guard::{InFlight, Outcome};

/// Dashboard list state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Fetching,
    Ready,
    Error,
}

#[derive(Debug)]
struct DashboardView {
    wallet: String,
    state: FetchState,
    records: Vec<DocumentRecord>,
    message: String,
    /// Bumped by `clear` and `set_wallet`; a fetch started under an older
    /// value does not touch the list.
    generation: u64,
}

/// A wallet's document list with fetch and revoke actions.
pub struct Dashboard {
    client: DocClient,
    view: Mutex<DashboardView>,
    fetching: InFlight,
    revoking: InFlight,
}

impl Dashboard {
    pub fn new(client: DocClient) -> Self {
        Self {
            client,
            view: Mutex::new(DashboardView {
                wallet: String::new(),
                state: FetchState::Idle,
                records: Vec::new(),
                message: String::new(),
                generation: 0,
            }),
            fetching: InFlight::new(),
            revoking: InFlight::new(),
        }
    }

    pub fn with_wallet(self, wallet: &str) -> Self {
        self.set_wallet(wallet);
        self
    }

    pub fn set_wallet(&self, wallet: &str) {
        self.update(|view| {
            view.wallet = wallet.trim().to_string();
            view.generation += 1;
        });
    }

    /// Replace the list with the wallet's records from the backend.
    ///
    /// On failure the list is emptied and the state is `Error`.
    pub async fn fetch(&self) -> Outcome<ClientResult<usize>> {
        let Some(_ticket) = self.fetching.try_begin() else {
            return Outcome::Ignored;
        };

        let (wallet, generation) = self.read(|view| (view.wallet.clone(), view.generation));
        if wallet.is_empty() {
            self.set_message("Enter or connect your wallet address first.");
            return Outcome::Completed(Err(ClientError::Validation {
                message: "wallet address required".to_string(),
            }));
        }

        self.update(|view| {
            view.state = FetchState::Fetching;
            view.message = "Fetching documents…".to_string();
        });

        let result = self.client.retrieve(&wallet).await;
        let failure = result.as_ref().err().map(|e| match e {
            ClientError::Timeout { .. } => failure_message("Failed to fetch documents", e),
            _ => "Failed to fetch documents (backend unreachable or error).".to_string(),
        });

        let applied = self.update(|view| {
            if view.generation != generation {
                return false;
            }
            match (&result, failure) {
                (Ok(records), _) => {
                    let count = records.len();
                    view.records = records.clone();
                    view.state = FetchState::Ready;
                    view.message = if count > 0 {
                        format!("Loaded {count} document(s)")
                    } else {
                        "No documents found".to_string()
                    };
                }
                (Err(_), message) => {
                    view.records.clear();
                    view.state = FetchState::Error;
                    view.message = message.unwrap_or_default();
                }
            }
            true
        });
        if !applied {
            debug!(wallet = %wallet, "list cleared or wallet changed during fetch, dropping result");
            return Outcome::Ignored;
        }

        let outcome = match result {
            Ok(records) => {
                info!(wallet = %wallet, count = records.len(), "fetched documents");
                Ok(records.len())
            }
            Err(e) => {
                warn!(wallet = %wallet, error = %e, "failed to fetch documents");
                Err(e)
            }
        };
        Outcome::Completed(outcome)
    }

    /// Revoke a listed record; it is marked revoked only once the backend
    /// confirms.
    pub async fn revoke(&self, hash: &str) -> Outcome<ClientResult<RevokeReceipt>> {
        let Some(_ticket) = self.revoking.try_begin() else {
            return Outcome::Ignored;
        };

        let (wallet, listed) = self.read(|view| {
            let listed = view.records.iter().find(|r| r.hash == hash).cloned();
            (view.wallet.clone(), listed)
        });
        if wallet.is_empty() {
            self.set_message("Connect wallet before revoking.");
            return Outcome::Completed(Err(ClientError::Validation {
                message: "wallet address required".to_string(),
            }));
        }
        let Some(record) = listed else {
            self.set_message("Invalid document selected.");
            return Outcome::Completed(Err(ClientError::Validation {
                message: format!("no listed document with hash {hash}"),
            }));
        };
        if record.revoked {
            self.set_message("Document already revoked.");
            return Outcome::Completed(Err(ClientError::Validation {
                message: format!("document {} is already revoked", record.name),
            }));
        }

        self.set_message("Sending revoke request…");
        let outcome = match self.client.revoke(&wallet, &record.hash).await {
            Ok(receipt) => {
                info!(hash = %record.hash, "document revoked");
                let message = receipt
                    .message
                    .clone()
                    .unwrap_or_else(|| "Revoke request submitted".to_string());
                self.update(|view| {
                    for r in view.records.iter_mut().filter(|r| r.hash == record.hash) {
                        r.revoked = true;
                    }
                    view.message = message;
                });
                Ok(receipt)
            }
            Err(e) => {
                warn!(hash = %record.hash, error = %e, "failed to revoke document");
                self.set_message(&failure_message("Failed to revoke document", &e));
                Err(e)
            }
        };
        Outcome::Completed(outcome)
    }

    /// Drop the local list (the backend is untouched).
    pub fn clear(&self) {
        self.update(|view| {
            view.records.clear();
            view.state = FetchState::Idle;
            view.message = "Cleared local list (UI only).".to_string();
            view.generation += 1;
        });
    }

    pub fn records(&self) -> Vec<DocumentRecord> {
        self.read(|view| view.records.clone())
    }

    pub fn state(&self) -> FetchState {
        self.read(|view| view.state)
    }

    pub fn message(&self) -> String {
        self.read(|view| view.message.clone())
    }

    pub fn is_revoking(&self) -> bool {
        self.revoking.is_busy()
    }

    fn set_message(&self, message: &str) {
        self.update(|view| view.message = message.to_string());
    }

    fn update<T>(&self, f: impl FnOnce(&mut DashboardView) -> T) -> T {
        let mut view = self.view.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut view)
    }

    fn read<T>(&self, f: impl FnOnce(&DashboardView) -> T) -> T {
        let view = self.view.lock().unwrap_or_else(|e| e.into_inner());
        f(&view)
    }
}
