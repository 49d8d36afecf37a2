//! Normalized document record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder name for records whose source carried none.
pub const UNNAMED: &str = "Unnamed";

/// One stored document as understood by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRecord {
    /// Display label.
    pub name: String,

    /// Content fingerprint; identity key within one result set.
    pub hash: String,

    /// Backend/on-chain transaction that anchored the record.
    #[serde(default)]
    pub transaction_reference: Option<String>,

    #[serde(default)]
    pub revoked: bool,

    /// Unix seconds, when the backend reports it.
    #[serde(default)]
    pub timestamp: Option<u64>,

    /// IPFS content identifier, when the backend reports it.
    #[serde(default)]
    pub cid: Option<String>,
}

impl DocumentRecord {
    pub fn new(name: impl Into<String>, hash: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            hash: hash.into(),
            transaction_reference: None,
            revoked: false,
            timestamp: None,
            cid: None,
        }
    }

    /// Anchoring time as a UTC datetime.
    pub fn stored_at(&self) -> Option<DateTime<Utc>> {
        let secs = i64::try_from(self.timestamp?).ok()?;
        DateTime::from_timestamp(secs, 0)
    }

    /// "Active" or "Revoked".
    pub fn status_label(&self) -> &'static str {
        if self.revoked {
            "Revoked"
        } else {
            "Active"
        }
    }
}

/// Shorten a long identifier for list display: first `n` chars plus an ellipsis.
pub fn short(s: &str, n: usize) -> String {
    if s.is_empty() {
        return "-".to_string();
    }
    let mut out: String = s.chars().take(n).collect();
    if s.chars().count() > n {
        out.push('…');
    }
    out
}
