use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::client::DocClient;
use crate::error::{ClientError, ClientResult};
use crate::hash::ContentHash;

use super::failure_message;
use super::guard::{InFlight, Outcome};

/// Answer time of [`SimulatedLookup`] by default.
pub const SIMULATED_LATENCY: Duration = Duration::from_millis(1200);

/// Something that can tell whether a well-formed hash is authentic.
#[async_trait]
pub trait HashLookup: Send + Sync {
    async fn is_authentic(&self, hash: &ContentHash) -> ClientResult<bool>;
}

#[async_trait]
impl HashLookup for DocClient {
    async fn is_authentic(&self, hash: &ContentHash) -> ClientResult<bool> {
        let report = self.verify_hash(hash.as_str()).await?;
        Ok(report.is_authentic())
    }
}

/// Stand-in backend: after a fixed latency, every well-formed hash is
/// authentic.
#[derive(Debug, Clone)]
pub struct SimulatedLookup {
    latency: Duration,
}

impl SimulatedLookup {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl Default for SimulatedLookup {
    fn default() -> Self {
        Self::new(SIMULATED_LATENCY)
    }
}

#[async_trait]
impl HashLookup for SimulatedLookup {
    async fn is_authentic(&self, _hash: &ContentHash) -> ClientResult<bool> {
        tokio::time::sleep(self.latency).await;
        Ok(true)
    }
}

/// Verify screen state: `Idle → Checking → {Valid | Invalid}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyState {
    Idle,
    Checking,
    Valid,
    Invalid,
}

impl VerifyState {
    pub fn label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Checking => "Checking",
            Self::Valid => "Authentic",
            Self::Invalid => "Not Found",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Valid | Self::Invalid)
    }
}

#[derive(Debug)]
struct VerifyView {
    input: String,
    state: VerifyState,
    message: String,
    failure: Option<ClientError>,
    /// Bumped on every input change; a lookup only lands on the input it
    /// was started for.
    generation: u64,
}

/// Hash verification flow.
///
/// Malformed input is decided locally; only gate-approved hashes reach the
/// lookup, which must answer within `budget`. A lookup that fails still ends
/// in `Invalid`, with the cause kept in [`VerifyFlow::failure`].
pub struct VerifyFlow<L> {
    lookup: L,
    budget: Duration,
    view: Mutex<VerifyView>,
    checking: InFlight,
}

impl<L: HashLookup> VerifyFlow<L> {
    pub fn new(lookup: L, budget: Duration) -> Self {
        Self {
            lookup,
            budget,
            view: Mutex::new(VerifyView {
                input: String::new(),
                state: VerifyState::Idle,
                message: String::new(),
                failure: None,
                generation: 0,
            }),
            checking: InFlight::new(),
        }
    }

    /// Check `input` and return the terminal state.
    ///
    /// `Ignored` when a check is already running, or when the input changed
    /// before the lookup answered; the stale verdict is then dropped.
    pub async fn check(&self, input: &str) -> Outcome<VerifyState> {
        let Some(_ticket) = self.checking.try_begin() else {
            return Outcome::Ignored;
        };
        let generation = self.reset(input, VerifyState::Idle);

        let Ok(hash) = ContentHash::parse(input) else {
            debug!("hash rejected by format gate");
            let message = "Not a valid SHA-256 hash.";
            return self.settle(generation, VerifyState::Invalid, message, None);
        };

        self.update(|view| {
            view.state = VerifyState::Checking;
            view.message = "Checking…".to_string();
        });
        let lookup = self.lookup.is_authentic(&hash);
        match tokio::time::timeout(self.budget, lookup).await {
            Ok(Ok(true)) => {
                self.settle(generation, VerifyState::Valid, "Document is authentic.", None)
            }
            Ok(Ok(false)) => self.settle(
                generation,
                VerifyState::Invalid,
                "No matching document found.",
                None,
            ),
            Ok(Err(e)) => {
                warn!(error = %e, "hash lookup failed");
                let message = failure_message("Verification failed", &e);
                self.settle(generation, VerifyState::Invalid, &message, Some(e))
            }
            Err(_) => {
                warn!(budget_ms = self.budget.as_millis(), "hash lookup timed out");
                let e = ClientError::Timeout {
                    after_secs: whole_secs(self.budget),
                };
                let message = failure_message("Verification failed", &e);
                self.settle(generation, VerifyState::Invalid, &message, Some(e))
            }
        }
    }

    /// Replace the input; any previous verdict no longer applies.
    pub fn set_input(&self, input: &str) {
        self.reset(input, VerifyState::Idle);
    }

    pub fn clear(&self) {
        self.set_input("");
    }

    pub fn state(&self) -> VerifyState {
        self.read(|view| view.state)
    }

    pub fn input(&self) -> String {
        self.read(|view| view.input.clone())
    }

    pub fn message(&self) -> String {
        self.read(|view| view.message.clone())
    }

    /// Why the last lookup could not answer, if it failed.
    pub fn failure(&self) -> Option<ClientError> {
        self.read(|view| view.failure.clone())
    }

    /// Shareable one-line verdict.
    pub fn result_line(&self) -> String {
        self.read(|view| match view.state {
            VerifyState::Valid => format!("VeriChain: AUTHENTIC - {}", view.input.trim()),
            VerifyState::Invalid => format!("VeriChain: NOT FOUND - {}", view.input.trim()),
            other => format!("VeriChain: {}", other.label().to_lowercase()),
        })
    }

    /// New input: back to `state` with no verdict. Returns the new generation.
    fn reset(&self, input: &str, state: VerifyState) -> u64 {
        self.update(|view| {
            view.generation += 1;
            view.input = input.to_string();
            view.state = state;
            view.message.clear();
            view.failure = None;
            view.generation
        })
    }

    fn settle(
        &self,
        generation: u64,
        state: VerifyState,
        message: &str,
        failure: Option<ClientError>,
    ) -> Outcome<VerifyState> {
        self.update(|view| {
            if view.generation != generation {
                debug!("input changed during lookup, dropping verdict");
                return Outcome::Ignored;
            }
            view.state = state;
            view.message = message.to_string();
            view.failure = failure;
            Outcome::Completed(state)
        })
    }

    fn update<T>(&self, f: impl FnOnce(&mut VerifyView) -> T) -> T {
        let mut view = self.view.lock().unwrap_or_else(|e| e.into_inner());
        f(&mut view)
    }

    fn read<T>(&self, f: impl FnOnce(&VerifyView) -> T) -> T {
        let view = self.view.lock().unwrap_or_else(|e| e.into_inner());
        f(&view)
    }
}

/// Seconds in `budget`, rounded up.
fn whole_secs(budget: Duration) -> u64 {
    budget.as_secs() + u64::from(budget.subsec_nanos() > 0)
}
