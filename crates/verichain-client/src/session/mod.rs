//! Interaction flows behind the upload, dashboard and verify screens.
//!
//! Each flow owns its view state behind a mutex (never held across an await)
//! and guards its triggering actions with [`InFlight`], so a flow can be
//! shared by reference between concurrent triggers. Failures are turned into
//! a status message on the flow; the error itself is still handed back to the
//! caller.

mod dashboard;
mod guard;
mod upload;
mod verify;

pub use dashboard::{Dashboard, FetchState};
pub use guard::{InFlight, InFlightTicket, Outcome};
pub use upload::{UploadFlow, UploadState};
pub use verify::{HashLookup, SimulatedLookup, VerifyFlow, VerifyState, SIMULATED_LATENCY};

use crate::error::ClientError;

/// Status line for a failed action.
///
/// Timeouts are reported as such so a slow backend reads differently from a
/// rejection; backend validation messages are shown verbatim.
pub(crate) fn failure_message(base: &str, err: &ClientError) -> String {
    match err {
        ClientError::Timeout { after_secs } => {
            format!("{base} (backend did not answer within {after_secs}s).")
        }
        ClientError::Validation { message } => message.clone(),
        _ => format!("{base}."),
    }
}
