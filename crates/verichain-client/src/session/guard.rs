use std::sync::atomic::{AtomicBool, Ordering};

/// Result of triggering a guarded action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The action ran.
    Completed(T),
    /// Another run of the same action was still in flight; nothing happened.
    Ignored,
}

impl<T> Outcome<T> {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Self::Ignored)
    }

    pub fn completed(self) -> Option<T> {
        match self {
            Self::Completed(value) => Some(value),
            Self::Ignored => None,
        }
    }
}

/// Busy flag for one triggering control (a "disabled while running" button).
#[derive(Debug, Default)]
pub struct InFlight {
    busy: AtomicBool,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the control; `None` while a previous claim is alive.
    pub fn try_begin(&self) -> Option<InFlightTicket<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| InFlightTicket { busy: &self.busy })
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }
}

/// Releases the control on drop.
#[derive(Debug)]
pub struct InFlightTicket<'a> {
    busy: &'a AtomicBool,
}

impl Drop for InFlightTicket<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}
