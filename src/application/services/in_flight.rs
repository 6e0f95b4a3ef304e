use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};

use crate::domain::{Action, GatewayError};

/// Tracks which actions have a submission pending.
///
/// A second submission of an action is refused until the first one settles.
/// Different actions never block each other.
#[derive(Debug, Default)]
pub struct InFlight {
    pending: Mutex<HashSet<Action>>,
}

impl InFlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `action`, or fail with `Busy` if it is already pending.
    pub fn begin(&self, action: Action) -> Result<InFlightPermit<'_>, GatewayError> {
        let mut pending = self.pending.lock().unwrap_or_else(PoisonError::into_inner);
        if !pending.insert(action) {
            return Err(GatewayError::Busy(action));
        }
        Ok(InFlightPermit { owner: self, action })
    }

    pub fn is_pending(&self, action: Action) -> bool {
        self.pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains(&action)
    }
}

/// Releases its action when dropped.
#[derive(Debug)]
pub struct InFlightPermit<'a> {
    owner: &'a InFlight,
    action: Action,
}

impl Drop for InFlightPermit<'_> {
    fn drop(&mut self) {
        self.owner
            .pending
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.action);
    }
}
