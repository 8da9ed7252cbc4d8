//! Per-(target, action) locking for control requests.

use std::collections::HashMap;

use crate::gateway::{ActionReply, GatewayError};
use crate::model::ControlKey;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ControlState {
    Enabled,
    /// Request outstanding; the lock is held.
    Pending,
    /// Succeeded; stays disabled until the rows are rebuilt by a refresh.
    Settled,
}

/// Lock token for one outstanding control request. Consumed by
/// [`ActionDispatcher::finish`].
#[derive(Debug, PartialEq, Eq)]
pub struct PendingAction {
    key: ControlKey,
}

impl PendingAction {
    pub fn key(&self) -> &ControlKey {
        &self.key
    }
}

#[derive(Debug, Default)]
pub struct ActionDispatcher {
    controls: HashMap<ControlKey, ControlState>,
}

impl ActionDispatcher {
    pub fn state(&self, key: &ControlKey) -> ControlState {
        self.controls
            .get(key)
            .copied()
            .unwrap_or(ControlState::Enabled)
    }

    pub fn is_enabled(&self, key: &ControlKey) -> bool {
        self.state(key) == ControlState::Enabled
    }

    pub fn is_locked(&self, key: &ControlKey) -> bool {
        self.state(key) == ControlState::Pending
    }

    pub fn pending_count(&self) -> usize {
        self.controls
            .values()
            .filter(|s| **s == ControlState::Pending)
            .count()
    }

    /// Takes the lock and disables the control. `None` when the control is
    /// not enabled, in which case nothing must be sent.
    pub fn begin(&mut self, key: ControlKey) -> Option<PendingAction> {
        if !self.is_enabled(&key) {
            tracing::debug!(%key, state = ?self.state(&key), "dispatch ignored; control disabled");
            return None;
        }
        self.controls.insert(key.clone(), ControlState::Pending);
        Some(PendingAction { key })
    }

    /// Releases the lock. Returns the success message when the action
    /// succeeded; a failed action re-enables its control.
    pub fn finish(
        &mut self,
        pending: PendingAction,
        result: &Result<ActionReply, GatewayError>,
    ) -> Option<String> {
        let PendingAction { key } = pending;
        match result {
            Ok(reply) => {
                if key.action.is_daemon_wide() {
                    self.controls.remove(&key);
                } else {
                    self.controls.insert(key.clone(), ControlState::Settled);
                }
                Some(reply.message_or(&format!("{} successful.", key.action)))
            }
            Err(_) => {
                self.controls.remove(&key);
                None
            }
        }
    }

    /// Rows were rebuilt from a fresh snapshot; only outstanding requests
    /// keep their controls disabled.
    pub fn rows_rebuilt(&mut self) {
        self.controls.retain(|_, s| *s == ControlState::Pending);
    }
}

#[cfg(test)]
#[path = "tests/dispatcher_tests.rs"]
mod tests;
