//! Two-phase delete confirmation.
//!
//! ```text
//! Idle --open--> ConfirmPending{target} --confirm--> Idle   (delete target)
//!                                       --cancel---> Idle   (no mutation)
//! ```
//!
//! The target is captured when the dialog opens. A later selection change
//! does not retarget a pending confirmation. [`DeleteWorkflow::confirm`] is
//! the only code path that queues a delete intent.

use foundry_universe::intent::{CausalReason, IntentBuffer, ViewId};
use serde::{Deserialize, Serialize};

/// Where the workflow is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeleteState {
    #[default]
    Idle,
    ConfirmPending {
        target: String,
    },
}

/// The delete confirmation state machine.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeleteWorkflow {
    state: DeleteState,
}

impl DeleteWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &DeleteState {
        &self.state
    }

    pub fn is_pending(&self) -> bool {
        matches!(self.state, DeleteState::ConfirmPending { .. })
    }

    /// The captured target, while a confirmation is pending.
    pub fn target(&self) -> Option<&str> {
        match &self.state {
            DeleteState::ConfirmPending { target } => Some(target),
            DeleteState::Idle => None,
        }
    }

    /// The dialog body while a confirmation is pending.
    pub fn prompt(&self) -> Option<String> {
        self.target().map(|target| {
            format!("Are you sure you want to delete the '{target}' universe? This cannot be undone.")
        })
    }

    /// Open the dialog for `selection`.
    ///
    /// With no selection there is nothing to delete and the workflow stays
    /// where it is. Opening again while pending recaptures the target.
    /// Returns `true` if the dialog is now showing `selection`.
    pub fn open(&mut self, selection: Option<&str>) -> bool {
        let Some(target) = selection else {
            return false;
        };
        self.state = DeleteState::ConfirmPending {
            target: target.to_owned(),
        };
        true
    }

    /// Close the dialog without deleting. Returns `true` if it was open.
    pub fn cancel(&mut self) -> bool {
        let was_pending = self.is_pending();
        self.state = DeleteState::Idle;
        was_pending
    }

    /// Confirm a pending delete: queue the delete of the captured target and
    /// return to `Idle`. Returns the target, or `None` if nothing was pending.
    ///
    /// A target that disappeared in the meantime yields a suppressed intent,
    /// so the store is left unchanged.
    pub fn confirm(&mut self, intents: &mut IntentBuffer) -> Option<String> {
        match std::mem::take(&mut self.state) {
            DeleteState::ConfirmPending { target } => {
                intents.delete(
                    &target,
                    ViewId::DELETE_DIALOG,
                    CausalReason::Confirmation("confirm_delete".to_owned()),
                );
                Some(target)
            }
            DeleteState::Idle => None,
        }
    }
}
