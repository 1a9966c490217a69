//! Intents for the unlock flow.

use crate::service::UnlockEvent;
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum UnlockIntent {
    /// The user tapped the card. Begins, cancels or dismisses by phase.
    Tap,

    /// The attempt could not start (missing credential or precondition error).
    Rejected { message: String },

    /// An event from the in-flight attempt.
    Event(UnlockEvent),

    /// Explicit cancel.
    Cancel,

    /// Terminal-state "OK" / "Try Again".
    Reset,
}

impl Intent for UnlockIntent {}
