//! Reducer for the unlock flow.

use crate::service::UnlockEvent;
use crate::ui::mvi::Reducer;

use super::intent::UnlockIntent;
use super::state::{UnlockPhase, UNKNOWN_FAILURE};

/// Unlock phase transitions.
///
/// Pure: resolving the credential, calling the service, spawning or
/// cancelling the event consumer and pulsing haptics all happen in
/// [`UnlockStateMachine`](super::UnlockStateMachine) around the dispatch.
pub struct UnlockReducer;

impl Reducer for UnlockReducer {
    type State = UnlockPhase;
    type Intent = UnlockIntent;

    fn reduce(state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            // Same gesture, three meanings.
            UnlockIntent::Tap => match state {
                UnlockPhase::Idle => UnlockPhase::Connecting,
                UnlockPhase::Connecting
                | UnlockPhase::Success
                | UnlockPhase::Failure { .. } => UnlockPhase::Idle,
            },

            UnlockIntent::Rejected { message } => UnlockPhase::Failure { message },

            UnlockIntent::Event(event) => match state {
                UnlockPhase::Connecting => match event {
                    UnlockEvent::Launched => UnlockPhase::Connecting,
                    UnlockEvent::GrantedAccess => UnlockPhase::Success,
                    UnlockEvent::TimedOut => UnlockPhase::Idle,
                    UnlockEvent::ConnectionFailed { debug_message } => UnlockPhase::Failure {
                        message: debug_message.unwrap_or_else(|| UNKNOWN_FAILURE.to_string()),
                    },
                },
                // Stale event from an attempt that is no longer current.
                other => other,
            },

            UnlockIntent::Cancel | UnlockIntent::Reset => UnlockPhase::Idle,
        }
    }
}
