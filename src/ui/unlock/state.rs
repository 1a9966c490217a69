//! Stored phase and derived card state for the unlock flow.

use crate::credential::{Credential, CredentialError};
use crate::ui::mvi::UiState;

/// Failure text used when the credential cannot be resolved.
pub const CREDENTIAL_UNAVAILABLE: &str = "Credential unavailable";

/// Failure text used when the SDK gives no diagnostic.
pub const UNKNOWN_FAILURE: &str = "unknown";

/// Internal phase of one credential's unlock flow.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum UnlockPhase {
    #[default]
    Idle,
    /// An attempt is in flight.
    Connecting,
    /// Access granted. The presentation resets this after showing it.
    Success,
    /// The attempt failed. Stays until reset or tapped.
    Failure { message: String },
}

impl UiState for UnlockPhase {}

/// What the card shows. Never stored; see [`UnlockCardState::derive`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnlockCardState {
    Idle,
    Connecting,
    Success,
    Failure { message: String },
    /// The credential is blocked; overrides every phase.
    Error(CredentialError),
}

impl UnlockCardState {
    /// Combine the stored phase with the live credential snapshot.
    ///
    /// A blocking error on the credential always wins, even while an
    /// attempt is in flight.
    pub fn derive(phase: &UnlockPhase, credential: Option<&Credential>) -> Self {
        if let Some(error) = credential.and_then(Credential::blocking_error) {
            return Self::Error(error.clone());
        }
        match phase {
            UnlockPhase::Idle => Self::Idle,
            UnlockPhase::Connecting => Self::Connecting,
            UnlockPhase::Success => Self::Success,
            UnlockPhase::Failure { message } => Self::Failure {
                message: message.clone(),
            },
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_connecting(&self) -> bool {
        matches!(self, Self::Connecting)
    }

    /// Success, failure and blocked cards wait for the user.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Failure { .. } | Self::Error(_))
    }

    /// Whether the card offers "try again" (only plain failures do).
    pub fn can_retry(&self) -> bool {
        matches!(self, Self::Failure { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failure { message } => Some(message),
            Self::Error(error) => Some(error.title()),
            _ => None,
        }
    }
}
