//! Precondition errors raised by [`AccessService`](super::AccessService) commands.

use thiserror::Error;

use crate::credential::CredentialError;

/// Errors raised synchronously before a service operation begins.
///
/// Runtime outcomes of an unlock attempt are not errors; they arrive as
/// terminal [`UnlockEvent`](super::UnlockEvent)s.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("Session token is empty or malformed")]
    InvalidToken,

    #[error("A deactivation is in progress")]
    DeactivationInProgress,

    #[error("Service is already initialized")]
    AlreadyInitialized,

    #[error("Service must be initialized and active first")]
    InitializationRequired,

    #[error("Credential '{id}' not found")]
    InvalidCredentialId { id: String },

    #[error("Integration '{integration}' not found")]
    IntegrationNotFound { integration: String },

    #[error("Credential is blocked: {}", describe(.0))]
    CredentialErrors(Vec<CredentialError>),

    /// The backing SDK reported a readiness failure.
    #[error("Access SDK error: {reason}")]
    Sdk { reason: String },
}

fn describe(errors: &[CredentialError]) -> String {
    errors
        .iter()
        .map(|e| e.title())
        .collect::<Vec<_>>()
        .join(", ")
}
