//! Capability trait every access SDK adapter implements.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;

use super::error::ServiceError;
use super::event::UnlockAttempt;
use crate::credential::Credential;

/// Normalized view of an access-control SDK.
///
/// UI models depend only on this trait; the host application supplies the
/// implementation at construction time. Observable state is exposed as
/// `watch` channels: each caller gets its own receiver.
#[async_trait]
pub trait AccessService: Send + Sync {
    /// Label used in logs and swap history.
    fn name(&self) -> &str;

    /// One-time setup with a session token. Must precede [`activate`].
    ///
    /// # Errors
    /// `InvalidToken`, `DeactivationInProgress`, `AlreadyInitialized`.
    ///
    /// [`activate`]: AccessService::activate
    fn initialize(&self, token: &str) -> Result<(), ServiceError>;

    /// Start synchronizing. Resolves once the SDK reports readiness or failure.
    ///
    /// Calling while already active has no additional effect.
    async fn activate(&self) -> Result<(), ServiceError>;

    /// Fetch the current credential list, also publishing it on [`credentials`].
    ///
    /// [`credentials`]: AccessService::credentials
    async fn refresh(&self) -> Result<Vec<Credential>, ServiceError>;

    /// Validate and prepare an unlock attempt.
    ///
    /// All precondition failures are reported here, before any stream exists.
    ///
    /// # Errors
    /// `InitializationRequired`, `InvalidCredentialId`, `IntegrationNotFound`,
    /// `CredentialErrors`.
    fn unlock(&self, credential_id: &str, timeout: Duration) -> Result<UnlockAttempt, ServiceError>;

    /// Tear the session down. Best effort; never fails.
    ///
    /// `deintegrate` also removes this device from the backend, irreversibly.
    fn deactivate(&self, deintegrate: bool);

    /// Current credential snapshot and its change notifications.
    fn credentials(&self) -> watch::Receiver<Vec<Credential>>;

    /// Session liveness and its change notifications.
    fn is_active(&self) -> watch::Receiver<bool>;
}
