//! Intents for the credential list.

use crate::credential::Credential;
use crate::service::ServiceError;
use crate::ui::mvi::Intent;

#[derive(Debug, Clone)]
pub enum CredentialListIntent {
    /// Select a credential by id, or clear the selection.
    Select(Option<String>),

    SetSearchText(String),

    /// New snapshot from the service.
    CredentialsUpdated(Vec<Credential>),

    /// Session liveness changed.
    ActivationChanged(bool),

    /// Activation finished: select the only credential, if there is one.
    ActivationCompleted,

    /// An advisory operation (activate, refresh) failed.
    OperationFailed(ServiceError),

    ClearError,
}

impl Intent for CredentialListIntent {}
