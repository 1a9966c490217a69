//! Credential list model.

use std::sync::Arc;

use tokio::sync::watch;

use crate::credential::Credential;
use crate::service::{AccessService, ServiceError};
use crate::ui::mvi::Reducer;

use super::intent::CredentialListIntent;
use super::reducer::CredentialListReducer;
use super::state::CredentialListState;

/// Searchable, selectable projection of the service's credentials.
///
/// Keeps its own copy of the snapshot, refreshed from the service's watch
/// channels by [`sync`](Self::sync) and [`changed`](Self::changed).
/// Activation and refresh failures never propagate; they are logged and
/// kept in [`last_error`](Self::last_error).
pub struct CredentialListModel {
    service: Arc<dyn AccessService>,
    credentials_rx: watch::Receiver<Vec<Credential>>,
    active_rx: watch::Receiver<bool>,
    state: CredentialListState,
    auto_select_single: bool,
}

impl CredentialListModel {
    pub fn new(service: Arc<dyn AccessService>) -> Self {
        let credentials_rx = service.credentials();
        let active_rx = service.is_active();
        let mut model = Self {
            service,
            credentials_rx,
            active_rx,
            state: CredentialListState::default(),
            auto_select_single: true,
        };
        model.sync();
        model
    }

    /// Toggle selecting the only credential after activation.
    pub fn with_auto_select_single(mut self, enabled: bool) -> Self {
        self.auto_select_single = enabled;
        self
    }

    pub fn service(&self) -> Arc<dyn AccessService> {
        Arc::clone(&self.service)
    }

    pub fn state(&self) -> &CredentialListState {
        &self.state
    }

    pub fn credentials(&self) -> &[Credential] {
        &self.state.credentials
    }

    pub fn filtered_credentials(&self) -> Vec<&Credential> {
        self.state.filtered_credentials()
    }

    pub fn selected_credential_id(&self) -> Option<&str> {
        self.state.selected_credential_id.as_deref()
    }

    pub fn selected_credential(&self) -> Option<&Credential> {
        self.state.selected_credential()
    }

    pub fn search_text(&self) -> &str {
        &self.state.search_text
    }

    pub fn is_activated(&self) -> bool {
        self.state.is_activated
    }

    pub fn last_error(&self) -> Option<&ServiceError> {
        self.state.last_error.as_ref()
    }

    /// Select a credential, or clear the selection with `None`.
    pub fn select(&mut self, credential: Option<&Credential>) {
        let id = credential.map(|c| c.id.clone());
        self.dispatch(CredentialListIntent::Select(id));
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.dispatch(CredentialListIntent::SetSearchText(text.into()));
    }

    pub fn clear_error(&mut self) {
        self.dispatch(CredentialListIntent::ClearError);
    }

    /// Pull the latest service snapshot into the local copy.
    pub fn sync(&mut self) {
        let credentials = self.credentials_rx.borrow_and_update().clone();
        if credentials != self.state.credentials {
            self.dispatch(CredentialListIntent::CredentialsUpdated(credentials));
        }
        let active = *self.active_rx.borrow_and_update();
        if active != self.state.is_activated {
            self.dispatch(CredentialListIntent::ActivationChanged(active));
        }
    }

    /// Wait for the service to publish a change, then sync.
    ///
    /// Returns false once the service has gone away.
    pub async fn changed(&mut self) -> bool {
        let alive = tokio::select! {
            res = self.credentials_rx.changed() => res.is_ok(),
            res = self.active_rx.changed() => res.is_ok(),
        };
        self.sync();
        alive
    }

    /// Ask the service for a fresh list. Advisory: errors are not returned.
    pub async fn refresh_credentials(&mut self) {
        match self.service.refresh().await {
            Ok(credentials) => {
                tracing::debug!(count = credentials.len(), "Credentials refreshed");
                self.sync();
            }
            Err(err) => {
                tracing::warn!(error = %err, "Credential refresh failed");
                self.dispatch(CredentialListIntent::OperationFailed(err));
            }
        }
    }

    /// Appearance hook. Activates the service if needed, then selects the
    /// only credential when there is no real choice to make.
    ///
    /// Safe to call on every appearance.
    pub async fn on_appear(&mut self) {
        self.sync();
        if !self.state.is_activated {
            if let Err(err) = self.service.activate().await {
                tracing::warn!(error = %err, "Activation failed");
                self.dispatch(CredentialListIntent::OperationFailed(err));
                return;
            }
            self.sync();
        }

        if self.auto_select_single {
            let before = self.state.selected_credential_id.clone();
            self.dispatch(CredentialListIntent::ActivationCompleted);
            if let Some(id) = self.selected_credential_id().filter(|id| before.as_deref() != Some(*id)) {
                tracing::debug!(credential_id = %id, "Selected the only credential");
            }
        }
    }

    /// Follow a service swap: resubscribe and drop the selection.
    pub fn rebind(&mut self, service: Arc<dyn AccessService>) {
        self.credentials_rx = service.credentials();
        self.active_rx = service.is_active();
        self.service = service;
        self.dispatch(CredentialListIntent::Select(None));
        self.sync();
        tracing::debug!(service = self.service.name(), "Credential list rebound");
    }

    fn dispatch(&mut self, intent: CredentialListIntent) {
        let state = std::mem::take(&mut self.state);
        self.state = CredentialListReducer::reduce(state, intent);
    }
}
