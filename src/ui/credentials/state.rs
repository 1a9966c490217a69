//! State for the credential list.

use crate::credential::Credential;
use crate::service::ServiceError;
use crate::ui::mvi::UiState;

/// Private mirror of the service's credentials plus list-local UI state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CredentialListState {
    /// Service order, never re-sorted.
    pub credentials: Vec<Credential>,
    pub selected_credential_id: Option<String>,
    pub search_text: String,
    pub is_activated: bool,
    /// Most recent swallowed activate/refresh failure.
    pub last_error: Option<ServiceError>,
}

impl UiState for CredentialListState {}

impl CredentialListState {
    /// Credentials whose name contains the search text, in service order.
    pub fn filtered_credentials(&self) -> Vec<&Credential> {
        self.credentials
            .iter()
            .filter(|c| c.matches_search(&self.search_text))
            .collect()
    }

    pub fn selected_credential(&self) -> Option<&Credential> {
        let id = self.selected_credential_id.as_deref()?;
        self.credentials.iter().find(|c| c.id == id)
    }
}
