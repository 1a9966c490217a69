//! Reducer for the credential list.

use crate::ui::mvi::Reducer;

use super::intent::CredentialListIntent;
use super::state::CredentialListState;

pub struct CredentialListReducer;

impl Reducer for CredentialListReducer {
    type State = CredentialListState;
    type Intent = CredentialListIntent;

    fn reduce(mut state: Self::State, intent: Self::Intent) -> Self::State {
        match intent {
            CredentialListIntent::Select(id) => state.selected_credential_id = id,

            CredentialListIntent::SetSearchText(text) => state.search_text = text,

            CredentialListIntent::CredentialsUpdated(credentials) => {
                state.credentials = credentials;
            }

            CredentialListIntent::ActivationChanged(active) => state.is_activated = active,

            CredentialListIntent::ActivationCompleted => {
                if let [only] = state.credentials.as_slice() {
                    state.selected_credential_id = Some(only.id.clone());
                }
            }

            CredentialListIntent::OperationFailed(error) => state.last_error = Some(error),

            CredentialListIntent::ClearError => state.last_error = None,
        }
        state
    }
}
