//! Credential list feature module.
//!
//! # Architecture
//!
//! Uses MVI (Model-View-Intent) pattern:
//! - `state.rs` - mirrored credentials, selection, search text
//! - `intent.rs` - user commands and service notifications
//! - `reducer.rs` - state transitions (pure, no side effects)
//! - `model.rs` - owns the service handle and its subscriptions

mod intent;
mod model;
mod reducer;
mod state;

pub use intent::CredentialListIntent;
pub use model::CredentialListModel;
pub use reducer::CredentialListReducer;
pub use state::CredentialListState;
