//! Credential snapshots and their blocking conditions.

mod error;
mod model;

pub use error::{CorrectiveAction, CredentialError, SettingsPane, UserInteraction};
pub use model::Credential;
