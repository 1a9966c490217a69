//! Credential snapshot type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::error::CredentialError;

/// One access credential as last reported by the service.
///
/// Snapshots are replaced wholesale on every refresh; the UI layer never
/// edits them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Credential {
    /// Stable unique key.
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub location: String,
    /// `None` when no expiry is known.
    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub card_number: Option<String>,
    #[serde(default)]
    pub access_code: Option<String>,
    /// Provider key, used for branding and for routing inside the SDK.
    pub integration: String,
    /// Current conditions, highest priority first. Empty means usable.
    #[serde(default)]
    pub errors: Vec<CredentialError>,
}

impl Credential {
    pub fn new(id: impl Into<String>, name: impl Into<String>, integration: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: String::new(),
            expires_at: None,
            card_number: None,
            access_code: None,
            integration: integration.into(),
            errors: Vec::new(),
        }
    }

    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = location.into();
        self
    }

    pub fn with_errors(mut self, errors: Vec<CredentialError>) -> Self {
        self.errors = errors;
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    /// The condition that blocks unlocking, if any.
    pub fn blocking_error(&self) -> Option<&CredentialError> {
        self.errors.first()
    }

    /// Whether an unlock attempt may be made with this credential.
    pub fn is_usable(&self) -> bool {
        self.errors.is_empty()
    }

    /// Display helper only; expiry is enforced by the service through `errors`.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|at| at <= now)
    }

    /// Case-insensitive name containment. Empty text matches everything.
    pub fn matches_search(&self, text: &str) -> bool {
        if text.is_empty() {
            return true;
        }
        self.name.to_lowercase().contains(&text.to_lowercase())
    }
}
