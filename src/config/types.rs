use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::credential::{Credential, CredentialError};
use crate::service::UnlockScript;

/// Root configuration container.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub unlock: UnlockConfig,
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub mock: MockConfig,
}

/// Unlock attempt settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnlockConfig {
    /// How long one attempt may run before the SDK reports a timeout (default: 10).
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

/// Credential list behavior.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListConfig {
    /// Select the only credential after activation (default: true).
    #[serde(default = "default_auto_select_single")]
    pub auto_select_single: bool,
}

/// Fixtures for the in-process mock service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockConfig {
    /// Session token passed to `initialize`.
    #[serde(default = "default_mock_token")]
    pub token: String,
    /// Integrations the mock SDK knows. Omit to accept every fixture's integration.
    #[serde(default)]
    pub integrations: Option<Vec<String>>,
    /// Simulated activation latency in milliseconds (default: 0).
    #[serde(default)]
    pub activation_delay_ms: u64,
    #[serde(default = "default_mock_credentials")]
    pub credentials: Vec<MockCredential>,
}

/// A fixture credential plus its optional unlock playback.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MockCredential {
    #[serde(flatten)]
    pub credential: Credential,
    #[serde(default)]
    pub script: Option<UnlockScript>,
}

fn default_timeout_seconds() -> u64 {
    10
}

fn default_auto_select_single() -> bool {
    true
}

fn default_mock_token() -> String {
    "demo-session".to_string()
}

fn default_mock_credentials() -> Vec<MockCredential> {
    vec![
        MockCredential {
            credential: Credential::new("front-door", "Front Door", "seos")
                .with_location("Building A"),
            script: None,
        },
        MockCredential {
            credential: Credential::new("garage", "Garage", "seos")
                .with_location("Level -1")
                .with_errors(vec![CredentialError::Expired]),
            script: None,
        },
    ]
}

impl UnlockConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for UnlockConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_timeout_seconds(),
        }
    }
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            auto_select_single: default_auto_select_single(),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            token: default_mock_token(),
            integrations: None,
            activation_delay_ms: 0,
            credentials: default_mock_credentials(),
        }
    }
}
