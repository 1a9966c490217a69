//! Credential-level conditions that block unlocking.

use serde::{Deserialize, Serialize};

/// A persistent condition attached to a credential.
///
/// Conditions are display-only: they are refreshed by the service and
/// never resolved by retrying an unlock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CredentialError {
    /// The credential exists remotely but is not yet provisioned on this device.
    AwaitingLocalCredential,
    Expired,
    ContactSupport,
    UnsupportedDevice,
    Unknown,
    /// The user must do something before the credential becomes usable.
    UserInteractionRequired(UserInteraction),
}

/// Actions the user has to take to clear a [`CredentialError::UserInteractionRequired`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserInteraction {
    CompleteOtpAuthorization { url: String },
    EnableInternet,
    EnableBluetooth,
    GrantBluetoothPermission,
    AppRestartRequired,
}

/// System settings pane a corrective action points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsPane {
    Network,
    Bluetooth,
    AppPermissions,
}

/// Condition-specific follow-up offered instead of a retry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CorrectiveAction {
    OpenUrl(String),
    OpenSettings(SettingsPane),
    RestartApp,
    ContactSupport,
}

impl CredentialError {
    /// Short headline for the blocked card.
    pub fn title(&self) -> &'static str {
        match self {
            Self::AwaitingLocalCredential => "Key is being prepared",
            Self::Expired => "Key expired",
            Self::ContactSupport => "Contact support",
            Self::UnsupportedDevice => "Device not supported",
            Self::Unknown => "Key unavailable",
            Self::UserInteractionRequired(interaction) => match interaction {
                UserInteraction::CompleteOtpAuthorization { .. } => "Authorization required",
                UserInteraction::EnableInternet => "Internet connection required",
                UserInteraction::EnableBluetooth => "Bluetooth is off",
                UserInteraction::GrantBluetoothPermission => "Bluetooth permission required",
                UserInteraction::AppRestartRequired => "Restart required",
            },
        }
    }

    /// The action the blocked card should offer, if any.
    pub fn corrective_action(&self) -> Option<CorrectiveAction> {
        match self {
            Self::ContactSupport => Some(CorrectiveAction::ContactSupport),
            Self::UserInteractionRequired(interaction) => Some(match interaction {
                UserInteraction::CompleteOtpAuthorization { url } => {
                    CorrectiveAction::OpenUrl(url.clone())
                }
                UserInteraction::EnableInternet => {
                    CorrectiveAction::OpenSettings(SettingsPane::Network)
                }
                UserInteraction::EnableBluetooth => {
                    CorrectiveAction::OpenSettings(SettingsPane::Bluetooth)
                }
                UserInteraction::GrantBluetoothPermission => {
                    CorrectiveAction::OpenSettings(SettingsPane::AppPermissions)
                }
                UserInteraction::AppRestartRequired => CorrectiveAction::RestartApp,
            }),
            Self::AwaitingLocalCredential
            | Self::Expired
            | Self::UnsupportedDevice
            | Self::Unknown => None,
        }
    }
}

impl std::fmt::Display for CredentialError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}
