//! Shared fixtures for integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use parking_lot::Mutex;
use unlock_kit::credential::{Credential, CredentialError};
use unlock_kit::haptics::{HapticFeedback, HapticPulse};
use unlock_kit::service::{AccessService, MockAccessService};

/// `[A (usable), B (expired)]`.
pub fn two_credentials() -> Vec<Credential> {
    vec![
        Credential::new("a", "Apartment Door", "seos").with_location("Floor 3"),
        Credential::new("b", "Bike Room", "seos")
            .with_location("Basement")
            .with_errors(vec![CredentialError::Expired]),
    ]
}

/// Initialize and activate `mock`.
pub async fn activate(mock: MockAccessService) -> Arc<MockAccessService> {
    mock.initialize("test-token").expect("initialize");
    mock.activate().await.expect("activate");
    Arc::new(mock)
}

pub fn as_service(mock: &Arc<MockAccessService>) -> Arc<dyn AccessService> {
    Arc::clone(mock) as Arc<dyn AccessService>
}

/// Haptics sink that remembers every pulse.
#[derive(Default)]
pub struct RecordingHaptics {
    pulses: Mutex<Vec<HapticPulse>>,
}

impl RecordingHaptics {
    pub fn pulses(&self) -> Vec<HapticPulse> {
        self.pulses.lock().clone()
    }
}

impl HapticFeedback for RecordingHaptics {
    fn pulse(&self, pulse: HapticPulse) {
        self.pulses.lock().push(pulse);
    }
}
