//! In-process access service used when the host supplies no live SDK.
//!
//! Credentials come from fixtures, and every unlock plays back a scripted
//! sequence of events with real (tokio) delays, so the UI models can be
//! exercised end to end without hardware.

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tokio::time::Instant;

use super::error::ServiceError;
use super::event::{UnlockAttempt, UnlockEvent, UnlockEventStream};
use super::traits::AccessService;
use crate::config::MockConfig;
use crate::credential::{Credential, CredentialError};

/// One scripted event, emitted `delay_ms` after the previous one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptStep {
    #[serde(default)]
    pub delay_ms: u64,
    pub event: UnlockEvent,
}

impl ScriptStep {
    pub fn after(delay_ms: u64, event: UnlockEvent) -> Self {
        Self { delay_ms, event }
    }
}

/// Ordered playback for one credential's unlock attempts.
///
/// If playback has not reached a terminal event when the attempt's timeout
/// elapses, the stream ends with [`UnlockEvent::TimedOut`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnlockScript {
    pub steps: Vec<ScriptStep>,
}

impl UnlockScript {
    pub fn new(steps: Vec<ScriptStep>) -> Self {
        Self { steps }
    }

    /// Launch, then grant access.
    pub fn granted() -> Self {
        Self::new(vec![
            ScriptStep::after(300, UnlockEvent::Launched),
            ScriptStep::after(700, UnlockEvent::GrantedAccess),
        ])
    }

    /// Launch, then fail with the given diagnostic.
    pub fn failing(debug_message: Option<&str>) -> Self {
        Self::new(vec![
            ScriptStep::after(300, UnlockEvent::Launched),
            ScriptStep::after(
                700,
                UnlockEvent::ConnectionFailed {
                    debug_message: debug_message.map(str::to_string),
                },
            ),
        ])
    }

    /// Launch and never finish; the attempt runs into its timeout.
    pub fn unresponsive() -> Self {
        Self::new(vec![ScriptStep::after(300, UnlockEvent::Launched)])
    }

    fn play(&self, timeout: Duration) -> UnlockEventStream {
        let steps = self.steps.clone();
        Box::pin(async_stream::stream! {
            let deadline = Instant::now() + timeout;
            let mut finished = false;

            for step in steps {
                let at = Instant::now() + Duration::from_millis(step.delay_ms);
                if at > deadline {
                    break;
                }
                tokio::time::sleep_until(at).await;
                let terminal = step.event.is_terminal();
                yield step.event;
                if terminal {
                    finished = true;
                    break;
                }
            }

            if !finished {
                tokio::time::sleep_until(deadline).await;
                yield UnlockEvent::TimedOut;
            }
        })
    }
}

impl Default for UnlockScript {
    fn default() -> Self {
        Self::granted()
    }
}

struct MockState {
    token: Option<String>,
    deactivating: bool,
    fixtures: Vec<Credential>,
    scripts: HashMap<String, UnlockScript>,
    integrations: Option<HashSet<String>>,
    activation_delay: Duration,
    activation_failure: Option<String>,
}

/// Fixture-backed [`AccessService`].
pub struct MockAccessService {
    state: Mutex<MockState>,
    credentials: watch::Sender<Vec<Credential>>,
    active: watch::Sender<bool>,
}

impl MockAccessService {
    pub fn new(fixtures: Vec<Credential>) -> Self {
        let (credentials, _) = watch::channel(Vec::new());
        let (active, _) = watch::channel(false);
        Self {
            state: Mutex::new(MockState {
                token: None,
                deactivating: false,
                fixtures,
                scripts: HashMap::new(),
                integrations: None,
                activation_delay: Duration::ZERO,
                activation_failure: None,
            }),
            credentials,
            active,
        }
    }

    /// Build a mock from the `[mock]` config section.
    pub fn from_config(config: &MockConfig) -> Self {
        let fixtures = config
            .credentials
            .iter()
            .map(|fixture| fixture.credential.clone())
            .collect();
        let mut mock = Self::new(fixtures)
            .with_activation_delay(Duration::from_millis(config.activation_delay_ms));
        if let Some(integrations) = &config.integrations {
            mock = mock.with_integrations(integrations.iter().cloned());
        }
        for fixture in &config.credentials {
            if let Some(script) = &fixture.script {
                mock = mock.with_script(fixture.credential.id.clone(), script.clone());
            }
        }
        mock
    }

    /// Use `script` for every unlock of `credential_id`.
    pub fn with_script(self, credential_id: impl Into<String>, script: UnlockScript) -> Self {
        self.state.lock().scripts.insert(credential_id.into(), script);
        self
    }

    /// Restrict the integrations the mock SDK knows about.
    ///
    /// Without this, every integration referenced by a fixture is accepted.
    pub fn with_integrations<I, S>(self, integrations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.state.lock().integrations = Some(integrations.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_activation_delay(self, delay: Duration) -> Self {
        self.state.lock().activation_delay = delay;
        self
    }

    /// Make every `activate` call fail with an SDK error.
    pub fn with_activation_failure(self, reason: impl Into<String>) -> Self {
        self.state.lock().activation_failure = Some(reason.into());
        self
    }

    /// Replace the fixtures, publishing them if the session is active.
    pub fn set_credentials(&self, fixtures: Vec<Credential>) {
        self.state.lock().fixtures = fixtures.clone();
        if *self.active.borrow() {
            self.credentials.send_replace(fixtures);
        }
    }

    /// Replace one credential's error list, publishing if the session is active.
    pub fn set_credential_errors(&self, credential_id: &str, errors: Vec<CredentialError>) {
        let fixtures = {
            let mut state = self.state.lock();
            if let Some(cred) = state.fixtures.iter_mut().find(|c| c.id == credential_id) {
                cred.errors = errors;
            }
            state.fixtures.clone()
        };
        if *self.active.borrow() {
            self.credentials.send_replace(fixtures);
        }
    }

    /// Simulate a deactivation that has started but not finished.
    pub fn begin_deactivation(&self) {
        self.state.lock().deactivating = true;
    }

    fn check_session(&self) -> Result<(), ServiceError> {
        let state = self.state.lock();
        if state.token.is_none() {
            return Err(ServiceError::InitializationRequired);
        }
        if state.deactivating {
            return Err(ServiceError::DeactivationInProgress);
        }
        Ok(())
    }

    fn knows_integration(state: &MockState, integration: &str) -> bool {
        match &state.integrations {
            Some(known) => known.contains(integration),
            None => state.fixtures.iter().any(|c| c.integration == integration),
        }
    }
}

fn is_valid_token(token: &str) -> bool {
    !token.is_empty() && !token.chars().any(char::is_whitespace)
}

#[async_trait]
impl AccessService for MockAccessService {
    fn name(&self) -> &str {
        "mock"
    }

    fn initialize(&self, token: &str) -> Result<(), ServiceError> {
        if !is_valid_token(token) {
            return Err(ServiceError::InvalidToken);
        }
        let mut state = self.state.lock();
        if state.deactivating {
            return Err(ServiceError::DeactivationInProgress);
        }
        if state.token.is_some() {
            return Err(ServiceError::AlreadyInitialized);
        }
        state.token = Some(token.to_string());
        tracing::debug!(service = "mock", "Access service initialized");
        Ok(())
    }

    async fn activate(&self) -> Result<(), ServiceError> {
        self.check_session()?;
        if *self.active.borrow() {
            return Ok(());
        }

        let (delay, failure) = {
            let state = self.state.lock();
            (state.activation_delay, state.activation_failure.clone())
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = failure {
            tracing::warn!(service = "mock", %reason, "Activation failed");
            return Err(ServiceError::Sdk { reason });
        }

        let fixtures = self.state.lock().fixtures.clone();
        let count = fixtures.len();
        self.credentials.send_replace(fixtures);
        self.active.send_replace(true);
        tracing::info!(service = "mock", credentials = count, "Access service active");
        Ok(())
    }

    async fn refresh(&self) -> Result<Vec<Credential>, ServiceError> {
        self.check_session()?;
        let fixtures = self.state.lock().fixtures.clone();
        self.credentials.send_replace(fixtures.clone());
        tracing::debug!(service = "mock", credentials = fixtures.len(), "Credentials refreshed");
        Ok(fixtures)
    }

    fn unlock(&self, credential_id: &str, timeout: Duration) -> Result<UnlockAttempt, ServiceError> {
        if !*self.active.borrow() {
            return Err(ServiceError::InitializationRequired);
        }
        // A session that is tearing down cannot unlock until it is set up again.
        self.check_session()
            .map_err(|_| ServiceError::InitializationRequired)?;

        let credential = self
            .credentials
            .borrow()
            .iter()
            .find(|c| c.id == credential_id)
            .cloned()
            .ok_or_else(|| ServiceError::InvalidCredentialId {
                id: credential_id.to_string(),
            })?;

        if !credential.errors.is_empty() {
            return Err(ServiceError::CredentialErrors(credential.errors));
        }

        let script = {
            let state = self.state.lock();
            if !Self::knows_integration(&state, &credential.integration) {
                return Err(ServiceError::IntegrationNotFound {
                    integration: credential.integration.clone(),
                });
            }
            state.scripts.get(credential_id).cloned().unwrap_or_default()
        };

        tracing::debug!(
            service = "mock",
            credential_id,
            timeout_ms = timeout.as_millis() as u64,
            "Unlock attempt prepared"
        );
        Ok(UnlockAttempt::new(credential_id, move || script.play(timeout)))
    }

    fn deactivate(&self, deintegrate: bool) {
        {
            let mut state = self.state.lock();
            state.deactivating = false;
            if deintegrate {
                state.token = None;
                state.fixtures.clear();
            }
        }
        self.active.send_replace(false);
        self.credentials.send_replace(Vec::new());
        tracing::info!(service = "mock", deintegrate, "Access service deactivated");
    }

    fn credentials(&self) -> watch::Receiver<Vec<Credential>> {
        self.credentials.subscribe()
    }

    fn is_active(&self) -> watch::Receiver<bool> {
        self.active.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn fixtures() -> Vec<Credential> {
        vec![
            Credential::new("a", "Front Door", "seos"),
            Credential::new("b", "Garage", "seos").with_errors(vec![CredentialError::Expired]),
        ]
    }

    async fn active_mock() -> MockAccessService {
        let mock = MockAccessService::new(fixtures());
        mock.initialize("token-1").unwrap();
        mock.activate().await.unwrap();
        mock
    }

    #[test]
    fn initialize_rejects_bad_tokens() {
        let mock = MockAccessService::new(fixtures());
        assert_eq!(mock.initialize(""), Err(ServiceError::InvalidToken));
        assert_eq!(mock.initialize("has space"), Err(ServiceError::InvalidToken));
    }

    #[test]
    fn initialize_twice_fails() {
        let mock = MockAccessService::new(fixtures());
        mock.initialize("t").unwrap();
        assert_eq!(mock.initialize("t"), Err(ServiceError::AlreadyInitialized));
    }

    #[test]
    fn initialize_during_deactivation_fails() {
        let mock = MockAccessService::new(fixtures());
        mock.begin_deactivation();
        assert_eq!(mock.initialize("t"), Err(ServiceError::DeactivationInProgress));
    }

    #[tokio::test]
    async fn activate_requires_initialize() {
        let mock = MockAccessService::new(fixtures());
        assert_eq!(mock.activate().await, Err(ServiceError::InitializationRequired));
        assert_eq!(mock.refresh().await, Err(ServiceError::InitializationRequired));
    }

    #[tokio::test]
    async fn activate_publishes_credentials() {
        let mock = active_mock().await;
        assert!(*mock.is_active().borrow());
        assert_eq!(mock.credentials().borrow().len(), 2);

        // second call is a no-op
        mock.activate().await.unwrap();
        assert!(*mock.is_active().borrow());
    }

    #[tokio::test]
    async fn unlock_blocked_credential_fails_before_stream() {
        let mock = active_mock().await;
        let err = mock.unlock("b", Duration::from_secs(10)).unwrap_err();
        assert_eq!(err, ServiceError::CredentialErrors(vec![CredentialError::Expired]));
    }

    #[tokio::test]
    async fn unlock_unknown_integration_fails() {
        let mock = MockAccessService::new(fixtures()).with_integrations(["latch"]);
        mock.initialize("t").unwrap();
        mock.activate().await.unwrap();
        let err = mock.unlock("a", Duration::from_secs(10)).unwrap_err();
        assert_eq!(
            err,
            ServiceError::IntegrationNotFound {
                integration: "seos".into()
            }
        );
    }

    #[tokio::test]
    async fn unlock_reports_credential_errors_before_integration() {
        let mock = MockAccessService::new(fixtures()).with_integrations(["latch"]);
        mock.initialize("t").unwrap();
        mock.activate().await.unwrap();
        let err = mock.unlock("b", Duration::from_secs(10)).unwrap_err();
        assert_eq!(err, ServiceError::CredentialErrors(vec![CredentialError::Expired]));
    }

    #[tokio::test]
    async fn unlock_during_deactivation_requires_initialize() {
        let mock = active_mock().await;
        mock.begin_deactivation();
        assert_eq!(
            mock.unlock("a", Duration::from_secs(10)).unwrap_err(),
            ServiceError::InitializationRequired
        );
        assert_eq!(mock.refresh().await, Err(ServiceError::DeactivationInProgress));
    }

    #[tokio::test(start_paused = true)]
    async fn default_script_grants_access() {
        let mock = active_mock().await;
        let attempt = mock.unlock("a", Duration::from_secs(10)).unwrap();
        let events: Vec<_> = attempt.events().collect().await;
        assert_eq!(events, vec![UnlockEvent::Launched, UnlockEvent::GrantedAccess]);
    }

    #[tokio::test(start_paused = true)]
    async fn unresponsive_script_times_out() {
        let mock = MockAccessService::new(fixtures()).with_script("a", UnlockScript::unresponsive());
        mock.initialize("t").unwrap();
        mock.activate().await.unwrap();

        let attempt = mock.unlock("a", Duration::from_secs(2)).unwrap();
        let events: Vec<_> = attempt.events().collect().await;
        assert_eq!(events, vec![UnlockEvent::Launched, UnlockEvent::TimedOut]);
    }

    #[tokio::test(start_paused = true)]
    async fn steps_past_the_deadline_become_timeout() {
        let mock = MockAccessService::new(fixtures()).with_script(
            "a",
            UnlockScript::new(vec![ScriptStep::after(5_000, UnlockEvent::GrantedAccess)]),
        );
        mock.initialize("t").unwrap();
        mock.activate().await.unwrap();

        let attempt = mock.unlock("a", Duration::from_secs(1)).unwrap();
        let events: Vec<_> = attempt.events().collect().await;
        assert_eq!(events, vec![UnlockEvent::TimedOut]);
    }

    #[tokio::test]
    async fn deintegrate_requires_new_initialize() {
        let mock = active_mock().await;
        mock.deactivate(true);
        assert!(!*mock.is_active().borrow());
        assert!(mock.credentials().borrow().is_empty());
        assert_eq!(mock.activate().await, Err(ServiceError::InitializationRequired));
        mock.initialize("again").unwrap();
    }

    #[tokio::test]
    async fn deactivate_keeps_session_token() {
        let mock = active_mock().await;
        mock.deactivate(false);
        assert_eq!(
            mock.unlock("a", Duration::from_secs(1)).unwrap_err(),
            ServiceError::InitializationRequired
        );
        mock.activate().await.unwrap();
        assert!(*mock.is_active().borrow());
    }
}
