//! Per-credential unlock state machine.
//!
//! Owns the task that consumes an attempt's event stream. All phase
//! changes go through [`UnlockReducer`]; the card state shown to the user
//! is recomputed from the phase and the live credential snapshot on every
//! read.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::credential::Credential;
use crate::haptics::{HapticFeedback, HapticPulse, NoHaptics};
use crate::service::{AccessService, UnlockEventStream};
use crate::ui::mvi::Reducer;

use super::intent::UnlockIntent;
use super::reducer::UnlockReducer;
use super::state::{UnlockCardState, UnlockPhase, CREDENTIAL_UNAVAILABLE};

/// Phase cell shared with the consumer task.
///
/// `generation` identifies the current attempt. It only changes while the
/// phase lock is held, so a consumer whose attempt was cancelled can never
/// write a phase.
struct Shared {
    phase: watch::Sender<UnlockPhase>,
    generation: AtomicU64,
}

impl Shared {
    fn dispatch(&self, intent: UnlockIntent) {
        self.phase.send_modify(|phase| {
            *phase = UnlockReducer::reduce(std::mem::take(phase), intent);
        });
    }

    /// Dispatch and invalidate any running attempt. Returns the new generation.
    fn dispatch_superseding(&self, intent: UnlockIntent) -> u64 {
        let mut generation = 0;
        self.phase.send_modify(|phase| {
            generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
            *phase = UnlockReducer::reduce(std::mem::take(phase), intent);
        });
        generation
    }

    /// Apply an intent on behalf of attempt `attempt`.
    ///
    /// Returns false when the attempt is stale or no longer connecting.
    fn apply(&self, attempt: u64, intent: UnlockIntent) -> bool {
        self.phase.send_if_modified(|phase| {
            if self.generation.load(Ordering::SeqCst) != attempt
                || *phase != UnlockPhase::Connecting
            {
                return false;
            }
            *phase = UnlockReducer::reduce(std::mem::take(phase), intent);
            true
        })
    }
}

struct RunningAttempt {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Unlock flow for a single credential.
///
/// Created at idle when the credential is selected; dropping it cancels
/// any in-flight attempt. Commands must be issued from within a tokio
/// runtime, since starting an attempt spawns the stream consumer.
pub struct UnlockStateMachine {
    credential_id: String,
    service: Arc<dyn AccessService>,
    haptics: Arc<dyn HapticFeedback>,
    timeout: Duration,
    credentials: watch::Receiver<Vec<Credential>>,
    shared: Arc<Shared>,
    running: Mutex<Option<RunningAttempt>>,
}

impl UnlockStateMachine {
    pub fn new(
        service: Arc<dyn AccessService>,
        credential_id: impl Into<String>,
        timeout: Duration,
    ) -> Self {
        let (phase, _) = watch::channel(UnlockPhase::Idle);
        let credentials = service.credentials();
        Self {
            credential_id: credential_id.into(),
            service,
            haptics: Arc::new(NoHaptics),
            timeout,
            credentials,
            shared: Arc::new(Shared {
                phase,
                generation: AtomicU64::new(0),
            }),
            running: Mutex::new(None),
        }
    }

    pub fn with_haptics(mut self, haptics: Arc<dyn HapticFeedback>) -> Self {
        self.haptics = haptics;
        self
    }

    pub fn credential_id(&self) -> &str {
        &self.credential_id
    }

    /// The live credential snapshot, if the service still lists it.
    pub fn credential(&self) -> Option<Credential> {
        find(&self.credentials.borrow(), &self.credential_id).cloned()
    }

    /// Stored phase, without the error override.
    pub fn phase(&self) -> UnlockPhase {
        self.shared.phase.borrow().clone()
    }

    /// Card state to render.
    pub fn state(&self) -> UnlockCardState {
        let credentials = self.credentials.borrow();
        let phase = self.shared.phase.borrow();
        UnlockCardState::derive(&phase, find(&credentials, &self.credential_id))
    }

    /// Observer for card state changes.
    pub fn watch(&self) -> UnlockStateWatcher {
        UnlockStateWatcher {
            credential_id: self.credential_id.clone(),
            phase: self.shared.phase.subscribe(),
            credentials: self.credentials.clone(),
        }
    }

    /// The card was tapped.
    ///
    /// Idle begins an attempt, connecting cancels it, and any terminal or
    /// blocked card goes back to idle without retrying.
    pub fn start_unlock(&self) {
        match self.state() {
            UnlockCardState::Idle => self.begin(),
            UnlockCardState::Connecting => {
                self.stop_running();
                self.shared.dispatch_superseding(UnlockIntent::Tap);
                tracing::info!(credential_id = %self.credential_id, "Unlock attempt cancelled");
            }
            UnlockCardState::Success | UnlockCardState::Failure { .. } => {
                self.shared.dispatch(UnlockIntent::Tap);
            }
            UnlockCardState::Error(_) => {
                self.stop_running();
                self.shared.dispatch_superseding(UnlockIntent::Reset);
            }
        }
    }

    /// Stop listening to any in-flight attempt and return to idle.
    ///
    /// This does not promise the SDK aborts the radio operation.
    pub fn cancel_unlock(&self) {
        let was_running = self.stop_running();
        self.shared.dispatch_superseding(UnlockIntent::Cancel);
        if was_running {
            tracing::info!(credential_id = %self.credential_id, "Unlock attempt cancelled");
        }
    }

    /// Force idle without cancelling. Used by terminal "OK" / "Try Again".
    pub fn reset(&self) {
        self.shared.dispatch(UnlockIntent::Reset);
    }

    fn begin(&self) {
        if self.credential().is_none() {
            tracing::warn!(credential_id = %self.credential_id, "Credential not listed by service");
            self.shared.dispatch(UnlockIntent::Rejected {
                message: CREDENTIAL_UNAVAILABLE.to_string(),
            });
            return;
        }

        let attempt = match self.service.unlock(&self.credential_id, self.timeout) {
            Ok(attempt) => attempt,
            Err(err) => {
                tracing::warn!(credential_id = %self.credential_id, error = %err, "Unlock rejected");
                self.shared.dispatch(UnlockIntent::Rejected {
                    message: err.to_string(),
                });
                return;
            }
        };

        self.stop_running();
        let generation = self.shared.dispatch_superseding(UnlockIntent::Tap);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(consume(
            Arc::clone(&self.shared),
            Arc::clone(&self.haptics),
            attempt.events(),
            generation,
            cancel.clone(),
            self.credential_id.clone(),
        ));
        *self.running.lock() = Some(RunningAttempt { cancel, handle });

        tracing::info!(
            credential_id = %self.credential_id,
            timeout_ms = self.timeout.as_millis() as u64,
            "Unlock attempt started"
        );
    }

    /// Returns whether an unfinished attempt was stopped.
    fn stop_running(&self) -> bool {
        match self.running.lock().take() {
            Some(running) => {
                running.cancel.cancel();
                !running.handle.is_finished()
            }
            None => false,
        }
    }
}

impl Drop for UnlockStateMachine {
    fn drop(&mut self) {
        if let Some(running) = self.running.get_mut().take() {
            running.cancel.cancel();
        }
    }
}

async fn consume(
    shared: Arc<Shared>,
    haptics: Arc<dyn HapticFeedback>,
    mut events: UnlockEventStream,
    generation: u64,
    cancel: CancellationToken,
    credential_id: String,
) {
    loop {
        let event = tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            next = events.next() => next,
        };

        let Some(event) = event else {
            tracing::warn!(%credential_id, "Unlock stream ended without a terminal event");
            shared.apply(generation, UnlockIntent::Cancel);
            return;
        };

        tracing::debug!(%credential_id, ?event, "Unlock event");
        let pulse = HapticPulse::for_event(&event);
        let terminal = event.is_terminal();
        if !shared.apply(generation, UnlockIntent::Event(event)) {
            return;
        }
        haptics.pulse(pulse);

        if terminal {
            tracing::info!(%credential_id, ?pulse, "Unlock attempt finished");
            return;
        }
    }
}

fn find<'a>(credentials: &'a [Credential], id: &str) -> Option<&'a Credential> {
    credentials.iter().find(|c| c.id == id)
}

/// Receives the card state whenever the phase or the credential snapshot changes.
pub struct UnlockStateWatcher {
    credential_id: String,
    phase: watch::Receiver<UnlockPhase>,
    credentials: watch::Receiver<Vec<Credential>>,
}

impl UnlockStateWatcher {
    pub fn current(&self) -> UnlockCardState {
        let credentials = self.credentials.borrow();
        let phase = self.phase.borrow();
        UnlockCardState::derive(&phase, find(&credentials, &self.credential_id))
    }

    /// Wait for the next change. `None` once the machine or service is gone.
    pub async fn changed(&mut self) -> Option<UnlockCardState> {
        tokio::select! {
            res = self.phase.changed() => res.ok()?,
            res = self.credentials.changed() => res.ok()?,
        }
        Some(self.current())
    }
}
