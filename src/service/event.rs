//! Unlock attempt events and the cold stream handle that produces them.

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;

use futures::Stream;
use serde::{Deserialize, Serialize};

/// Progress reported during one unlock attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnlockEvent {
    /// The SDK started talking to the lock.
    Launched,
    GrantedAccess,
    TimedOut,
    ConnectionFailed {
        #[serde(default)]
        debug_message: Option<String>,
    },
}

impl UnlockEvent {
    /// Terminal events end the stream.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Launched)
    }
}

/// Boxed stream of events for one attempt. Never fails.
pub type UnlockEventStream = Pin<Box<dyn Stream<Item = UnlockEvent> + Send>>;

type StreamFactory = dyn Fn() -> UnlockEventStream + Send + Sync;

/// A validated unlock request.
///
/// Holding an attempt does nothing by itself: each call to [`events`]
/// returns a fresh stream, and the attempt only runs while that stream is
/// polled.
///
/// [`events`]: UnlockAttempt::events
#[derive(Clone)]
pub struct UnlockAttempt {
    credential_id: String,
    factory: Arc<StreamFactory>,
}

impl UnlockAttempt {
    pub fn new<F>(credential_id: impl Into<String>, factory: F) -> Self
    where
        F: Fn() -> UnlockEventStream + Send + Sync + 'static,
    {
        Self {
            credential_id: credential_id.into(),
            factory: Arc::new(factory),
        }
    }

    pub fn credential_id(&self) -> &str {
        &self.credential_id
    }

    /// Subscribe to a new run of this attempt.
    pub fn events(&self) -> UnlockEventStream {
        (self.factory)()
    }
}

impl fmt::Debug for UnlockAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnlockAttempt")
            .field("credential_id", &self.credential_id)
            .finish_non_exhaustive()
    }
}
