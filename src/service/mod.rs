//! Service abstraction over the external access-control SDK.
//!
//! # Contract
//!
//! ```text
//! initialize(token) ─→ activate() ─→ refresh() / unlock(id, timeout) ─→ deactivate()
//!                          │
//!                          └─→ credentials / is_active (watch channels)
//! ```
//!
//! Precondition failures are returned synchronously as [`ServiceError`];
//! an accepted [`UnlockAttempt`] yields a stream of [`UnlockEvent`]s that
//! never fails.

mod error;
mod event;
mod mock;
mod slot;
mod traits;

pub use error::ServiceError;
pub use event::{UnlockAttempt, UnlockEvent, UnlockEventStream};
pub use mock::{MockAccessService, ScriptStep, UnlockScript};
pub use slot::{ServiceSlot, SwapLogEntry};
pub use traits::AccessService;
