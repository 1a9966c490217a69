//! Unlock flow feature module.
//!
//! # Architecture
//!
//! Uses MVI (Model-View-Intent) pattern:
//! - `state.rs` - stored phase and derived card state
//! - `intent.rs` - taps, cancels, resets and stream events
//! - `reducer.rs` - phase transitions (pure, no side effects)
//! - `machine.rs` - owns the service call, the consumer task and haptics
//!
//! ```text
//!            tap                 granted
//!   Idle ───────────→ Connecting ───────→ Success
//!    ↑  ←─────────────┘   │ │                │
//!    │  tap / cancel /    │ └──── failed ──→ Failure
//!    │  timed out         │                  │
//!    └────────────────────┴──── tap / reset ─┘
//! ```
//!
//! A blocking credential error overrides every phase in the card state.

mod intent;
mod machine;
mod reducer;
mod state;

pub use intent::UnlockIntent;
pub use machine::{UnlockStateMachine, UnlockStateWatcher};
pub use reducer::UnlockReducer;
pub use state::{UnlockCardState, UnlockPhase, CREDENTIAL_UNAVAILABLE, UNKNOWN_FAILURE};
