//! Observable UI models.
//!
//! - [`credentials`] - searchable, selectable credential list
//! - [`unlock`] - per-credential unlock state machine
//!
//! Both follow the MVI pattern from [`mvi`]: state changes only through
//! pure reducers, and the owning model performs side effects around each
//! dispatch.

pub mod credentials;
pub mod mvi;
pub mod unlock;
