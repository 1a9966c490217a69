//! Base trait for intents.

/// Marker trait for intent objects.
///
/// Intents are either commands from the presentation layer (select,
/// tap, cancel) or notifications from the service (new credential
/// snapshot, unlock event).
pub trait Intent: Send + 'static {}
