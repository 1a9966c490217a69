//! Base trait for model state.

/// Marker trait for model state.
///
/// States are cloned values compared with `PartialEq` so observers can
/// skip redundant renders.
pub trait UiState: Clone + PartialEq + Default + Send + 'static {}
