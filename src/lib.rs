//! Unlock flow core for access-credential apps.
//!
//! Adapts an access-control SDK into observable models a presentation
//! layer can render: a searchable credential list and a per-credential
//! unlock state machine.

pub mod config;
pub mod credential;
pub mod haptics;
pub mod logging;
pub mod service;
pub mod ui;
