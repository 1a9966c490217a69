//! Haptic feedback seam.
//!
//! The unlock state machine pulses once per delivered event. Pulses are
//! fire-and-forget: implementations must return immediately.

use crate::service::UnlockEvent;

/// Kind of pulse, mirroring the platform's notification feedback styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HapticPulse {
    Info,
    Success,
    Warning,
    Error,
}

impl HapticPulse {
    pub fn for_event(event: &UnlockEvent) -> Self {
        match event {
            UnlockEvent::Launched => Self::Info,
            UnlockEvent::GrantedAccess => Self::Success,
            UnlockEvent::TimedOut => Self::Warning,
            UnlockEvent::ConnectionFailed { .. } => Self::Error,
        }
    }
}

/// Platform haptics provided by the host application.
pub trait HapticFeedback: Send + Sync {
    fn pulse(&self, pulse: HapticPulse);
}

/// Feedback sink for hosts without haptics.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHaptics;

impl HapticFeedback for NoHaptics {
    fn pulse(&self, _pulse: HapticPulse) {}
}

/// Writes each pulse to the trace log. Handy on desktop builds.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggedHaptics;

impl HapticFeedback for LoggedHaptics {
    fn pulse(&self, pulse: HapticPulse) {
        tracing::debug!(?pulse, "Haptic pulse");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_event_has_a_distinct_pulse() {
        let pulses = [
            HapticPulse::for_event(&UnlockEvent::Launched),
            HapticPulse::for_event(&UnlockEvent::GrantedAccess),
            HapticPulse::for_event(&UnlockEvent::TimedOut),
            HapticPulse::for_event(&UnlockEvent::ConnectionFailed { debug_message: None }),
        ];
        assert_eq!(
            pulses,
            [
                HapticPulse::Info,
                HapticPulse::Success,
                HapticPulse::Warning,
                HapticPulse::Error
            ]
        );
    }
}
