//! Input normalization and debouncing
//!
//! The kiosk accepts player input from exactly one surface per session: the
//! physical serial-connected button box, the on-screen buttons, or the
//! phone-based buttons. Each surface emits its own raw tokens; this module
//! collapses them into two abstract, debounced actions that the rest of the
//! core consumes. Malformed tokens are dropped, never raised as errors, and
//! a dead transport degrades silently (logged once for the operator).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{trace, warn};

/// One of the two abstract player actions
///
/// On binary rounds, `A` means "Legit" and `B` means "Phishing". On
/// four-option rounds each action activates the slot the round's
/// configuration maps it to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
pub enum Action {
    /// First button (Legit / configured slot A-action)
    A,
    /// Second button (Phishing / configured slot B-action)
    B,
}

/// The input surface active for a session
///
/// Chosen once at session start; surfaces are never mixed at runtime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputSurface {
    /// Serial-connected physical button box (emits `BTN1`/`BTN2` tokens)
    #[default]
    SerialButtons,
    /// On-screen buttons (emit `A`/`B` tokens)
    Screen,
    /// Phone-based buttons (emit `A`/`B` tokens)
    Phone,
}

/// A raw, tagged event as delivered by a transport layer
///
/// `at` is the time since session start; the transport is responsible for
/// stamping it from the host clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Surface-specific token identifying the pressed button
    pub tag: String,
    /// Timestamp of the press, relative to session start
    pub at: Duration,
}

/// Maps raw surface events to debounced abstract actions
///
/// Two events from the same logical source closer together than the
/// debounce window collapse to one; events spaced exactly at the window
/// boundary are both accepted.
#[derive(Debug, Clone)]
pub struct InputNormalizer {
    surface: InputSurface,
    debounce: Duration,
    last_accepted: [Option<Duration>; 2],
    transport_fault_logged: bool,
}

impl InputNormalizer {
    /// Creates a normalizer for a surface with the default debounce window
    pub fn new(surface: InputSurface) -> Self {
        Self::with_debounce(
            surface,
            Duration::from_millis(crate::constants::input::DEBOUNCE_MILLIS),
        )
    }

    /// Creates a normalizer with an explicit debounce window
    pub fn with_debounce(surface: InputSurface, debounce: Duration) -> Self {
        Self {
            surface,
            debounce,
            last_accepted: [None, None],
            transport_fault_logged: false,
        }
    }

    /// The surface this normalizer was configured for
    pub fn surface(&self) -> InputSurface {
        self.surface
    }

    /// Forgets debounce history, as on session start
    pub fn reset(&mut self) {
        self.last_accepted = [None, None];
    }

    /// Normalizes one raw event into an abstract action
    ///
    /// Returns `None` for unknown tokens and for presses suppressed by the
    /// debounce window. Never fails.
    pub fn normalize(&mut self, raw: &RawEvent) -> Option<Action> {
        let action = self.decode(raw.tag.as_str())?;

        let slot = match action {
            Action::A => 0,
            Action::B => 1,
        };

        if let Some(last) = self.last_accepted[slot] {
            // Strict comparison: a press exactly one window later is accepted.
            if raw.at.saturating_sub(last) < self.debounce {
                trace!(%action, at = ?raw.at, "press suppressed by debounce");
                return None;
            }
        }

        self.last_accepted[slot] = Some(raw.at);
        Some(action)
    }

    /// Records that the input transport is unavailable
    ///
    /// The session stays playable through other means; this only surfaces
    /// the fault to operators, once per normalizer.
    pub fn report_transport_failure(&mut self, detail: &str) {
        if self.transport_fault_logged {
            trace!(surface = ?self.surface, detail, "input transport still unavailable");
        } else {
            warn!(surface = ?self.surface, detail, "input transport unavailable; no events will be produced");
            self.transport_fault_logged = true;
        }
    }

    fn decode(&self, tag: &str) -> Option<Action> {
        let action = match (self.surface, tag) {
            (InputSurface::SerialButtons, "BTN1") => Action::A,
            (InputSurface::SerialButtons, "BTN2") => Action::B,
            (InputSurface::Screen | InputSurface::Phone, "A") => Action::A,
            (InputSurface::Screen | InputSurface::Phone, "B") => Action::B,
            _ => {
                trace!(surface = ?self.surface, tag, "dropping unrecognized input token");
                return None;
            }
        };
        Some(action)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn event(tag: &str, millis: u64) -> RawEvent {
        RawEvent {
            tag: tag.to_string(),
            at: Duration::from_millis(millis),
        }
    }

    #[test]
    fn test_serial_tokens_decode() {
        let mut normalizer = InputNormalizer::new(InputSurface::SerialButtons);
        assert_eq!(normalizer.normalize(&event("BTN1", 0)), Some(Action::A));
        assert_eq!(normalizer.normalize(&event("BTN2", 0)), Some(Action::B));
    }

    #[test]
    fn test_screen_and_phone_tokens_decode() {
        let mut screen = InputNormalizer::new(InputSurface::Screen);
        assert_eq!(screen.normalize(&event("A", 0)), Some(Action::A));
        assert_eq!(screen.normalize(&event("B", 0)), Some(Action::B));

        let mut phone = InputNormalizer::new(InputSurface::Phone);
        assert_eq!(phone.normalize(&event("A", 0)), Some(Action::A));
    }

    #[test]
    fn test_unknown_tokens_dropped() {
        let mut normalizer = InputNormalizer::new(InputSurface::SerialButtons);
        assert_eq!(normalizer.normalize(&event("A", 0)), None);
        assert_eq!(normalizer.normalize(&event("BTN3", 0)), None);
        assert_eq!(normalizer.normalize(&event("", 0)), None);
        // A dropped token must not arm the debounce window.
        assert_eq!(normalizer.normalize(&event("BTN1", 1)), Some(Action::A));
    }

    #[test]
    fn test_debounce_collapses_rapid_presses() {
        let mut normalizer = InputNormalizer::new(InputSurface::SerialButtons);
        assert_eq!(normalizer.normalize(&event("BTN1", 0)), Some(Action::A));
        assert_eq!(normalizer.normalize(&event("BTN1", 100)), None);
        assert_eq!(normalizer.normalize(&event("BTN1", 199)), None);
    }

    #[test]
    fn test_debounce_boundary_is_exclusive() {
        let mut normalizer = InputNormalizer::new(InputSurface::SerialButtons);
        assert_eq!(normalizer.normalize(&event("BTN1", 0)), Some(Action::A));
        // Exactly one window later: both presses accepted.
        assert_eq!(normalizer.normalize(&event("BTN1", 200)), Some(Action::A));
    }

    #[test]
    fn test_debounce_window_rearms_from_last_accepted() {
        let mut normalizer = InputNormalizer::new(InputSurface::SerialButtons);
        assert_eq!(normalizer.normalize(&event("BTN1", 0)), Some(Action::A));
        // Suppressed presses do not push the window forward.
        assert_eq!(normalizer.normalize(&event("BTN1", 150)), None);
        assert_eq!(normalizer.normalize(&event("BTN1", 250)), Some(Action::A));
    }

    #[test]
    fn test_sources_debounce_independently() {
        let mut normalizer = InputNormalizer::new(InputSurface::SerialButtons);
        assert_eq!(normalizer.normalize(&event("BTN1", 0)), Some(Action::A));
        assert_eq!(normalizer.normalize(&event("BTN2", 50)), Some(Action::B));
        assert_eq!(normalizer.normalize(&event("BTN1", 100)), None);
        assert_eq!(normalizer.normalize(&event("BTN2", 100)), None);
    }

    #[test]
    fn test_reset_forgets_history() {
        let mut normalizer = InputNormalizer::new(InputSurface::SerialButtons);
        assert_eq!(normalizer.normalize(&event("BTN1", 0)), Some(Action::A));
        normalizer.reset();
        assert_eq!(normalizer.normalize(&event("BTN1", 10)), Some(Action::A));
    }

    #[test]
    fn test_custom_debounce_window() {
        let mut normalizer = InputNormalizer::with_debounce(
            InputSurface::Screen,
            Duration::from_millis(500),
        );
        assert_eq!(normalizer.normalize(&event("A", 0)), Some(Action::A));
        assert_eq!(normalizer.normalize(&event("A", 400)), None);
        assert_eq!(normalizer.normalize(&event("A", 500)), Some(Action::A));
    }

    #[test]
    fn test_transport_failure_does_not_halt() {
        let mut normalizer = InputNormalizer::new(InputSurface::SerialButtons);
        normalizer.report_transport_failure("COM8 open failed");
        normalizer.report_transport_failure("COM8 open failed");
        // Still decodes events should the transport recover.
        assert_eq!(normalizer.normalize(&event("BTN1", 0)), Some(Action::A));
    }
}
