//! Timed feedback gate after four-option answers
//!
//! After a kahoot-style answer locks, the kiosk plays a short mascot
//! animation and audio sting before the next round may begin. This module
//! is that gate: a single in-flight deadline, armed from the feedback
//! clip's natural length and polled by the host's tick loop. It never
//! blocks and never scores; it only holds round advancement.

use std::time::Duration;

use tracing::debug;

use crate::{
    presenter::{PresentEvent, Presenter},
    rounds::ClipRef,
};

#[derive(Debug, Clone)]
struct Inflight {
    remaining: Duration,
    correct: bool,
}

/// Runs at most one uninterruptible feedback interval at a time
///
/// Starting a new run cancels (never queues behind) a run in progress, and
/// the latched feedback presentation is cleared on every way out: normal
/// completion and cancellation alike. A cancelled run can never report
/// completion afterwards.
#[derive(Debug, Clone, Default)]
pub struct FeedbackSequencer {
    inflight: Option<Inflight>,
}

impl FeedbackSequencer {
    /// Starts a feedback run for an answer outcome
    ///
    /// Presents the correct/incorrect state, plays `clip` if one is
    /// configured, and arms the completion deadline from the clip's natural
    /// length. A missing clip (or one the presenter cannot measure) falls
    /// back to a zero-length interval that completes on the next tick.
    pub fn start<P: Presenter>(&mut self, correct: bool, clip: Option<&ClipRef>, presenter: &mut P) {
        self.cancel(presenter);

        presenter.present(PresentEvent::Feedback { correct });

        let remaining = match clip {
            Some(clip) => {
                presenter.play(clip);
                presenter.clip_duration(clip).unwrap_or(Duration::ZERO)
            }
            None => Duration::ZERO,
        };

        debug!(correct, ?remaining, "feedback gate armed");
        self.inflight = Some(Inflight { remaining, correct });
    }

    /// Advances the in-flight deadline
    ///
    /// Returns `true` exactly once, on the tick where the deadline elapses.
    /// The latched presentation is cleared before completion is reported.
    pub fn tick<P: Presenter>(&mut self, delta: Duration, presenter: &mut P) -> bool {
        let Some(inflight) = self.inflight.as_mut() else {
            return false;
        };

        inflight.remaining = inflight.remaining.saturating_sub(delta);
        if !inflight.remaining.is_zero() {
            return false;
        }

        self.inflight = None;
        presenter.present(PresentEvent::FeedbackCleared);
        true
    }

    /// Stops the in-flight run without completing it
    ///
    /// Used when a session is aborted or a new round is force-started. The
    /// latched presentation is still cleared; no completion fires.
    pub fn cancel<P: Presenter>(&mut self, presenter: &mut P) {
        if self.inflight.take().is_some() {
            presenter.present(PresentEvent::FeedbackCleared);
        }
    }

    /// Whether a feedback run is currently holding the gate
    pub fn is_running(&self) -> bool {
        self.inflight.is_some()
    }

    /// The outcome of the in-flight run, if one exists
    pub fn pending_outcome(&self) -> Option<bool> {
        self.inflight.as_ref().map(|inflight| inflight.correct)
    }
}
