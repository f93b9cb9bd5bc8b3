//! Host-side hook contracts
//!
//! This module defines the traits through which the quiz core talks to the
//! outside world: a [`Presenter`] that renders state changes and plays audio
//! clips, and a [`KeyValueStore`] that persists small string blobs (the
//! leaderboard and the typed username). The abstraction keeps the core free
//! of any concrete UI toolkit, audio device, or storage backend.

use std::time::Duration;

use crate::rounds::{ClipRef, OptionSlot, RoundConfig};

/// State changes the host must reflect on screen
///
/// Each variant corresponds to one display hook of the kiosk UI. The core
/// emits these in a deterministic order; the host is free to animate them
/// however it likes, but must not feed anything back into the core in
/// response.
#[derive(Debug, Clone, PartialEq)]
pub enum PresentEvent {
    /// Show a round's content and its answer surface
    Round {
        /// Index of the round being shown (0-based)
        index: usize,
        /// Total number of rounds in the session
        count: usize,
        /// The round's full configuration, including presentation payload
        config: RoundConfig,
    },
    /// Swap an option's visual to its "selected" representation
    Selected {
        /// The option that was selected
        slot: OptionSlot,
    },
    /// Revert a previously selected option's visual to normal
    SelectionCleared {
        /// The option whose visual must revert
        slot: OptionSlot,
    },
    /// Show the correct/incorrect feedback presentation (mascot, tint, ...)
    Feedback {
        /// Whether the confirmed answer was correct
        correct: bool,
    },
    /// Clear any latched feedback presentation
    FeedbackCleared,
    /// Show the end-of-session screen
    SessionEnded {
        /// Final score achieved in the session
        score: u32,
        /// Number of rounds the session consisted of
        out_of: usize,
    },
}

/// Trait for binding the core to a concrete UI and audio output
///
/// Implementations might drive a game engine scene, a test recorder, or a
/// headless stub. All methods are fire-and-forget from the core's point of
/// view; failures must be swallowed (and logged) by the implementation.
pub trait Presenter {
    /// Reflects a state change on screen
    fn present(&mut self, event: PresentEvent);

    /// Plays an audio clip, fire-and-forget
    fn play(&mut self, clip: &ClipRef);

    /// Reports the natural length of a clip
    ///
    /// Used by the feedback sequencer to schedule its completion. Returning
    /// `None` (clip unknown or unmeasurable) degrades to a zero-length
    /// feedback interval.
    fn clip_duration(&self, clip: &ClipRef) -> Option<Duration>;
}

/// Trait for persistent string key/value storage
///
/// The core stores exactly two things: the serialized leaderboard blob and
/// the typed username. Implementations may be backed by player prefs, a
/// file, or an in-memory map under test.
pub trait KeyValueStore {
    /// Retrieves the string stored under `key`, if any
    fn get_string(&self, key: &str) -> Option<String>;

    /// Stores `value` under `key`, overwriting any previous value
    fn set_string(&mut self, key: &str, value: &str);
}
