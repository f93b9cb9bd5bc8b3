//! Round sequencing, scoring, and the session state machine
//!
//! This module contains the main session struct and logic for one
//! play-through of the kiosk quiz: advancing through the fixed round
//! sequence, running the per-round countdown and answer-acceptance window,
//! routing normalized input through the select-then-confirm protocol on
//! four-option rounds, holding advancement behind the feedback gate, and
//! pushing the final score into the leaderboard at session end.
//!
//! The session is single-threaded and cooperative: the host calls
//! [`Session::tick`] every frame and [`Session::handle_raw`] (or
//! [`Session::handle_action`] / [`Session::activate_option`]) for each
//! discrete input event. Within one frame the host must deliver actions
//! before ticking, so a last-moment confirm always wins over a
//! simultaneous timeout.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, trace, warn};

use crate::{
    feedback::FeedbackSequencer,
    input::{Action, InputNormalizer, InputSurface, RawEvent},
    leaderboard::LeaderboardStore,
    names,
    presenter::{KeyValueStore, PresentEvent, Presenter},
    rounds::{Deck, OptionSlot, RoundConfig},
    selection::{Activation, SelectionController},
};

/// Represents the current phase of a session
///
/// The session progresses from idle through the configured rounds to the
/// end screen. Answer locking is transient inside a single call: a lock
/// either opens the feedback gate (four-option rounds) or advances
/// immediately (binary rounds), so no observable state sits between.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Phase {
    /// Before a session starts, or after returning to the menu
    #[default]
    Idle,
    /// A round is being shown and (while time remains) accepting an answer
    RoundActive,
    /// A locked four-option answer is holding the feedback gate
    FeedbackPending,
    /// The round sequence is exhausted; the end screen is showing
    SessionEnded,
}

/// Session-start configuration choices
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// The single input surface active for this session
    pub surface: InputSurface,
    /// Debounce window override in milliseconds (None uses the default)
    pub debounce_millis: Option<u64>,
}

/// One play-through of the kiosk quiz
///
/// Created when the player leaves the menu; destroyed (or [`Session::start`]ed
/// again from scratch) on return to it. The leaderboard and storage are
/// external collaborators threaded into the calls that can reach session end.
#[derive(Debug)]
pub struct Session {
    deck: Deck,
    input: InputNormalizer,
    selection: SelectionController,
    feedback: FeedbackSequencer,
    phase: Phase,
    round_index: usize,
    time_remaining: Duration,
    can_answer: bool,
    score: u32,
    player_name: Option<String>,
}

impl Session {
    /// Creates an idle session over a fixed round deck
    pub fn new(deck: Deck, options: Options) -> Self {
        let input = match options.debounce_millis {
            Some(millis) => {
                InputNormalizer::with_debounce(options.surface, Duration::from_millis(millis))
            }
            None => InputNormalizer::new(options.surface),
        };

        Self {
            deck,
            input,
            selection: SelectionController::default(),
            feedback: FeedbackSequencer::default(),
            phase: Phase::Idle,
            round_index: 0,
            time_remaining: Duration::ZERO,
            can_answer: false,
            score: 0,
            player_name: None,
        }
    }

    /// Starts (or force-restarts) the session from round 0
    ///
    /// Any in-flight feedback run is cancelled synchronously; score,
    /// selection, and debounce history reset. An empty deck is an authoring
    /// mistake: it is logged and the session stays idle.
    pub fn start<P: Presenter>(&mut self, presenter: &mut P) {
        self.feedback.cancel(presenter);
        self.clear_selection(presenter);
        self.input.reset();
        self.score = 0;
        self.round_index = 0;

        if self.deck.is_empty() {
            warn!("session started with an empty deck; staying idle");
            self.phase = Phase::Idle;
            self.can_answer = false;
            return;
        }

        info!(rounds = self.deck.len(), "session started");
        self.enter_round(presenter);
    }

    /// Aborts the session back to idle
    ///
    /// Cancels any in-flight feedback synchronously; nothing is recorded.
    pub fn abort<P: Presenter>(&mut self, presenter: &mut P) {
        self.feedback.cancel(presenter);
        self.clear_selection(presenter);
        self.phase = Phase::Idle;
        self.can_answer = false;
        info!("session aborted");
    }

    /// Advances countdowns by one frame
    ///
    /// While the feedback gate holds, only the gate's deadline runs; the
    /// round countdown is frozen. In an active round the countdown
    /// decrements and, on reaching zero, locks the round as *no answer*.
    pub fn tick<P: Presenter, K: KeyValueStore>(
        &mut self,
        delta: Duration,
        leaderboard: &mut LeaderboardStore,
        storage: &mut K,
        presenter: &mut P,
    ) {
        match self.phase {
            Phase::FeedbackPending => {
                if self.feedback.tick(delta, presenter) {
                    self.advance(leaderboard, storage, presenter);
                }
            }
            Phase::RoundActive => {
                if !self.can_answer {
                    return;
                }
                self.time_remaining = self.time_remaining.saturating_sub(delta);
                if self.time_remaining.is_zero() {
                    self.lock_timeout(leaderboard, storage, presenter);
                }
            }
            Phase::Idle | Phase::SessionEnded => {}
        }
    }

    /// Normalizes one raw input event and routes the resulting action
    pub fn handle_raw<P: Presenter, K: KeyValueStore>(
        &mut self,
        raw: &RawEvent,
        leaderboard: &mut LeaderboardStore,
        storage: &mut K,
        presenter: &mut P,
    ) {
        if let Some(action) = self.input.normalize(raw) {
            self.handle_action(action, leaderboard, storage, presenter);
        }
    }

    /// Applies one abstract button action to the current round
    ///
    /// Ignored (idempotent no-op) whenever answers are not being accepted,
    /// which also swallows duplicate confirms queued behind a lock.
    pub fn handle_action<P: Presenter, K: KeyValueStore>(
        &mut self,
        action: Action,
        leaderboard: &mut LeaderboardStore,
        storage: &mut K,
        presenter: &mut P,
    ) {
        if !self.can_answer {
            trace!(%action, "action ignored; answers not being accepted");
            return;
        }

        let Some(round) = self.deck.get(self.round_index) else {
            return;
        };

        match round {
            RoundConfig::Binary(config) => {
                // A = Legit, B = Phishing.
                let chose_legit = action == Action::A;
                let correct = chose_legit == config.is_legit;
                debug!(%action, correct, "binary answer");
                self.lock_answered(correct, leaderboard, storage, presenter);
            }
            RoundConfig::FourOption(config) => {
                let slot = config.slot_for(action);
                self.activate_option(slot, leaderboard, storage, presenter);
            }
        }
    }

    /// Activates an option on the current four-option round
    ///
    /// This is the direct path for touch surfaces, which can reach all four
    /// slots; the two-button path arrives here through
    /// [`Session::handle_action`]. No-op on binary rounds and outside the
    /// answer window.
    pub fn activate_option<P: Presenter, K: KeyValueStore>(
        &mut self,
        slot: OptionSlot,
        leaderboard: &mut LeaderboardStore,
        storage: &mut K,
        presenter: &mut P,
    ) {
        if !self.can_answer {
            trace!(%slot, "activation ignored; answers not being accepted");
            return;
        }

        let correct_slot = match self.deck.get(self.round_index) {
            Some(RoundConfig::FourOption(config)) => config.correct_slot(),
            _ => {
                trace!(%slot, "activation ignored; current round has no option panel");
                return;
            }
        };

        match self.selection.activate(slot) {
            Activation::Selected(slot) => {
                debug!(%slot, "option selected");
                presenter.present(PresentEvent::Selected { slot });
            }
            Activation::Confirmed(slot) => {
                // A round without a unique correct answer scores every
                // confirm as wrong.
                let correct = correct_slot == Some(slot);
                debug!(%slot, correct, "option confirmed");
                self.lock_answered(correct, leaderboard, storage, presenter);
            }
            Activation::Ignored => {}
        }
    }

    /// Validates, remembers, and persists the player's typed username
    ///
    /// # Errors
    ///
    /// Propagates [`names::Error`] when the name is empty, too long, or
    /// inappropriate; the previously stored name is left untouched.
    pub fn set_player_name<K: KeyValueStore>(
        &mut self,
        name: &str,
        storage: &mut K,
    ) -> Result<String, names::Error> {
        let name = names::validate(name)?;
        storage.set_string(crate::constants::names::STORAGE_KEY, &name);
        self.player_name = Some(name.clone());
        Ok(name)
    }

    /// Reloads a previously persisted username, if one exists
    pub fn restore_player_name<K: KeyValueStore>(&mut self, storage: &K) -> Option<&str> {
        if let Some(name) = storage.get_string(crate::constants::names::STORAGE_KEY) {
            self.player_name = Some(name);
        }
        self.player_name.as_deref()
    }

    /// Current phase of the session
    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// 0-based position in the round order
    pub fn round_index(&self) -> usize {
        self.round_index
    }

    /// Time left in the current round's answer window
    pub fn time_remaining(&self) -> Duration {
        self.time_remaining
    }

    /// Whether input is currently accepted
    pub fn can_answer(&self) -> bool {
        self.can_answer
    }

    /// Whether the feedback gate is holding round advancement
    pub fn awaiting_feedback(&self) -> bool {
        self.phase == Phase::FeedbackPending
    }

    /// Score accumulated so far in this session
    pub fn score(&self) -> u32 {
        self.score
    }

    /// The currently selected (not yet confirmed) option, if any
    pub fn selected(&self) -> Option<OptionSlot> {
        self.selection.selected()
    }

    /// The player name results will be recorded under, if set
    pub fn player_name(&self) -> Option<&str> {
        self.player_name.as_deref()
    }

    /// Number of rounds in this session's deck
    pub fn round_count(&self) -> usize {
        self.deck.len()
    }

    /// Access to the input normalizer, e.g. to report transport failures
    pub fn input_mut(&mut self) -> &mut InputNormalizer {
        &mut self.input
    }

    /// Locks the current round with a player answer
    fn lock_answered<P: Presenter, K: KeyValueStore>(
        &mut self,
        correct: bool,
        leaderboard: &mut LeaderboardStore,
        storage: &mut K,
        presenter: &mut P,
    ) {
        self.can_answer = false;
        if correct {
            self.score += 1;
        }
        self.finish_lock(correct, leaderboard, storage, presenter);
    }

    /// Locks the current round as timed out (never scores)
    fn lock_timeout<P: Presenter, K: KeyValueStore>(
        &mut self,
        leaderboard: &mut LeaderboardStore,
        storage: &mut K,
        presenter: &mut P,
    ) {
        debug!(index = self.round_index, "round timed out with no answer");
        self.can_answer = false;
        self.finish_lock(false, leaderboard, storage, presenter);
    }

    /// Routes a locked round into the feedback gate or straight onward
    fn finish_lock<P: Presenter, K: KeyValueStore>(
        &mut self,
        correct: bool,
        leaderboard: &mut LeaderboardStore,
        storage: &mut K,
        presenter: &mut P,
    ) {
        match self.deck.get(self.round_index) {
            Some(RoundConfig::FourOption(config)) => {
                let clip = config.feedback_clip(correct).cloned();
                self.phase = Phase::FeedbackPending;
                self.feedback.start(correct, clip.as_ref(), presenter);
            }
            // Binary rounds have no feedback gate.
            Some(RoundConfig::Binary(_)) | None => {
                self.advance(leaderboard, storage, presenter);
            }
        }
    }

    /// Moves to the next round, or ends the session past the last one
    fn advance<P: Presenter, K: KeyValueStore>(
        &mut self,
        leaderboard: &mut LeaderboardStore,
        storage: &mut K,
        presenter: &mut P,
    ) {
        self.clear_selection(presenter);
        self.round_index += 1;

        if self.round_index >= self.deck.len() {
            self.end_session(leaderboard, storage, presenter);
        } else {
            self.enter_round(presenter);
        }
    }

    /// Entry actions of `RoundActive` for the round at `round_index`
    fn enter_round<P: Presenter>(&mut self, presenter: &mut P) {
        let Some(round) = self.deck.get(self.round_index) else {
            // Unreachable through advance/start, which bound the index.
            warn!(index = self.round_index, "no round data at index; ending input");
            self.can_answer = false;
            return;
        };

        self.phase = Phase::RoundActive;
        self.time_remaining = round.time_limit();
        self.can_answer = true;

        presenter.present(PresentEvent::Round {
            index: self.round_index,
            count: self.deck.len(),
            config: round.clone(),
        });
        if let Some(clip) = round.intro_clip() {
            presenter.play(clip);
        }
        debug!(index = self.round_index, "round started");
    }

    /// Records the final score and shows the end screen
    fn end_session<P: Presenter, K: KeyValueStore>(
        &mut self,
        leaderboard: &mut LeaderboardStore,
        storage: &mut K,
        presenter: &mut P,
    ) {
        self.phase = Phase::SessionEnded;
        self.can_answer = false;

        let entry = leaderboard.record(self.player_name.as_deref(), self.score, storage);
        info!(
            score = self.score,
            out_of = self.deck.len(),
            name = %entry.name,
            "session ended"
        );

        presenter.present(PresentEvent::SessionEnded {
            score: self.score,
            out_of: self.deck.len(),
        });
    }

    fn clear_selection<P: Presenter>(&mut self, presenter: &mut P) {
        if let Some(slot) = self.selection.reset() {
            presenter.present(PresentEvent::SelectionCleared { slot });
        }
    }
}
