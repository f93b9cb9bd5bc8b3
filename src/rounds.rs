//! Round configuration and the session deck
//!
//! This module defines the immutable per-session round data: four-option
//! "kahoot-style" rounds with exactly one correct answer and a two-button
//! action mapping, and binary Legit/Phishing rounds. Presentation payload
//! (image and audio clip references) is opaque to the core and passed
//! through to the host's display hooks untouched.

use std::time::Duration;

use enum_map::EnumMap;
use garde::Validate;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use tracing::warn;

use crate::input::Action;

/// Validation result type for duration validation
type ValidationResult = garde::Result;

/// Validates that a duration falls within specified bounds.
///
/// This is a custom validation function for use with the `garde` crate.
/// It checks if the duration in seconds is within the inclusive range
/// defined by `MIN_SECONDS` and `MAX_SECONDS`.
fn validate_duration<const MIN_SECONDS: u64, const MAX_SECONDS: u64>(
    val: &Duration,
    _ctx: &(),
) -> ValidationResult {
    if (MIN_SECONDS..=MAX_SECONDS).contains(&val.as_secs()) {
        Ok(())
    } else {
        Err(garde::Error::new(format!(
            "time limit is outside of the bounds [{MIN_SECONDS},{MAX_SECONDS}]",
        )))
    }
}

/// Validates every answer option of a four-option panel
///
/// `EnumMap` has no `garde::Validate` impl, so the per-choice rules are
/// applied through this adapter.
fn validate_options(val: &EnumMap<OptionSlot, AnswerChoice>, _ctx: &()) -> ValidationResult {
    val.values()
        .try_for_each(|choice| choice.validate())
        .map_err(|report| garde::Error::new(report.to_string()))
}

/// Validates the answer-window length of a round
fn validate_time_limit(val: &Duration) -> ValidationResult {
    validate_duration::<
        { crate::constants::round::MIN_TIME_LIMIT },
        { crate::constants::round::MAX_TIME_LIMIT },
    >(val, &())
}

/// Opaque reference to an image shown with a round
///
/// The core never inspects it; it is resolved by the host's display layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef(pub String);

/// Opaque reference to an audio clip
///
/// Resolved and measured by the host's audio layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipRef(pub String);

/// One of the four positions on a kahoot-style answer panel
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    enum_map::Enum,
    derive_more::Display,
)]
pub enum OptionSlot {
    /// Top-left position
    A,
    /// Top-right position
    B,
    /// Bottom-left position
    C,
    /// Bottom-right position
    D,
}

impl OptionSlot {
    /// All four slots in panel order
    pub const ALL: [OptionSlot; 4] = [OptionSlot::A, OptionSlot::B, OptionSlot::C, OptionSlot::D];
}

/// A single answer option on a four-option panel
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct AnswerChoice {
    /// Whether this option is the correct answer
    #[garde(skip)]
    pub correct: bool,
    /// Text label shown on the option
    #[garde(length(max = crate::constants::round::MAX_LABEL_LENGTH))]
    pub label: String,
}

/// Configuration for a four-option kahoot-style round
///
/// Two of the four options are reachable from the physical two-button box:
/// `action_a` and `action_b` name the slots driven by the abstract
/// [`Action::A`] and [`Action::B`] presses. Touch surfaces can activate any
/// slot directly.
#[serde_with::serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct FourOptionConfig {
    /// Optional image displayed with the round
    #[garde(skip)]
    pub media: Option<MediaRef>,
    /// Length of the answer window
    #[garde(custom(|v, _| validate_time_limit(v)))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub time_limit: Duration,
    /// The four answer options, keyed by panel position
    #[garde(custom(validate_options))]
    pub options: EnumMap<OptionSlot, AnswerChoice>,
    /// Slot driven by the abstract A action
    #[garde(skip)]
    pub action_a: OptionSlot,
    /// Slot driven by the abstract B action
    #[garde(skip)]
    pub action_b: OptionSlot,
    /// Clip played when the round starts
    #[garde(skip)]
    pub intro_clip: Option<ClipRef>,
    /// Clip played on a correct confirmation
    #[garde(skip)]
    pub correct_clip: Option<ClipRef>,
    /// Clip played on an incorrect confirmation or a timeout
    #[garde(skip)]
    pub incorrect_clip: Option<ClipRef>,
}

impl FourOptionConfig {
    /// Returns the slot holding the correct answer
    ///
    /// `None` when zero or more than one option is marked correct; such a
    /// round scores every confirmation as wrong. This is an authoring
    /// mistake and is logged loudly at deck construction.
    pub fn correct_slot(&self) -> Option<OptionSlot> {
        let mut marked = self
            .options
            .iter()
            .filter_map(|(slot, choice)| choice.correct.then_some(slot));
        match (marked.next(), marked.next()) {
            (Some(slot), None) => Some(slot),
            _ => None,
        }
    }

    /// Returns the slot driven by an abstract button action
    pub fn slot_for(&self, action: Action) -> OptionSlot {
        match action {
            Action::A => self.action_a,
            Action::B => self.action_b,
        }
    }

    /// Returns the feedback clip matching an outcome
    pub fn feedback_clip(&self, correct: bool) -> Option<&ClipRef> {
        if correct {
            self.correct_clip.as_ref()
        } else {
            self.incorrect_clip.as_ref()
        }
    }
}

/// Configuration for a binary Legit/Phishing round
#[serde_with::serde_as]
#[skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct BinaryConfig {
    /// Optional image displayed with the round (typically the email screenshot)
    #[garde(skip)]
    pub media: Option<MediaRef>,
    /// Length of the answer window
    #[garde(custom(|v, _| validate_time_limit(v)))]
    #[serde_as(as = "serde_with::DurationMilliSeconds<u64>")]
    pub time_limit: Duration,
    /// Whether the shown content is legitimate (as opposed to phishing)
    #[garde(skip)]
    pub is_legit: bool,
    /// Clip played when the round starts
    #[garde(skip)]
    pub intro_clip: Option<ClipRef>,
}

/// A single round of either style
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub enum RoundConfig {
    /// Four-option kahoot-style round with select-then-confirm interaction
    FourOption(#[garde(dive)] FourOptionConfig),
    /// Binary Legit/Phishing round with a single confirm
    Binary(#[garde(dive)] BinaryConfig),
}

impl RoundConfig {
    /// Length of this round's answer window
    pub fn time_limit(&self) -> Duration {
        match self {
            RoundConfig::FourOption(config) => config.time_limit,
            RoundConfig::Binary(config) => config.time_limit,
        }
    }

    /// Clip played when the round starts, if any
    pub fn intro_clip(&self) -> Option<&ClipRef> {
        match self {
            RoundConfig::FourOption(config) => config.intro_clip.as_ref(),
            RoundConfig::Binary(config) => config.intro_clip.as_ref(),
        }
    }

    /// Whether this is a four-option round
    pub fn is_four_option(&self) -> bool {
        matches!(self, RoundConfig::FourOption(_))
    }
}

/// The fixed, ordered round sequence of one session
///
/// The four-option/binary boundary is data: it falls wherever the deck's
/// author placed the last four-option round, not at a hard-coded index.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Deck {
    /// Rounds in play order
    #[garde(length(max = crate::constants::round::MAX_ROUND_COUNT), dive)]
    pub rounds: Vec<RoundConfig>,
}

impl Deck {
    /// Creates a deck, logging authoring mistakes
    ///
    /// Mistakes do not fail construction; the affected rounds degrade at
    /// play time (a four-option round without a unique correct answer
    /// scores every confirmation as wrong).
    pub fn new(rounds: Vec<RoundConfig>) -> Self {
        let mut seen_binary = false;
        for (index, round) in rounds.iter().enumerate() {
            match round {
                RoundConfig::FourOption(config) => {
                    if config.correct_slot().is_none() {
                        warn!(index, "four-option round does not mark exactly one correct answer; every confirm will score wrong");
                    }
                    if seen_binary {
                        warn!(index, "four-option round appears after a binary round; decks are expected to front-load kahoot rounds");
                    }
                }
                RoundConfig::Binary(_) => seen_binary = true,
            }
        }
        Self { rounds }
    }

    /// Number of rounds in the deck
    pub fn len(&self) -> usize {
        self.rounds.len()
    }

    /// Whether the deck has no rounds
    pub fn is_empty(&self) -> bool {
        self.rounds.is_empty()
    }

    /// The round at `index`, if it exists
    pub fn get(&self, index: usize) -> Option<&RoundConfig> {
        self.rounds.get(index)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use enum_map::enum_map;

    fn four_option_round(correct: OptionSlot) -> FourOptionConfig {
        FourOptionConfig {
            media: None,
            time_limit: Duration::from_secs(20),
            options: enum_map! {
                slot => AnswerChoice {
                    correct: slot == correct,
                    label: format!("Option {slot}"),
                },
            },
            action_a: correct,
            action_b: OptionSlot::B,
            intro_clip: None,
            correct_clip: None,
            incorrect_clip: None,
        }
    }

    #[test]
    fn test_correct_slot_unique() {
        let config = four_option_round(OptionSlot::C);
        assert_eq!(config.correct_slot(), Some(OptionSlot::C));
    }

    #[test]
    fn test_correct_slot_none_marked() {
        let mut config = four_option_round(OptionSlot::C);
        config.options[OptionSlot::C].correct = false;
        assert_eq!(config.correct_slot(), None);
    }

    #[test]
    fn test_correct_slot_multiple_marked() {
        let mut config = four_option_round(OptionSlot::C);
        config.options[OptionSlot::A].correct = true;
        assert_eq!(config.correct_slot(), None);
    }

    #[test]
    fn test_slot_for_actions() {
        let mut config = four_option_round(OptionSlot::C);
        config.action_a = OptionSlot::C;
        config.action_b = OptionSlot::D;
        assert_eq!(config.slot_for(Action::A), OptionSlot::C);
        assert_eq!(config.slot_for(Action::B), OptionSlot::D);
    }

    #[test]
    fn test_feedback_clip_selection() {
        let mut config = four_option_round(OptionSlot::A);
        config.correct_clip = Some(ClipRef("yay.ogg".to_string()));
        config.incorrect_clip = Some(ClipRef("aww.ogg".to_string()));
        assert_eq!(config.feedback_clip(true), Some(&ClipRef("yay.ogg".to_string())));
        assert_eq!(config.feedback_clip(false), Some(&ClipRef("aww.ogg".to_string())));
    }

    #[test]
    fn test_time_limit_validation() {
        let mut config = four_option_round(OptionSlot::A);
        assert!(config.validate().is_ok());

        config.time_limit = Duration::from_secs(crate::constants::round::MAX_TIME_LIMIT + 1);
        assert!(config.validate().is_err());

        config.time_limit = Duration::from_secs(crate::constants::round::MIN_TIME_LIMIT - 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_label_too_long() {
        let mut config = four_option_round(OptionSlot::A);
        config.options[OptionSlot::B].label =
            "a".repeat(crate::constants::round::MAX_LABEL_LENGTH + 1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_deck_too_many_rounds() {
        let deck = Deck::new(vec![
            RoundConfig::Binary(BinaryConfig {
                media: None,
                time_limit: Duration::from_secs(20),
                is_legit: true,
                intro_clip: None,
            });
            crate::constants::round::MAX_ROUND_COUNT + 1
        ]);
        assert!(deck.validate().is_err());
    }

    #[test]
    fn test_deck_roundtrip_serialization() {
        let deck = Deck::new(vec![
            RoundConfig::FourOption(four_option_round(OptionSlot::B)),
            RoundConfig::Binary(BinaryConfig {
                media: Some(MediaRef("email-01.png".to_string())),
                time_limit: Duration::from_secs(20),
                is_legit: false,
                intro_clip: Some(ClipRef("whoosh.ogg".to_string())),
            }),
        ]);

        let json = serde_json::to_string(&deck).unwrap();
        let parsed: Deck = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, deck);
    }

    #[test]
    fn test_round_accessors() {
        let four = RoundConfig::FourOption(four_option_round(OptionSlot::A));
        let binary = RoundConfig::Binary(BinaryConfig {
            media: None,
            time_limit: Duration::from_secs(15),
            is_legit: true,
            intro_clip: None,
        });

        assert!(four.is_four_option());
        assert!(!binary.is_four_option());
        assert_eq!(binary.time_limit(), Duration::from_secs(15));
        assert!(binary.intro_clip().is_none());
    }
}
