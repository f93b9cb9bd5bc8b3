//! Configuration constants for the kiosk quiz system
//!
//! This module contains the configuration limits and defaults used
//! throughout the crate to ensure data integrity and provide consistent
//! boundaries for the different components.

/// Input normalization constants
pub mod input {
    /// Default debounce window in milliseconds between two presses of the
    /// same logical button
    pub const DEBOUNCE_MILLIS: u64 = 200;
}

/// Round configuration constants
pub mod round {
    /// Minimum answer-window length in seconds for a round
    pub const MIN_TIME_LIMIT: u64 = 5;
    /// Maximum answer-window length in seconds for a round
    pub const MAX_TIME_LIMIT: u64 = 240;
    /// Default answer-window length in seconds for a round
    pub const DEFAULT_TIME_LIMIT: u64 = 20;
    /// Maximum number of rounds allowed in a single deck
    pub const MAX_ROUND_COUNT: usize = 100;
    /// Maximum length of an answer option label in characters
    pub const MAX_LABEL_LENGTH: usize = 200;
}

/// Leaderboard constants
pub mod leaderboard {
    /// Default maximum number of entries retained on the leaderboard
    pub const DEFAULT_CAPACITY: usize = 50;
    /// Storage key under which the serialized leaderboard blob is persisted
    pub const STORAGE_KEY: &str = "LEADERBOARD_SAVE_V2";
}

/// Player name constants
pub mod names {
    /// Exact length of auto-generated usernames in characters
    pub const GENERATED_LENGTH: usize = 6;
    /// Maximum length of a user-supplied username in characters
    pub const MAX_LENGTH: usize = 30;
    /// Exclusive upper bound of the numeric suffix used to pad short
    /// generated names
    pub const SUFFIX_BOUND: u32 = 999;
    /// Storage key under which the typed username is persisted
    pub const STORAGE_KEY: &str = "KIOSK_USERNAME";
}
