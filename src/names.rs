//! Player name generation and validation
//!
//! Results on the kiosk leaderboard always carry a name. Players may type
//! their own (validated for length, emptiness, and inappropriate content),
//! or the kiosk synthesizes one from two fixed word lists, squeezed to
//! exactly six characters. Generation is driven by a caller-supplied RNG so
//! it is reproducible under a seeded source.

use heck::ToUpperCamelCase;
use rustrict::CensorStr;
use serde::Serialize;
use thiserror::Error;

use crate::constants::names::{GENERATED_LENGTH, MAX_LENGTH, SUFFIX_BOUND};

/// First words of generated usernames
const FIRST_WORDS: [&str; 10] = [
    "cozy", "tiny", "swift", "happy", "chill", "nova", "pixel", "sunny", "fuzzy", "mossy",
];

/// Second words of generated usernames
const SECOND_WORDS: [&str; 10] = [
    "wiz", "fox", "owl", "cat", "bee", "arc", "run", "leaf", "wolf", "duke",
];

/// Errors that can occur during username validation
#[derive(Error, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The name is empty or contains only whitespace
    #[error("name cannot be empty")]
    Empty,
    /// The name contains inappropriate content
    #[error("name is inappropriate")]
    Sinful,
    /// The name exceeds the maximum allowed length
    #[error("name is too long")]
    TooLong,
}

/// Validates and cleans a user-supplied username
///
/// The name is trimmed of surrounding whitespace and checked against the
/// length bound and the content filter.
///
/// # Errors
///
/// * [`Error::TooLong`] - name exceeds [`MAX_LENGTH`] characters
/// * [`Error::Empty`] - name is empty after trimming whitespace
/// * [`Error::Sinful`] - name contains inappropriate content
pub fn validate(name: &str) -> Result<String, Error> {
    if name.len() > MAX_LENGTH {
        return Err(Error::TooLong);
    }
    let name = rustrict::trim_whitespace(name);
    if name.is_empty() {
        return Err(Error::Empty);
    }
    if name.is_inappropriate() {
        return Err(Error::Sinful);
    }
    Ok(name.to_owned())
}

/// Synthesizes a username of exactly [`GENERATED_LENGTH`] characters
///
/// Concatenates one word from each fixed list in upper camel case, pads a
/// short result with a random numeric suffix (zero-filled if the digits run
/// out), and truncates a long one. Both lists are ASCII, so byte-indexed
/// truncation is character-exact.
pub fn generate(rng: &mut fastrand::Rng) -> String {
    let first = FIRST_WORDS[rng.usize(..FIRST_WORDS.len())];
    let second = SECOND_WORDS[rng.usize(..SECOND_WORDS.len())];

    let mut name = format!("{first} {second}").to_upper_camel_case();

    if name.len() < GENERATED_LENGTH {
        name.push_str(&rng.u32(..SUFFIX_BOUND).to_string());
        while name.len() < GENERATED_LENGTH {
            name.push('0');
        }
    }
    name.truncate(GENERATED_LENGTH);
    name
}
