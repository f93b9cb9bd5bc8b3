//! # Phishkiosk Core Library
//!
//! This library provides the core logic for a phishing-awareness quiz kiosk:
//! a fixed sequence of timed rounds (four-option "kahoot-style" rounds with a
//! select-then-confirm interaction, followed by binary Legit/Phishing rounds),
//! driven by button input from one of several input surfaces, with a bounded,
//! persisted leaderboard.
//!
//! The crate is deliberately free of any rendering, audio, serial-port, or
//! storage backend. Hosts drive the [`engine::Session`] state machine with
//! `tick`/`handle_raw` calls and implement the [`presenter::Presenter`] and
//! [`presenter::KeyValueStore`] traits to bind it to a concrete UI and store.

#![cfg_attr(all(coverage_nightly, test), feature(coverage_attribute))]
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::wildcard_imports)]

pub mod constants;

pub mod engine;
pub mod feedback;
pub mod input;
pub mod leaderboard;
pub mod names;
pub mod presenter;
pub mod rounds;
pub mod selection;
