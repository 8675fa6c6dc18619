//! Syllable-by-syllable reading engine for early-reading sessions.
//!
//! The crate is `no_std`; the host runner and the tests bring `std` along.

#![cfg_attr(not(test), no_std)]

pub mod app;
pub mod content;
pub mod input;
pub mod render;
pub mod reveal;
pub mod settings;
pub mod syllables;
pub mod text_policy;
