//! hark - voice command resolution
//!
//! Takes the hypotheses a speech recognizer produced for one utterance and
//! decides what the user asked for: one of their own custom commands, or one
//! of the built-in intents.
//!
//! ## Pipeline
//!
//! 1. **Filter**: hypotheses censored by the recognizer are dropped
//!    ([`profanity`]).
//! 2. **Custom commands**: a committee of similarity algorithms plus
//!    structural pattern tests race against a deadline ([`resolve`]).
//! 3. **Built-in intents**: keyword detectors vote and the votes are reduced
//!    by count and confidence ([`vote`]).
//!
//! A custom command always beats a voted intent. [`engine::Engine`] ties the
//! steps together.

pub mod algorithm;
pub mod capture;
pub mod config;
pub mod domain;
pub mod engine;
pub mod keywords;
pub mod profanity;
pub mod resolve;
pub mod store;
pub mod vote;

pub use domain::*;
