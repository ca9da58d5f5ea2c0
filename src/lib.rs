//! Keypad scientific calculator.
//!
//! - [`calculator`] translates calculator notation and evaluates it
//! - [`keypad`] owns the input buffer and reacts to button presses
//! - [`config`] holds the read-only user settings

pub mod calculator;
pub mod config;
pub mod keypad;

pub use calculator::{CalcError, CalcResult, evaluate, translate};
pub use config::Config;
pub use keypad::{Button, Keypad, Mode};
