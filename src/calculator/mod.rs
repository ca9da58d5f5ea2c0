//! Calculator module for translating and evaluating keypad expressions.
//!
//! This module provides functionality to:
//! - Translate calculator notation into the evaluator grammar
//! - Parse and evaluate the translated expression
//! - Copy results to the clipboard

mod clipboard;
mod error;
mod evaluation;
mod parser;
mod translation;

pub use clipboard::copy_to_clipboard;
pub use error::CalcError;
pub use evaluation::{
    CalcResult, ERROR_MARKER, evaluate, evaluate_translated, format_display, format_number,
};
pub use translation::{factorial, translate};
