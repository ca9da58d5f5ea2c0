//! Failure reasons for a single evaluation.
//!
//! These never reach the keypad display: [`evaluate`](super::evaluate)
//! collapses every variant into the error marker.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unexpected token '{found}' at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("unexpected end of expression")]
    UnexpectedEnd,

    #[error("empty expression")]
    Empty,

    #[error("unknown function '{0}'")]
    UnknownFunction(String),

    #[error("function '{name}' takes {expected} argument(s), got {found}")]
    Arity {
        name: String,
        expected: usize,
        found: usize,
    },

    #[error("expression nested deeper than {0} levels")]
    TooDeep(usize),

    #[error("result is not a finite number ({0})")]
    NonFinite(f64),
}
