//! Calculator notation to evaluator grammar.
//!
//! The keypad writes glyphs the evaluator does not know about (`x`, `π`,
//! `√`, `^`, `5!`, `asin(`, `10(`, `AND`, ...). [`translate`] rewrites them
//! with an ordered table of global textual substitutions. Order matters:
//! later rules act on text produced by earlier ones, and inverse forms must
//! be rewritten before the plain forms they contain.

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::f64::consts::{E, PI};

use super::evaluation::format_number;

/// A single rewrite step.
struct Rule {
    name: &'static str,
    apply: fn(&str) -> String,
}

/// Rewrite steps, in application order.
const RULES: &[Rule] = &[
    Rule {
        name: "close-parens",
        apply: auto_close_parentheses,
    },
    Rule {
        name: "multiply",
        apply: rewrite_operator_glyphs,
    },
    Rule {
        name: "constants",
        apply: rewrite_constants,
    },
    Rule {
        name: "factorial",
        apply: rewrite_factorials,
    },
    Rule {
        name: "power",
        apply: rewrite_power,
    },
    Rule {
        name: "root",
        apply: rewrite_root,
    },
    Rule {
        name: "inverse-trig",
        apply: rewrite_inverse_trig,
    },
    Rule {
        name: "trig",
        apply: rewrite_trig,
    },
    Rule {
        name: "inverse-log",
        apply: rewrite_inverse_log,
    },
    Rule {
        name: "log",
        apply: rewrite_log,
    },
    Rule {
        name: "bitwise",
        apply: rewrite_bitwise,
    },
];

/// Characters after which a `-` is a sign rather than a subtraction.
const SIGN_CONTEXT: &[char] = &['(', '+', '-', '*', '/', '%', '^', '&', '|', ','];

lazy_static! {
    /// A standalone `e`. The optional `(` marks the inverse-ln token.
    static ref EULER: Regex = Regex::new(r"\be\b(\()?").unwrap();

    /// A digit run followed by `!`, with an optional leading minus.
    static ref FACTORIAL: Regex = Regex::new(r"(-?)(\d+)!").unwrap();

    static ref INVERSE_TRIG: Regex = Regex::new(r"(asin|acos|atan)").unwrap();

    /// A trig name that is not the tail of an inverse or qualified name.
    static ref TRIG: Regex = Regex::new(r"(^|[^a.])(sin|cos|tan)").unwrap();

    static ref POW_TEN: Regex = Regex::new(r"10\(").unwrap();

    static ref EXP: Regex = Regex::new(r"e\(").unwrap();

    static ref LOG10: Regex = Regex::new(r"log\(").unwrap();

    static ref LN: Regex = Regex::new(r"ln\(").unwrap();
}

/// Translate a keypad buffer into evaluator syntax.
///
/// Not idempotent in general: translating the output again only yields the
/// same string when the input had no calculator glyphs in the first place.
pub fn translate(buffer: &str) -> String {
    let mut expression = buffer.to_string();

    for rule in RULES {
        let rewritten = (rule.apply)(&expression);
        if rewritten != expression {
            tracing::trace!(rule = rule.name, from = %expression, to = %rewritten, "rewrite");
        }
        expression = rewritten;
    }

    tracing::debug!(buffer, translated = %expression, "translated expression");
    expression
}

/// Factorial as an iterative product of `2..=n`.
///
/// Negative input yields NaN; `0!` and `1!` are 1. Stops early once the
/// product overflows to infinity.
pub fn factorial(n: f64) -> f64 {
    if n.is_nan() || n < 0.0 {
        return f64::NAN;
    }

    let mut result = 1.0;
    let mut i = 2.0;
    while i <= n {
        result *= i;
        if result.is_infinite() {
            break;
        }
        i += 1.0;
    }
    result
}

fn auto_close_parentheses(input: &str) -> String {
    let open = input.chars().fold(0i64, |depth, c| match c {
        '(' => depth + 1,
        ')' => depth - 1,
        _ => depth,
    });

    let mut result = input.to_string();
    if open > 0 {
        result.push_str(&")".repeat(open as usize));
    }
    result
}

fn rewrite_operator_glyphs(input: &str) -> String {
    input.replace(['x', '×'], "*").replace('÷', "/")
}

fn rewrite_constants(input: &str) -> String {
    let input = input.replace('π', &PI.to_string());

    EULER
        .replace_all(&input, |caps: &Captures| {
            if caps.get(1).is_some() {
                "e(".to_string()
            } else {
                E.to_string()
            }
        })
        .into_owned()
}

fn rewrite_factorials(input: &str) -> String {
    FACTORIAL
        .replace_all(input, |caps: &Captures| {
            let whole = caps.get(0).map_or(0, |m| m.start());
            let digits = &caps[2];
            let n: f64 = digits.parse().unwrap_or(f64::INFINITY);

            let has_minus = !caps[1].is_empty();
            let is_sign = has_minus
                && input[..whole]
                    .chars()
                    .next_back()
                    .is_none_or(|prev| SIGN_CONTEXT.contains(&prev));

            if is_sign {
                format_number(factorial(-n))
            } else {
                format!("{}{}", &caps[1], format_number(factorial(n)))
            }
        })
        .into_owned()
}

fn rewrite_power(input: &str) -> String {
    input.replace('^', "**")
}

fn rewrite_root(input: &str) -> String {
    input.replace('√', "math.sqrt")
}

fn rewrite_inverse_trig(input: &str) -> String {
    INVERSE_TRIG.replace_all(input, "math.$1").into_owned()
}

fn rewrite_trig(input: &str) -> String {
    TRIG.replace_all(input, "${1}math.$2").into_owned()
}

fn rewrite_inverse_log(input: &str) -> String {
    let input = POW_TEN.replace_all(input, "math.pow(10,");
    EXP.replace_all(&input, "math.exp(").into_owned()
}

fn rewrite_log(input: &str) -> String {
    let input = LOG10.replace_all(input, "math.log10(");
    LN.replace_all(&input, "math.ln(").into_owned()
}

fn rewrite_bitwise(input: &str) -> String {
    // XOR first, or its tail would be taken as OR.
    input
        .replace("AND", "&")
        .replace("XOR", "^")
        .replace("OR", "|")
}
