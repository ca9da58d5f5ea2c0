//! Expression evaluation.
//!
//! Translates a keypad buffer, parses it with the closed grammar in
//! [`parser`](super::parser), and reduces the tree to a finite `f64`.
//! Every failure collapses into [`CalcResult::Error`].

use super::error::CalcError;
use super::parser::{BinaryOp, Expr, Function, parse};
use super::translation::translate;

/// The text shown in place of a result when evaluation fails.
pub const ERROR_MARKER: &str = "Error";

/// Result of evaluating a calculator expression.
#[derive(Clone, Debug)]
pub enum CalcResult {
    /// Successful calculation with a finite numeric result.
    Success {
        /// The buffer as entered on the keypad.
        expression: String,
        /// The numeric value.
        value: f64,
        /// Raw number, reused as the next buffer and for the clipboard.
        raw_result: String,
        /// Formatted for display (with thousand separators).
        display_result: String,
    },
    /// Evaluation failed for any reason.
    Error {
        /// The buffer as entered on the keypad.
        expression: String,
        /// Why it failed. Only used for diagnostics.
        reason: CalcError,
    },
}

impl CalcResult {
    /// Get the expression that was evaluated.
    pub fn expression(&self) -> &str {
        match self {
            Self::Success { expression, .. } => expression,
            Self::Error { expression, .. } => expression,
        }
    }

    /// Check if this is a successful result.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The numeric value, if evaluation succeeded.
    pub fn value(&self) -> Option<f64> {
        match self {
            Self::Success { value, .. } => Some(*value),
            Self::Error { .. } => None,
        }
    }

    /// Get the display string (result or the error marker).
    pub fn display(&self) -> &str {
        match self {
            Self::Success { display_result, .. } => display_result,
            Self::Error { .. } => ERROR_MARKER,
        }
    }

    /// Get the raw result string (only for successful results).
    pub fn raw(&self) -> Option<&str> {
        match self {
            Self::Success { raw_result, .. } => Some(raw_result),
            Self::Error { .. } => None,
        }
    }
}

/// Translate and evaluate a keypad buffer.
pub fn evaluate(buffer: &str) -> CalcResult {
    let expression = buffer.to_string();
    let translated = translate(buffer);

    match evaluate_translated(&translated) {
        Ok(value) => CalcResult::Success {
            expression,
            raw_result: format_number(value),
            display_result: format_display(value),
            value,
        },
        Err(reason) => {
            tracing::debug!(buffer, %translated, %reason, "evaluation failed");
            CalcResult::Error { expression, reason }
        }
    }
}

/// Evaluate an expression already in evaluator syntax.
///
/// Rejects NaN and infinite results, so division by zero and domain
/// errors surface as [`CalcError::NonFinite`].
pub fn evaluate_translated(expression: &str) -> Result<f64, CalcError> {
    let tree = parse(expression)?;
    let value = eval(&tree);

    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NonFinite(value))
    }
}

fn eval(expr: &Expr) -> f64 {
    match expr {
        Expr::Number(value) => *value,
        Expr::Neg(inner) => -eval(inner),
        Expr::Binary { op, lhs, rhs } => {
            let lhs = eval(lhs);
            let rhs = eval(rhs);
            match op {
                BinaryOp::Add => lhs + rhs,
                BinaryOp::Sub => lhs - rhs,
                BinaryOp::Mul => lhs * rhs,
                BinaryOp::Div => lhs / rhs,
                BinaryOp::Rem => lhs % rhs,
                BinaryOp::Pow => lhs.powf(rhs),
                BinaryOp::BitAnd => f64::from(to_int32(lhs) & to_int32(rhs)),
                BinaryOp::BitOr => f64::from(to_int32(lhs) | to_int32(rhs)),
                BinaryOp::BitXor => f64::from(to_int32(lhs) ^ to_int32(rhs)),
            }
        }
        Expr::Call { function, args } => {
            let x = args.first().map_or(f64::NAN, eval);
            match function {
                Function::Sqrt => x.sqrt(),
                Function::Sin => x.sin(),
                Function::Cos => x.cos(),
                Function::Tan => x.tan(),
                Function::Asin => x.asin(),
                Function::Acos => x.acos(),
                Function::Atan => x.atan(),
                Function::Log10 => x.log10(),
                Function::Ln => x.ln(),
                Function::Exp => x.exp(),
                Function::Pow => x.powf(args.get(1).map_or(f64::NAN, eval)),
            }
        }
    }
}

/// Truncate to a signed 32-bit integer, wrapping modulo 2^32.
fn to_int32(value: f64) -> i32 {
    const TWO_32: f64 = 4_294_967_296.0;
    const TWO_31: f64 = 2_147_483_648.0;

    if !value.is_finite() {
        return 0;
    }

    let wrapped = value.trunc().rem_euclid(TWO_32);
    if wrapped >= TWO_31 {
        (wrapped - TWO_32) as i32
    } else {
        wrapped as i32
    }
}

/// Format a number the way it is written back into the buffer.
///
/// Shortest round-trip decimal, switching to exponent notation outside
/// `[1e-6, 1e21)`. Non-finite values use the `NaN`/`Infinity` literals the
/// parser understands.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() {
            "Infinity".to_string()
        } else {
            "-Infinity".to_string()
        };
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let abs = value.abs();
    if (1e-6..1e21).contains(&abs) {
        return value.to_string();
    }

    let formatted = format!("{:e}", value);
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{}e+{}", mantissa, exponent)
        }
        _ => formatted,
    }
}

/// Format a number for display with thousand separators.
pub fn format_display(value: f64) -> String {
    let raw = format_number(value);
    if !value.is_finite() || raw.contains('e') {
        return raw;
    }

    let (sign, unsigned) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw.as_str()),
    };
    let (int_part, frac_part) = match unsigned.find('.') {
        Some(dot) => unsigned.split_at(dot),
        None => (unsigned, ""),
    };

    format!("{}{}{}", sign, with_separators(int_part), frac_part)
}

/// Insert a comma every three digits, counting from the right.
fn with_separators(digits: &str) -> String {
    let mut result = String::new();
    for (i, c) in digits.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn value_of(buffer: &str) -> f64 {
        evaluate(buffer)
            .value()
            .unwrap_or_else(|| panic!("{buffer} failed to evaluate"))
    }

    fn assert_close(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn test_basic_evaluation() {
        let result = evaluate("2+3*4");
        assert!(result.is_success());
        assert_eq!(result.value(), Some(14.0));
        assert_eq!(result.raw(), Some("14"));
    }

    #[test]
    fn test_standard_arithmetic() {
        assert_eq!(value_of("(2+3)*4"), 20.0);
        assert_eq!(value_of("10/4"), 2.5);
        assert_eq!(value_of("7%3"), 1.0);
        assert_eq!(value_of("-5+2"), -3.0);
        assert_eq!(value_of("--5"), 5.0);
        assert_eq!(value_of("2**10"), 1024.0);
        assert_eq!(value_of("50/100"), 0.5);
    }

    #[test]
    fn test_factorial() {
        assert_eq!(value_of("5!"), 120.0);
        assert_eq!(value_of("0!"), 1.0);
        assert_eq!(value_of("3!x2"), 12.0);
        assert!(!evaluate("-3!").is_success());
    }

    #[test]
    fn test_constants() {
        assert_close(value_of("2*π"), 6.283185307);
        assert_close(value_of("e"), 2.718281828);
        assert_close(value_of("2xπ"), 6.283185307);
    }

    #[test]
    fn test_calculator_glyphs() {
        assert_eq!(value_of("2^3"), 8.0);
        assert_eq!(value_of("√(16"), 4.0);
        assert_eq!(value_of("√(9)+1"), 4.0);
        assert_close(value_of("sin(0)"), 0.0);
        assert_close(value_of("cos(0)"), 1.0);
        assert_close(value_of("asin(1)"), std::f64::consts::FRAC_PI_2);
        assert_close(value_of("atan(1)x4"), std::f64::consts::PI);
        assert_close(value_of("log(1000"), 3.0);
        assert_close(value_of("ln(e)"), 1.0);
        assert_close(value_of("10(2)"), 100.0);
        assert_close(value_of("e(1)"), std::f64::consts::E);
    }

    #[test]
    fn test_bitwise() {
        assert_eq!(value_of("6AND3"), 2.0);
        assert_eq!(value_of("6OR3"), 7.0);
        assert_eq!(value_of("6XOR3"), 5.0);
        assert_eq!(value_of("5.9AND7"), 5.0);
        // Bitwise binds looser than arithmetic.
        assert_eq!(value_of("1+1AND3"), 2.0);
    }

    #[test]
    fn test_functions_after_bitwise_mnemonics() {
        assert_close(value_of("6ANDlog(100)"), 2.0);
        assert_eq!(value_of("1ORe(0)"), 1.0);
        assert_eq!(value_of("1XOR10(1)"), 11.0);
    }

    #[test]
    fn test_deep_nesting_is_an_error() {
        let result = evaluate(&("(".repeat(10_000) + "1"));
        assert!(!result.is_success());
        assert_eq!(result.display(), ERROR_MARKER);
        assert!(matches!(
            result,
            CalcResult::Error {
                reason: CalcError::TooDeep(_),
                ..
            }
        ));
    }

    #[test]
    fn test_to_int32_wraps() {
        assert_eq!(to_int32(4_294_967_297.0), 1);
        assert_eq!(to_int32(2_147_483_648.0), i32::MIN);
        assert_eq!(to_int32(-1.5), -1);
        assert_eq!(to_int32(f64::NAN), 0);
    }

    #[test]
    fn test_failures_collapse_to_error_marker() {
        for buffer in ["1/0", "asin(2)", "log(0)", "ln(-1)", "2+*3", "sin", "", "1+2)"] {
            let result = evaluate(buffer);
            assert!(!result.is_success(), "{buffer} should fail");
            assert_eq!(result.display(), ERROR_MARKER);
            assert_eq!(result.raw(), None);
        }
    }

    #[test]
    fn test_failure_reasons() {
        assert_eq!(
            evaluate_translated("1/0"),
            Err(CalcError::NonFinite(f64::INFINITY))
        );
        assert!(matches!(
            evaluate_translated("math.asin(2)"),
            Err(CalcError::NonFinite(v)) if v.is_nan()
        ));
        assert!(matches!(
            evaluate_translated("2+"),
            Err(CalcError::UnexpectedEnd)
        ));
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(14.0), "14");
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(format_number(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(format_number(1e21), "1e+21");
        assert_eq!(format_number(1.5e-7), "1.5e-7");
        assert_eq!(format_number(123456.0), "123456");
        assert_eq!(format_number(f64::NAN), "NaN");
        assert_eq!(format_number(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_result_reuse_round_trips() {
        for buffer in ["1/3", "2**80", "1/3000000000", "0.1+0.2"] {
            let first = evaluate(buffer);
            let reused = evaluate(first.raw().unwrap());
            assert_eq!(first.value(), reused.value(), "{buffer}");
        }
    }

    #[test]
    fn test_thousand_separators() {
        let result = evaluate("1000x1000");
        assert_eq!(result.display(), "1,000,000");
        assert_eq!(result.raw(), Some("1000000"));
        assert_eq!(format_display(-1234.5), "-1,234.5");
        assert_eq!(format_display(999.0), "999");
        assert_eq!(format_display(1e22), "1e+22");
    }
}
