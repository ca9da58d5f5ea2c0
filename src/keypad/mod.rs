//! Keypad controller.
//!
//! Owns the expression buffer and the inverse-mode flag, appends tokens as
//! buttons are pressed, and hands the buffer to the calculator on `=`.

mod buttons;

pub use buttons::{Button, FUNCTION_BUTTONS, FunctionButton};

use crate::calculator::{CalcResult, evaluate};
use crate::config::Config;

/// Whether the display currently shows the error marker.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Normal,
    ErrorDisplayed,
}

/// Calculator keypad: the expression buffer, inverse mode and what the
/// display shows.
#[derive(Clone, Debug)]
pub struct Keypad {
    buffer: String,
    inverse: bool,
    mode: Mode,
    display: String,
    error_marker: String,
    thousands_separators: bool,
    /// Raw value of the most recent successful evaluation.
    last_result: Option<String>,
}

impl Default for Keypad {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Keypad {
    pub fn new(config: &Config) -> Self {
        Self {
            buffer: String::new(),
            inverse: false,
            mode: Mode::Normal,
            display: "0".to_string(),
            error_marker: config.error_marker.clone(),
            thousands_separators: config.thousands_separators,
            last_result: None,
        }
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn is_inverse(&self) -> bool {
        self.inverse
    }

    pub fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }

    /// Current `(id, label)` of each function button.
    pub fn function_labels(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        FUNCTION_BUTTONS
            .iter()
            .map(|button| (button.id, button.label(self.inverse)))
    }

    /// Process one button press and return the new display text.
    pub fn press(&mut self, button: Button) -> &str {
        if self.mode == Mode::ErrorDisplayed {
            self.buffer.clear();
            self.mode = Mode::Normal;
        }

        match button {
            Button::Clear => {
                self.buffer.clear();
                self.show_buffer();
            }
            Button::Backspace => {
                self.buffer.pop();
                self.show_buffer();
            }
            Button::Equals => self.equals(),
            Button::SquareRoot => self.append("√("),
            Button::Percentage => self.append("/100"),
            Button::Factorial => self.append("!"),
            Button::Power => self.append("^"),
            Button::Pi => self.append("π"),
            Button::Euler => self.append("e"),
            Button::Inverse => {
                self.inverse = !self.inverse;
                tracing::debug!(inverse = self.inverse, "toggled inverse mode");
            }
            Button::Function(function) => self.append(function.token(self.inverse)),
            Button::Input(label) => self.append(&label),
        }

        &self.display
    }

    fn append(&mut self, token: &str) {
        self.buffer.push_str(token);
        self.show_buffer();
    }

    fn show_buffer(&mut self) {
        self.display = if self.buffer.is_empty() {
            "0".to_string()
        } else {
            self.buffer.clone()
        };
    }

    fn equals(&mut self) {
        match evaluate(&self.buffer) {
            CalcResult::Success {
                raw_result,
                display_result,
                ..
            } => {
                self.display = if self.thousands_separators {
                    display_result
                } else {
                    raw_result.clone()
                };
                self.buffer = raw_result.clone();
                self.last_result = Some(raw_result);
            }
            CalcResult::Error { .. } => {
                self.display = self.error_marker.clone();
                self.buffer.clear();
                self.mode = Mode::ErrorDisplayed;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn press_all(keypad: &mut Keypad, tokens: &[&str]) {
        for token in tokens {
            keypad.press(Button::from_token(token));
        }
    }

    #[test]
    fn test_empty_display_shows_zero() {
        let keypad = Keypad::default();
        assert_eq!(keypad.display(), "0");
        assert_eq!(keypad.mode(), Mode::Normal);
    }

    #[test]
    fn test_accumulate_and_evaluate() {
        let mut keypad = Keypad::default();
        press_all(&mut keypad, &["2", "+", "3", "x", "4"]);
        assert_eq!(keypad.display(), "2+3x4");

        assert_eq!(keypad.press(Button::Equals), "14");
        assert_eq!(keypad.buffer(), "14");
        assert_eq!(keypad.last_result(), Some("14"));
        assert_eq!(keypad.mode(), Mode::Normal);
    }

    #[test]
    fn test_result_is_reused_as_input() {
        let mut keypad = Keypad::default();
        press_all(&mut keypad, &["6", "=", "x", "7", "="]);
        assert_eq!(keypad.display(), "42");
    }

    #[test]
    fn test_error_then_next_press_starts_fresh() {
        let mut keypad = Keypad::default();
        press_all(&mut keypad, &["1", "/", "0"]);
        assert_eq!(keypad.press(Button::Equals), "Error");
        assert_eq!(keypad.mode(), Mode::ErrorDisplayed);
        assert_eq!(keypad.buffer(), "");

        assert_eq!(keypad.press(Button::from_token("5")), "5");
        assert_eq!(keypad.mode(), Mode::Normal);
    }

    #[test]
    fn test_error_then_backspace_clears() {
        let mut keypad = Keypad::default();
        press_all(&mut keypad, &["inv", "sin", "2", "="]);
        assert_eq!(keypad.display(), "Error");

        assert_eq!(keypad.press(Button::Backspace), "0");
        assert_eq!(keypad.mode(), Mode::Normal);
    }

    #[test]
    fn test_clear_and_backspace() {
        let mut keypad = Keypad::default();
        press_all(&mut keypad, &["1", "2", "pi"]);
        assert_eq!(keypad.display(), "12π");

        assert_eq!(keypad.press(Button::Backspace), "12");
        assert_eq!(keypad.press(Button::Clear), "0");
        assert_eq!(keypad.press(Button::Backspace), "0");
        assert_eq!(keypad.buffer(), "");
    }

    #[test]
    fn test_inverse_affects_only_later_presses() {
        let mut keypad = Keypad::default();
        press_all(&mut keypad, &["sin", "inv", "sin"]);
        assert_eq!(keypad.buffer(), "sin(asin(");
        assert!(keypad.is_inverse());
    }

    #[test]
    fn test_inverse_persists_until_toggled() {
        let mut keypad = Keypad::default();
        press_all(&mut keypad, &["inv", "log", "2", ")", "+", "ln", "0", ")"]);
        assert_eq!(keypad.buffer(), "10(2)+e(0)");

        press_all(&mut keypad, &["inv", "cos"]);
        assert_eq!(keypad.buffer(), "10(2)+e(0)cos(");
        assert!(!keypad.is_inverse());
    }

    #[test]
    fn test_inverse_relabels_function_buttons() {
        let mut keypad = Keypad::default();
        let normal: Vec<_> = keypad.function_labels().map(|(_, label)| label).collect();
        assert_eq!(normal, ["sin", "cos", "tan", "log", "ln"]);

        keypad.press(Button::Inverse);
        let inverse: Vec<_> = keypad.function_labels().map(|(_, label)| label).collect();
        assert_eq!(inverse, ["sin⁻¹", "cos⁻¹", "tan⁻¹", "10^x", "e^x"]);
    }

    #[test]
    fn test_glyph_buttons() {
        let mut keypad = Keypad::default();
        press_all(
            &mut keypad,
            &["square-root", "9", ")", "power", "2", "+", "3", "factorial"],
        );
        assert_eq!(keypad.buffer(), "√(9)^2+3!");
        assert_eq!(keypad.press(Button::Equals), "15");
    }

    #[test]
    fn test_percentage() {
        let mut keypad = Keypad::default();
        press_all(&mut keypad, &["5", "0", "percentage", "="]);
        assert_eq!(keypad.display(), "0.5");
    }

    #[test]
    fn test_auto_close_on_equals() {
        let mut keypad = Keypad::default();
        press_all(&mut keypad, &["(", "1", "+", "2", "x", "(", "3", "="]);
        assert_eq!(keypad.display(), "7");
    }

    #[test]
    fn test_configured_display() {
        let config = Config {
            error_marker: "E".to_string(),
            thousands_separators: true,
            copy_results: false,
        };
        let mut keypad = Keypad::new(&config);
        press_all(&mut keypad, &["1", "0", "0", "0", "x", "1", "0", "0", "0", "="]);
        assert_eq!(keypad.display(), "1,000,000");
        assert_eq!(keypad.buffer(), "1000000");

        press_all(&mut keypad, &["/", "0", "="]);
        assert_eq!(keypad.display(), "E");
    }
}
