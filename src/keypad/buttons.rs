//! Keypad buttons and the trig/log function descriptors.

/// A trig or log function button.
///
/// Each button appends one of two opening tokens depending on inverse mode,
/// and shows one of two labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FunctionButton {
    /// Button identifier.
    pub id: &'static str,
    /// Token appended in normal mode.
    pub normal: &'static str,
    /// Token appended in inverse mode.
    pub inverse: &'static str,
    /// Label shown in normal mode.
    pub normal_label: &'static str,
    /// Label shown in inverse mode.
    pub inverse_label: &'static str,
}

impl FunctionButton {
    /// Look up a function button by its identifier.
    pub fn find(id: &str) -> Option<&'static FunctionButton> {
        FUNCTION_BUTTONS.iter().find(|button| button.id == id)
    }

    /// Token to append for the given inverse mode.
    pub fn token(&self, inverse: bool) -> &'static str {
        if inverse { self.inverse } else { self.normal }
    }

    /// Label to show for the given inverse mode.
    pub fn label(&self, inverse: bool) -> &'static str {
        if inverse {
            self.inverse_label
        } else {
            self.normal_label
        }
    }
}

/// The sin, cos, tan, log and ln buttons, in keypad order.
pub static FUNCTION_BUTTONS: [FunctionButton; 5] = [
    FunctionButton {
        id: "sin",
        normal: "sin(",
        inverse: "asin(",
        normal_label: "sin",
        inverse_label: "sin⁻¹",
    },
    FunctionButton {
        id: "cos",
        normal: "cos(",
        inverse: "acos(",
        normal_label: "cos",
        inverse_label: "cos⁻¹",
    },
    FunctionButton {
        id: "tan",
        normal: "tan(",
        inverse: "atan(",
        normal_label: "tan",
        inverse_label: "tan⁻¹",
    },
    FunctionButton {
        id: "log",
        normal: "log(",
        inverse: "10(",
        normal_label: "log",
        inverse_label: "10^x",
    },
    FunctionButton {
        id: "ln",
        normal: "ln(",
        inverse: "e(",
        normal_label: "ln",
        inverse_label: "e^x",
    },
];

/// A single button press.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Button {
    Clear,
    Backspace,
    Equals,
    SquareRoot,
    Percentage,
    Factorial,
    Power,
    Pi,
    Euler,
    /// Toggles inverse mode.
    Inverse,
    /// One of the [`FUNCTION_BUTTONS`].
    Function(&'static FunctionButton),
    /// Digits, operators, parentheses and `AND`/`OR`/`XOR`: appended as labelled.
    Input(String),
}

impl Button {
    /// Classify a press from the button's identifier and its display label.
    pub fn from_press(id: &str, label: &str) -> Self {
        match id {
            "clear" => Self::Clear,
            "backspace" => Self::Backspace,
            "equals" => Self::Equals,
            "square-root" => Self::SquareRoot,
            "percentage" => Self::Percentage,
            "factorial" => Self::Factorial,
            "power" => Self::Power,
            "pi" => Self::Pi,
            "e" => Self::Euler,
            "inv" => Self::Inverse,
            _ => match FunctionButton::find(id) {
                Some(function) => Self::Function(function),
                None => Self::Input(label.to_string()),
            },
        }
    }

    /// Classify a press where the identifier doubles as the label.
    ///
    /// Also accepts `=` for equals, so a typed line like `2 + 3 =` works.
    pub fn from_token(token: &str) -> Self {
        match token {
            "=" => Self::Equals,
            _ => Self::from_press(token, token),
        }
    }
}
