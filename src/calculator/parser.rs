//! Tokenizer and recursive-descent parser for translated expressions.
//!
//! The grammar is closed: numbers, `NaN`/`Infinity`, the arithmetic and
//! bitwise operators, parentheses, unary signs and calls to a fixed set of
//! math functions. Precedence follows the usual C-family ordering with `**`
//! binding tightest and associating to the right.

use super::error::CalcError;

/// Deepest expression tree the parser will build.
pub const MAX_DEPTH: usize = 256;

#[derive(Clone, Debug, PartialEq)]
enum Token {
    Number(f64),
    Ident(String),
    Plus,
    Minus,
    Star,
    StarStar,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    LParen,
    RParen,
    Comma,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Ident(name) => name.clone(),
            Self::Plus => "+".into(),
            Self::Minus => "-".into(),
            Self::Star => "*".into(),
            Self::StarStar => "**".into(),
            Self::Slash => "/".into(),
            Self::Percent => "%".into(),
            Self::Amp => "&".into(),
            Self::Pipe => "|".into(),
            Self::Caret => "^".into(),
            Self::LParen => "(".into(),
            Self::RParen => ")".into(),
            Self::Comma => ",".into(),
        }
    }
}

/// Binary operators, in no particular order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Pow,
    BitAnd,
    BitOr,
    BitXor,
}

/// Built-in math functions callable from an expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Function {
    Sqrt,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Log10,
    Ln,
    Exp,
    Pow,
}

impl Function {
    /// Resolve a function name, with or without the `math.` qualifier.
    fn lookup(name: &str) -> Option<Self> {
        let bare = name.strip_prefix("math.").unwrap_or(name);
        let function = match bare {
            "sqrt" => Self::Sqrt,
            "sin" => Self::Sin,
            "cos" => Self::Cos,
            "tan" => Self::Tan,
            "asin" => Self::Asin,
            "acos" => Self::Acos,
            "atan" => Self::Atan,
            "log10" => Self::Log10,
            "ln" => Self::Ln,
            "exp" => Self::Exp,
            "pow" => Self::Pow,
            _ => return None,
        };
        Some(function)
    }

    pub fn arity(self) -> usize {
        match self {
            Self::Pow => 2,
            _ => 1,
        }
    }
}

/// Parsed expression tree.
#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Number(f64),
    Neg(Box<Expr>),
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Call {
        function: Function,
        args: Vec<Expr>,
    },
}

/// Parse a translated expression into an [`Expr`].
pub fn parse(input: &str) -> Result<Expr, CalcError> {
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
    };
    let expr = parser.bit_or()?;

    match parser.tokens.get(parser.pos) {
        None => Ok(expr),
        Some((token, offset)) => Err(CalcError::UnexpectedToken {
            found: token.describe(),
            offset: *offset,
        }),
    }
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(offset, c)) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        if c.is_ascii_digit() || c == '.' {
            let end = scan_number(input, offset);
            let text = &input[offset..end];
            let value = text
                .parse::<f64>()
                .map_err(|_| CalcError::UnexpectedChar { ch: c, offset })?;
            tokens.push((Token::Number(value), offset));
            while chars.peek().is_some_and(|&(i, _)| i < end) {
                chars.next();
            }
            continue;
        }

        if c.is_alphabetic() || c == '_' {
            let mut end = offset;
            while let Some(&(i, ch)) = chars.peek() {
                if ch.is_alphanumeric() || ch == '_' || ch == '.' {
                    end = i + ch.len_utf8();
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push((Token::Ident(input[offset..end].to_string()), offset));
            continue;
        }

        chars.next();
        let token = match c {
            '+' => Token::Plus,
            '-' => Token::Minus,
            '*' => {
                if chars.peek().is_some_and(|&(_, next)| next == '*') {
                    chars.next();
                    Token::StarStar
                } else {
                    Token::Star
                }
            }
            '/' => Token::Slash,
            '%' => Token::Percent,
            '&' => Token::Amp,
            '|' => Token::Pipe,
            '^' => Token::Caret,
            '(' => Token::LParen,
            ')' => Token::RParen,
            ',' => Token::Comma,
            _ => return Err(CalcError::UnexpectedChar { ch: c, offset }),
        };
        tokens.push((token, offset));
    }

    Ok(tokens)
}

/// Byte offset just past the number literal starting at `start`.
///
/// Accepts `12`, `1.5`, `.5`, `3.` and an exponent such as `1e-7` or
/// `1.5e+25`. An `e` not followed by digits is left for the next token.
fn scan_number(input: &str, start: usize) -> usize {
    let bytes = input.as_bytes();
    let mut end = start;

    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            end = exp_end;
        }
    }

    end
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
    /// Height of the tree above the node being parsed.
    depth: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn advance(&mut self) -> Option<(Token, usize)> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, expected: &Token) -> bool {
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn descend(&mut self) -> Result<(), CalcError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::TooDeep(MAX_DEPTH));
        }
        Ok(())
    }

    fn ascend(&mut self, levels: usize) {
        self.depth -= levels;
    }

    fn expect(&mut self, expected: Token) -> Result<(), CalcError> {
        match self.advance() {
            Some((token, _)) if token == expected => Ok(()),
            Some((token, offset)) => Err(CalcError::UnexpectedToken {
                found: token.describe(),
                offset,
            }),
            None => Err(CalcError::UnexpectedEnd),
        }
    }

    /// Parse a left-associative chain of `ops` over `operand`.
    fn binary_chain(
        &mut self,
        ops: &[(Token, BinaryOp)],
        operand: fn(&mut Self) -> Result<Expr, CalcError>,
    ) -> Result<Expr, CalcError> {
        let mut lhs = operand(self)?;
        let mut extended = 0;

        'chain: loop {
            for (token, op) in ops {
                if self.eat(token) {
                    // Each link pushes the left-hand tree one level down.
                    self.descend()?;
                    extended += 1;
                    let rhs = operand(self)?;
                    lhs = Expr::Binary {
                        op: *op,
                        lhs: Box::new(lhs),
                        rhs: Box::new(rhs),
                    };
                    continue 'chain;
                }
            }
            break;
        }

        self.ascend(extended);
        Ok(lhs)
    }

    fn bit_or(&mut self) -> Result<Expr, CalcError> {
        self.binary_chain(&[(Token::Pipe, BinaryOp::BitOr)], Self::bit_xor)
    }

    fn bit_xor(&mut self) -> Result<Expr, CalcError> {
        self.binary_chain(&[(Token::Caret, BinaryOp::BitXor)], Self::bit_and)
    }

    fn bit_and(&mut self) -> Result<Expr, CalcError> {
        self.binary_chain(&[(Token::Amp, BinaryOp::BitAnd)], Self::additive)
    }

    fn additive(&mut self) -> Result<Expr, CalcError> {
        self.binary_chain(
            &[(Token::Plus, BinaryOp::Add), (Token::Minus, BinaryOp::Sub)],
            Self::term,
        )
    }

    fn term(&mut self) -> Result<Expr, CalcError> {
        self.binary_chain(
            &[
                (Token::Star, BinaryOp::Mul),
                (Token::Slash, BinaryOp::Div),
                (Token::Percent, BinaryOp::Rem),
            ],
            Self::unary,
        )
    }

    fn unary(&mut self) -> Result<Expr, CalcError> {
        if self.eat(&Token::Minus) {
            self.descend()?;
            let inner = self.unary()?;
            self.ascend(1);
            return Ok(Expr::Neg(Box::new(inner)));
        }
        if self.eat(&Token::Plus) {
            self.descend()?;
            let inner = self.unary()?;
            self.ascend(1);
            return Ok(inner);
        }
        self.power()
    }

    /// `base ** exponent`, right associative.
    ///
    /// A leading sign applies to the whole power, so `-2**2` is `-(2**2)`.
    /// JavaScript rejects that form as ambiguous; here it is accepted.
    fn power(&mut self) -> Result<Expr, CalcError> {
        let base = self.primary()?;
        if self.eat(&Token::StarStar) {
            self.descend()?;
            let exponent = self.unary()?;
            self.ascend(1);
            return Ok(Expr::Binary {
                op: BinaryOp::Pow,
                lhs: Box::new(base),
                rhs: Box::new(exponent),
            });
        }
        Ok(base)
    }

    fn primary(&mut self) -> Result<Expr, CalcError> {
        match self.advance() {
            Some((Token::Number(value), _)) => Ok(Expr::Number(value)),
            Some((Token::LParen, _)) => {
                self.descend()?;
                let inner = self.bit_or()?;
                self.expect(Token::RParen)?;
                self.ascend(1);
                Ok(inner)
            }
            Some((Token::Ident(name), offset)) => match name.as_str() {
                "NaN" => Ok(Expr::Number(f64::NAN)),
                "Infinity" => Ok(Expr::Number(f64::INFINITY)),
                _ => self.call(name, offset),
            },
            Some((token, offset)) => Err(CalcError::UnexpectedToken {
                found: token.describe(),
                offset,
            }),
            None => Err(CalcError::UnexpectedEnd),
        }
    }

    fn call(&mut self, name: String, offset: usize) -> Result<Expr, CalcError> {
        let Some(function) = Function::lookup(&name) else {
            return Err(CalcError::UnknownFunction(name));
        };

        if !self.eat(&Token::LParen) {
            return match self.advance() {
                Some((token, offset)) => Err(CalcError::UnexpectedToken {
                    found: token.describe(),
                    offset,
                }),
                None => Err(CalcError::UnexpectedToken { found: name, offset }),
            };
        }

        self.descend()?;
        let mut args = vec![self.bit_or()?];
        while self.eat(&Token::Comma) {
            args.push(self.bit_or()?);
        }
        self.expect(Token::RParen)?;
        self.ascend(1);

        if args.len() != function.arity() {
            return Err(CalcError::Arity {
                name,
                expected: function.arity(),
                found: args.len(),
            });
        }

        Ok(Expr::Call { function, args })
    }
}
