//! Longest-match tokenizer.
//!
//! The tokenizer folds the parser in: every token it emits is either a
//! finished [`Value`] to push, a scoped word call, or the `:` guard
//! separator. Tokens are not whitespace-delimited; the dictionary is
//! authoritative for lexical boundaries, so `2add3mul` tokenizes as
//! `2 add 3 mul`.
//!
//! Recognition priority at every position: whitespace and comments, string
//! literal, vector literal, number, reserved literal, guard separator, then
//! dictionary longest match (with an optional `@` / `*` / `#` scope
//! prefix). `#` starts a comment only when the text after it does not begin
//! with a dictionary word; otherwise it is the Global scope prefix.

use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::dictionary::Dictionary;
use crate::error::EvalError;
use crate::value::{Scope, Value};

/// An executable unit: a literal value to push or a scoped word call.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Push(Value),
    Call(Scope, String),
}

/// Tokenizer output: executable steps plus the `:` guard separator, which
/// only the evaluator's guard-clause routing consumes.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    Step(Step),
    Guard,
}

pub fn tokenize(source: &str, dict: &Dictionary) -> Result<Vec<Token>, EvalError> {
    let mut lexer = Lexer {
        src: source,
        pos: 0,
        dict,
    };
    let mut tokens = Vec::new();
    while let Some(unit) = lexer.next_unit()? {
        match unit {
            Unit::Step(step) => tokens.push(Token::Step(step)),
            Unit::Guard => tokens.push(Token::Guard),
            Unit::Close(offset) => {
                return Err(EvalError::SyntaxAt {
                    offset,
                    message: "unmatched ']'".to_string(),
                });
            }
        }
    }
    Ok(tokens)
}

enum Unit {
    Step(Step),
    Guard,
    Close(usize),
}

struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    dict: &'a Dictionary,
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.src[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn next_unit(&mut self) -> Result<Option<Unit>, EvalError> {
        loop {
            let Some(c) = self.peek() else {
                return Ok(None);
            };
            match c {
                _ if c.is_whitespace() => self.pos += c.len_utf8(),
                '#' => {
                    // Global-scope word reference if a word follows,
                    // otherwise a comment to end of line.
                    if let Some(len) = self.dict.longest_prefix(&self.src[self.pos + 1..]) {
                        let name = self.src[self.pos + 1..self.pos + 1 + len].to_string();
                        self.pos += 1 + len;
                        return Ok(Some(Unit::Step(Step::Call(Scope::Global, name))));
                    }
                    while let Some(c) = self.peek() {
                        self.pos += c.len_utf8();
                        if c == '\n' {
                            break;
                        }
                    }
                }
                '\'' => return self.string_literal().map(|v| Some(Unit::Step(Step::Push(v)))),
                '[' => return self.vector_literal().map(|v| Some(Unit::Step(Step::Push(v)))),
                ']' => {
                    let offset = self.pos;
                    self.pos += 1;
                    return Ok(Some(Unit::Close(offset)));
                }
                ':' => {
                    self.pos += 1;
                    return Ok(Some(Unit::Guard));
                }
                _ => return self.word_or_literal().map(Some),
            }
        }
    }

    fn word_or_literal(&mut self) -> Result<Unit, EvalError> {
        if let Some((value, len)) = self.number()? {
            self.pos += len;
            return Ok(Unit::Step(Step::Push(value)));
        }

        let rest = self.rest();
        for (literal, value) in [
            ("true", Value::Bool(true)),
            ("false", Value::Bool(false)),
            ("nil", Value::Nil),
        ] {
            if rest.starts_with(literal) {
                self.pos += literal.len();
                return Ok(Unit::Step(Step::Push(value)));
            }
        }

        let (scope, skip) = match rest.as_bytes().first() {
            Some(b'@') => (Scope::Map, 1),
            Some(b'*') => (Scope::Reduce, 1),
            _ => (Scope::Local, 0),
        };
        if let Some(len) = self.dict.longest_prefix(&self.src[self.pos + skip..]) {
            let name = self.src[self.pos + skip..self.pos + skip + len].to_string();
            self.pos += skip + len;
            return Ok(Unit::Step(Step::Call(scope, name)));
        }

        Err(EvalError::SyntaxAt {
            offset: self.pos,
            message: "unknown token".to_string(),
        })
    }

    // The content between single quotes is taken verbatim; no escapes.
    fn string_literal(&mut self) -> Result<Value, EvalError> {
        let open = self.pos;
        let body = &self.src[open + 1..];
        match body.find('\'') {
            Some(end) => {
                let text = body[..end].to_string();
                self.pos = open + 1 + end + 1;
                Ok(Value::String(text))
            }
            None => Err(EvalError::SyntaxAt {
                offset: open,
                message: "unterminated string".to_string(),
            }),
        }
    }

    // Recurses through `next_unit`, so nested vectors, strings and comments
    // all behave as at top level. Word references become `Value::Word`
    // elements: the homoiconic representation that `run` executes.
    fn vector_literal(&mut self) -> Result<Value, EvalError> {
        let open = self.pos;
        self.pos += 1;
        let mut elements = Vec::new();
        loop {
            match self.next_unit()? {
                Some(Unit::Step(Step::Push(value))) => elements.push(value),
                Some(Unit::Step(Step::Call(scope, name))) => elements.push(Value::Word(scope, name)),
                Some(Unit::Guard) => {
                    return Err(EvalError::SyntaxAt {
                        offset: self.pos - 1,
                        message: "guard separator inside vector".to_string(),
                    });
                }
                Some(Unit::Close(_)) => return Ok(Value::Vector(elements)),
                None => {
                    return Err(EvalError::SyntaxAt {
                        offset: open,
                        message: "unmatched '['".to_string(),
                    });
                }
            }
        }
    }

    /// Number grammar: `[-+]?digits(/digits)?` or
    /// `[-+]?digits(.digits)?([eE][-+]?digits)?`, converted exactly.
    fn number(&mut self) -> Result<Option<(Value, usize)>, EvalError> {
        let bytes = self.rest().as_bytes();
        let mut i = 0;

        let negative = match bytes.first() {
            Some(b'-') => {
                i = 1;
                true
            }
            Some(b'+') => {
                i = 1;
                false
            }
            _ => false,
        };

        let int_start = i;
        while bytes.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == int_start {
            return Ok(None);
        }
        let int_digits = &self.rest()[int_start..i];

        // Fraction literal: digits '/' digits.
        if bytes.get(i) == Some(&b'/') && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
            let den_start = i + 1;
            let mut j = den_start;
            while bytes.get(j).is_some_and(u8::is_ascii_digit) {
                j += 1;
            }
            let numer = parse_digits(int_digits, negative, self.pos)?;
            let denom = parse_digits(&self.rest()[den_start..j], false, self.pos)?;
            if denom.is_zero() {
                return Err(EvalError::SyntaxAt {
                    offset: self.pos,
                    message: "fraction literal with zero denominator".to_string(),
                });
            }
            return Ok(Some((
                Value::Rational(BigRational::new(numer, denom)),
                j,
            )));
        }

        // Optional decimal part.
        let mut frac_digits = "";
        if bytes.get(i) == Some(&b'.') && bytes.get(i + 1).is_some_and(u8::is_ascii_digit) {
            let frac_start = i + 1;
            let mut j = frac_start;
            while bytes.get(j).is_some_and(u8::is_ascii_digit) {
                j += 1;
            }
            frac_digits = &self.rest()[frac_start..j];
            i = j;
        }

        // Optional exponent.
        let mut exponent: i64 = 0;
        if matches!(bytes.get(i), Some(b'e' | b'E')) {
            let mut j = i + 1;
            let exp_negative = match bytes.get(j) {
                Some(b'-') => {
                    j += 1;
                    true
                }
                Some(b'+') => {
                    j += 1;
                    false
                }
                _ => false,
            };
            let exp_start = j;
            while bytes.get(j).is_some_and(u8::is_ascii_digit) {
                j += 1;
            }
            if j > exp_start {
                // Expanded exactly; the magnitude only has to fit the
                // power function's u32 exponent.
                let magnitude: u32 =
                    self.rest()[exp_start..j]
                        .parse()
                        .map_err(|_| EvalError::SyntaxAt {
                            offset: self.pos,
                            message: "exponent out of range".to_string(),
                        })?;
                exponent = if exp_negative {
                    -i64::from(magnitude)
                } else {
                    i64::from(magnitude)
                };
                i = j;
            }
            // 'e' not followed by digits is left for the dictionary.
        }

        // A.B becomes (A*10^|B| + B) / 10^|B|, sign on the numerator.
        let mut numer = parse_digits(int_digits, false, self.pos)?;
        let mut denom = BigInt::from(1);
        if !frac_digits.is_empty() {
            let scale = BigInt::from(10).pow(frac_digits.len() as u32);
            numer = numer * &scale + parse_digits(frac_digits, false, self.pos)?;
            denom = scale;
        }
        if negative {
            numer = -numer;
        }
        let mut value = BigRational::new(numer, denom);

        if exponent != 0 {
            let shift = BigRational::from_integer(BigInt::from(10).pow(exponent.unsigned_abs() as u32));
            value = if exponent > 0 { value * shift } else { value / shift };
        }

        Ok(Some((Value::Rational(value), i)))
    }
}

fn parse_digits(digits: &str, negative: bool, offset: usize) -> Result<BigInt, EvalError> {
    let n: BigInt = digits.parse().map_err(|_| EvalError::SyntaxAt {
        offset,
        message: "malformed number".to_string(),
    })?;
    Ok(if negative { -n } else { n })
}
