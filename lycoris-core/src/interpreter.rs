use log::debug;
use num_bigint::BigInt;
use num_rational::BigRational;

use crate::builtins;
use crate::dictionary::Dictionary;
use crate::error::EvalError;
use crate::evaluator;
use crate::state::{self, LoadReport};
use crate::value::Value;

/// Resource bounds enforced by the evaluator itself.
#[derive(Debug, Clone)]
pub struct LimitConfig {
    /// Maximum absolute value of a `pow` exponent.
    pub max_exponent: i64,
    /// Maximum nesting of word application (`run` inside `run`, recursive
    /// user words).
    pub max_recursion_depth: usize,
}

impl Default for LimitConfig {
    fn default() -> Self {
        LimitConfig {
            max_exponent: 10_000,
            max_recursion_depth: 1024,
        }
    }
}

/// The Lycoris interpreter: a value stack, the word dictionary, and a
/// captured output buffer.
///
/// Strictly single-threaded and synchronous: one `execute` call runs to
/// completion or to a typed error, with no suspension points. Hosts that
/// need timeouts replace the instance rather than interrupting it.
pub struct Interpreter {
    pub(crate) stack: Vec<Value>,
    pub(crate) dictionary: Dictionary,
    pub(crate) output: String,
    pub(crate) limits: LimitConfig,
    pub(crate) depth: usize,
}

impl Interpreter {
    /// Fresh stack, seeded built-ins, empty output.
    pub fn new() -> Self {
        Self::with_limits(LimitConfig::default())
    }

    pub fn with_limits(limits: LimitConfig) -> Self {
        let mut dictionary = Dictionary::new();
        builtins::register(&mut dictionary);
        Interpreter {
            stack: Vec::new(),
            dictionary,
            output: String::new(),
            limits,
            depth: 0,
        }
    }

    /// Tokenize and run `source`, returning the output text appended during
    /// this call.
    ///
    /// On failure the stack and dictionary are rolled back to their state
    /// just before the failing token (partial effects of earlier tokens are
    /// retained), the error description is appended to the output buffer,
    /// and the error is returned.
    pub fn execute(&mut self, source: &str) -> Result<String, EvalError> {
        debug!("execute: {} bytes of source", source.len());
        let mark = self.output.len();
        evaluator::execute_source(self, source)?;
        // `clear` may have shrunk the buffer below the mark.
        Ok(self.output.get(mark..).unwrap_or_default().to_string())
    }

    /// Canonical forms of the stack values, bottom to top.
    pub fn stack_snapshot(&self) -> Vec<String> {
        self.stack.iter().map(|v| v.to_string()).collect()
    }

    /// User dictionary entries in insertion order, as
    /// `(name, body canonical text, color)`.
    pub fn dictionary_snapshot(&self) -> Vec<(String, String, String)> {
        self.dictionary
            .user_entries()
            .map(|(name, word)| (name.to_string(), word.source.clone(), word.color.clone()))
            .collect()
    }

    /// Accumulated output; reading never clears.
    pub fn output_buffer(&self) -> &str {
        &self.output
    }

    pub fn dictionary(&self) -> &Dictionary {
        &self.dictionary
    }

    /// Serialize the user dictionary to a text blob.
    pub fn save_state(&self) -> String {
        state::save(self)
    }

    /// Install user words from a blob produced by [`save_state`].
    ///
    /// Entries whose bodies no longer tokenize are skipped and reported in
    /// the returned [`LoadReport`]; the blob failing to parse at all is a
    /// `CorruptState` error.
    ///
    /// [`save_state`]: Interpreter::save_state
    pub fn load_state(&mut self, blob: &str) -> Result<LoadReport, EvalError> {
        state::load(self, blob)
    }

    pub(crate) fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    pub(crate) fn pop(&mut self, context: &str) -> Result<Value, EvalError> {
        self.stack
            .pop()
            .ok_or_else(|| EvalError::Arity(format!("{}: stack underflow", context)))
    }

    pub(crate) fn pop_rational(&mut self, context: &str) -> Result<BigRational, EvalError> {
        match self.pop(context)? {
            Value::Rational(r) => Ok(r),
            other => Err(EvalError::Type(format!(
                "{} expects a number, got {}",
                context,
                other.type_name()
            ))),
        }
    }

    pub(crate) fn pop_vector(&mut self, context: &str) -> Result<Vec<Value>, EvalError> {
        match self.pop(context)? {
            Value::Vector(v) => Ok(v),
            other => Err(EvalError::Type(format!(
                "{} expects a vector, got {}",
                context,
                other.type_name()
            ))),
        }
    }

    pub(crate) fn pop_string(&mut self, context: &str) -> Result<String, EvalError> {
        match self.pop(context)? {
            Value::String(s) => Ok(s),
            other => Err(EvalError::Type(format!(
                "{} expects a string, got {}",
                context,
                other.type_name()
            ))),
        }
    }

    /// Pop an integer rational, of any sign.
    pub(crate) fn pop_integer(&mut self, context: &str) -> Result<BigInt, EvalError> {
        let r = self.pop_rational(context)?;
        if !r.is_integer() {
            return Err(EvalError::Type(format!(
                "{} expects an integer, got {}",
                context, r
            )));
        }
        Ok(r.to_integer())
    }

    pub(crate) fn write_line(&mut self, text: &str) {
        self.output.push_str(text);
        self.output.push('\n');
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pop_helpers() {
        let mut interp = Interpreter::new();

        assert!(matches!(interp.pop("t"), Err(EvalError::Arity(_))));

        interp.push(Value::integer(3));
        assert_eq!(interp.pop_integer("t").unwrap(), BigInt::from(3));

        interp.push(Value::Bool(true));
        assert!(matches!(interp.pop_rational("t"), Err(EvalError::Type(_))));

        interp.push(Value::Rational(BigRational::new(
            BigInt::from(1),
            BigInt::from(2),
        )));
        assert!(matches!(interp.pop_integer("t"), Err(EvalError::Type(_))));
    }

    #[test]
    fn test_snapshots() {
        let mut interp = Interpreter::new();
        interp.execute("1 2/4 'hi' [1 2]").unwrap();
        assert_eq!(
            interp.stack_snapshot(),
            vec!["1", "1/2", "'hi'", "[1 2]"]
        );
        assert!(interp.dictionary_snapshot().is_empty());
    }

    #[test]
    fn test_output_accumulates_across_calls() {
        let mut interp = Interpreter::new();
        let first = interp.execute("1 print").unwrap();
        assert_eq!(first, "1\n");
        let second = interp.execute("2 print").unwrap();
        assert_eq!(second, "2\n");
        assert_eq!(interp.output_buffer(), "1\n2\n");
    }
}
