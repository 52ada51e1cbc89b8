use std::fmt;

use num_bigint::BigInt;
use num_rational::BigRational;

/// How a word reference is applied to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Plain application at the stack top.
    Local,
    /// `@word`: apply per element of a vector, collecting results.
    Map,
    /// `*word`: left fold over a vector.
    Reduce,
    /// `#word`: apply to the whole stack gathered into one vector.
    Global,
}

impl Scope {
    /// The source glyph that selects this scope (empty for Local).
    pub fn prefix(self) -> &'static str {
        match self {
            Scope::Local => "",
            Scope::Map => "@",
            Scope::Reduce => "*",
            Scope::Global => "#",
        }
    }
}

/// A Lycoris value.
///
/// The first five variants are the data values that may appear on the stack.
/// `Word` only ever occurs inside a `Vector` body: it is the homoiconic form
/// of a word reference, produced when a word appears inside a vector literal
/// and executed when that vector is passed to `run` (or applied under a
/// scope modifier). A bare word-reference token executes instead of pushing.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// An exact rational; always reduced, denominator always positive.
    Rational(BigRational),
    String(String),
    Bool(bool),
    Nil,
    Vector(Vec<Value>),
    Word(Scope, String),
}

impl Value {
    /// An integer rational `n/1`.
    pub fn integer<T: Into<BigInt>>(n: T) -> Self {
        Value::Rational(BigRational::from_integer(n.into()))
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Rational(_) => "rational",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Nil => "nil",
            Value::Vector(_) => "vector",
            Value::Word(_, _) => "word",
        }
    }
}

// Canonical textual form: what `print` emits, what user-word sources are
// stored as, and what the tokenizer accepts back.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Rational(r) => {
                if r.is_integer() {
                    write!(f, "{}", r.numer())
                } else {
                    write!(f, "{}/{}", r.numer(), r.denom())
                }
            }
            Value::String(s) => write!(f, "'{}'", s),
            Value::Bool(b) => write!(f, "{}", if *b { "true" } else { "false" }),
            Value::Nil => write!(f, "nil"),
            Value::Vector(elements) => {
                write!(f, "[")?;
                let mut iter = elements.iter();
                if let Some(first) = iter.next() {
                    write!(f, "{}", first)?;
                    for element in iter {
                        write!(f, " {}", element)?;
                    }
                }
                write!(f, "]")
            }
            Value::Word(scope, name) => write!(f, "{}{}", scope.prefix(), name),
        }
    }
}
