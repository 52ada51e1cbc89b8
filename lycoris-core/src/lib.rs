//! # Lycoris Core
//!
//! Runtime for the Lycoris programming language: a small concatenative
//! (stack-based, postfix) language with a homoiconic vector data model and
//! exact rational arithmetic.
//!
//! The pipeline is: source text → [`tokenizer`] (consulting the
//! [`dictionary`] for longest-match word boundaries) → token sequence →
//! evaluator (stack + dictionary + output buffer). Vectors are both
//! data and suspended code; only `run` and the `@` / `*` / `#` scope
//! modifiers realize execution.
//!
//! The interpreter is strictly synchronous. Hosts that need timeouts run
//! one instance per disposable context and replace it, and may snapshot the
//! user dictionary between calls with [`Interpreter::save_state`] /
//! [`Interpreter::load_state`].
//!
//! ## Example
//!
//! ```
//! use lycoris_core::Interpreter;
//!
//! let mut interp = Interpreter::new();
//! interp.execute("[dup mul] 'square' def").unwrap();
//! interp.execute("7 square").unwrap();
//! assert_eq!(interp.stack_snapshot(), vec!["49"]);
//! ```

pub mod builtins;
pub mod dictionary;
pub mod error;
pub mod interpreter;
pub mod primitives;
pub mod rational;
pub mod state;
pub mod tokenizer;
pub mod value;

mod evaluator;

pub use error::EvalError;
pub use interpreter::{Interpreter, LimitConfig};
pub use state::LoadReport;
pub use value::{Scope, Value};
