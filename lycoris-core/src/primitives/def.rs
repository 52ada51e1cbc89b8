//! Definition words: installing and removing user entries.

use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::value::Value;

/// Display color assigned to words installed with `def`.
pub const DEFAULT_WORD_COLOR: &str = "green";

// ( [body] 'name' -- ) - install or replace a user word
pub fn def_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let name = interp.pop_string("def")?;
    let body = interp.pop_vector("def")?;
    // The canonical text of the body is what listings and save_state show.
    let source = Value::Vector(body.clone()).to_string();
    interp
        .dictionary
        .define(&name, body, source, DEFAULT_WORD_COLOR.to_string())
}

// ( 'name' -- )
pub fn undef_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let name = interp.pop_string("undef")?;
    interp.dictionary.undefine(&name)
}
