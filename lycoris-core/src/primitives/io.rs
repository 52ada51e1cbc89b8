//! Output words. The interpreter never touches host I/O; everything goes
//! through the captured output buffer.

use crate::error::EvalError;
use crate::interpreter::Interpreter;

// ( a -- ) - append the canonical form plus a newline to the output
pub fn print_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let value = interp.pop("print")?;
    interp.write_line(&value.to_string());
    Ok(())
}

// ( -- ) - reset the output buffer
pub fn clear_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    interp.output.clear();
    Ok(())
}

// ( -- ) - list the dictionary: built-ins first, then user words
pub fn words_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let mut lines: Vec<String> = interp
        .dictionary
        .builtin_names()
        .iter()
        .map(|name| format!("{} [built-in]", name))
        .collect();
    for (name, word) in interp.dictionary.user_entries() {
        lines.push(format!("{} {}", name, word.source));
    }
    for line in lines {
        interp.write_line(&line);
    }
    Ok(())
}
