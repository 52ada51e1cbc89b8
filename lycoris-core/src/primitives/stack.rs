//! Stack-shuffling words.

use crate::error::EvalError;
use crate::interpreter::Interpreter;

// ( a -- a a )
pub fn dup_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let top = interp
        .stack
        .last()
        .cloned()
        .ok_or_else(|| EvalError::Arity("dup: stack underflow".to_string()))?;
    interp.push(top);
    Ok(())
}

// ( a -- )
pub fn drop_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    interp.pop("drop")?;
    Ok(())
}

// ( a b -- b a )
pub fn swap_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let b = interp.pop("swap")?;
    let a = interp.pop("swap")?;
    interp.push(b);
    interp.push(a);
    Ok(())
}

// ( a b -- a b a )
pub fn over_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    if interp.stack.len() < 2 {
        return Err(EvalError::Arity("over: stack underflow".to_string()));
    }
    let second = interp.stack[interp.stack.len() - 2].clone();
    interp.push(second);
    Ok(())
}

// ( a b c -- b c a )
pub fn rot_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let c = interp.pop("rot")?;
    let b = interp.pop("rot")?;
    let a = interp.pop("rot")?;
    interp.push(b);
    interp.push(c);
    interp.push(a);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::interpreter::Interpreter;

    fn run(source: &str) -> Vec<String> {
        let mut interp = Interpreter::new();
        interp.execute(source).unwrap();
        interp.stack_snapshot()
    }

    #[test]
    fn test_shuffles() {
        assert_eq!(run("1 dup"), vec!["1", "1"]);
        assert_eq!(run("1 2 drop"), vec!["1"]);
        assert_eq!(run("1 2 swap"), vec!["2", "1"]);
        assert_eq!(run("1 2 over"), vec!["1", "2", "1"]);
        assert_eq!(run("1 2 3 rot"), vec!["2", "3", "1"]);
    }

    #[test]
    fn test_identities() {
        assert_eq!(run("5 dup drop"), vec!["5"]);
        assert_eq!(run("1 2 swap swap"), vec!["1", "2"]);
    }
}
