//! Execution control: realizing vectors as code.

use crate::error::EvalError;
use crate::evaluator;
use crate::interpreter::Interpreter;
use crate::value::Value;

// ( [body] -- ... ) - execute a vector as code
pub fn run_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    match interp.pop("run")? {
        Value::Vector(body) => evaluator::run_quotation(interp, &body),
        other => Err(EvalError::Type(format!(
            "run expects a vector, got {}",
            other.type_name()
        ))),
    }
}

// ( a -- [a] )
pub fn quote_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let value = interp.pop("quote")?;
    interp.push(Value::Vector(vec![value]));
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::error::EvalError;
    use crate::interpreter::Interpreter;

    #[test]
    fn test_run_executes_vector() {
        let mut interp = Interpreter::new();
        interp.execute("7 [dup mul] run").unwrap();
        assert_eq!(interp.stack_snapshot(), vec!["49"]);
    }

    #[test]
    fn test_run_rejects_non_vectors() {
        let mut interp = Interpreter::new();
        let err = interp.execute("7 run").unwrap_err();
        assert!(matches!(err, EvalError::Type(_)));
    }

    #[test]
    fn test_quote_then_unpack_is_identity() {
        let mut interp = Interpreter::new();
        interp.execute("5 quote").unwrap();
        assert_eq!(interp.stack_snapshot(), vec!["[5]"]);
        interp.execute("unpack").unwrap();
        assert_eq!(interp.stack_snapshot(), vec!["5"]);
    }

    #[test]
    fn test_nested_run() {
        let mut interp = Interpreter::new();
        interp.execute("[[1 2 add] run 3 mul] run").unwrap();
        assert_eq!(interp.stack_snapshot(), vec!["9"]);
    }
}
