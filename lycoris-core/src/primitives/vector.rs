//! Vector words. Vectors are immutable values: accessors return elements
//! and constructors build new vectors; nothing is mutated in place.

use num_bigint::BigInt;
use num_traits::{Signed, ToPrimitive};

use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::value::Value;

// Negative indices count from the end; `allow_end` admits `len` itself
// (for slice bounds).
fn resolve_index(index: &BigInt, len: usize, allow_end: bool) -> Result<usize, EvalError> {
    let out_of_range = || EvalError::Index {
        index: index.to_i64().unwrap_or_else(|| {
            if index.is_negative() {
                i64::MIN
            } else {
                i64::MAX
            }
        }),
        len,
    };
    let resolved = if index.is_negative() {
        index + BigInt::from(len)
    } else {
        index.clone()
    };
    let resolved = resolved.to_usize().ok_or_else(out_of_range)?;
    let limit = if allow_end { len } else { len.saturating_sub(1) };
    if len == 0 && !allow_end {
        return Err(out_of_range());
    }
    if resolved > limit {
        return Err(out_of_range());
    }
    Ok(resolved)
}

// ( x1 .. xn n -- [x1 .. xn] )
pub fn vec_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let count = interp.pop_integer("vec")?;
    let count = count
        .to_usize()
        .ok_or_else(|| EvalError::Type("vec expects a non-negative count".to_string()))?;
    if interp.stack.len() < count {
        return Err(EvalError::Arity("vec: stack underflow".to_string()));
    }
    let start = interp.stack.len() - count;
    let elements = interp.stack.split_off(start);
    interp.push(Value::Vector(elements));
    Ok(())
}

// ( [x1 .. xn] -- x1 .. xn )
pub fn unpack_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let elements = interp.pop_vector("unpack")?;
    for element in elements {
        interp.push(element);
    }
    Ok(())
}

// ( vector index -- element ), registered as both `nth` and `get`
pub fn nth_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let index = interp.pop_integer("nth")?;
    let vector = interp.pop_vector("nth")?;
    let at = resolve_index(&index, vector.len(), false)?;
    interp.push(vector[at].clone());
    Ok(())
}

// ( vector index value -- vector' )
pub fn set_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let value = interp.pop("set")?;
    let index = interp.pop_integer("set")?;
    let mut vector = interp.pop_vector("set")?;
    let at = resolve_index(&index, vector.len(), false)?;
    vector[at] = value;
    interp.push(Value::Vector(vector));
    Ok(())
}

// ( vector start end -- sub-vector ), half-open range
pub fn slice_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let end = interp.pop_integer("slice")?;
    let start = interp.pop_integer("slice")?;
    let vector = interp.pop_vector("slice")?;
    let len = vector.len();
    let start = resolve_index(&start, len, true)?;
    let end = resolve_index(&end, len, true)?;
    if start > end {
        return Err(EvalError::Index {
            index: start as i64,
            len,
        });
    }
    interp.push(Value::Vector(vector[start..end].to_vec()));
    Ok(())
}

// ( vector -- length )
pub fn length_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let vector = interp.pop_vector("length")?;
    interp.push(Value::integer(vector.len()));
    Ok(())
}

// ( a b -- a++b )
pub fn concat_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let b = interp.pop_vector("concat")?;
    let mut a = interp.pop_vector("concat")?;
    a.extend(b);
    interp.push(Value::Vector(a));
    Ok(())
}

// ( vector value -- vector' )
pub fn append_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let value = interp.pop("append")?;
    let mut vector = interp.pop_vector("append")?;
    vector.push(value);
    interp.push(Value::Vector(vector));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interpreter::Interpreter;

    fn run(source: &str) -> Vec<String> {
        let mut interp = Interpreter::new();
        interp.execute(source).unwrap();
        interp.stack_snapshot()
    }

    fn fail(source: &str) -> EvalError {
        Interpreter::new().execute(source).unwrap_err()
    }

    #[test]
    fn test_vec_and_unpack() {
        assert_eq!(run("1 2 3 3 vec"), vec!["[1 2 3]"]);
        assert_eq!(run("0 vec"), vec!["[]"]);
        assert_eq!(run("[1 2 3] unpack"), vec!["1", "2", "3"]);
        // n vec unpack recovers the originals in order.
        assert_eq!(run("1 2 3 3 vec unpack"), vec!["1", "2", "3"]);
        assert!(matches!(fail("1 2 vec"), EvalError::Arity(_)));
    }

    #[test]
    fn test_nth_and_get() {
        assert_eq!(run("[10 20 30] 1 nth"), vec!["20"]);
        assert_eq!(run("[10 20 30] -1 get"), vec!["30"]);
        assert!(matches!(
            fail("[10 20 30] 3 nth"),
            EvalError::Index { index: 3, len: 3 }
        ));
        assert!(matches!(
            fail("[10] -2 nth"),
            EvalError::Index { .. }
        ));
        assert!(matches!(fail("[] 0 nth"), EvalError::Index { .. }));
    }

    #[test]
    fn test_set_builds_new_vector() {
        assert_eq!(run("[1 2 3] 1 99 set"), vec!["[1 99 3]"]);
        assert_eq!(run("[1 2 3] -1 99 set"), vec!["[1 2 99]"]);
        assert!(matches!(fail("[1] 5 0 set"), EvalError::Index { .. }));
    }

    #[test]
    fn test_slice() {
        assert_eq!(run("[1 2 3 4] 1 3 slice"), vec!["[2 3]"]);
        assert_eq!(run("[1 2 3 4] 0 -1 slice"), vec!["[1 2 3]"]);
        assert_eq!(run("[1 2] 2 2 slice"), vec!["[]"]);
        assert!(matches!(fail("[1 2] 2 1 slice"), EvalError::Index { .. }));
        assert!(matches!(fail("[1 2] 0 3 slice"), EvalError::Index { .. }));
    }

    #[test]
    fn test_length_concat_append() {
        assert_eq!(run("[1 2 3] length"), vec!["3"]);
        assert_eq!(run("[1] [2 3] concat"), vec!["[1 2 3]"]);
        assert_eq!(run("[] [1] concat"), vec!["[1]"]);
        assert_eq!(run("[1 2] nil append"), vec!["[1 2 nil]"]);
        assert!(matches!(fail("[1] 2 concat"), EvalError::Type(_)));
    }
}
