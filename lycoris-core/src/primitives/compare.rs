//! Comparison words. `eq` is structural equality over any two values; the
//! ordered comparisons require rationals and compare exactly.

use std::cmp::Ordering;

use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::rational;
use crate::value::Value;

// ( a b -- bool )
pub fn eq_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let b = interp.pop("eq")?;
    let a = interp.pop("eq")?;
    interp.push(Value::Bool(a == b));
    Ok(())
}

fn ordered(
    interp: &mut Interpreter,
    name: &str,
    accept: fn(Ordering) -> bool,
) -> Result<(), EvalError> {
    let b = interp.pop_rational(name)?;
    let a = interp.pop_rational(name)?;
    interp.push(Value::Bool(accept(rational::compare(&a, &b))));
    Ok(())
}

pub fn lt_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    ordered(interp, "lt", Ordering::is_lt)
}

pub fn gt_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    ordered(interp, "gt", Ordering::is_gt)
}

pub fn le_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    ordered(interp, "le", Ordering::is_le)
}

pub fn ge_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    ordered(interp, "ge", Ordering::is_ge)
}
