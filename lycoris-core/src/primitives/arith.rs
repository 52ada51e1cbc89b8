//! Binary arithmetic words: consume two rationals, push one.

use crate::error::EvalError;
use crate::interpreter::Interpreter;
use crate::rational;
use crate::value::Value;

// ( a b -- a+b )
pub fn add_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let b = interp.pop_rational("add")?;
    let a = interp.pop_rational("add")?;
    interp.push(Value::Rational(a + b));
    Ok(())
}

// ( a b -- a-b )
pub fn sub_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let b = interp.pop_rational("sub")?;
    let a = interp.pop_rational("sub")?;
    interp.push(Value::Rational(a - b));
    Ok(())
}

// ( a b -- a*b )
pub fn mul_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let b = interp.pop_rational("mul")?;
    let a = interp.pop_rational("mul")?;
    interp.push(Value::Rational(a * b));
    Ok(())
}

// ( a b -- a/b )
pub fn div_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let b = interp.pop_rational("div")?;
    let a = interp.pop_rational("div")?;
    interp.push(Value::Rational(rational::div(a, b)?));
    Ok(())
}

// ( base exp -- base^exp )
pub fn pow_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let exp = interp.pop_rational("pow")?;
    let base = interp.pop_rational("pow")?;
    let result = rational::pow(&base, &exp, interp.limits.max_exponent)?;
    interp.push(Value::Rational(result));
    Ok(())
}

// ( a b -- a%b ), integers only
pub fn mod_impl(interp: &mut Interpreter) -> Result<(), EvalError> {
    let b = interp.pop_rational("mod")?;
    let a = interp.pop_rational("mod")?;
    interp.push(Value::Rational(rational::modulus(&a, &b)?));
    Ok(())
}
