//! Exact rational arithmetic kernels.
//!
//! Addition, subtraction and multiplication go straight through the
//! `BigRational` operators; the fallible operations live here so every
//! failure is a typed [`EvalError`].

use std::cmp::Ordering;

use num_rational::BigRational;
use num_traits::{Signed, ToPrimitive, Zero};

use crate::error::EvalError;

pub fn div(a: BigRational, b: BigRational) -> Result<BigRational, EvalError> {
    if b.is_zero() {
        return Err(EvalError::Domain("division by zero".to_string()));
    }
    Ok(a / b)
}

/// `base ^ exp` for an integer exponent, inverting first when negative.
///
/// The exponent magnitude is capped by `max_exponent` to reject
/// catastrophic work before it starts.
pub fn pow(base: &BigRational, exp: &BigRational, max_exponent: i64) -> Result<BigRational, EvalError> {
    if !exp.is_integer() {
        return Err(EvalError::Domain("pow requires an integer exponent".to_string()));
    }
    let over_limit = || EvalError::Limit(format!("exponent magnitude exceeds {}", max_exponent));
    let e = exp.to_integer().to_i64().ok_or_else(over_limit)?;
    if e.abs() > max_exponent {
        return Err(over_limit());
    }
    let e = i32::try_from(e).map_err(|_| over_limit())?;
    if base.is_zero() && e < 0 {
        return Err(EvalError::Domain(
            "zero cannot be raised to a negative power".to_string(),
        ));
    }
    Ok(base.pow(e))
}

/// Remainder, defined only when both operands are integers.
pub fn modulus(a: &BigRational, b: &BigRational) -> Result<BigRational, EvalError> {
    if !a.is_integer() || !b.is_integer() {
        return Err(EvalError::Domain("mod requires two integers".to_string()));
    }
    if b.is_zero() {
        return Err(EvalError::Domain("division by zero".to_string()));
    }
    Ok(BigRational::from_integer(a.to_integer() % b.to_integer()))
}

/// Exact ordering: `BigRational` compares `a.num * b.den` against
/// `b.num * a.den` with both denominators positive.
pub fn compare(a: &BigRational, b: &BigRational) -> Ordering {
    a.cmp(b)
}

/// Sign of a rational: -1, 0 or 1.
pub fn signum(a: &BigRational) -> i8 {
    if a.is_zero() {
        0
    } else if a.is_negative() {
        -1
    } else {
        1
    }
}
