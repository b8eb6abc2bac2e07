use std::cmp::Ordering;

use crate::error::{ObjError, Result};
use crate::expr::eval::{order, power, Num};
use crate::models::Value;

/// Functions a formula may call. Anything else is rejected at parse time.
pub const FUNCTIONS: &[&str] = &[
    "abs", "min", "max", "round", "pow", "sqrt", "exp", "log", "log10", "floor", "ceil", "int",
    "float",
];

pub fn is_known(name: &str) -> bool {
    FUNCTIONS.contains(&name)
}

pub fn call(name: &str, args: &[Value]) -> Result<Value> {
    match name {
        "abs" => {
            let [x] = exactly::<1>(name, args)?;
            match Num::from_value(x)? {
                Num::Int(i) => i
                    .checked_abs()
                    .map(Value::Int)
                    .ok_or(ObjError::Overflow("abs")),
                Num::Float(f) => Ok(Value::Float(f.abs())),
            }
        }
        "min" => extremum(name, args, Ordering::Less),
        "max" => extremum(name, args, Ordering::Greater),
        "round" => round(args),
        "pow" => {
            let [base, exp] = exactly::<2>(name, args)?;
            power(Num::from_value(base)?, Num::from_value(exp)?)
        }
        "sqrt" => {
            let x = float_arg(name, args)?;
            if x < 0.0 {
                return Err(ObjError::MathDomain("sqrt"));
            }
            Ok(Value::Float(x.sqrt()))
        }
        "exp" => Ok(Value::Float(float_arg(name, args)?.exp())),
        "log" => log(args),
        "log10" => {
            let x = float_arg(name, args)?;
            if x <= 0.0 {
                return Err(ObjError::MathDomain("log10"));
            }
            Ok(Value::Float(x.log10()))
        }
        "floor" => float_to_int(float_arg(name, args)?.floor()),
        "ceil" => float_to_int(float_arg(name, args)?.ceil()),
        "int" => {
            let [x] = exactly::<1>(name, args)?;
            match Num::from_value(x)? {
                Num::Int(i) => Ok(Value::Int(i)),
                Num::Float(f) => float_to_int(f.trunc()),
            }
        }
        "float" => Ok(Value::Float(float_arg(name, args)?)),
        _ => Err(ObjError::UnknownFunction(name.to_string())),
    }
}

fn exactly<'a, const N: usize>(name: &str, args: &'a [Value]) -> Result<&'a [Value; N]> {
    args.try_into().map_err(|_| ObjError::Arity {
        name: name.to_string(),
        expected: match N {
            1 => "1",
            _ => "2",
        },
        got: args.len(),
    })
}

fn float_arg(name: &str, args: &[Value]) -> Result<f64> {
    let [x] = exactly::<1>(name, args)?;
    Ok(Num::from_value(x)?.as_f64())
}

fn float_to_int(f: f64) -> Result<Value> {
    if !f.is_finite() {
        return Err(ObjError::NonFinite);
    }
    // i64::MAX as f64 rounds up to 2^63, which is already out of range
    if f >= i64::MAX as f64 || f < i64::MIN as f64 {
        return Err(ObjError::Overflow("integer conversion"));
    }
    Ok(Value::Int(f as i64))
}

/// `min`/`max`: returns the winning argument unchanged; ties keep the first.
fn extremum(name: &str, args: &[Value], want: Ordering) -> Result<Value> {
    let Some((first, rest)) = args.split_first() else {
        return Err(ObjError::Arity {
            name: name.to_string(),
            expected: "at least 1",
            got: 0,
        });
    };

    let mut best = first;
    let mut best_num = Num::from_value(first)?;
    for candidate in rest {
        let num = Num::from_value(candidate)?;
        if order(num, best_num) == want {
            best = candidate;
            best_num = num;
        }
    }
    Ok(best.clone())
}

/// `round(x)` gives an int; `round(x, n)` keeps the argument's type.
/// Halves round to even.
fn round(args: &[Value]) -> Result<Value> {
    match args {
        [x] => match Num::from_value(x)? {
            Num::Int(i) => Ok(Value::Int(i)),
            Num::Float(f) => float_to_int(f.round_ties_even()),
        },
        [x, digits] => {
            let Num::Int(n) = Num::from_value(digits)? else {
                return Err(ObjError::TypeMismatch(
                    "round() digits must be an integer".to_string(),
                ));
            };
            let n = i32::try_from(n).map_err(|_| ObjError::Overflow("round"))?;
            match Num::from_value(x)? {
                Num::Int(i) if n >= 0 => Ok(Value::Int(i)),
                Num::Int(i) => {
                    let scale = 10f64.powi(-n);
                    float_to_int((i as f64 / scale).round_ties_even() * scale)
                }
                Num::Float(f) => {
                    let scale = 10f64.powi(n);
                    Ok(Value::Float((f * scale).round_ties_even() / scale))
                }
            }
        }
        _ => Err(ObjError::Arity {
            name: "round".to_string(),
            expected: "1 or 2",
            got: args.len(),
        }),
    }
}

fn log(args: &[Value]) -> Result<Value> {
    let (x, base) = match args {
        [x] => (Num::from_value(x)?.as_f64(), None),
        [x, b] => (
            Num::from_value(x)?.as_f64(),
            Some(Num::from_value(b)?.as_f64()),
        ),
        _ => {
            return Err(ObjError::Arity {
                name: "log".to_string(),
                expected: "1 or 2",
                got: args.len(),
            });
        }
    };

    if x <= 0.0 {
        return Err(ObjError::MathDomain("log"));
    }
    match base {
        None => Ok(Value::Float(x.ln())),
        Some(b) if b <= 0.0 => Err(ObjError::MathDomain("log")),
        Some(b) if b == 1.0 => Err(ObjError::DivisionByZero),
        Some(b) => Ok(Value::Float(x.ln() / b.ln())),
    }
}
