use std::cmp::Ordering;
use std::collections::BTreeMap;

use crate::error::{ObjError, Result};
use crate::expr::ast::{BinaryOp, CompareOp, Expr, LogicalOp, UnaryOp};
use crate::expr::functions;
use crate::models::Value;

/// Variable bindings visible to a formula.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Environment {
    vars: BTreeMap<String, Value>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name`, replacing any earlier value.
    pub fn bind(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    pub fn len(&self) -> usize {
        self.vars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.vars.iter()
    }
}

impl<S: Into<String>> FromIterator<(S, Value)> for Environment {
    fn from_iter<I: IntoIterator<Item = (S, Value)>>(iter: I) -> Self {
        let mut env = Environment::new();
        for (name, value) in iter {
            env.bind(name, value);
        }
        env
    }
}

/// Evaluate an expression tree and check the result is a usable objective value.
///
/// Text results and non-finite floats are rejected.
pub fn evaluate(expr: &Expr, env: &Environment) -> Result<Value> {
    let value = eval_node(expr, env)?;
    match value {
        Value::Float(f) if !f.is_finite() => Err(ObjError::NonFinite),
        Value::Text(_) | Value::Unsupported(_) => Err(ObjError::TypeMismatch(format!(
            "objective evaluated to {}",
            value.type_name()
        ))),
        _ => Ok(value),
    }
}

fn eval_node(expr: &Expr, env: &Environment) -> Result<Value> {
    match expr {
        Expr::Literal(v) => Ok(v.clone()),
        Expr::Variable(name) => match env.get(name) {
            Some(Value::Unsupported(raw)) => Err(ObjError::UnsupportedValue {
                name: name.clone(),
                value: raw.clone(),
            }),
            Some(value) => Ok(value.clone()),
            None => Err(ObjError::UnboundVariable(name.clone())),
        },
        Expr::Unary { op, operand } => unary(*op, eval_node(operand, env)?),
        Expr::Binary { op, left, right } => {
            let l = eval_node(left, env)?;
            let r = eval_node(right, env)?;
            binary(*op, &l, &r)
        }
        Expr::Logical { op, left, right } => {
            // The operand that settles the result is returned as-is.
            let l = eval_node(left, env)?;
            let settled = match op {
                LogicalOp::And => !truthy(&l),
                LogicalOp::Or => truthy(&l),
            };
            if settled {
                Ok(l)
            } else {
                eval_node(right, env)
            }
        }
        Expr::Compare { first, rest } => {
            let mut left = eval_node(first, env)?;
            for (op, right_expr) in rest {
                let right = eval_node(right_expr, env)?;
                if !compare(*op, &left, &right)? {
                    return Ok(Value::Bool(false));
                }
                left = right;
            }
            Ok(Value::Bool(true))
        }
        Expr::Call { name, args } => {
            let values = args
                .iter()
                .map(|a| eval_node(a, env))
                .collect::<Result<Vec<_>>>()?;
            functions::call(name, &values)
        }
    }
}

/// Numeric operand after bool promotion.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Num {
    Int(i64),
    Float(f64),
}

impl Num {
    pub(crate) fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Int(i) => Ok(Num::Int(*i)),
            Value::Float(f) => Ok(Num::Float(*f)),
            Value::Bool(b) => Ok(Num::Int(*b as i64)),
            Value::Text(s) | Value::Unsupported(s) => Err(ObjError::TypeMismatch(format!(
                "'{}' is not a number",
                s
            ))),
        }
    }

    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Num::Int(i) => i as f64,
            Num::Float(f) => f,
        }
    }

    pub(crate) fn into_value(self) -> Value {
        match self {
            Num::Int(i) => Value::Int(i),
            Num::Float(f) => Value::Float(f),
        }
    }
}

pub(crate) fn truthy(value: &Value) -> bool {
    match value {
        Value::Int(i) => *i != 0,
        Value::Float(f) => *f != 0.0,
        Value::Bool(b) => *b,
        Value::Text(s) => !s.is_empty(),
        Value::Unsupported(_) => false,
    }
}

fn unary(op: UnaryOp, value: Value) -> Result<Value> {
    match op {
        UnaryOp::Not => Ok(Value::Bool(!truthy(&value))),
        UnaryOp::Plus => Ok(Num::from_value(&value)?.into_value()),
        UnaryOp::Neg => match Num::from_value(&value)? {
            Num::Int(i) => i
                .checked_neg()
                .map(Value::Int)
                .ok_or(ObjError::Overflow("negation")),
            Num::Float(f) => Ok(Value::Float(-f)),
        },
    }
}

pub(crate) fn binary(op: BinaryOp, left: &Value, right: &Value) -> Result<Value> {
    let l = Num::from_value(left)?;
    let r = Num::from_value(right)?;

    match op {
        BinaryOp::Add => int_or_float(l, r, i64::checked_add, |a, b| a + b, "addition"),
        BinaryOp::Sub => int_or_float(l, r, i64::checked_sub, |a, b| a - b, "subtraction"),
        BinaryOp::Mul => int_or_float(l, r, i64::checked_mul, |a, b| a * b, "multiplication"),
        BinaryOp::Div => {
            let divisor = r.as_f64();
            if divisor == 0.0 {
                return Err(ObjError::DivisionByZero);
            }
            Ok(Value::Float(l.as_f64() / divisor))
        }
        BinaryOp::FloorDiv => floor_div(l, r),
        BinaryOp::Mod => modulo(l, r),
        BinaryOp::Pow => power(l, r),
    }
}

fn int_or_float(
    l: Num,
    r: Num,
    int_op: fn(i64, i64) -> Option<i64>,
    float_op: fn(f64, f64) -> f64,
    what: &'static str,
) -> Result<Value> {
    match (l, r) {
        (Num::Int(a), Num::Int(b)) => int_op(a, b)
            .map(Value::Int)
            .ok_or(ObjError::Overflow(what)),
        _ => Ok(Value::Float(float_op(l.as_f64(), r.as_f64()))),
    }
}

/// Floor division rounding toward negative infinity.
fn floor_div(l: Num, r: Num) -> Result<Value> {
    match (l, r) {
        (Num::Int(_), Num::Int(0)) => Err(ObjError::DivisionByZero),
        (Num::Int(a), Num::Int(b)) => {
            let q = a.checked_div(b).ok_or(ObjError::Overflow("floor division"))?;
            if a % b != 0 && ((a < 0) != (b < 0)) {
                Ok(Value::Int(q - 1))
            } else {
                Ok(Value::Int(q))
            }
        }
        _ => {
            let b = r.as_f64();
            if b == 0.0 {
                return Err(ObjError::DivisionByZero);
            }
            Ok(Value::Float((l.as_f64() / b).floor()))
        }
    }
}

/// Remainder with the sign of the divisor.
fn modulo(l: Num, r: Num) -> Result<Value> {
    match (l, r) {
        (Num::Int(_), Num::Int(0)) => Err(ObjError::DivisionByZero),
        (Num::Int(a), Num::Int(b)) => {
            let rem = a.checked_rem(b).ok_or(ObjError::Overflow("modulo"))?;
            if rem != 0 && ((rem < 0) != (b < 0)) {
                Ok(Value::Int(rem + b))
            } else {
                Ok(Value::Int(rem))
            }
        }
        _ => {
            let (a, b) = (l.as_f64(), r.as_f64());
            if b == 0.0 {
                return Err(ObjError::DivisionByZero);
            }
            let rem = a % b;
            if rem != 0.0 && ((rem < 0.0) != (b < 0.0)) {
                Ok(Value::Float(rem + b))
            } else {
                Ok(Value::Float(rem))
            }
        }
    }
}

pub(crate) fn power(base: Num, exp: Num) -> Result<Value> {
    if let (Num::Int(b), Num::Int(e)) = (base, exp) {
        if e >= 0 {
            let e = u32::try_from(e).map_err(|_| ObjError::Overflow("power"))?;
            return b
                .checked_pow(e)
                .map(Value::Int)
                .ok_or(ObjError::Overflow("power"));
        }
    }

    let (b, e) = (base.as_f64(), exp.as_f64());
    if b == 0.0 && e < 0.0 {
        return Err(ObjError::DivisionByZero);
    }
    if b < 0.0 && e.fract() != 0.0 {
        return Err(ObjError::MathDomain("power"));
    }
    Ok(Value::Float(b.powf(e)))
}

/// Numeric ordering; both sides integral compares exactly.
pub(crate) fn order(left: Num, right: Num) -> Ordering {
    match (left, right) {
        (Num::Int(a), Num::Int(b)) => a.cmp(&b),
        _ => left
            .as_f64()
            .partial_cmp(&right.as_f64())
            .unwrap_or(Ordering::Equal),
    }
}

fn compare(op: CompareOp, left: &Value, right: &Value) -> Result<bool> {
    if let (Value::Text(a), Value::Text(b)) = (left, right) {
        return match op {
            CompareOp::Eq => Ok(a == b),
            CompareOp::NotEq => Ok(a != b),
            _ => Ok(ordered(op, a.cmp(b))),
        };
    }
    if left.is_numeric() != right.is_numeric() {
        return match op {
            CompareOp::Eq => Ok(false),
            CompareOp::NotEq => Ok(true),
            _ => Err(ObjError::TypeMismatch(format!(
                "cannot order {} and {}",
                left.type_name(),
                right.type_name()
            ))),
        };
    }

    let (l, r) = (Num::from_value(left)?, Num::from_value(right)?);
    if l.as_f64().is_nan() || r.as_f64().is_nan() {
        // NaN is unequal to everything
        return Ok(op == CompareOp::NotEq);
    }
    Ok(ordered(op, order(l, r)))
}

fn ordered(op: CompareOp, ord: Ordering) -> bool {
    match op {
        CompareOp::Eq => ord == Ordering::Equal,
        CompareOp::NotEq => ord != Ordering::Equal,
        CompareOp::Lt => ord == Ordering::Less,
        CompareOp::Le => ord != Ordering::Greater,
        CompareOp::Gt => ord == Ordering::Greater,
        CompareOp::Ge => ord != Ordering::Less,
    }
}
