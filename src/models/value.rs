use std::fmt;

/// A scalar flowing from the results file into the objective formula.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Benchmark text that is not a number or boolean.
    Text(String),
    /// A result value with no scalar form (JSON null, array, object, or a
    /// mean over text). Reading it from a formula is an error.
    Unsupported(String),
}

impl Value {
    /// Parse a benchmark cell: integer, then float, then boolean, else text.
    pub fn parse_scalar(raw: &str) -> Self {
        let text = raw.trim();
        if let Ok(i) = text.parse::<i64>() {
            return Value::Int(i);
        }
        if let Ok(f) = text.parse::<f64>() {
            // Rust accepts "inf" and "NaN"; benchmark text like that is not a number here.
            if f.is_finite() {
                return Value::Float(f);
            }
        }
        match text {
            "true" | "True" => Value::Bool(true),
            "false" | "False" => Value::Bool(false),
            _ => Value::Text(raw.to_string()),
        }
    }

    /// Convert a JSON value. Non-scalars become [`Value::Unsupported`].
    pub fn from_json(json: &serde_json::Value) -> Self {
        match json {
            serde_json::Value::Bool(b) => Value::Bool(*b),
            serde_json::Value::Number(n) => match (n.as_i64(), n.as_f64()) {
                (Some(i), _) => Value::Int(i),
                (None, Some(f)) => Value::Float(f),
                (None, None) => Value::Unsupported(n.to_string()),
            },
            serde_json::Value::String(s) => Value::parse_scalar(s),
            other => Value::Unsupported(other.to_string()),
        }
    }

    /// Numeric view used by arithmetic. Booleans count as 0/1.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Text(_) | Value::Unsupported(_) => None,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.as_f64().is_some()
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::Text(_) => "text",
            Value::Unsupported(_) => "unsupported",
        }
    }
}

/// Float text in the style HPO tooling parses: shortest round-trip digits,
/// a trailing `.0` on integral values, and `1e+20` / `1.5e-05` exponents
/// outside `[1e-4, 1e16)`.
fn format_float(x: f64) -> String {
    if !x.is_finite() {
        return if x.is_nan() {
            "nan".to_string()
        } else if x > 0.0 {
            "inf".to_string()
        } else {
            "-inf".to_string()
        };
    }

    let sci = format!("{:e}", x);
    let (mantissa, exponent) = sci.split_once('e').unwrap_or((sci.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);

    if x != 0.0 && !(-4..16).contains(&exponent) {
        let sign = if exponent < 0 { '-' } else { '+' };
        return format!("{}e{}{:02}", mantissa, sign, exponent.abs());
    }

    let plain = format!("{}", x);
    if plain.contains('.') {
        plain
    } else {
        format!("{}.0", plain)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => f.write_str(&format_float(*x)),
            Value::Bool(true) => f.write_str("True"),
            Value::Bool(false) => f.write_str("False"),
            Value::Text(s) | Value::Unsupported(s) => f.write_str(s),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_scalar_prefers_int() {
        assert_eq!(Value::parse_scalar("42"), Value::Int(42));
        assert_eq!(Value::parse_scalar(" 7 "), Value::Int(7));
        assert_eq!(Value::parse_scalar("2.5"), Value::Float(2.5));
        assert_eq!(Value::parse_scalar("1e3"), Value::Float(1000.0));
        assert_eq!(Value::parse_scalar("True"), Value::Bool(true));
        assert_eq!(Value::parse_scalar("false"), Value::Bool(false));
    }

    #[test]
    fn test_parse_scalar_rejects_non_finite() {
        assert_eq!(Value::parse_scalar("inf"), Value::Text("inf".to_string()));
        assert_eq!(Value::parse_scalar("NaN"), Value::Text("NaN".to_string()));
        assert_eq!(Value::parse_scalar("ms"), Value::Text("ms".to_string()));
    }

    #[test]
    fn test_from_json() {
        assert_eq!(Value::from_json(&serde_json::json!(3)), Value::Int(3));
        assert_eq!(Value::from_json(&serde_json::json!(0.25)), Value::Float(0.25));
        assert_eq!(Value::from_json(&serde_json::json!("12")), Value::Int(12));
        assert_eq!(
            Value::from_json(&serde_json::Value::Null),
            Value::Unsupported("null".to_string())
        );
        assert_eq!(
            Value::from_json(&serde_json::json!([1, 2])),
            Value::Unsupported("[1,2]".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Int(5).to_string(), "5");
        assert_eq!(Value::Float(5.0).to_string(), "5.0");
        assert_eq!(Value::Float(3.5).to_string(), "3.5");
        assert_eq!(Value::Float(-0.0).to_string(), "-0.0");
        assert_eq!(Value::Bool(true).to_string(), "True");
        assert_eq!(Value::Bool(false).to_string(), "False");
    }

    #[test]
    fn test_display_float_exponents() {
        assert_eq!(Value::Float(1e20).to_string(), "1e+20");
        assert_eq!(Value::Float(1e16).to_string(), "1e+16");
        assert_eq!(Value::Float(1e15).to_string(), "1000000000000000.0");
        assert_eq!(Value::Float(1.5e-5).to_string(), "1.5e-05");
        assert_eq!(Value::Float(0.0001).to_string(), "0.0001");
        assert_eq!(Value::Float(-2.5e-7).to_string(), "-2.5e-07");
        assert_eq!(Value::Float(1.2345e123).to_string(), "1.2345e+123");
    }
}
