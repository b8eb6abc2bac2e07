use thiserror::Error;

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("Results file not found: {0}")]
    MissingResults(String),

    #[error("Results file is empty: {0}")]
    EmptyResults(String),

    #[error("Search space has no objective_function")]
    MissingObjective,

    #[error("Unsupported value for '{name}': {value}")]
    UnsupportedValue { name: String, value: String },

    #[error("Malformed results: {0}")]
    MalformedResults(String),

    #[error("Parse error at {position}: {message}")]
    Parse { position: usize, message: String },

    #[error("Unbound variable: {0}")]
    UnboundVariable(String),

    #[error("Unknown function: {0}")]
    UnknownFunction(String),

    #[error("Function {name} expects {expected} argument(s), got {got}")]
    Arity {
        name: String,
        expected: &'static str,
        got: usize,
    },

    #[error("Type mismatch: {0}")]
    TypeMismatch(String),

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Integer overflow in {0}")]
    Overflow(&'static str),

    #[error("Math domain error in {0}")]
    MathDomain(&'static str),

    #[error("Result is not finite")]
    NonFinite,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl ObjError {
    pub(crate) fn parse(position: usize, message: impl Into<String>) -> Self {
        ObjError::Parse {
            position,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ObjError>;
