pub mod ast;
pub mod eval;
pub mod functions;
pub mod parser;
pub mod tokenizer;

pub use ast::{BinaryOp, CompareOp, Expr, LogicalOp, UnaryOp};
pub use eval::{evaluate, Environment};
pub use parser::parse;
