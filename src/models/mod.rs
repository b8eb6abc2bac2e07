pub mod search_space;
pub mod value;

pub use search_space::{FunctionVariable, SearchSpace};
pub use value::Value;
