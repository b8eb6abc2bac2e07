pub mod cli;
pub mod error;
pub mod expr;
pub mod loader;
pub mod models;
pub mod objective;
pub mod results;

pub use error::{ObjError, Result};
pub use models::{SearchSpace, Value};
pub use objective::{calculate_objective, objective_output, ObjectiveRequest, SENTINEL};
pub use results::RowSelection;
