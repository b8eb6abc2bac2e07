use serde::Deserialize;

use crate::error::{ObjError, Result};

/// One entry of the search space's `function_variables` list.
#[derive(Debug, Clone, Deserialize)]
pub struct FunctionVariable {
    #[serde(default)]
    pub name: Option<String>,
}

/// The parts of an HPO search-space document this tool reads.
///
/// Every other key (tunables, direction, algorithm settings) is ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchSpace {
    #[serde(default)]
    pub objective_function: Option<String>,

    #[serde(default)]
    pub function_variables: Option<Vec<FunctionVariable>>,
}

impl SearchSpace {
    /// The formula template.
    pub fn objective_function(&self) -> Result<&str> {
        self.objective_function
            .as_deref()
            .ok_or(ObjError::MissingObjective)
    }

    /// Declared variable names in order; entries without a `name` are skipped.
    pub fn variable_names(&self) -> Vec<String> {
        self.function_variables
            .iter()
            .flatten()
            .filter_map(|v| v.name.clone())
            .collect()
    }
}
