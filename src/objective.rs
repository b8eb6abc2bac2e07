use std::path::PathBuf;

use log::{debug, warn};

use crate::error::Result;
use crate::expr::{evaluate, parse};
use crate::loader::{load_search_space, validate_results_file};
use crate::models::{SearchSpace, Value};
use crate::results::{extract_values, RowSelection};

/// Printed in place of a result whenever anything goes wrong.
pub const SENTINEL: &str = "-1";

/// Inputs for one objective evaluation.
#[derive(Debug, Clone)]
pub struct ObjectiveRequest {
    pub search_space: PathBuf,
    pub results: PathBuf,
    /// Comma-separated variable names; empty means use the search space's list.
    pub variables: String,
    pub rows: RowSelection,
}

impl ObjectiveRequest {
    pub fn new(
        search_space: impl Into<PathBuf>,
        results: impl Into<PathBuf>,
        variables: impl Into<String>,
    ) -> Self {
        Self {
            search_space: search_space.into(),
            results: results.into(),
            variables: variables.into(),
            rows: RowSelection::default(),
        }
    }

    pub fn with_rows(mut self, rows: RowSelection) -> Self {
        self.rows = rows;
        self
    }
}

/// Work out which variable names to bind.
///
/// A non-empty explicit list wins outright; otherwise the search space's
/// `function_variables` names are used in order.
pub fn resolve_variables(explicit: &str, space: &SearchSpace) -> Vec<String> {
    if explicit.trim().is_empty() {
        return space.variable_names();
    }

    explicit
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

/// Validate, resolve, extract, bind and evaluate.
pub fn calculate_objective(request: &ObjectiveRequest) -> Result<Value> {
    validate_results_file(&request.results)?;

    let space = load_search_space(&request.search_space)?;
    let variables = resolve_variables(&request.variables, &space);
    if variables.is_empty() {
        debug!("no objective variables resolved; formula is evaluated unbound");
    } else {
        debug!("objective variables: {}", variables.join(", "));
    }

    let formula = space.objective_function()?;
    debug!("objective function: {}", formula);

    let extracted = extract_values(&request.results, &variables)?;
    let env = extracted.bind(request.rows);
    for (name, value) in env.iter() {
        debug!("bind {} = {}", name, value);
    }

    let expr = parse(formula)?;
    for name in expr.variables() {
        if env.get(name).is_none() {
            debug!("formula reads unbound variable '{}'", name);
        }
    }
    evaluate(&expr, &env)
}

/// The single line to print: the result, or [`SENTINEL`] on any failure.
pub fn objective_output(request: &ObjectiveRequest) -> String {
    match calculate_objective(request) {
        Ok(value) => value.to_string(),
        Err(e) => {
            warn!("objective evaluation failed: {}", e);
            SENTINEL.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FunctionVariable;

    fn space_with(names: &[&str]) -> SearchSpace {
        SearchSpace {
            objective_function: Some("x + y".to_string()),
            function_variables: Some(
                names
                    .iter()
                    .map(|n| FunctionVariable {
                        name: Some(n.to_string()),
                    })
                    .collect(),
            ),
        }
    }

    #[test]
    fn test_explicit_list_replaces_search_space_list() {
        let space = space_with(&["a", "b"]);
        assert_eq!(resolve_variables("x,y", &space), vec!["x", "y"]);
        assert_eq!(resolve_variables(" x , ,y ", &space), vec!["x", "y"]);
    }

    #[test]
    fn test_empty_list_falls_back_to_search_space() {
        let space = space_with(&["a", "b"]);
        assert_eq!(resolve_variables("", &space), vec!["a", "b"]);
        assert_eq!(resolve_variables("  ", &space), vec!["a", "b"]);
    }

    #[test]
    fn test_nothing_declared_resolves_empty() {
        let space = SearchSpace::default();
        assert!(resolve_variables("", &space).is_empty());
    }

    #[test]
    fn test_missing_results_is_sentinel() {
        let request = ObjectiveRequest::new("/nonexistent/space.json", "/nonexistent/out.csv", "");
        assert_eq!(objective_output(&request), SENTINEL);
    }
}
