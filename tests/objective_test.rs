use std::io::Write;

use assert_float_eq::assert_float_absolute_eq;
use objfunc::{calculate_objective, objective_output, ObjectiveRequest, RowSelection, Value};
use tempfile::NamedTempFile;

const SEARCH_SPACE: &str = r#"{
    "experiment_name": "tfb-benchmark",
    "objective_function": "x + y",
    "function_variables": [{"name": "x"}, {"name": "y"}]
}"#;

fn file_with(suffix: &str, content: &str) -> NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

fn output(space: &NamedTempFile, results: &NamedTempFile, variables: &str) -> String {
    objective_output(&ObjectiveRequest::new(space.path(), results.path(), variables))
}

#[test]
fn test_missing_results_file() {
    let space = file_with(".json", SEARCH_SPACE);
    let request = ObjectiveRequest::new(space.path(), "/nonexistent/results.csv", "");
    assert_eq!(objective_output(&request), "-1");
}

#[test]
fn test_empty_results_file() {
    let space = file_with(".json", SEARCH_SPACE);
    let results = file_with(".csv", "");
    assert_eq!(output(&space, &results, ""), "-1");
}

#[test]
fn test_csv_with_search_space_variables() {
    let space = file_with(".json", SEARCH_SPACE);
    let results = file_with(".csv", "x,y\n2,3\n");
    assert_eq!(output(&space, &results, ""), "5");
}

#[test]
fn test_csv_with_explicit_variables() {
    let space = file_with(".json", SEARCH_SPACE);
    let results = file_with(".csv", "x,y\n2,3\n");
    assert_eq!(output(&space, &results, "x,y"), "5");
}

#[test]
fn test_explicit_variables_ignore_search_space_list() {
    let space = file_with(".json", SEARCH_SPACE);
    let results = file_with(".csv", "x,y\n2,3\n");
    // y is not in the explicit list, so it stays unbound
    assert_eq!(output(&space, &results, "x"), "-1");
}

#[test]
fn test_json_records() {
    let space = file_with(".json", SEARCH_SPACE);
    let results = file_with(".json", r#"[{"values": {"x": 2, "y": 3}}]"#);
    assert_eq!(output(&space, &results, ""), "5");
}

#[test]
fn test_json_last_write_wins() {
    let space = file_with(".json", SEARCH_SPACE);
    let results = file_with(
        ".json",
        r#"[{"values": {"x": 2, "y": 3}}, {"values": {"x": 10}}]"#,
    );
    assert_eq!(output(&space, &results, ""), "13");
}

#[test]
fn test_unbound_variable_is_sentinel() {
    let space = file_with(
        ".json",
        r#"{"objective_function": "z + 1", "function_variables": [{"name": "x"}]}"#,
    );
    let results = file_with(".csv", "x\n2\n");
    assert_eq!(output(&space, &results, ""), "-1");
}

#[test]
fn test_missing_objective_function_is_sentinel() {
    let space = file_with(".json", r#"{"function_variables": [{"name": "x"}]}"#);
    let results = file_with(".csv", "x\n2\n");
    assert_eq!(output(&space, &results, ""), "-1");
}

#[test]
fn test_invalid_search_space_is_sentinel() {
    let space = file_with(".json", "{not json");
    let results = file_with(".csv", "x\n2\n");
    assert_eq!(output(&space, &results, ""), "-1");
}

#[test]
fn test_unsupported_extension_evaluates_unbound() {
    let space = file_with(".json", SEARCH_SPACE);
    let results = file_with(".txt", "x,y\n2,3\n");
    assert_eq!(output(&space, &results, ""), "-1");

    let constant = file_with(".json", r#"{"objective_function": "6 * 7"}"#);
    assert_eq!(output(&constant, &results, ""), "42");
}

#[test]
fn test_repeated_invocations_agree() {
    let space = file_with(".json", SEARCH_SPACE);
    let results = file_with(".csv", "x,y\n2,3\n");
    let first = output(&space, &results, "");
    let second = output(&space, &results, "");
    assert_eq!(first, second);
}

#[test]
fn test_variable_inside_function_name_does_not_collide() {
    let space = file_with(
        ".json",
        r#"{"objective_function": "max(x, 1) + a", "function_variables": [{"name": "x"}, {"name": "a"}]}"#,
    );
    let results = file_with(".csv", "x,a\n4,1\n");
    assert_eq!(output(&space, &results, ""), "5");
}

#[test]
fn test_disallowed_constructs_are_sentinel() {
    let results = file_with(".csv", "x\n2\n");
    for formula in [
        r#"__import__('os').system('true')"#,
        "open(x)",
        "x.real",
        "[x][0]",
    ] {
        let doc = serde_json::json!({ "objective_function": formula }).to_string();
        let space = file_with(".json", &doc);
        assert_eq!(output(&space, &results, "x"), "-1", "formula: {}", formula);
    }
}

#[test]
fn test_csv_row_selection() {
    let space = file_with(".json", SEARCH_SPACE);
    let results = file_with(".csv", "x,y\n2,3\n4,5\n");

    let request = ObjectiveRequest::new(space.path(), results.path(), "");
    assert_eq!(objective_output(&request), "9");

    let first = request.clone().with_rows(RowSelection::First);
    assert_eq!(objective_output(&first), "5");

    let mean = request.with_rows(RowSelection::Mean);
    let value = calculate_objective(&mean).unwrap();
    assert_float_absolute_eq!(value.as_f64().unwrap(), 7.0, 1e-9);
}

#[test]
fn test_realistic_benchmark_objective() {
    let space = file_with(
        ".json",
        r#"{
            "objective_function": "(request_sum / request_count) * 1000",
            "function_variables": [
                {"name": "request_sum", "value_type": "double"},
                {"name": "request_count", "value_type": "double"}
            ]
        }"#,
    );
    let results = file_with(
        ".csv",
        "instances,request_sum,request_count,cpu_util\n1,12.5,500,0.73\n",
    );

    let value = calculate_objective(&ObjectiveRequest::new(space.path(), results.path(), ""))
        .unwrap();
    assert_float_absolute_eq!(value.as_f64().unwrap(), 25.0, 1e-9);
}

#[test]
fn test_boolean_objective() {
    let space = file_with(
        ".json",
        r#"{"objective_function": "latency < 0.5 and errors == 0"}"#,
    );
    let results = file_with(".json", r#"[{"values": {"latency": 0.2, "errors": 0}}]"#);
    assert_eq!(output(&space, &results, "latency,errors"), "True");

    let value = calculate_objective(&ObjectiveRequest::new(
        space.path(),
        results.path(),
        "latency,errors",
    ))
    .unwrap();
    assert_eq!(value, Value::Bool(true));
}

#[test]
fn test_division_by_zero_is_sentinel() {
    let space = file_with(
        ".json",
        r#"{"objective_function": "x / y", "function_variables": [{"name": "x"}, {"name": "y"}]}"#,
    );
    let results = file_with(".csv", "x,y\n1,0\n");
    assert_eq!(output(&space, &results, ""), "-1");
}

#[test]
fn test_unused_null_value_does_not_fail() {
    let space = file_with(".json", SEARCH_SPACE);
    let results = file_with(
        ".json",
        r#"[{"values": {"x": 2, "y": 3, "notes": null}}]"#,
    );
    assert_eq!(output(&space, &results, "x,y,notes"), "5");
}

#[test]
fn test_null_value_read_by_formula_is_sentinel() {
    let space = file_with(".json", SEARCH_SPACE);
    let results = file_with(".json", r#"[{"values": {"x": 2, "y": null}}]"#);
    assert_eq!(output(&space, &results, ""), "-1");
}

#[test]
fn test_logic_returns_deciding_operand() {
    let results = file_with(".csv", "x\n0\n");

    let space = file_with(".json", r#"{"objective_function": "x or 5"}"#);
    assert_eq!(output(&space, &results, "x"), "5");

    let space = file_with(".json", r#"{"objective_function": "2 and 3"}"#);
    assert_eq!(output(&space, &results, "x"), "3");
}

#[test]
fn test_empty_last_cell_falls_back_to_earlier_row() {
    let space = file_with(".json", SEARCH_SPACE);
    let results = file_with(".csv", "x,y\n2,3\n4,\n");
    // last row has no y, so y comes from the first row
    assert_eq!(output(&space, &results, ""), "7");
}

#[test]
fn test_float_output_uses_exponent_form() {
    let space = file_with(".json", r#"{"objective_function": "x / 100000"}"#);
    let results = file_with(".csv", "x\n1\n");
    assert_eq!(output(&space, &results, "x"), "1e-05");
}
