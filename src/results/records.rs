use crate::error::{ObjError, Result};
use crate::models::Value;
use crate::results::Extracted;

/// Collect values for `variables` from a JSON array of `{"values": {...}}` records.
///
/// Records are visited in order; a record without `values` contributes nothing.
/// Non-scalar entries are kept as [`Value::Unsupported`] so they only fail
/// when the formula reads them.
pub fn extract_records(content: &str, variables: &[String]) -> Result<Extracted> {
    let doc: serde_json::Value = serde_json::from_str(content)?;
    let records = doc
        .as_array()
        .ok_or_else(|| ObjError::MalformedResults("expected a JSON array of records".to_string()))?;

    let mut extracted = Extracted::for_variables(variables);
    let names: Vec<String> = extracted.names().map(str::to_string).collect();

    for (idx, record) in records.iter().enumerate() {
        let record = record
            .as_object()
            .ok_or_else(|| ObjError::MalformedResults(format!("record {} is not an object", idx)))?;
        let Some(values) = record.get("values") else {
            continue;
        };
        let values = values.as_object().ok_or_else(|| {
            ObjError::MalformedResults(format!("record {} has non-object 'values'", idx))
        })?;

        for (slot, name) in names.iter().enumerate() {
            if let Some(raw) = values.get(name) {
                extracted.push(slot, Value::from_json(raw));
            }
        }
    }

    Ok(extracted)
}
