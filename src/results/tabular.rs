use std::io::Read;

use crate::error::Result;
use crate::models::Value;
use crate::results::Extracted;

/// Collect values for `variables` from CSV with a header row.
///
/// Every row contributes in order. A duplicated header resolves to its
/// right-most column. Empty cells and cells missing from short rows are skipped.
pub fn extract_tabular<R: Read>(reader: R, variables: &[String]) -> Result<Extracted> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let mut extracted = Extracted::for_variables(variables);
    let headers = rdr.headers()?.clone();
    let columns: Vec<(usize, usize)> = extracted
        .names()
        .enumerate()
        .filter_map(|(slot, name)| {
            headers
                .iter()
                .enumerate()
                .filter(|(_, h)| *h == name)
                .map(|(col, _)| (slot, col))
                .last()
        })
        .collect();

    for record in rdr.records() {
        let record = record?;
        for &(slot, col) in &columns {
            match record.get(col) {
                Some(cell) if !cell.trim().is_empty() => {
                    extracted.push(slot, Value::parse_scalar(cell));
                }
                _ => {}
            }
        }
    }

    Ok(extracted)
}
