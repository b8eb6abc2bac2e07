mod records;
mod selection;
mod tabular;

use std::fs::{self, File};
use std::path::Path;

use log::{debug, warn};

use crate::error::Result;
use crate::expr::Environment;
use crate::models::Value;

pub use records::extract_records;
pub use selection::RowSelection;
pub use tabular::extract_tabular;

/// Benchmark results layout, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsFormat {
    /// `.csv` with a header row.
    Tabular,
    /// `.json` array of `{"values": {...}}` records.
    Records,
    Unsupported,
}

impl ResultsFormat {
    /// Case-insensitive extension match.
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("csv") => ResultsFormat::Tabular,
            Some("json") => ResultsFormat::Records,
            _ => ResultsFormat::Unsupported,
        }
    }
}

/// Values collected per resolved variable, in resolution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extracted {
    entries: Vec<(String, Vec<Value>)>,
}

impl Extracted {
    /// One empty slot per distinct variable name.
    pub fn for_variables(variables: &[String]) -> Self {
        let mut entries: Vec<(String, Vec<Value>)> = Vec::with_capacity(variables.len());
        for name in variables {
            if !entries.iter().any(|(n, _)| n == name) {
                entries.push((name.clone(), Vec::new()));
            }
        }
        Self { entries }
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    pub(crate) fn push(&mut self, slot: usize, value: Value) {
        if let Some((_, values)) = self.entries.get_mut(slot) {
            values.push(value);
        }
    }

    /// Everything collected for `name`, or `None` if it was never resolved.
    #[cfg(test)]
    pub(crate) fn values(&self, name: &str) -> Option<&[Value]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_slice())
    }

    /// Reduce each variable with `selection` and bind it. Variables with
    /// no collected values stay unbound.
    pub fn bind(&self, selection: RowSelection) -> Environment {
        self.entries
            .iter()
            .filter_map(|(name, values)| {
                let selected = selection.select(values);
                if selected.is_none() {
                    debug!("no value found for variable '{}'", name);
                }
                selected.map(|value| (name.as_str(), value))
            })
            .collect()
    }
}

/// Read the results file and collect values for `variables`.
///
/// An unsupported extension yields no values; the formula is then
/// evaluated without bindings.
pub fn extract_values(path: &Path, variables: &[String]) -> Result<Extracted> {
    let format = ResultsFormat::from_path(path);
    debug!("results format for {}: {:?}", path.display(), format);

    match format {
        ResultsFormat::Tabular => extract_tabular(File::open(path)?, variables),
        ResultsFormat::Records => extract_records(&fs::read_to_string(path)?, variables),
        ResultsFormat::Unsupported => {
            warn!(
                "unsupported results file extension: {}; no values extracted",
                path.display()
            );
            Ok(Extracted::for_variables(variables))
        }
    }
}
