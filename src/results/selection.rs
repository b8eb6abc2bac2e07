use clap::ValueEnum;

use crate::models::Value;

/// How a variable seen in several rows (or records) is reduced to one value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum RowSelection {
    /// Value from the first row that has one.
    First,
    /// Value from the last row that has one; later rows override earlier ones.
    #[default]
    Last,
    /// Arithmetic mean across all rows.
    Mean,
}

impl RowSelection {
    /// Reduce the collected values of one variable. `None` when nothing was collected.
    ///
    /// A mean over non-numeric values is [`Value::Unsupported`], so it only
    /// fails if the formula reads it.
    pub fn select(self, values: &[Value]) -> Option<Value> {
        match self {
            RowSelection::First => values.first().cloned(),
            RowSelection::Last => values.last().cloned(),
            RowSelection::Mean if values.is_empty() => None,
            RowSelection::Mean => {
                let sum: Option<f64> = values.iter().map(Value::as_f64).sum();
                Some(match sum {
                    Some(sum) => Value::Float(sum / values.len() as f64),
                    None => Value::Unsupported("mean over non-numeric values".to_string()),
                })
            }
        }
    }
}
