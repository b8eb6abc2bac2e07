use std::fs;
use std::path::Path;

use crate::error::{ObjError, Result};
use crate::models::SearchSpace;

/// Check that the results file exists and is not zero bytes.
///
/// The file is not parsed here.
pub fn validate_results_file<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let display = path.display().to_string();

    let metadata = match fs::metadata(path) {
        Ok(m) => m,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(ObjError::MissingResults(display));
        }
        Err(e) => return Err(e.into()),
    };

    if metadata.len() == 0 {
        return Err(ObjError::EmptyResults(display));
    }
    Ok(())
}

/// Load a search-space document from a JSON file.
pub fn load_search_space<P: AsRef<Path>>(path: P) -> Result<SearchSpace> {
    let content = fs::read_to_string(path)?;
    let space: SearchSpace = serde_json::from_str(&content)?;
    Ok(space)
}
