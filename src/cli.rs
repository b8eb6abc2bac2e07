use std::path::PathBuf;

use clap::Parser;

use crate::objective::ObjectiveRequest;
use crate::results::RowSelection;

/// objfunc: evaluates an HPO objective function against benchmark results.
///
/// Prints the result, or -1 if anything goes wrong.
#[derive(Parser, Debug)]
#[command(name = "objfunc")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the search-space JSON document.
    pub search_space: PathBuf,

    /// Path to the benchmark results file (.csv or .json).
    pub results: PathBuf,

    /// Comma-separated objective variable names. Empty uses the search space's function_variables.
    #[arg(default_value = "")]
    pub variables: String,

    /// Which row wins when a variable appears in several rows or records.
    #[arg(long, value_enum, default_value_t = RowSelection::Last)]
    pub rows: RowSelection,

    /// Log pipeline steps to stderr.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn request(&self) -> ObjectiveRequest {
        ObjectiveRequest::new(
            self.search_space.clone(),
            self.results.clone(),
            self.variables.clone(),
        )
        .with_rows(self.rows)
    }
}
