//! Run configuration, threaded explicitly through the pipeline instead of
//! living in process-wide flag state.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct GenerateConfig {
    /// Target type whose methods get stubs.
    pub type_name: String,
    /// Suffix of the generated submit-and-await wrappers.
    pub exec_suffix: String,
    /// Suffix of the generated submit-and-start wrappers.
    pub start_suffix: String,
    /// Print to stdout instead of writing the output file.
    pub dry_run: bool,
    /// Directory of the Go package to scan.
    pub path: PathBuf,
}
