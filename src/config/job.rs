use std::path::{Path, PathBuf};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JobFile {
    pub jobs: Vec<Job>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    pub input: String,
    /// Explicit output path; derived from the input name when omitted.
    pub output: Option<String>,
    pub density: Option<u32>,
    /// Fixed seed for a reproducible run of this job.
    pub seed: Option<u64>,
}

impl Job {
    /// Derive the output path for a job without an explicit `output`.
    ///
    /// The name is deterministic: `<prefix><input stem>.pdf`, placed next to
    /// the input file. A job with an explicit output never reaches this.
    pub fn derive_output_path(
        input_path: &Path,
        output_prefix: &str,
    ) -> crate::error::Result<PathBuf> {
        let stem = input_path
            .file_stem()
            .and_then(|s| s.to_str())
            .ok_or_else(|| {
                crate::error::ScanifyError::config(format!(
                    "cannot derive output name from input '{}'",
                    input_path.display()
                ))
            })?;
        Ok(input_path.with_file_name(format!("{output_prefix}{stem}.pdf")))
    }
}
