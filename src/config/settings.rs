use std::path::Path;

use serde::Deserialize;

use crate::pipeline::job_runner::DEFAULT_DENSITY;

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Rendering density in DPI for decode and re-encode.
    pub density: u32,
    /// Worker threads for page processing; 0 lets rayon pick.
    pub parallel_workers: usize,
    /// Prefix for derived output file names.
    pub output_prefix: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            density: DEFAULT_DENSITY,
            parallel_workers: 0,
            output_prefix: String::from("output_"),
        }
    }
}

impl Settings {
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yml::from_str(yaml).map_err(|e| {
            crate::error::ScanifyError::config(format!("Failed to parse settings YAML: {e}"))
        })
    }

    pub fn from_file(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }
}
