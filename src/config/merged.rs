use super::job::Job;
use super::settings::Settings;

#[derive(Debug, Clone)]
pub struct MergedConfig {
    pub density: u32,
    pub seed: Option<u64>,
    pub parallel_workers: usize,
    pub output_prefix: String,
}

impl MergedConfig {
    /// Job values take precedence over settings; settings fill the gaps.
    pub fn new(settings: &Settings, job: &Job) -> Self {
        MergedConfig {
            density: job.density.unwrap_or(settings.density),
            seed: job.seed,
            parallel_workers: settings.parallel_workers,
            output_prefix: settings.output_prefix.clone(),
        }
    }
}
