use std::path::{Path, PathBuf};
use std::process::ExitCode;

use pdf_scanify::config::job::{Job, JobFile};
use pdf_scanify::config::merged::MergedConfig;
use pdf_scanify::config::{self};
use pdf_scanify::pipeline::job_runner::JobConfig;
use pdf_scanify::pipeline::orchestrator::run_all_jobs;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.is_empty() || args.iter().any(|a| a == "--help" || a == "-h") {
        eprintln!("Usage: pdf_scanify <jobs.yaml>...");
        eprintln!("  Distort PDF files into scanned-looking copies per job specifications.");
        return if args.is_empty() {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        };
    }

    if args.iter().any(|a| a == "--version" || a == "-V") {
        eprintln!("pdf_scanify {}", env!("CARGO_PKG_VERSION"));
        return ExitCode::SUCCESS;
    }

    // Collect job configs from all job files.
    let mut job_configs: Vec<JobConfig> = Vec::new();
    let mut pool_workers: Option<usize> = None;

    for job_file_arg in &args {
        let job_file_path = Path::new(job_file_arg);

        // Load settings from the same directory as the job file.
        let settings = match config::load_settings_for_job(job_file_path) {
            Ok(s) => s,
            Err(e) => {
                eprintln!("ERROR: Failed to load settings for {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        // Read and parse the job YAML file.
        let yaml_content = match std::fs::read_to_string(job_file_path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("ERROR: Failed to read job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        let job_file: JobFile = match serde_yml::from_str(&yaml_content) {
            Ok(jf) => jf,
            Err(e) => {
                eprintln!("ERROR: Failed to parse job file {job_file_arg}: {e}");
                return ExitCode::FAILURE;
            }
        };

        // Resolve job file directory for relative paths.
        let job_dir = job_file_path
            .parent()
            .unwrap_or_else(|| Path::new("."))
            .to_path_buf();

        // Merge settings with each job and construct JobConfig.
        for job in &job_file.jobs {
            let merged = MergedConfig::new(&settings, job);

            if merged.parallel_workers > 0 && pool_workers.is_none() {
                pool_workers = Some(merged.parallel_workers);
            }

            let input_path = resolve_path(&job_dir, &job.input);
            let output_path = match &job.output {
                Some(output) => resolve_path(&job_dir, output),
                None => match Job::derive_output_path(&input_path, &merged.output_prefix) {
                    Ok(p) => p,
                    Err(e) => {
                        eprintln!("ERROR: {e}");
                        return ExitCode::FAILURE;
                    }
                },
            };

            job_configs.push(JobConfig {
                input_path,
                output_path,
                density: merged.density,
                seed: merged.seed,
            });
        }
    }

    // Size the worker pool once, before any page work starts. First settings
    // file with an explicit worker count wins.
    if let Some(workers) = pool_workers
        && let Err(e) = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build_global()
    {
        eprintln!("ERROR: Failed to configure {workers} worker threads: {e}");
        return ExitCode::FAILURE;
    }

    // Run all jobs through the pipeline.
    let results = run_all_jobs(&job_configs);

    // Report results.
    let mut has_error = false;
    for (i, result) in results.iter().enumerate() {
        match result {
            Ok(job_result) => {
                eprintln!(
                    "OK: {} -> {} ({} pages)",
                    job_result.input_path.display(),
                    job_result.output_path.display(),
                    job_result.pages_processed
                );
            }
            Err(e) => {
                eprintln!(
                    "ERROR: {} -> {}: {e}",
                    job_configs[i].input_path.display(),
                    job_configs[i].output_path.display()
                );
                has_error = true;
            }
        }
    }

    if has_error {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Resolve a potentially relative path against a base directory.
/// If the path is already absolute, return it as-is.
fn resolve_path(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}
