// CLI entry point tests

use std::io::Write;
use std::process::Command;

fn cargo_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_pdf_scanify"))
}

// ============================================================
// 1. No arguments shows usage and exits with failure
// ============================================================

#[test]
fn test_main_no_args_shows_usage() {
    let output = cargo_bin().output().expect("failed to execute binary");

    assert!(
        !output.status.success(),
        "should exit with failure when no args given"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Usage"),
        "stderr should contain 'Usage', got: {stderr}"
    );
}

// ============================================================
// 2. --help flag shows usage and exits with success
// ============================================================

#[test]
fn test_main_help_flag() {
    let output = cargo_bin()
        .arg("--help")
        .output()
        .expect("failed to execute binary");

    assert!(
        output.status.success(),
        "should exit with success for --help"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Usage"),
        "stderr should contain 'Usage', got: {stderr}"
    );
}

// ============================================================
// 3. --version flag shows version and exits with success
// ============================================================

#[test]
fn test_main_version_flag() {
    let output = cargo_bin()
        .arg("--version")
        .output()
        .expect("failed to execute binary");

    assert!(
        output.status.success(),
        "should exit with success for --version"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    let version = env!("CARGO_PKG_VERSION");
    assert!(
        stderr.contains(version),
        "stderr should contain version '{version}', got: {stderr}"
    );
}

// ============================================================
// 4. Missing and malformed job files fail cleanly
// ============================================================

#[test]
fn test_main_missing_job_file() {
    let output = cargo_bin()
        .arg("/nonexistent/jobs.yaml")
        .output()
        .expect("failed to execute binary");

    assert!(
        !output.status.success(),
        "should exit with failure for a missing job file"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("ERROR"),
        "stderr should report an error, got: {stderr}"
    );
}

#[test]
fn test_main_malformed_job_file() {
    let dir = tempfile::tempdir().expect("should create temp dir");
    let job_path = dir.path().join("jobs.yaml");
    let mut file = std::fs::File::create(&job_path).expect("should create job file");
    writeln!(file, "jobs: [this is not a job").expect("should write job file");

    let output = cargo_bin()
        .arg(&job_path)
        .output()
        .expect("failed to execute binary");

    assert!(
        !output.status.success(),
        "should exit with failure for malformed YAML"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Failed to parse job file"),
        "stderr should name the parse failure, got: {stderr}"
    );
}

// ============================================================
// 5. Empty input is rejected before any pipeline work
// ============================================================

#[test]
fn test_main_rejects_empty_input_document() {
    // The empty-input guard fires before pdfium is loaded, so this runs
    // without a rendering library.
    let dir = tempfile::tempdir().expect("should create temp dir");
    let input_path = dir.path().join("empty.pdf");
    std::fs::File::create(&input_path).expect("should create empty input");

    let job_path = dir.path().join("jobs.yaml");
    let mut file = std::fs::File::create(&job_path).expect("should create job file");
    writeln!(file, "jobs:\n  - input: \"empty.pdf\"").expect("should write job file");

    let output = cargo_bin()
        .arg(&job_path)
        .output()
        .expect("failed to execute binary");

    assert!(
        !output.status.success(),
        "empty input document should fail the job"
    );

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Input error"),
        "stderr should surface the input rejection, got: {stderr}"
    );

    // All-or-nothing: no output artifact may appear.
    assert!(
        !dir.path().join("output_empty.pdf").exists(),
        "no output must be written for a rejected input"
    );
}
