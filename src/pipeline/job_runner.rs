// Job level: decode input -> parallel page distortion -> output PDF assembly

use std::path::PathBuf;

use rayon::prelude::*;
use tracing::info;

use crate::distort::rng::PageRng;
use crate::error::ScanifyError;
use crate::page::PageSequence;
use crate::pdf::writer::ScanPageWriter;
use crate::pipeline::page_processor::{ProcessedPage, process_page};
use crate::render::pdfium::decode_pages;

/// Default rendering density in DPI.
pub const DEFAULT_DENSITY: u32 = 130;

/// Tuning for one conversion.
#[derive(Debug, Clone)]
pub struct ScanifyOptions {
    /// Rendering density in DPI for decode and re-encode.
    pub density: u32,
    /// Fixed seed for reproducible runs; `None` draws fresh entropy per page.
    pub seed: Option<u64>,
}

impl Default for ScanifyOptions {
    fn default() -> Self {
        Self {
            density: DEFAULT_DENSITY,
            seed: None,
        }
    }
}

/// Configuration for a single job.
pub struct JobConfig {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub density: u32,
    pub seed: Option<u64>,
}

/// Result of processing a single job.
pub struct JobResult {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub pages_processed: usize,
}

/// A fully converted document, ready to hand back to the caller.
#[derive(Debug)]
pub struct ConvertedDocument {
    /// Serialized output PDF.
    pub pdf: Vec<u8>,
    /// Number of pages in the output (always equals the input page count).
    pub page_count: usize,
}

/// Distort every page of a sequence, in parallel.
///
/// Pages are independent units of work: each gets its own generator and is
/// dispatched to the rayon pool. Results are re-ordered by page index, so
/// completion order never leaks into the output. The first page failure
/// aborts the whole sequence; a partial document is worse than no document
/// for a conversion tool, so there is no skip-and-continue path.
pub fn distort_sequence(
    pages: PageSequence,
    seed: Option<u64>,
) -> crate::error::Result<Vec<ProcessedPage>> {
    let results: Vec<crate::error::Result<ProcessedPage>> = pages
        .into_par_iter()
        .enumerate()
        .map(|(idx, page)| {
            let mut rng = PageRng::for_page(seed, idx as u32);
            process_page(idx as u32, page, &mut rng)
        })
        .collect();

    let mut processed = Vec::with_capacity(results.len());
    for result in results {
        processed.push(result?);
    }
    processed.sort_by_key(|p| p.page_index);
    Ok(processed)
}

/// Convert a PDF byte stream into its distorted counterpart.
///
/// The bytes-in/bytes-out core entry point:
/// decode at `options.density` -> per-page distortion -> CMYK page assembly.
///
/// # Errors
/// Empty input is rejected as an input error before any decode work; decode,
/// page, and encode failures propagate with their own variants.
pub fn convert_pdf(
    input: &[u8],
    options: &ScanifyOptions,
) -> crate::error::Result<ConvertedDocument> {
    if input.is_empty() {
        return Err(ScanifyError::input("input document is empty"));
    }

    let pages = decode_pages(input, options.density)?;
    info!(
        pages = pages.len(),
        density = options.density,
        "decoded input document"
    );

    let processed = distort_sequence(pages, options.seed)?;

    let mut writer = ScanPageWriter::new();
    for page in &processed {
        writer.write_page(&page.page)?;
    }
    let pdf = writer.finish()?;

    info!(
        pages = processed.len(),
        bytes = pdf.len(),
        "assembled output document"
    );
    Ok(ConvertedDocument {
        pdf,
        page_count: processed.len(),
    })
}

/// Run a single conversion job from input path to output path.
///
/// The output file is written once, after the whole document has been
/// assembled in memory; a failing job leaves no partial artifact behind.
pub fn run_job(config: &JobConfig) -> crate::error::Result<JobResult> {
    let input = std::fs::read(&config.input_path).map_err(|e| {
        ScanifyError::input(format!(
            "cannot read input {}: {e}",
            config.input_path.display()
        ))
    })?;

    let options = ScanifyOptions {
        density: config.density,
        seed: config.seed,
    };
    let converted = convert_pdf(&input, &options)?;

    std::fs::write(&config.output_path, &converted.pdf)?;

    Ok(JobResult {
        input_path: config.input_path.clone(),
        output_path: config.output_path.clone(),
        pages_processed: converted.page_count,
    })
}
