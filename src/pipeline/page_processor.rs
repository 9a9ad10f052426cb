// Page-level processing: normalize to RGB, draw parameters, run the
// distortion stages.

use tracing::debug;

use crate::distort::rng::PageRng;
use crate::distort::{self, DistortStage, DistortionParams};
use crate::page::RasterPage;

/// Single page processing result.
#[derive(Debug)]
pub struct ProcessedPage {
    pub page_index: u32,
    pub page: RasterPage,
}

/// Run one page through the standard distortion pipeline.
///
/// The page is first normalized to the RGB working model (grayscale and CMYK
/// inputs included), then rotated, tonally distorted, and grained, each stage
/// drawing from the page's own generator. Any stage failure is surfaced as a
/// page processing error carrying the 1-based page number; the orchestrator
/// turns that into an all-or-nothing abort for the document.
pub fn process_page(
    page_index: u32,
    page: RasterPage,
    rng: &mut PageRng,
) -> crate::error::Result<ProcessedPage> {
    let params = DistortionParams::draw(rng);
    debug!(
        page = page_index + 1,
        rotation_deg = params.rotation_deg,
        "drew distortion parameters"
    );

    let page = distort::apply_stages(page.into_rgb(), &DistortStage::standard(), &params, rng)
        .map_err(|e| {
            crate::error::ScanifyError::page(format!("page {}: {e}", page_index + 1))
        })?;

    Ok(ProcessedPage { page_index, page })
}
