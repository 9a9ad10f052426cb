// pdfium-render wrapper: PDF bytes -> ordered RGB page rasters (in-memory only)

use std::path::PathBuf;

use pdfium_render::prelude::*;

use crate::page::{PageSequence, RasterPage};

/// Resolves the path to the pdfium shared library.
///
/// Search order:
/// 1. `PDFIUM_DYNAMIC_LIB_PATH` environment variable
/// 2. `vendor/pdfium/lib/` relative to the project root (for development)
fn resolve_pdfium_lib_path() -> crate::error::Result<PathBuf> {
    if let Ok(path) = std::env::var("PDFIUM_DYNAMIC_LIB_PATH") {
        let p = PathBuf::from(&path);
        if p.exists() {
            return Ok(p);
        }
        return Err(crate::error::ScanifyError::decode(format!(
            "PDFIUM_DYNAMIC_LIB_PATH is set to '{}' but the path does not exist",
            path
        )));
    }

    if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
        let vendor_path = PathBuf::from(&manifest_dir).join("vendor/pdfium/lib");
        if vendor_path.exists() {
            return Ok(vendor_path);
        }
    }

    Err(crate::error::ScanifyError::decode(
        "pdfium library not found: set PDFIUM_DYNAMIC_LIB_PATH or place libpdfium.so in vendor/pdfium/lib/",
    ))
}

/// Creates a new Pdfium instance by dynamically loading the shared library.
fn create_pdfium() -> crate::error::Result<Pdfium> {
    let lib_path = resolve_pdfium_lib_path()?;
    let lib_path_str = lib_path.to_str().ok_or_else(|| {
        crate::error::ScanifyError::decode("pdfium library path contains non-UTF-8 characters")
    })?;
    let bindings =
        Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path(lib_path_str))
            .map_err(|e| crate::error::ScanifyError::decode(e.to_string()))?;
    Ok(Pdfium::new(bindings))
}

/// Decode a PDF byte stream into an ordered sequence of RGB page rasters.
///
/// Every page is rendered at `density` DPI from its point dimensions
/// (1 point = 1/72 inch, so each point maps to `density / 72` pixels). The
/// returned sequence preserves document page order.
///
/// # Errors
/// Returns an input error for an empty byte stream, and a decode error if:
/// - the pdfium library cannot be initialized
/// - the bytes are not a readable PDF
/// - the document has no pages, or a page has degenerate dimensions
/// - rendering fails
pub fn decode_pages(pdf_bytes: &[u8], density: u32) -> crate::error::Result<PageSequence> {
    if pdf_bytes.is_empty() {
        return Err(crate::error::ScanifyError::input("empty document stream"));
    }
    if density == 0 {
        return Err(crate::error::ScanifyError::decode(
            "rendering density must be positive",
        ));
    }

    let pdfium = create_pdfium()?;

    let document = pdfium
        .load_pdf_from_byte_slice(pdf_bytes, None)
        .map_err(|e| crate::error::ScanifyError::decode(e.to_string()))?;

    let mut pages = PageSequence::new();
    for page in document.pages().iter() {
        let width_pts = page.width().value;
        let height_pts = page.height().value;
        let width_px = (width_pts * density as f32 / 72.0).round() as i32;
        let height_px = (height_pts * density as f32 / 72.0).round() as i32;

        if width_px <= 0 || height_px <= 0 {
            return Err(crate::error::ScanifyError::decode(format!(
                "page {} has degenerate dimensions {width_pts}x{height_pts} pts",
                pages.len() + 1
            )));
        }

        let config = PdfRenderConfig::new()
            .set_target_width(width_px)
            .set_target_height(height_px);

        let bitmap = page
            .render_with_config(&config)
            .map_err(|e| crate::error::ScanifyError::decode(e.to_string()))?;

        pages.push(RasterPage::from_rgb_image(
            bitmap.as_image().to_rgb8(),
            density,
        ));
    }

    if pages.is_empty() {
        return Err(crate::error::ScanifyError::decode(
            "document contains no pages",
        ));
    }

    Ok(pages)
}
