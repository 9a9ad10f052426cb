// Geometric distortion: small rotation about the page center, canvas
// expanded so no content is cropped.

use image::{Rgb, RgbImage};
use imageproc::geometric_transformations::{Interpolation, Projection, warp_into};

use crate::error::ScanifyError;
use crate::page::{ColorModel, RasterPage};

/// Rotate a page by `angle_deg` about its center.
///
/// The output canvas grows to the rotated bounding box, so the full page
/// survives even at the largest configured angle. New border area is filled
/// with the page's estimated background color.
///
/// # Errors
/// Returns a decode error for a zero-dimension page and a page processing
/// error when the page is not in the RGB working model.
pub fn rotate(page: RasterPage, angle_deg: f64) -> crate::error::Result<RasterPage> {
    if page.width() == 0 || page.height() == 0 {
        return Err(ScanifyError::decode(format!(
            "cannot rotate structurally invalid {}x{} page",
            page.width(),
            page.height()
        )));
    }
    if page.model() != ColorModel::Rgb {
        return Err(ScanifyError::page(format!(
            "rotation expects the RGB working model, got {:?}",
            page.model()
        )));
    }

    let (width, height) = (page.width(), page.height());
    let density = page.density();
    let theta = angle_deg.to_radians();

    // Rotated bounding box, rounded outward.
    let (abs_sin, abs_cos) = (theta.sin().abs(), theta.cos().abs());
    let out_width = (width as f64 * abs_cos + height as f64 * abs_sin).ceil() as u32;
    let out_height = (width as f64 * abs_sin + height as f64 * abs_cos).ceil() as u32;

    let background = estimate_background(&page);

    let source = RgbImage::from_raw(width, height, page.into_data())
        .ok_or_else(|| ScanifyError::page("RGB buffer does not match page dimensions"))?;
    let mut output = RgbImage::from_pixel(out_width, out_height, background);

    // Map the source center onto the expanded canvas center, rotating between
    // the two translations.
    let projection = Projection::translate(out_width as f32 / 2.0, out_height as f32 / 2.0)
        * Projection::rotate(theta as f32)
        * Projection::translate(-(width as f32) / 2.0, -(height as f32) / 2.0);

    warp_into(
        &source,
        &projection,
        Interpolation::Bilinear,
        background,
        &mut output,
    );

    RasterPage::new(
        out_width,
        out_height,
        ColorModel::Rgb,
        density,
        output.into_raw(),
    )
}

/// Estimate the page background from the one-pixel border ring.
///
/// Mean over the ring; white when the page has no pixels to sample. Scanned
/// documents keep their margins at the paper color, so the ring is a cheap
/// stand-in for the true background.
fn estimate_background(page: &RasterPage) -> Rgb<u8> {
    let (width, height) = (page.width() as usize, page.height() as usize);
    let data = page.data();

    let mut sums = [0u64; 3];
    let mut count = 0u64;
    for y in 0..height {
        for x in 0..width {
            if y != 0 && y != height - 1 && x != 0 && x != width - 1 {
                continue;
            }
            let offset = (y * width + x) * 3;
            for (sum, &v) in sums.iter_mut().zip(&data[offset..offset + 3]) {
                *sum += v as u64;
            }
            count += 1;
        }
    }

    if count == 0 {
        return Rgb([255, 255, 255]);
    }
    Rgb([
        (sums[0] / count) as u8,
        (sums[1] / count) as u8,
        (sums[2] / count) as u8,
    ])
}
