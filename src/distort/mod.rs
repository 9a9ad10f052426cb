// Per-page distortion pipeline: rotate -> tonal -> grain, in that order.

pub mod geometry;
pub mod noise;
pub mod rng;
pub mod tonal;

use crate::page::RasterPage;
use rng::PageRng;

/// Smallest rotation magnitude in degrees. Never draws exactly zero.
pub const ROTATION_MIN_DEG: f64 = 0.05;
/// Largest rotation magnitude in degrees. Small enough that no content is
/// lost even without re-cropping.
pub const ROTATION_MAX_DEG: f64 = 0.50;

/// Fraction of low-end histogram mass clipped by the linear stretch.
pub const STRETCH_BLACK_CLIP: f64 = 0.015;
/// Fraction of high-end histogram mass clipped by the linear stretch.
pub const STRETCH_WHITE_CLIP: f64 = 0.02;

/// Brightness modulation in percent. 98 darkens slightly, as a scanner lamp
/// would against a true-white original.
pub const BRIGHTNESS_PCT: f64 = 98.0;
/// Saturation modulation in percent (100 = unchanged).
pub const SATURATION_PCT: f64 = 100.0;
/// Hue modulation in percent (100 = unchanged).
pub const HUE_PCT: f64 = 100.0;

/// Contribution of the noisy scratch copy at composite time.
pub const NOISE_BLEND: f64 = 0.05;

/// Distortion values drawn fresh for one page.
///
/// Only the rotation angle is random per page; the remaining fields carry the
/// fixed tuning constants so a stage sees one parameter block instead of
/// reaching into module constants.
#[derive(Debug, Clone, Copy)]
pub struct DistortionParams {
    /// Signed rotation angle in degrees.
    pub rotation_deg: f64,
    /// Low-end clip fraction for the linear stretch.
    pub black_clip: f64,
    /// High-end clip fraction for the linear stretch.
    pub white_clip: f64,
    /// Brightness modulation in percent.
    pub brightness: f64,
    /// Saturation modulation in percent.
    pub saturation: f64,
    /// Hue modulation in percent.
    pub hue: f64,
    /// Blend factor for the grain composite (0-1).
    pub noise_blend: f64,
}

impl DistortionParams {
    /// Draw the per-page parameter block from the page's generator.
    pub fn draw(rng: &mut PageRng) -> Self {
        Self {
            rotation_deg: rng.rotation_degrees(),
            black_clip: STRETCH_BLACK_CLIP,
            white_clip: STRETCH_WHITE_CLIP,
            brightness: BRIGHTNESS_PCT,
            saturation: SATURATION_PCT,
            hue: HUE_PCT,
            noise_blend: NOISE_BLEND,
        }
    }
}

/// One named stage of the per-page pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DistortStage {
    /// Small random rotation, canvas expanded to fit.
    Rotate,
    /// Linear stretch, modulation, CMYK conversion.
    Tonal,
    /// Poisson grain composited at low opacity.
    Grain,
}

impl DistortStage {
    /// The fixed stage order. The grain stage requires the tonal stage's
    /// CMYK output, so this ordering is a contract, not a convenience.
    pub fn standard() -> [DistortStage; 3] {
        [DistortStage::Rotate, DistortStage::Tonal, DistortStage::Grain]
    }

    pub fn apply(
        self,
        page: RasterPage,
        params: &DistortionParams,
        rng: &mut PageRng,
    ) -> crate::error::Result<RasterPage> {
        match self {
            DistortStage::Rotate => geometry::rotate(page, params.rotation_deg),
            DistortStage::Tonal => tonal::apply(page, params),
            DistortStage::Grain => noise::apply(page, params.noise_blend, rng),
        }
    }
}

/// Run a page through the given stages in order.
pub fn apply_stages(
    page: RasterPage,
    stages: &[DistortStage],
    params: &DistortionParams,
    rng: &mut PageRng,
) -> crate::error::Result<RasterPage> {
    stages
        .iter()
        .try_fold(page, |page, stage| stage.apply(page, params, rng))
}

/// Draw parameters and run the standard pipeline on one page.
pub fn distort_page(page: RasterPage, rng: &mut PageRng) -> crate::error::Result<RasterPage> {
    let params = DistortionParams::draw(rng);
    apply_stages(page, &DistortStage::standard(), &params, rng)
}
