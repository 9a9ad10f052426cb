// Grain synthesis: Poisson shot noise on a scratch copy, composited back at
// low opacity.

use rand_distr::{Distribution, Poisson};

use crate::error::ScanifyError;
use crate::page::{ColorModel, RasterPage};

use super::rng::PageRng;

/// Overlay Poisson grain on a page at `blend` contribution.
///
/// A scratch copy of the page is perturbed channel by channel with draws from
/// a Poisson process parameterized by the channel's own value, so dense ink
/// gets higher-variance grain than blank paper (the photon shot-noise model).
/// The copy is then blended over the page at `blend` weight and dropped.
///
/// CMYK carries no alpha channel, so the attenuated "over" composite reduces
/// to a direct linear blend: `out = noisy * blend + page * (1 - blend)`.
/// That is numerically identical to compositing the copy with a synthesized
/// constant alpha of `blend` over an opaque page.
pub fn apply(
    mut page: RasterPage,
    blend: f64,
    rng: &mut PageRng,
) -> crate::error::Result<RasterPage> {
    if page.model() != ColorModel::Cmyk {
        return Err(ScanifyError::page(format!(
            "grain stage expects the post-tonal CMYK model, got {:?}",
            page.model()
        )));
    }
    if !(0.0..=1.0).contains(&blend) {
        return Err(ScanifyError::page(format!(
            "grain blend factor must be in 0-1, got {blend}"
        )));
    }

    // One distribution per channel value. Zero stays zero: a channel with no
    // ink produces no shot noise, and the Poisson rate must be positive.
    let mut distributions: Vec<Option<Poisson<f64>>> = Vec::with_capacity(256);
    distributions.push(None);
    for value in 1..=255u32 {
        let dist = Poisson::new(value as f64).map_err(|e| {
            ScanifyError::page(format!("invalid Poisson rate {value}: {e}"))
        })?;
        distributions.push(Some(dist));
    }

    // Scratch copy; never escapes this stage.
    let mut noisy = Vec::with_capacity(page.data().len());
    for &v in page.data() {
        let sample = match &distributions[v as usize] {
            Some(dist) => dist.sample(&mut *rng).min(255.0) as u8,
            None => 0,
        };
        noisy.push(sample);
    }

    for (dst, &src) in page.data_mut().iter_mut().zip(&noisy) {
        let blended = src as f64 * blend + *dst as f64 * (1.0 - blend);
        *dst = blended.round() as u8;
    }

    Ok(page)
}
