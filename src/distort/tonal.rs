// Tonal distortion: linear stretch -> HSL modulation -> CMYK conversion.
// The order is fixed; converting earlier would change the numeric domain the
// stretch and modulation operate in.

use crate::error::ScanifyError;
use crate::page::{ColorModel, RasterPage};

use super::DistortionParams;

/// Run the full tonal stage on one page.
pub fn apply(page: RasterPage, params: &DistortionParams) -> crate::error::Result<RasterPage> {
    let page = linear_stretch(page.into_rgb(), params.black_clip, params.white_clip)?;
    let page = modulate(page, params.brightness, params.saturation, params.hue)?;
    convert_to_cmyk(page)
}

/// Contrast remap: clip `black_clip` of the low-end and `white_clip` of the
/// high-end luminance histogram mass, then rescale the remainder to the full
/// range.
///
/// The black and white points come from the luminance histogram; the remap is
/// applied per channel with clamping. Degenerate histograms (flat pages)
/// leave the page unchanged.
pub fn linear_stretch(
    mut page: RasterPage,
    black_clip: f64,
    white_clip: f64,
) -> crate::error::Result<RasterPage> {
    if page.model() != ColorModel::Rgb {
        return Err(ScanifyError::page(format!(
            "linear stretch expects the RGB working model, got {:?}",
            page.model()
        )));
    }

    let total = page.pixel_count();
    if total == 0 {
        return Ok(page);
    }

    let mut histogram = [0u64; 256];
    for px in page.data().chunks_exact(3) {
        histogram[luminance(px[0], px[1], px[2]) as usize] += 1;
    }

    let black_budget = total as f64 * black_clip;
    let white_budget = total as f64 * white_clip;

    // Black point: first intensity whose cumulative mass exceeds the clip
    // budget, counted from the dark end. White point mirrors it from the top.
    let mut cumulative = 0u64;
    let mut black_point = 255usize;
    for (value, &count) in histogram.iter().enumerate() {
        cumulative += count;
        if cumulative as f64 > black_budget {
            black_point = value;
            break;
        }
    }

    let mut cumulative = 0u64;
    let mut white_point = 0usize;
    for (value, &count) in histogram.iter().enumerate().rev() {
        cumulative += count;
        if cumulative as f64 > white_budget {
            white_point = value;
            break;
        }
    }

    if white_point <= black_point {
        return Ok(page);
    }

    let span = (white_point - black_point) as f64;
    let mut lut = [0u8; 256];
    for (value, entry) in lut.iter_mut().enumerate() {
        let remapped = (value as f64 - black_point as f64) * 255.0 / span;
        *entry = remapped.round().clamp(0.0, 255.0) as u8;
    }

    for v in page.data_mut() {
        *v = lut[*v as usize];
    }
    Ok(page)
}

/// Multiplicative brightness/saturation/hue adjustment in HSL space.
///
/// Percentages follow the usual modulate convention: 100 leaves a component
/// unchanged, brightness and saturation scale lightness and saturation, and
/// hue shifts by `(pct - 100) / 100 * 180` degrees.
pub fn modulate(
    mut page: RasterPage,
    brightness_pct: f64,
    saturation_pct: f64,
    hue_pct: f64,
) -> crate::error::Result<RasterPage> {
    if page.model() != ColorModel::Rgb {
        return Err(ScanifyError::page(format!(
            "modulation expects the RGB working model, got {:?}",
            page.model()
        )));
    }

    if brightness_pct == 100.0 && saturation_pct == 100.0 && hue_pct == 100.0 {
        return Ok(page);
    }

    let hue_shift = (hue_pct - 100.0) / 100.0 * 180.0;
    for px in page.data_mut().chunks_exact_mut(3) {
        let (mut h, mut s, mut l) = rgb_to_hsl(px[0], px[1], px[2]);
        l = (l * brightness_pct / 100.0).clamp(0.0, 1.0);
        s = (s * saturation_pct / 100.0).clamp(0.0, 1.0);
        h = (h + hue_shift).rem_euclid(360.0);
        let (r, g, b) = hsl_to_rgb(h, s, l);
        px[0] = r;
        px[1] = g;
        px[2] = b;
    }
    Ok(page)
}

/// Convert the page to the CMYK output model.
///
/// Grayscale and CMYK inputs are normalized through RGB first, so every input
/// model lands on the same four-channel layout.
pub fn convert_to_cmyk(page: RasterPage) -> crate::error::Result<RasterPage> {
    if page.model() == ColorModel::Cmyk {
        return Ok(page);
    }
    let page = page.into_rgb();

    let (width, height, density) = (page.width(), page.height(), page.density());
    let mut data = Vec::with_capacity(page.pixel_count() * 4);
    for px in page.into_data().chunks_exact(3) {
        let (r, g, b) = (px[0] as u32, px[1] as u32, px[2] as u32);
        let k = 255 - r.max(g).max(b);
        if k == 255 {
            data.extend_from_slice(&[0, 0, 0, 255]);
            continue;
        }
        // ink = (255 - channel - k) / (1 - k/255), kept in integer math
        let c = ((255 - r - k) * 255 / (255 - k)) as u8;
        let m = ((255 - g - k) * 255 / (255 - k)) as u8;
        let y = ((255 - b - k) * 255 / (255 - k)) as u8;
        data.extend_from_slice(&[c, m, y, k as u8]);
    }

    RasterPage::new(width, height, ColorModel::Cmyk, density, data)
}

/// Rec. 601 integer luminance.
fn luminance(r: u8, g: u8, b: u8) -> u8 {
    ((77 * r as u32 + 150 * g as u32 + 29 * b as u32) >> 8) as u8
}

fn rgb_to_hsl(r: u8, g: u8, b: u8) -> (f64, f64, f64) {
    let (r, g, b) = (r as f64 / 255.0, g as f64 / 255.0, b as f64 / 255.0);
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        return (0.0, 0.0, l);
    }

    let delta = max - min;
    let s = if l > 0.5 {
        delta / (2.0 - max - min)
    } else {
        delta / (max + min)
    };
    let h = if max == r {
        60.0 * ((g - b) / delta).rem_euclid(6.0)
    } else if max == g {
        60.0 * ((b - r) / delta + 2.0)
    } else {
        60.0 * ((r - g) / delta + 4.0)
    };
    (h, s, l)
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    if s == 0.0 {
        let v = (l * 255.0).round().clamp(0.0, 255.0) as u8;
        return (v, v, v);
    }

    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0).rem_euclid(2.0) - 1.0).abs());
    let m = l - c / 2.0;

    let (r1, g1, b1) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r1), to_u8(g1), to_u8(b1))
}
