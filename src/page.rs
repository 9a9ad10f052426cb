// Raster page model: interleaved pixel buffer + color model tag + density.

use crate::error::ScanifyError;

/// Color model of a page's pixel buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorModel {
    /// 3 channels, additive.
    Rgb,
    /// 1 channel, luminance only.
    Gray,
    /// 4 channels, subtractive (cyan, magenta, yellow, key).
    Cmyk,
}

impl ColorModel {
    /// Number of interleaved channels per pixel.
    pub fn channels(self) -> usize {
        match self {
            ColorModel::Rgb => 3,
            ColorModel::Gray => 1,
            ColorModel::Cmyk => 4,
        }
    }
}

/// One raster page of a document.
///
/// Owns its pixel buffer; pipeline stages take the page by value and return a
/// new (or mutated) page, so ownership moves stage to stage without aliasing.
/// The density records the DPI the page was rasterized at and is carried
/// through to the encoder, which sizes the output MediaBox from it.
#[derive(Debug, Clone)]
pub struct RasterPage {
    width: u32,
    height: u32,
    model: ColorModel,
    density: u32,
    data: Vec<u8>,
}

impl RasterPage {
    /// Construct a page from an interleaved pixel buffer.
    ///
    /// The buffer length must equal `width * height * model.channels()`.
    /// Zero-dimension pages are representable (the geometric stage rejects
    /// them), but a buffer of the wrong size is not.
    pub fn new(
        width: u32,
        height: u32,
        model: ColorModel,
        density: u32,
        data: Vec<u8>,
    ) -> crate::error::Result<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|n| n.checked_mul(model.channels()))
            .ok_or_else(|| {
                ScanifyError::decode(format!(
                    "overflow computing buffer size for {width}x{height} page"
                ))
            })?;

        if data.len() != expected {
            return Err(ScanifyError::decode(format!(
                "pixel buffer size mismatch for {width}x{height} {model:?} page: expected {expected} bytes, got {}",
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            model,
            density,
            data,
        })
    }

    /// Wrap a decoded RGB image as a page at the given density.
    pub fn from_rgb_image(image: image::RgbImage, density: u32) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            model: ColorModel::Rgb,
            density,
            data: image.into_raw(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn model(&self) -> ColorModel {
        self.model
    }

    pub fn density(&self) -> u32 {
        self.density
    }

    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Normalize the page to the RGB working model.
    ///
    /// Grayscale is widened to three equal channels; CMYK is inverted back to
    /// additive values. RGB pages pass through untouched. The distortion
    /// stages operate on RGB up to the tonal conversion, so every input model
    /// converges on CMYK output.
    pub fn into_rgb(self) -> Self {
        match self.model {
            ColorModel::Rgb => self,
            ColorModel::Gray => {
                let data = self.data.iter().flat_map(|&v| [v, v, v]).collect();
                Self {
                    model: ColorModel::Rgb,
                    data,
                    ..self
                }
            }
            ColorModel::Cmyk => {
                let mut data = Vec::with_capacity(self.pixel_count() * 3);
                for px in self.data.chunks_exact(4) {
                    let k = px[3] as u32;
                    for &ink in &px[..3] {
                        // v = (255 - ink) * (255 - k), rescaled to 0..=255
                        data.push(((255 - ink as u32) * (255 - k) / 255) as u8);
                    }
                }
                Self {
                    model: ColorModel::Rgb,
                    data,
                    ..self
                }
            }
        }
    }
}

/// Ordered pages of one document, decode order == output order.
pub type PageSequence = Vec<RasterPage>;
