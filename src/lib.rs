//! Scanned-look PDF distortion.
//!
//! Renders every page of an input PDF at a configurable density, runs each
//! page through a randomized distortion pipeline (slight rotation, contrast
//! stretch, brightness modulation, CMYK conversion, Poisson grain), and
//! reassembles the pages into a single output PDF in the original order.

pub mod config;
pub mod distort;
pub mod error;
pub mod page;
pub mod pdf;
pub mod pipeline;
pub mod render;

pub use error::{Result, ScanifyError};
pub use page::{ColorModel, PageSequence, RasterPage};
pub use pipeline::job_runner::{
    ConvertedDocument, DEFAULT_DENSITY, ScanifyOptions, convert_pdf,
};
