// Output assembly: one full-page CMYK image XObject per page, Flate-compressed.

use std::io::Write;

use flate2::Compression;
use flate2::write::ZlibEncoder;
use lopdf::{Document, Object, Stream, dictionary};

use crate::page::{ColorModel, RasterPage};

/// Assembles processed pages into a single output PDF.
///
/// Pages must be written in document order; `finish` builds the page tree and
/// catalog and serializes the document to bytes. Nothing touches the
/// filesystem here, so a failed job never leaves a partial output artifact.
pub struct ScanPageWriter {
    doc: Document,
    pages_id: lopdf::ObjectId,
    page_ids: Vec<lopdf::ObjectId>,
}

impl ScanPageWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            page_ids: Vec::new(),
        }
    }

    /// Add a full-page CMYK image XObject.
    ///
    /// Returns the XObject's object ID.
    fn add_page_xobject(&mut self, page: &RasterPage) -> crate::error::Result<lopdf::ObjectId> {
        let compressed = flate_compress(page.data())?;
        let dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => page.width() as i64,
            "Height" => page.height() as i64,
            "ColorSpace" => "DeviceCMYK",
            "BitsPerComponent" => 8,
            "Filter" => "FlateDecode",
        };
        let stream = Stream::new(dict, compressed);
        Ok(self.doc.add_object(Object::Stream(stream)))
    }

    /// Append one processed page to the document.
    ///
    /// The MediaBox is sized from the page's pixel dimensions and density
    /// (`px * 72 / density` points), so the output page keeps the physical
    /// size the input was rendered from.
    pub fn write_page(&mut self, page: &RasterPage) -> crate::error::Result<lopdf::ObjectId> {
        if page.model() != ColorModel::Cmyk {
            return Err(crate::error::ScanifyError::encode(format!(
                "encoder requires CMYK pages, got {:?}",
                page.model()
            )));
        }
        if page.width() == 0 || page.height() == 0 || page.density() == 0 {
            return Err(crate::error::ScanifyError::encode(format!(
                "cannot encode {}x{} page at density {}",
                page.width(),
                page.height(),
                page.density()
            )));
        }

        let image_id = self.add_page_xobject(page)?;

        let width_pts = page.width() as f64 * 72.0 / page.density() as f64;
        let height_pts = page.height() as f64 * 72.0 / page.density() as f64;

        let mut xobject_dict = lopdf::Dictionary::new();
        xobject_dict.set("PgImg", Object::Reference(image_id));
        let resources_id = self.doc.add_object(dictionary! {
            "XObject" => Object::Dictionary(xobject_dict),
        });

        // Scale the unit image square up to the page rectangle.
        let content_bytes =
            format!("q {width_pts:.4} 0 0 {height_pts:.4} 0 0 cm /PgImg Do Q").into_bytes();
        let content_id = self
            .doc
            .add_object(Object::Stream(Stream::new(dictionary! {}, content_bytes)));

        let page_id = self.doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(width_pts as f32),
                Object::Real(height_pts as f32),
            ],
            "Resources" => resources_id,
            "Contents" => content_id,
        });

        self.page_ids.push(page_id);
        Ok(page_id)
    }

    /// Build the page tree and catalog, then serialize the document.
    pub fn finish(mut self) -> crate::error::Result<Vec<u8>> {
        if self.page_ids.is_empty() {
            return Err(crate::error::ScanifyError::encode(
                "no pages were written to the output document",
            ));
        }

        let kids: Vec<Object> = self.page_ids.iter().map(|&id| id.into()).collect();
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.doc
            .objects
            .insert(self.pages_id, Object::Dictionary(pages));

        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut buf = Vec::new();
        self.doc
            .save_to(&mut buf)
            .map_err(|e| crate::error::ScanifyError::encode(e.to_string()))?;
        Ok(buf)
    }
}

impl Default for ScanPageWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Compress raw pixel bytes for a `FlateDecode` image stream.
fn flate_compress(data: &[u8]) -> crate::error::Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|e| crate::error::ScanifyError::encode(format!("flate compression failed: {e}")))
}
