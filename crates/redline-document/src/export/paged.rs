// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Paged PDF writer — tile one tall raster across fixed-size pages using
// `printpdf` 0.8.
//
// The bitmap is scaled to the page width and embedded once; every page places
// the same XObject shifted up by one page height more than the previous page,
// so each page shows the next slice.

use image::RgbImage;
use printpdf::{
    Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, PdfWarnMsg, Pt, RawImage, RawImageData,
    RawImageFormat, XObjectTransform,
};
use redline_core::PaperSize;
use redline_core::error::{RedlineError, Result};
use tracing::{debug, info, instrument, warn};

const MM_PER_INCH: f32 = 25.4;

/// Vertical placement of the image on each successive page, in page units.
///
/// The first page shows the image from its top (offset 0). Each further page
/// shifts it up by one page height, until the whole image height is covered.
/// An image of 3.5 page heights yields 4 offsets, one of exactly 3 yields 3.
pub fn tile_offsets(image_height: f32, page_height: f32) -> Vec<f32> {
    let mut offsets = vec![0.0];
    if page_height <= 0.0 {
        return offsets;
    }
    let mut height_left = image_height - page_height;
    while height_left > 0.0 {
        offsets.push(height_left - image_height);
        height_left -= page_height;
    }
    offsets
}

/// Builds a multi-page PDF from a single raster image.
pub struct PagedPdfWriter {
    paper_size: PaperSize,
    /// Title metadata embedded in the PDF /Info dictionary.
    title: Option<String>,
}

impl PagedPdfWriter {
    pub fn new(paper_size: PaperSize) -> Self {
        Self {
            paper_size,
            title: None,
        }
    }

    /// Set a title for the PDF metadata.
    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = Some(title.into());
    }

    fn page_dimensions(&self) -> (Mm, Mm) {
        let (w_mm, h_mm) = self.paper_size.dimensions_mm();
        (Mm(w_mm as f32), Mm(h_mm as f32))
    }

    /// Height in millimetres the image takes once scaled to page width.
    pub fn scaled_height_mm(&self, image: &RgbImage) -> f32 {
        let (page_w, _) = self.page_dimensions();
        image.height() as f32 * page_w.0 / image.width() as f32
    }

    /// Lay `image` out across as many pages as its scaled height needs.
    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    pub fn create_from_raster(&self, image: RgbImage) -> Result<Vec<u8>> {
        if image.width() == 0 || image.height() == 0 {
            return Err(RedlineError::PdfError("cannot paginate an empty image".into()));
        }

        let (page_w, page_h) = self.page_dimensions();
        if page_w.0 <= 0.0 || page_h.0 <= 0.0 {
            return Err(RedlineError::PdfError(format!(
                "invalid page size {:?}",
                self.paper_size
            )));
        }

        let title = self.title.as_deref().unwrap_or("Revised Document");
        let image_h_mm = self.scaled_height_mm(&image);
        let offsets = tile_offsets(image_h_mm, page_h.0);

        info!(
            paper = ?self.paper_size,
            image_h_mm,
            pages = offsets.len(),
            "Paginating raster"
        );

        let (width_px, height_px) = image.dimensions();
        let raw = RawImage {
            pixels: RawImageData::U8(image.into_raw()),
            width: width_px as usize,
            height: height_px as usize,
            data_format: RawImageFormat::RGB8,
            tag: Vec::new(),
        };

        let mut doc = PdfDocument::new(title);
        let xobject_id = doc.add_image(&raw);

        // Pixels per inch that make the image exactly one page wide.
        let dpi = width_px as f32 / (page_w.0 / MM_PER_INCH);
        let page_h_pt = page_h.into_pt().0;
        let image_h_pt = Mm(image_h_mm).into_pt().0;

        let pages: Vec<PdfPage> = offsets
            .iter()
            .map(|offset_mm| {
                // PDF space grows upwards; the offset is measured from the top.
                let position_pt = Mm(*offset_mm).into_pt().0;
                let ops = vec![Op::UseXobject {
                    id: xobject_id.clone(),
                    transform: XObjectTransform {
                        translate_x: Some(Pt(0.0)),
                        translate_y: Some(Pt(page_h_pt - position_pt - image_h_pt)),
                        scale_x: None,
                        scale_y: None,
                        dpi: Some(dpi),
                        rotate: None,
                    },
                }];
                PdfPage::new(page_w, page_h, ops)
            })
            .collect();

        doc.with_pages(pages);

        let mut warnings: Vec<PdfWarnMsg> = Vec::new();
        let output = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            warn!(count = warnings.len(), "PDF serialisation reported warnings");
        }

        debug!(output_bytes = output.len(), dpi, "Paged PDF written");
        Ok(output)
    }
}
