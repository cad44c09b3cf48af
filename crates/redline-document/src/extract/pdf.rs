// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// PDF reader — load PDF bytes with `lopdf` and pull their text.

use lopdf::Document;
use redline_core::error::{RedlineError, Result};
use tracing::{debug, info, instrument, warn};

use super::printable::text_runs;

/// Shortest byte run the fallback keeps.
const FALLBACK_MIN_RUN: usize = 4;
/// The fallback result is only trusted above this many characters.
const FALLBACK_MIN_TEXT: usize = 100;

/// Reads existing PDF files.
pub struct PdfReader {
    document: Document,
}

impl PdfReader {
    /// Create a reader from raw PDF bytes already in memory.
    #[instrument(skip_all, fields(bytes_len = data.len()))]
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let document = Document::load_mem(data).map_err(|err| {
            RedlineError::PdfError(format!("failed to load PDF from memory: {}", err))
        })?;

        debug!(pages = document.get_pages().len(), "PDF loaded from bytes");

        Ok(Self { document })
    }

    pub fn page_count(&self) -> usize {
        self.document.get_pages().len()
    }

    /// Text of every page, in page order.
    #[instrument(skip(self))]
    pub fn extract_text(&self) -> Result<String> {
        let mut page_numbers: Vec<u32> = self.document.get_pages().keys().copied().collect();
        page_numbers.sort_unstable();

        let text = self
            .document
            .extract_text(&page_numbers)
            .map_err(|err| RedlineError::PdfError(format!("text extraction failed: {}", err)))?;

        debug!(pages = page_numbers.len(), chars = text.len(), "PDF text extracted");
        Ok(text)
    }
}

/// Text of a PDF document.
///
/// Uses the content streams when they parse and carry text; otherwise falls
/// back to scraping readable runs from the raw bytes.
#[instrument(skip_all, fields(bytes_len = data.len()))]
pub fn extract_pdf_text(data: &[u8]) -> Result<String> {
    match PdfReader::from_bytes(data).and_then(|reader| reader.extract_text()) {
        Ok(text) if !text.trim().is_empty() => {
            info!(chars = text.len(), "text read from PDF content streams");
            return Ok(text);
        }
        Ok(_) => warn!("PDF has no extractable text, scanning raw bytes"),
        Err(err) => warn!(%err, "PDF parsing failed, scanning raw bytes"),
    }

    let text = text_runs(data, FALLBACK_MIN_RUN).join(" ");
    if text.len() > FALLBACK_MIN_TEXT {
        info!(chars = text.len(), "text recovered from raw PDF bytes");
        Ok(text)
    } else {
        Err(RedlineError::Extraction(
            "could not extract text from PDF; convert it to plain text first".into(),
        ))
    }
}
