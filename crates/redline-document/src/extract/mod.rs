// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text extraction — turn an uploaded original into the plain-text buffer that
// findings are matched against.

pub mod pdf;
pub mod printable;

use redline_core::error::{RedlineError, Result};
use redline_core::types::{DocumentOrigin, OriginFormat, WordFormat};
use tracing::{info, instrument};

pub use pdf::PdfReader;

/// Legacy Word runs shorter than this are treated as binary noise.
const DOC_MIN_RUN: usize = 21;

/// Extracts plain text from an original document.
pub trait TextExtractor {
    fn extract(&self, bytes: &[u8], origin: &DocumentOrigin) -> Result<String>;
}

/// Built-in extractor: plain text, PDF, and legacy `.doc`.
///
/// `.docx` and unknown formats are refused with `UnsupportedFormat`; plug in
/// another [`TextExtractor`] to handle them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultExtractor;

impl TextExtractor for DefaultExtractor {
    #[instrument(skip(self, bytes), fields(file = %origin.file_name, bytes_len = bytes.len()))]
    fn extract(&self, bytes: &[u8], origin: &DocumentOrigin) -> Result<String> {
        let text = match origin.format {
            OriginFormat::PlainText => String::from_utf8_lossy(bytes).into_owned(),
            OriginFormat::Pdf => pdf::extract_pdf_text(bytes)?,
            OriginFormat::WordProcessor(WordFormat::Doc) => extract_legacy_doc(bytes)?,
            OriginFormat::WordProcessor(WordFormat::Docx) | OriginFormat::Other => {
                return Err(RedlineError::UnsupportedFormat(origin.file_name.clone()));
            }
        };
        info!(format = ?origin.format, chars = text.len(), "text extracted");
        Ok(text)
    }
}

/// Scrape readable text out of a binary `.doc`.
///
/// Only runs closed by a binary byte count; printable bytes trailing at end of
/// file are dropped.
pub fn extract_legacy_doc(bytes: &[u8]) -> Result<String> {
    let closed = bytes
        .iter()
        .rposition(|b| !(0x20..=0x7E).contains(b))
        .map_or(&bytes[..0], |end| &bytes[..end]);
    let text: String = printable::printable_runs(closed, DOC_MIN_RUN)
        .into_iter()
        .flat_map(|run| [run, " "])
        .collect();
    if text.trim().is_empty() {
        return Err(RedlineError::Extraction(
            "no readable text found in DOC file".into(),
        ));
    }
    Ok(text)
}
