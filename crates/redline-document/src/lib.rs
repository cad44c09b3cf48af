// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// redline-document — Getting text out of uploaded originals and revised text
// back out as files.
//
// Provides text extraction (plain text, PDF, legacy Word), the export pipeline
// (plain text, text downgrade, rasterized multi-page PDF), a single in-flight
// export gate, and scoped preview handles for the original.

pub mod export;
pub mod extract;
pub mod integrity;
pub mod preview;

pub use export::gate::{ExportGate, ExportTicket};
pub use export::paged::PagedPdfWriter;
pub use export::raster::TextRasterizer;
pub use export::{ExportArtifact, ExportPipeline, ExportStrategy, Exporter};
pub use extract::{DefaultExtractor, PdfReader, TextExtractor};
pub use preview::{PreviewHandle, PreviewKind, PreviewRegistry, PreviewSlot};
