// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Export pipeline — serialize the revised buffer into the format the original
// document came in, or the closest thing we can produce.
//
// The strategy is chosen from the origin's file name and declared MIME type
// only. Every failure while building an artifact is reported as a single
// `ExportFailure`; the caller's buffer is never touched.

pub mod gate;
pub mod naming;
pub mod paged;
pub mod raster;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use redline_core::config::ExportConfig;
use redline_core::error::{RedlineError, Result};
use redline_core::types::{DocumentOrigin, MIME_PDF, MIME_TEXT, OriginFormat};
use serde::Serialize;
use tracing::{error, info, instrument};

use crate::integrity::hash_bytes;
use gate::ExportGate;
use paged::PagedPdfWriter;
use raster::TextRasterizer;

/// How a revised buffer is encoded for a given origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExportStrategy {
    /// The buffer as UTF-8 text.
    PlainText,
    /// The buffer rendered to a bitmap and tiled across PDF pages.
    PagedRaster,
    /// Plain text behind a notice that the binary original was not preserved.
    TextDowngrade,
    /// Plain text under the original name with `.txt` appended.
    TextSidecar,
}

impl ExportStrategy {
    pub fn for_origin(format: OriginFormat) -> Self {
        match format {
            OriginFormat::PlainText => Self::PlainText,
            OriginFormat::Pdf => Self::PagedRaster,
            OriginFormat::WordProcessor(_) => Self::TextDowngrade,
            OriginFormat::Other => Self::TextSidecar,
        }
    }
}

/// A finished export: a named blob ready to be saved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// SHA-256 of the artifact bytes, hex-encoded.
    pub fn sha256(&self) -> String {
        hash_bytes(&self.bytes)
    }

    /// Write the artifact into `dir` under its own file name.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        info!(path = %path.display(), bytes = self.bytes.len(), "artifact written");
        Ok(path)
    }
}

/// Turns a buffer into an [`ExportArtifact`].
#[derive(Debug, Clone, Default)]
pub struct ExportPipeline {
    config: ExportConfig,
}

impl ExportPipeline {
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Export `buffer` for an original called `file_name` with an optional
    /// declared MIME type.
    pub fn export(
        &self,
        buffer: &str,
        file_name: &str,
        mime_type: Option<&str>,
    ) -> Result<ExportArtifact> {
        let origin = DocumentOrigin::new(file_name, mime_type.map(str::to_owned));
        self.export_origin(buffer, &origin)
    }

    #[instrument(skip(self, buffer), fields(file = %origin.file_name, buffer_len = buffer.len()))]
    pub fn export_origin(&self, buffer: &str, origin: &DocumentOrigin) -> Result<ExportArtifact> {
        let strategy = ExportStrategy::for_origin(origin.format);
        match self.build(buffer, origin, strategy) {
            Ok(artifact) => {
                info!(
                    ?strategy,
                    output = %artifact.file_name,
                    bytes = artifact.bytes.len(),
                    sha256 = %artifact.sha256(),
                    "export complete"
                );
                Ok(artifact)
            }
            Err(err) => {
                error!(?strategy, %err, "export failed");
                Err(err.into_export_failure())
            }
        }
    }

    fn build(
        &self,
        buffer: &str,
        origin: &DocumentOrigin,
        strategy: ExportStrategy,
    ) -> Result<ExportArtifact> {
        let file_name = naming::revised_file_name(
            &origin.file_name,
            origin.format,
            &self.config.revised_suffix,
        );

        let (mime_type, bytes) = match strategy {
            ExportStrategy::PlainText | ExportStrategy::TextSidecar => {
                (MIME_TEXT, buffer.as_bytes().to_vec())
            }
            ExportStrategy::TextDowngrade => {
                let text = format!("{}\n\n{}", self.config.downgrade_notice, buffer);
                (MIME_TEXT, text.into_bytes())
            }
            ExportStrategy::PagedRaster => (MIME_PDF, self.render_pdf(buffer, &file_name)?),
        };

        Ok(ExportArtifact {
            file_name,
            mime_type: mime_type.to_owned(),
            bytes,
        })
    }

    fn render_pdf(&self, buffer: &str, title: &str) -> Result<Vec<u8>> {
        let canvas = TextRasterizer::new(self.config.render.clone()).render(buffer)?;
        let mut writer = PagedPdfWriter::new(self.config.paper_size);
        writer.set_title(title);
        writer.create_from_raster(canvas)
    }
}

/// Async front end: runs the pipeline off the caller's thread, one export at
/// a time.
#[derive(Debug, Clone, Default)]
pub struct Exporter {
    pipeline: Arc<ExportPipeline>,
    gate: ExportGate,
}

impl Exporter {
    pub fn new(pipeline: ExportPipeline) -> Self {
        Self {
            pipeline: Arc::new(pipeline),
            gate: ExportGate::new(),
        }
    }

    pub fn gate(&self) -> &ExportGate {
        &self.gate
    }

    /// Export a snapshot of the buffer. Fails with `ExportInProgress` if
    /// another export has not finished yet.
    pub async fn export(&self, snapshot: String, origin: DocumentOrigin) -> Result<ExportArtifact> {
        let pipeline = Arc::clone(&self.pipeline);
        self.gate
            .run_blocking(move || pipeline.export_origin(&snapshot, &origin))
            .await
            .map_err(RedlineError::into_export_failure)
    }
}
