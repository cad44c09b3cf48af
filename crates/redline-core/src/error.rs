// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Redline.
//
// A statement that cannot be located while building the overlay is not an
// error: the matcher drops the finding silently. Likewise the plain-text
// downgrade of unsupported origins is an export strategy, not a failure.

use thiserror::Error;

use crate::types::FindingId;

/// Top-level error type for all Redline operations.
#[derive(Debug, Error)]
pub enum RedlineError {
    // -- Revision errors --
    #[error("finding {0} has no rewrite to apply")]
    InvalidRewrite(FindingId),

    #[error("statement for finding {0} is not present in the current document")]
    StatementNotFound(FindingId),

    #[error("finding {0} has already been accepted")]
    AlreadyAccepted(FindingId),

    #[error("no finding with id {0} in the current finding set")]
    UnknownFinding(FindingId),

    // -- Export errors --
    #[error("export failed: {0}")]
    ExportFailure(String),

    #[error("an export is already in progress")]
    ExportInProgress,

    #[error("PDF operation failed: {0}")]
    PdfError(String),

    #[error("image rendering failed: {0}")]
    ImageError(String),

    // -- Collaborator errors --
    #[error("unsupported document type: {0}")]
    UnsupportedFormat(String),

    #[error("text extraction failed: {0}")]
    Extraction(String),

    #[error("analyzer is not configured: {0}")]
    Configuration(String),

    #[error("analyzer returned an unusable response: {0}")]
    Upstream(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl RedlineError {
    /// Fold any failure raised while building an export artifact into the
    /// single user-facing `ExportFailure` condition.
    ///
    /// `ExportInProgress` passes through unchanged: it is a rejected trigger,
    /// not a failed export.
    pub fn into_export_failure(self) -> Self {
        match self {
            Self::ExportFailure(_) | Self::ExportInProgress => self,
            other => Self::ExportFailure(other.to_string()),
        }
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, RedlineError>;
