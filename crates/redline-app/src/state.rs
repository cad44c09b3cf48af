// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Session presentation state: which panes are shown and how far the current
// export has got.

use clap::ValueEnum;
use redline_core::error::Result;
use redline_core::human_errors::humanize_error;
use redline_document::ExportArtifact;

/// Which panes of the review are shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ViewMode {
    /// The uploaded original only.
    Original,
    /// The annotated text only.
    Analyzed,
    /// Both side by side.
    #[default]
    Split,
}

impl ViewMode {
    pub fn shows_original(self) -> bool {
        matches!(self, Self::Original | Self::Split)
    }

    pub fn shows_analysis(self) -> bool {
        matches!(self, Self::Analyzed | Self::Split)
    }
}

/// Export progress stages for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStage {
    /// No export has been requested.
    Idle,
    /// The blocking worker is building the artifact.
    Rendering,
    /// The artifact is ready.
    Complete,
    /// The export failed; the document is unchanged and it can be retried.
    Failed,
}

/// Detailed export progress.
#[derive(Debug, Clone)]
pub struct ExportProgress {
    pub stage: ExportStage,
    /// Human-readable status message.
    pub message: String,
}

impl Default for ExportProgress {
    fn default() -> Self {
        Self {
            stage: ExportStage::Idle,
            message: String::new(),
        }
    }
}

impl ExportProgress {
    pub fn rendering() -> Self {
        Self {
            stage: ExportStage::Rendering,
            message: "Preparing revised document…".into(),
        }
    }

    /// Progress after an export attempt finished.
    pub fn finished(result: &Result<ExportArtifact>) -> Self {
        match result {
            Ok(artifact) => Self {
                stage: ExportStage::Complete,
                message: format!("Saved as {}", artifact.file_name),
            },
            Err(err) => {
                let notice = humanize_error(err);
                Self {
                    stage: ExportStage::Failed,
                    message: format!("{} {}", notice.message, notice.suggestion),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_core::RedlineError;

    #[test]
    fn split_shows_both_panes() {
        assert!(ViewMode::Split.shows_original() && ViewMode::Split.shows_analysis());
        assert!(!ViewMode::Original.shows_analysis());
        assert!(!ViewMode::Analyzed.shows_original());
    }

    #[test]
    fn finished_progress_reflects_outcome() {
        let ok = ExportProgress::finished(&Ok(ExportArtifact {
            file_name: "nda-revised.txt".into(),
            mime_type: "text/plain".into(),
            bytes: Vec::new(),
        }));
        assert_eq!(ok.stage, ExportStage::Complete);
        assert!(ok.message.contains("nda-revised.txt"));

        let failed = ExportProgress::finished(&Err(RedlineError::ExportFailure("boom".into())));
        assert_eq!(failed.stage, ExportStage::Failed);
        assert!(!failed.message.is_empty());
    }
}
