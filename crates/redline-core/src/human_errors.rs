// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable notices for reviewers.
//
// Every technical error is mapped to a plain sentence with a clear suggestion.
// The level drives how the notice is presented.

use crate::error::RedlineError;

/// How a notice should be presented to the reviewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    /// Nothing was lost; trying the same action again may work.
    Retryable,
    /// The reviewer has to change something first (pick another file, fix config).
    ActionRequired,
    /// The action cannot succeed for this document.
    Permanent,
}

/// A reviewer-facing message with an actionable suggestion.
#[derive(Debug, Clone)]
pub struct UserNotice {
    /// Plain summary (shown as a heading).
    pub message: String,
    /// What the reviewer should try (shown as body text).
    pub suggestion: String,
    /// Whether re-running the same action is worthwhile.
    pub retriable: bool,
    pub level: NoticeLevel,
}

/// Convert a `RedlineError` into a `UserNotice`.
pub fn humanize_error(err: &RedlineError) -> UserNotice {
    match err {
        // -- Revision errors --
        RedlineError::InvalidRewrite(_) => UserNotice {
            message: "This finding has no suggested rewrite.".into(),
            suggestion: "Edit the passage by hand or pick another finding.".into(),
            retriable: false,
            level: NoticeLevel::Permanent,
        },

        RedlineError::StatementNotFound(_) => UserNotice {
            message: "The flagged passage is no longer in the document.".into(),
            suggestion: "It may already have been rewritten. Nothing was changed.".into(),
            retriable: false,
            level: NoticeLevel::Permanent,
        },

        RedlineError::AlreadyAccepted(_) => UserNotice {
            message: "This rewrite has already been applied.".into(),
            suggestion: "No further action is needed for this finding.".into(),
            retriable: false,
            level: NoticeLevel::Permanent,
        },

        RedlineError::UnknownFinding(_) => UserNotice {
            message: "That finding does not belong to this document.".into(),
            suggestion: "Reload the document to refresh the list of findings.".into(),
            retriable: false,
            level: NoticeLevel::ActionRequired,
        },

        // -- Export errors --
        RedlineError::ExportFailure(detail) => UserNotice {
            message: "The revised document could not be exported.".into(),
            suggestion: format!("Your revisions are safe. Please try exporting again. ({detail})"),
            retriable: true,
            level: NoticeLevel::Retryable,
        },

        RedlineError::ExportInProgress => UserNotice {
            message: "An export is already running.".into(),
            suggestion: "Wait for it to finish, then try again.".into(),
            retriable: true,
            level: NoticeLevel::Retryable,
        },

        RedlineError::PdfError(_) | RedlineError::ImageError(_) => UserNotice {
            message: "The PDF pages could not be rendered.".into(),
            suggestion: "Your revisions are safe. Please try exporting again.".into(),
            retriable: true,
            level: NoticeLevel::Retryable,
        },

        // -- Collaborator errors --
        RedlineError::UnsupportedFormat(detail) => UserNotice {
            message: "This type of document isn't supported.".into(),
            suggestion: format!(
                "Try a plain text, PDF, or Word document instead. (File type: {detail})"
            ),
            retriable: false,
            level: NoticeLevel::ActionRequired,
        },

        RedlineError::Extraction(_) => UserNotice {
            message: "We couldn't read the text of this document.".into(),
            suggestion: "Try converting it to plain text first, then upload it again.".into(),
            retriable: false,
            level: NoticeLevel::ActionRequired,
        },

        RedlineError::Configuration(_) => UserNotice {
            message: "The document analyzer is not set up.".into(),
            suggestion: "Check the analyzer settings, then try again.".into(),
            retriable: false,
            level: NoticeLevel::ActionRequired,
        },

        RedlineError::Upstream(_) => UserNotice {
            message: "The analyzer returned something we couldn't understand.".into(),
            suggestion: "Try analyzing the document again in a moment.".into(),
            retriable: true,
            level: NoticeLevel::Retryable,
        },

        // -- Storage --
        RedlineError::Io(io_err) => UserNotice {
            message: "A file could not be read or written.".into(),
            suggestion: format!("Check that the file exists and the folder is writable. ({io_err})"),
            retriable: true,
            level: NoticeLevel::ActionRequired,
        },

        RedlineError::Serialization(_) => UserNotice {
            message: "A settings or findings file is damaged.".into(),
            suggestion: "Check the JSON file for typos, or delete it to use the defaults.".into(),
            retriable: false,
            level: NoticeLevel::ActionRequired,
        },
    }
}
