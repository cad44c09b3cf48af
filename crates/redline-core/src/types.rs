// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Redline review engine.

use serde::{Deserialize, Serialize};

/// Identity of a finding: its zero-based position in the owning [`FindingSet`].
///
/// Two findings with the same statement text are still distinct findings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FindingId(pub usize);

impl std::fmt::Display for FindingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// How serious a finding is, as judged by the analyzer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
        };
        f.write_str(label)
    }
}

/// A single risk finding produced by the external analyzer.
///
/// Field names on the wire follow the analyzer's JSON (`clause`,
/// `clauseSection`); the `clauseRef` / `clauseTitle` spellings are accepted as
/// aliases.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Literal substring expected somewhere in the source text.
    pub statement: String,
    /// Description of the risk.
    #[serde(default)]
    pub factor: String,
    pub severity: Severity,
    /// General advice for improving the statement.
    #[serde(default)]
    pub suggestion: String,
    /// Number of the related clause in the analyzer's rulebook.
    #[serde(
        rename = "clause",
        alias = "clauseRef",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub clause_ref: Option<String>,
    /// Title of the related clause section.
    #[serde(
        rename = "clauseSection",
        alias = "clauseTitle",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub clause_title: Option<String>,
    /// Complete replacement text for `statement`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewrite: Option<String>,
}

impl Finding {
    /// Convenience constructor for a finding without clause metadata.
    pub fn new(
        statement: impl Into<String>,
        severity: Severity,
        factor: impl Into<String>,
        suggestion: impl Into<String>,
    ) -> Self {
        Self {
            statement: statement.into(),
            factor: factor.into(),
            severity,
            suggestion: suggestion.into(),
            clause_ref: None,
            clause_title: None,
            rewrite: None,
        }
    }

    /// Builder-style setter for the rewrite.
    pub fn with_rewrite(mut self, rewrite: impl Into<String>) -> Self {
        self.rewrite = Some(rewrite.into());
        self
    }

    /// Builder-style setter for the related clause.
    pub fn with_clause(mut self, number: Option<&str>, title: Option<&str>) -> Self {
        self.clause_ref = number.map(str::to_owned);
        self.clause_title = title.map(str::to_owned);
        self
    }
}

/// Placeholder the analyzer contract substitutes for a missing rewrite.
pub const REWRITE_PLACEHOLDER_SUFFIX: &str = " [suggested revision needed]";

/// The immutable list of findings for one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FindingSet {
    findings: Vec<Finding>,
}

impl FindingSet {
    pub fn new(findings: Vec<Finding>) -> Self {
        Self { findings }
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// Look up a finding by identity.
    pub fn get(&self, id: FindingId) -> Option<&Finding> {
        self.findings.get(id.0)
    }

    /// Iterate findings together with their identities, in set order.
    pub fn iter(&self) -> impl Iterator<Item = (FindingId, &Finding)> {
        self.findings
            .iter()
            .enumerate()
            .map(|(idx, finding)| (FindingId(idx), finding))
    }

    /// Give every finding with a missing or empty rewrite the placeholder
    /// `"{statement} [suggested revision needed]"`.
    pub fn with_placeholder_rewrites(self) -> Self {
        let findings = self
            .findings
            .into_iter()
            .map(|mut finding| {
                if finding.rewrite.as_deref().is_none_or(str::is_empty) {
                    finding.rewrite =
                        Some(format!("{}{}", finding.statement, REWRITE_PLACEHOLDER_SUFFIX));
                }
                finding
            })
            .collect();
        Self { findings }
    }

    /// Human summary shown above the overlay.
    pub fn summary(&self) -> String {
        format!("{} potential risks identified", self.findings.len())
    }
}

impl From<Vec<Finding>> for FindingSet {
    fn from(findings: Vec<Finding>) -> Self {
        Self::new(findings)
    }
}

/// Flavour of word-processor document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WordFormat {
    /// Office Open XML (`.docx`).
    Docx,
    /// Legacy binary Word (`.doc`).
    Doc,
}

/// The closed set of origin formats an uploaded document can have.
///
/// Detection looks only at the declared MIME type and the file name, never at
/// the bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OriginFormat {
    PlainText,
    Pdf,
    WordProcessor(WordFormat),
    Other,
}

pub const MIME_TEXT: &str = "text/plain";
pub const MIME_PDF: &str = "application/pdf";
pub const MIME_DOCX: &str = "application/vnd.openxmlformats-officedocument.wordprocessingml.document";
pub const MIME_DOC: &str = "application/msword";

impl OriginFormat {
    /// Classify a document from its file name and declared MIME type.
    ///
    /// Checked in order: text, PDF, Word, anything else.
    pub fn detect(file_name: &str, mime_type: Option<&str>) -> Self {
        let mime = mime_type.unwrap_or("").trim().to_ascii_lowercase();
        let name = file_name.to_ascii_lowercase();

        if mime == MIME_TEXT || name.ends_with(".txt") {
            return Self::PlainText;
        }
        if mime == MIME_PDF || name.ends_with(".pdf") {
            return Self::Pdf;
        }
        if mime == MIME_DOCX || name.ends_with(".docx") {
            return Self::WordProcessor(WordFormat::Docx);
        }
        if mime == MIME_DOC || name.ends_with(".doc") {
            return Self::WordProcessor(WordFormat::Doc);
        }
        if mime.contains("word") {
            return Self::WordProcessor(WordFormat::Docx);
        }
        Self::Other
    }

    /// Canonical MIME type for this origin.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::PlainText => MIME_TEXT,
            Self::Pdf => MIME_PDF,
            Self::WordProcessor(WordFormat::Docx) => MIME_DOCX,
            Self::WordProcessor(WordFormat::Doc) => MIME_DOC,
            Self::Other => "application/octet-stream",
        }
    }
}

/// The uploaded original: its name, declared MIME type, and detected format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentOrigin {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub format: OriginFormat,
}

impl DocumentOrigin {
    pub fn new(file_name: impl Into<String>, mime_type: Option<String>) -> Self {
        let file_name = file_name.into();
        let format = OriginFormat::detect(&file_name, mime_type.as_deref());
        Self {
            file_name,
            mime_type,
            format,
        }
    }

    /// Build an origin from a path on disk, with no declared MIME type.
    pub fn from_path(path: &std::path::Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(name, None)
    }
}

/// Standard paper sizes for paged export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaperSize {
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom { width_mm: u32, height_mm: u32 },
}

impl PaperSize {
    /// Dimensions in millimetres (width, height).
    pub fn dimensions_mm(&self) -> (u32, u32) {
        match self {
            Self::A4 => (210, 297),
            Self::A3 => (297, 420),
            Self::A5 => (148, 210),
            Self::Letter => (216, 279),
            Self::Legal => (216, 356),
            Self::Custom {
                width_mm,
                height_mm,
            } => (*width_mm, *height_mm),
        }
    }
}
