// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Analysis collaborator — the contract for whatever produces findings, plus a
// parser for the analyzer's JSON response.
//
// The analyzer answers either with a bare `{"risks": [...]}` object or with a
// chat-completion envelope whose first choice carries that object as a JSON
// string in `message.content`.

use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, info, instrument};

use crate::error::{RedlineError, Result};
use crate::types::{Finding, FindingSet};

/// Maps document text to a set of findings.
pub trait Analyzer {
    /// Analyze `text`. Fails with `Configuration` when the analyzer cannot
    /// run at all, or `Upstream` when its answer is unusable.
    fn analyze(&self, text: &str) -> Result<FindingSet>;
}

#[derive(Debug, Deserialize)]
struct RiskAnalysis {
    #[serde(default)]
    risks: Vec<Finding>,
}

#[derive(Debug, Deserialize)]
struct CompletionEnvelope {
    choices: Vec<CompletionChoice>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: CompletionMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionMessage {
    content: String,
}

/// Parse an analyzer response into a finding set.
///
/// Malformed input is reported as `Upstream`: the bytes came from the
/// analyzer, not from the reviewer.
pub fn parse_response(body: &str) -> Result<FindingSet> {
    let value: serde_json::Value = serde_json::from_str(body)
        .map_err(|err| RedlineError::Upstream(format!("response is not JSON: {err}")))?;

    let analysis: RiskAnalysis = if value.get("choices").is_some() {
        let envelope: CompletionEnvelope = serde_json::from_value(value)
            .map_err(|err| RedlineError::Upstream(format!("malformed completion: {err}")))?;
        let content = envelope
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| RedlineError::Upstream("completion has no choices".into()))?;
        debug!(content_len = content.len(), "unwrapped completion envelope");
        serde_json::from_str(&content)
            .map_err(|err| RedlineError::Upstream(format!("malformed risk analysis: {err}")))?
    } else {
        serde_json::from_value(value)
            .map_err(|err| RedlineError::Upstream(format!("malformed risk analysis: {err}")))?
    };

    Ok(FindingSet::new(analysis.risks))
}

/// Analyzer backed by a findings file produced out of band.
#[derive(Debug, Clone, Default)]
pub struct JsonFileAnalyzer {
    path: Option<PathBuf>,
    fill_missing_rewrites: bool,
}

impl JsonFileAnalyzer {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self {
            path,
            fill_missing_rewrites: false,
        }
    }

    /// Substitute the placeholder rewrite for findings that lack one.
    pub fn fill_missing_rewrites(mut self, enabled: bool) -> Self {
        self.fill_missing_rewrites = enabled;
        self
    }
}

impl Analyzer for JsonFileAnalyzer {
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    fn analyze(&self, text: &str) -> Result<FindingSet> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| RedlineError::Configuration("no findings source configured".into()))?;

        let body = std::fs::read_to_string(path).map_err(|err| {
            RedlineError::Upstream(format!("cannot read {}: {err}", path.display()))
        })?;

        let mut findings = parse_response(&body)?;
        if self.fill_missing_rewrites {
            findings = findings.with_placeholder_rewrites();
        }

        info!(
            path = %path.display(),
            findings = findings.len(),
            "findings loaded"
        );
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FindingId, Severity};

    const BARE: &str = r#"{"risks": [
        {"statement": "in perpetuity", "factor": "No end date", "severity": "High",
         "suggestion": "Limit to 3 years", "clause": "13", "clauseSection": "Termination"}
    ]}"#;

    #[test]
    fn parses_bare_analysis() {
        let set = parse_response(BARE).expect("parse");
        assert_eq!(set.len(), 1);
        let finding = set.get(FindingId(0)).expect("finding");
        assert_eq!(finding.statement, "in perpetuity");
        assert_eq!(finding.severity, Severity::High);
    }

    #[test]
    fn parses_completion_envelope() {
        let envelope = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": BARE } }]
        });
        let set = parse_response(&envelope.to_string()).expect("parse");
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn missing_risks_is_empty_set() {
        let set = parse_response("{}").expect("parse");
        assert!(set.is_empty());
    }

    #[test]
    fn garbage_is_upstream_error() {
        assert!(matches!(
            parse_response("not json"),
            Err(RedlineError::Upstream(_))
        ));
        assert!(matches!(
            parse_response(r#"{"choices": []}"#),
            Err(RedlineError::Upstream(_))
        ));
    }

    #[test]
    fn unconfigured_file_analyzer_is_configuration_error() {
        let analyzer = JsonFileAnalyzer::new(None);
        assert!(matches!(
            analyzer.analyze("text"),
            Err(RedlineError::Configuration(_))
        ));
    }

    #[test]
    fn file_analyzer_fills_placeholders() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("findings.json");
        std::fs::write(&path, BARE).expect("write");

        let analyzer = JsonFileAnalyzer::new(Some(path)).fill_missing_rewrites(true);
        let set = analyzer.analyze("anything").expect("analyze");
        assert_eq!(
            set.get(FindingId(0)).and_then(|f| f.rewrite.as_deref()),
            Some("in perpetuity [suggested revision needed]")
        );
    }

    #[test]
    fn unreadable_file_is_upstream_error() {
        let analyzer = JsonFileAnalyzer::new(Some(PathBuf::from("/nonexistent/findings.json")));
        assert!(matches!(
            analyzer.analyze("text"),
            Err(RedlineError::Upstream(_))
        ));
    }
}
