// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Revision ledger — sole owner of the live document buffer.
//
// Accepting a rewrite replaces the first (unprotected) occurrence of the
// finding's statement, records the finding as accepted, and bumps the
// generation so callers know the overlay is stale. A rejected acceptance
// never touches the buffer.
//
// Acceptances are keyed by `FindingId` (position in the finding set), not by
// statement text, so duplicate statements are tracked separately.

use std::collections::BTreeMap;
use std::ops::Range;

use chrono::{DateTime, Utc};
use redline_core::config::MatchingConfig;
use redline_core::error::{RedlineError, Result};
use redline_core::types::{FindingId, FindingSet};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::matcher::{Candidate, Segment, match_segments};
use crate::spans::{ProtectedSpans, shift_span};

/// One entry of the acceptance record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AcceptedRewrite {
    /// Statement text as it appeared before the rewrite.
    pub statement: String,
    /// Text that replaced it.
    pub rewrite: String,
    /// Where the rewrite currently sits in the buffer. `None` once a later
    /// edit has cut into it.
    pub span: Option<Range<usize>>,
    pub accepted_at: DateTime<Utc>,
}

/// Outcome of a successful acceptance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Revision {
    pub id: FindingId,
    /// Byte range of the rewrite in the new buffer.
    pub span: Range<usize>,
    /// Change in buffer length, `len(rewrite) - len(statement)`.
    pub delta: isize,
    /// Ledger generation after the edit.
    pub generation: u64,
}

/// Owns the document buffer and the record of accepted findings.
#[derive(Debug, Clone)]
pub struct RevisionLedger {
    buffer: String,
    accepted: BTreeMap<FindingId, AcceptedRewrite>,
    protected: ProtectedSpans,
    protect_accepted: bool,
    generation: u64,
}

impl RevisionLedger {
    /// Start a ledger over freshly extracted original text.
    pub fn new(original: impl Into<String>, matching: &MatchingConfig) -> Self {
        Self {
            buffer: original.into(),
            accepted: BTreeMap::new(),
            protected: ProtectedSpans::new(),
            protect_accepted: matching.protect_accepted_spans,
            generation: 0,
        }
    }

    /// Read-only view of the current buffer.
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Owned copy of the buffer, for work that outlives this borrow (export).
    pub fn snapshot(&self) -> String {
        self.buffer.clone()
    }

    /// Bumped on every mutation; an overlay computed at an older generation
    /// is stale.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_accepted(&self, id: FindingId) -> bool {
        self.accepted.contains_key(&id)
    }

    /// The acceptance record, ordered by finding id.
    pub fn accepted(&self) -> &BTreeMap<FindingId, AcceptedRewrite> {
        &self.accepted
    }

    /// Byte ranges currently occupied by applied rewrites.
    pub fn revised_spans(&self) -> &ProtectedSpans {
        &self.protected
    }

    /// Findings that may still be matched: everything not yet accepted.
    pub fn candidates<'a>(&self, findings: &'a FindingSet) -> Vec<Candidate<'a>> {
        findings
            .iter()
            .filter(|(id, _)| !self.accepted.contains_key(id))
            .map(|(id, finding)| Candidate { id, finding })
            .collect()
    }

    /// Compute the overlay for the current buffer.
    pub fn segments<'a>(&'a self, findings: &'a FindingSet) -> Vec<Segment<'a>> {
        let candidates = self.candidates(findings);
        match_segments(&self.buffer, &candidates, self.search_spans())
    }

    fn search_spans(&self) -> &ProtectedSpans {
        static UNPROTECTED: ProtectedSpans = ProtectedSpans::empty();
        if self.protect_accepted {
            &self.protected
        } else {
            &UNPROTECTED
        }
    }

    /// Apply the rewrite of finding `id`.
    #[instrument(skip(self, findings), fields(finding = %id))]
    pub fn accept(&mut self, findings: &FindingSet, id: FindingId) -> Result<Revision> {
        let finding = findings.get(id).ok_or(RedlineError::UnknownFinding(id))?;

        if self.accepted.contains_key(&id) {
            warn!("rewrite already applied");
            return Err(RedlineError::AlreadyAccepted(id));
        }
        let rewrite = finding
            .rewrite
            .as_deref()
            .ok_or(RedlineError::InvalidRewrite(id))?;

        let statement = finding.statement.as_str();
        let start = self
            .search_spans()
            .find(&self.buffer, statement, 0)
            .ok_or(RedlineError::StatementNotFound(id))?;
        let end = start + statement.len();

        self.buffer.replace_range(start..end, rewrite);
        self.protected
            .apply_edit(start, statement.len(), rewrite.len());
        self.shift_recorded_spans(start, statement.len(), rewrite.len());
        let span = start..start + rewrite.len();
        self.protected.insert(span.clone());

        self.accepted.insert(
            id,
            AcceptedRewrite {
                statement: statement.to_owned(),
                rewrite: rewrite.to_owned(),
                span: Some(span.clone()),
                accepted_at: Utc::now(),
            },
        );
        self.generation += 1;

        let delta = rewrite.len() as isize - statement.len() as isize;
        info!(
            start,
            delta,
            generation = self.generation,
            "rewrite applied"
        );

        Ok(Revision {
            id,
            span,
            delta,
            generation: self.generation,
        })
    }

    /// Replace the buffer with a new original and forget every acceptance.
    #[instrument(skip(self, original))]
    pub fn reset(&mut self, original: impl Into<String>) {
        self.buffer = original.into();
        let cleared = self.accepted.len();
        self.accepted.clear();
        self.protected.clear();
        self.generation += 1;
        info!(
            cleared,
            buffer_len = self.buffer.len(),
            generation = self.generation,
            "ledger reset"
        );
    }

    /// Move each recorded span along with an edit.
    fn shift_recorded_spans(&mut self, at: usize, removed: usize, inserted: usize) {
        for entry in self.accepted.values_mut() {
            if let Some(span) = entry.span.take() {
                entry.span = shift_span(&span, at, removed, inserted);
                if entry.span.is_none() {
                    debug!(statement = %entry.statement, "accepted rewrite was cut by a later edit");
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redline_core::types::{Finding, Severity};

    const NDA: &str = "The Recipient may disclose Confidential Information to any third party.";

    fn finding(statement: &str) -> Finding {
        Finding::new(statement, Severity::High, "factor", "suggestion")
    }

    fn ledger(text: &str) -> RevisionLedger {
        RevisionLedger::new(text, &MatchingConfig::default())
    }

    fn text_only_ledger(text: &str) -> RevisionLedger {
        RevisionLedger::new(
            text,
            &MatchingConfig {
                protect_accepted_spans: false,
            },
        )
    }

    #[test]
    fn accept_replaces_statement_with_rewrite() {
        let findings = FindingSet::new(vec![
            finding("to any third party.")
                .with_rewrite("only to Representatives bound by confidentiality."),
        ]);
        let mut ledger = ledger(NDA);

        let revision = ledger.accept(&findings, FindingId(0)).expect("accept");

        assert!(ledger.buffer().ends_with(
            "Confidential Information only to Representatives bound by confidentiality."
        ));
        assert_eq!(
            ledger.buffer().len() as isize,
            NDA.len() as isize + revision.delta
        );
        assert_eq!(
            revision.delta,
            "only to Representatives bound by confidentiality.".len() as isize
                - "to any third party.".len() as isize
        );
        assert_eq!(revision.generation, 1);
        assert!(ledger.is_accepted(FindingId(0)));
    }

    #[test]
    fn only_first_occurrence_is_replaced() {
        let findings = FindingSet::new(vec![finding("may").with_rewrite("shall")]);
        let mut ledger = ledger("A may B may C");
        ledger.accept(&findings, FindingId(0)).expect("accept");
        assert_eq!(ledger.buffer(), "A shall B may C");
    }

    #[test]
    fn missing_rewrite_leaves_buffer_untouched() {
        let findings = FindingSet::new(vec![finding("to any third party.")]);
        let mut ledger = ledger(NDA);

        let err = ledger.accept(&findings, FindingId(0)).unwrap_err();
        assert!(matches!(err, RedlineError::InvalidRewrite(FindingId(0))));
        assert_eq!(ledger.buffer(), NDA);
        assert!(ledger.accepted().is_empty());
        assert_eq!(ledger.generation(), 0);
    }

    #[test]
    fn reapplying_is_rejected_without_mutation() {
        let findings = FindingSet::new(vec![finding("third party").with_rewrite("affiliate")]);
        let mut ledger = ledger(NDA);
        ledger.accept(&findings, FindingId(0)).expect("accept");
        let after_first = ledger.snapshot();

        let err = ledger.accept(&findings, FindingId(0)).unwrap_err();
        assert!(matches!(err, RedlineError::AlreadyAccepted(_)));
        assert_eq!(ledger.buffer(), after_first);
    }

    #[test]
    fn vanished_statement_is_rejected() {
        // Both findings flag the same single passage.
        let findings = FindingSet::new(vec![
            finding("third party").with_rewrite("affiliate"),
            finding("third party").with_rewrite("contractor"),
        ]);
        let mut ledger = ledger(NDA);
        ledger.accept(&findings, FindingId(0)).expect("accept");

        let err = ledger.accept(&findings, FindingId(1)).unwrap_err();
        assert!(matches!(err, RedlineError::StatementNotFound(FindingId(1))));
        assert!(ledger.buffer().contains("affiliate"));
        assert!(!ledger.is_accepted(FindingId(1)));
    }

    #[test]
    fn unknown_finding_is_rejected() {
        let findings = FindingSet::default();
        let mut ledger = ledger(NDA);
        assert!(matches!(
            ledger.accept(&findings, FindingId(7)),
            Err(RedlineError::UnknownFinding(FindingId(7)))
        ));
    }

    #[test]
    fn accepted_findings_leave_the_overlay() {
        let findings = FindingSet::new(vec![
            finding("may disclose").with_rewrite("shall not disclose"),
            finding("third party"),
        ]);
        let mut ledger = ledger(NDA);
        assert_eq!(
            ledger.segments(&findings).iter().filter(|s| s.is_annotated()).count(),
            2
        );

        ledger.accept(&findings, FindingId(0)).expect("accept");
        let segments = ledger.segments(&findings);
        let ids: Vec<_> = segments
            .iter()
            .filter_map(|s| s.finding().map(|(id, _)| id))
            .collect();
        assert_eq!(ids, vec![FindingId(1)]);
        assert_eq!(
            segments.iter().map(|s| s.text).collect::<String>(),
            ledger.buffer()
        );
    }

    #[test]
    fn duplicate_statements_are_revised_one_at_a_time() {
        let text = "Either party may terminate. Either party may terminate.";
        let findings = FindingSet::new(vec![
            finding("Either party may terminate.").with_rewrite("Party A may terminate."),
            finding("Either party may terminate.").with_rewrite("Party B may terminate."),
        ]);
        let mut ledger = ledger(text);

        ledger.accept(&findings, FindingId(1)).expect("accept second");
        assert_eq!(
            ledger.buffer(),
            "Party B may terminate. Either party may terminate."
        );

        // The remaining finding now matches the remaining occurrence.
        let segments = ledger.segments(&findings);
        let annotated: Vec<_> = segments.iter().filter(|s| s.is_annotated()).collect();
        assert_eq!(annotated.len(), 1);
        assert_eq!(annotated[0].span, 23..50);

        ledger.accept(&findings, FindingId(0)).expect("accept first");
        assert_eq!(
            ledger.buffer(),
            "Party B may terminate. Party A may terminate."
        );
    }

    #[test]
    fn reset_clears_the_acceptance_record() {
        let findings = FindingSet::new(vec![finding("third party").with_rewrite("affiliate")]);
        let mut ledger = ledger(NDA);
        ledger.accept(&findings, FindingId(0)).expect("accept");

        ledger.reset(NDA);
        assert!(ledger.accepted().is_empty());
        assert!(ledger.revised_spans().is_empty());
        assert_eq!(ledger.buffer(), NDA);
        assert_eq!(ledger.generation(), 2);

        // Eligible again, both for matching and for acceptance.
        assert!(ledger.segments(&findings).iter().any(|s| s.is_annotated()));
        ledger.accept(&findings, FindingId(0)).expect("accept after reset");
    }

    #[test]
    fn rewrite_containing_statement_is_protected() {
        let findings = FindingSet::new(vec![
            finding("any third party").with_rewrite("a third party bound by confidentiality"),
            finding("third party"),
        ]);
        let mut ledger = ledger("Disclose to any third party.");
        ledger.accept(&findings, FindingId(0)).expect("accept");

        // "third party" now only occurs inside the applied rewrite.
        assert!(!ledger.segments(&findings).iter().any(|s| s.is_annotated()));
    }

    #[test]
    fn text_only_mode_matches_inside_rewrites() {
        let findings = FindingSet::new(vec![
            finding("any third party").with_rewrite("a third party bound by confidentiality"),
            finding("third party"),
        ]);
        let mut ledger = text_only_ledger("Disclose to any third party.");
        ledger.accept(&findings, FindingId(0)).expect("accept");

        let segments = ledger.segments(&findings);
        let annotated: Vec<_> = segments.iter().filter(|s| s.is_annotated()).collect();
        assert_eq!(annotated.len(), 1);
        assert_eq!(annotated[0].text, "third party");
    }

    #[test]
    fn recorded_spans_follow_later_edits() {
        let findings = FindingSet::new(vec![
            finding("disclose").with_rewrite("not disclose"),
            finding("The Recipient").with_rewrite("Recipient"),
        ]);
        let mut ledger = ledger(NDA);
        ledger.accept(&findings, FindingId(0)).expect("accept 0");
        ledger.accept(&findings, FindingId(1)).expect("accept 1");

        let span = ledger.accepted()[&FindingId(0)].span.clone().expect("span");
        assert_eq!(&ledger.buffer()[span], "not disclose");
    }
}
