// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Highlight state and finding cards — the interactive side of the overlay.
//
// The matcher stays a pure function; which finding the pointer is over is
// tracked here and re-validated whenever a fresh overlay is computed.

use redline_core::types::{Finding, FindingId, Severity};
use serde::Serialize;
use tracing::trace;

use crate::matcher::Segment;

/// The finding currently under the pointer, if any.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Highlight {
    active: Option<FindingId>,
}

impl Highlight {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer entered the segment of finding `id`.
    pub fn hover(&mut self, id: FindingId) {
        trace!(finding = %id, "highlight");
        self.active = Some(id);
    }

    /// Pointer left the highlighted segment.
    pub fn leave(&mut self) {
        self.active = None;
    }

    pub fn active(&self) -> Option<FindingId> {
        self.active
    }

    /// Drop the highlight if its finding is absent from `segments`.
    pub fn retain(&mut self, segments: &[Segment<'_>]) {
        if let Some(id) = self.active {
            let still_shown = segments
                .iter()
                .any(|segment| segment.finding().is_some_and(|(seg_id, _)| seg_id == id));
            if !still_shown {
                self.active = None;
            }
        }
    }
}

/// Everything the tooltip for one finding displays.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FindingCard {
    pub id: FindingId,
    pub risk_level: Severity,
    /// `"Clause 5: Obligations of Recipient"`, `"Clause 5: General"`, or just
    /// the title when no number is known.
    pub clause: Option<String>,
    pub factor: String,
    pub suggestion: String,
    pub rewrite: Option<String>,
    /// Whether the "apply rewrite" action is offered.
    pub can_apply: bool,
}

impl FindingCard {
    pub fn new(id: FindingId, finding: &Finding) -> Self {
        Self {
            id,
            risk_level: finding.severity,
            clause: clause_line(finding),
            factor: finding.factor.clone(),
            suggestion: finding.suggestion.clone(),
            rewrite: finding.rewrite.clone(),
            can_apply: finding.rewrite.is_some(),
        }
    }
}

fn clause_line(finding: &Finding) -> Option<String> {
    if finding.clause_ref.is_none() && finding.clause_title.is_none() {
        return None;
    }
    let title = finding.clause_title.as_deref().unwrap_or("General");
    Some(match finding.clause_ref.as_deref() {
        Some(number) => format!("Clause {number}: {title}"),
        None => title.to_owned(),
    })
}
