// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Segment matcher — partition a document buffer into plain and annotated
// segments in document order.
//
// Two phases:
//   1. sort candidates by the first position their statement occurs at,
//      each searched independently from the start of the buffer;
//   2. walk the sorted candidates with a single forward cursor, searching each
//      statement from the cursor and skipping candidates that are not found.
//
// The sort approximates reading order; the forward-only cursor guarantees that
// segments never overlap, even when two findings share the same statement.

use std::ops::Range;

use redline_core::types::{Finding, FindingId};
use tracing::{debug, trace};

use crate::spans::ProtectedSpans;

/// A finding that is eligible for matching in this pass.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub id: FindingId,
    pub finding: &'a Finding,
}

/// What a segment represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SegmentKind<'a> {
    /// Text with no finding attached.
    Plain,
    /// The exact statement of one finding.
    Annotated { id: FindingId, finding: &'a Finding },
}

/// One contiguous slice of the buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub kind: SegmentKind<'a>,
    /// Byte range within the buffer.
    pub span: Range<usize>,
    pub text: &'a str,
}

impl<'a> Segment<'a> {
    fn plain(buffer: &'a str, span: Range<usize>) -> Self {
        Self {
            kind: SegmentKind::Plain,
            text: &buffer[span.clone()],
            span,
        }
    }

    pub fn is_annotated(&self) -> bool {
        matches!(self.kind, SegmentKind::Annotated { .. })
    }

    /// The finding attached to this segment, if any.
    pub fn finding(&self) -> Option<(FindingId, &'a Finding)> {
        match self.kind {
            SegmentKind::Plain => None,
            SegmentKind::Annotated { id, finding } => Some((id, finding)),
        }
    }
}

/// Partition `buffer` into segments for the given candidates.
///
/// Candidates whose statement cannot be found (or was consumed by an earlier
/// match) simply contribute no segment. Concatenating the returned segments'
/// text always reproduces `buffer`. An empty buffer yields no segments.
pub fn match_segments<'a>(
    buffer: &'a str,
    candidates: &[Candidate<'a>],
    protected: &ProtectedSpans,
) -> Vec<Segment<'a>> {
    // Phase 1: order by first possible occurrence. Findings that never occur
    // would fail the cursor search anyway, so they are dropped here.
    let mut ordered: Vec<(usize, Candidate<'a>)> = candidates
        .iter()
        .filter_map(|candidate| {
            protected
                .find(buffer, &candidate.finding.statement, 0)
                .map(|first| (first, *candidate))
        })
        .collect();
    // Stable: candidates sharing a first occurrence keep finding-set order.
    ordered.sort_by_key(|(first, _)| *first);

    trace!(
        candidates = candidates.len(),
        present = ordered.len(),
        "candidates ordered"
    );

    // Phase 2: forward-only cursor.
    let mut segments = Vec::with_capacity(ordered.len() * 2 + 1);
    let mut last_index = 0usize;

    for (_, candidate) in ordered {
        let statement = candidate.finding.statement.as_str();
        let Some(start) = protected.find(buffer, statement, last_index) else {
            trace!(finding = %candidate.id, "statement consumed earlier in this pass");
            continue;
        };
        let end = start + statement.len();

        if start > last_index {
            segments.push(Segment::plain(buffer, last_index..start));
        }
        segments.push(Segment {
            kind: SegmentKind::Annotated {
                id: candidate.id,
                finding: candidate.finding,
            },
            span: start..end,
            text: &buffer[start..end],
        });
        last_index = end;
    }

    if last_index < buffer.len() {
        segments.push(Segment::plain(buffer, last_index..buffer.len()));
    }

    debug!(
        segments = segments.len(),
        annotated = segments.iter().filter(|s| s.is_annotated()).count(),
        "overlay computed"
    );
    segments
}
