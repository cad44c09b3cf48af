// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// redline-overlay — Annotation overlay and incremental revision engine.
//
// The matcher partitions a document buffer into plain and annotated segments;
// the ledger owns that buffer, applies accepted rewrites, and remembers which
// findings are done. Hover state lives in `highlight`, outside the matcher.

pub mod highlight;
pub mod ledger;
pub mod matcher;
pub mod spans;

pub use highlight::{FindingCard, Highlight};
pub use ledger::{AcceptedRewrite, Revision, RevisionLedger};
pub use matcher::{Candidate, Segment, SegmentKind, match_segments};
pub use spans::ProtectedSpans;
