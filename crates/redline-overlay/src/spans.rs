// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Protected spans — byte ranges of the buffer occupied by applied rewrites.
//
// Ranges are kept sorted and disjoint, and are shifted after every edit so they
// keep pointing at the same rewritten text.

use std::ops::Range;

/// Sorted, disjoint byte ranges that statement searches must not touch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectedSpans {
    spans: Vec<Range<usize>>,
}

impl ProtectedSpans {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty set usable in `static` position.
    pub const fn empty() -> Self {
        Self { spans: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.spans.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Range<usize>> {
        self.spans.iter()
    }

    pub fn clear(&mut self) {
        self.spans.clear();
    }

    /// First protected span intersecting `range`.
    pub fn first_overlap(&self, range: &Range<usize>) -> Option<&Range<usize>> {
        self.spans
            .iter()
            .find(|span| span.start < range.end && range.start < span.end)
    }

    /// Protect `range`. Empty ranges (an applied deletion) are not recorded.
    pub fn insert(&mut self, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let pos = self
            .spans
            .partition_point(|span| span.start < range.start);
        self.spans.insert(pos, range);
    }

    /// Account for `removed` bytes at `at` being replaced by `inserted` bytes.
    ///
    /// Spans after the edit move with it; spans the edit cuts into no longer
    /// describe an intact rewrite and are dropped.
    pub fn apply_edit(&mut self, at: usize, removed: usize, inserted: usize) {
        self.spans = self
            .spans
            .iter()
            .filter_map(|span| shift_span(span, at, removed, inserted))
            .collect();
    }

    /// Byte offset of the first occurrence of `needle` in `haystack` at or
    /// after `from` that does not overlap a protected span.
    ///
    /// An empty needle never matches.
    pub fn find(&self, haystack: &str, needle: &str, from: usize) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        let mut start = from;
        loop {
            let at = start + haystack.get(start..)?.find(needle)?;
            match self.first_overlap(&(at..at + needle.len())) {
                None => return Some(at),
                // Every later occurrence starting before the span's end also
                // overlaps it.
                Some(span) => start = span.end,
            }
        }
    }
}

/// Where `span` ends up after `removed` bytes at `at` are replaced by
/// `inserted` bytes, or `None` if the edit cuts into it.
pub fn shift_span(
    span: &Range<usize>,
    at: usize,
    removed: usize,
    inserted: usize,
) -> Option<Range<usize>> {
    let edit_end = at + removed;
    let cut = if removed == 0 {
        span.start < at && at < span.end
    } else {
        span.start < edit_end && at < span.end
    };
    if cut {
        None
    } else if span.start >= edit_end {
        Some(span.start - removed + inserted..span.end - removed + inserted)
    } else {
        Some(span.clone())
    }
}
