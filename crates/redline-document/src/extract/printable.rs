// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Printable-run heuristics for recovering text from binary containers.

/// Runs of printable ASCII (plus `\t`, `\n`, `\r`) at least `min_len` bytes
/// long, in file order.
pub fn text_runs(bytes: &[u8], min_len: usize) -> Vec<&str> {
    runs(bytes, |b| matches!(b, 0x20..=0x7E | b'\t' | b'\n' | b'\r'), min_len)
}

/// Runs of strictly printable ASCII (no whitespace controls) at least
/// `min_len` bytes long.
pub fn printable_runs(bytes: &[u8], min_len: usize) -> Vec<&str> {
    runs(bytes, |b| (0x20..=0x7E).contains(&b), min_len)
}

fn runs(bytes: &[u8], keep: impl Fn(u8) -> bool, min_len: usize) -> Vec<&str> {
    bytes
        .split(|b| !keep(*b))
        .filter(|run| run.len() >= min_len.max(1))
        // Only ASCII survives the split, so this never fails.
        .filter_map(|run| std::str::from_utf8(run).ok())
        .collect()
}
