// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Redline — Core types, error definitions, and collaborator contracts shared
// across all crates.

pub mod analysis;
pub mod config;
pub mod error;
pub mod human_errors;
pub mod types;

pub use analysis::{Analyzer, JsonFileAnalyzer};
pub use config::RedlineConfig;
pub use error::RedlineError;
pub use types::*;
