// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::PaperSize;

/// Persistent settings for a review session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RedlineConfig {
    /// How revised documents are written out.
    pub export: ExportConfig,
    /// How findings are located in the document.
    pub matching: MatchingConfig,
}

/// Export settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Page size for the rasterized PDF export.
    pub paper_size: PaperSize,
    /// Marker inserted before the extension of every exported file name.
    pub revised_suffix: String,
    /// Banner prepended when a word-processor original is downgraded to text.
    pub downgrade_notice: String,
    /// Offscreen canvas styling for the rasterized export.
    pub render: RenderStyle,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            revised_suffix: "-revised".into(),
            downgrade_notice: "NOTE: This is a plain-text export of a revised word-processor \
                               document. The original binary formatting could not be \
                               preserved."
                .into(),
            render: RenderStyle::default(),
        }
    }
}

/// Styling of the offscreen text canvas that gets rasterized into pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderStyle {
    /// Canvas width in pixels; maps to the full page width.
    pub canvas_width_px: u32,
    /// Padding on every side of the text block.
    pub margin_px: u32,
    /// Integer upscale applied to the 8x8 glyph cells.
    pub glyph_scale: u32,
    /// Extra vertical space between lines.
    pub line_gap_px: u32,
    /// Text colour (RGB).
    pub foreground: [u8; 3],
    /// Page colour (RGB).
    pub background: [u8; 3],
    /// Tallest canvas the rasterizer will allocate. Longer documents fail
    /// the export instead of exhausting memory.
    pub max_canvas_height_px: u32,
}

impl Default for RenderStyle {
    fn default() -> Self {
        Self {
            // A4 width at 150 DPI.
            canvas_width_px: 1240,
            margin_px: 90,
            glyph_scale: 2,
            line_gap_px: 8,
            foreground: [20, 20, 20],
            background: [255, 255, 255],
            // About 37 A4 pages; roughly 240 MB of RGB pixels at this width.
            max_canvas_height_px: 65_536,
        }
    }
}

/// Matching settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    /// Ignore statement occurrences that fall inside an already applied
    /// rewrite. When false, matching is purely textual.
    pub protect_accepted_spans: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            protect_accepted_spans: true,
        }
    }
}

impl RedlineConfig {
    /// Load settings from a JSON file. Missing fields take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&data)?;
        info!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    /// Load settings if the file exists, otherwise fall back to defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load(path)
        } else {
            debug!(path = %path.display(), "no configuration file, using defaults");
            Ok(Self::default())
        }
    }

    /// Write settings as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
