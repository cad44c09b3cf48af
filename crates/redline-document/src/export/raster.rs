// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text rasterizer — lay out a text buffer on an offscreen canvas and paint it
// with 8x8 bitmap glyphs, using the `image` and `imageproc` crates.
//
// The canvas is as tall as the text needs, up to `max_canvas_height_px`; the
// paged writer slices it into pages afterwards.

use font8x8::{BASIC_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use redline_core::config::RenderStyle;
use redline_core::error::{RedlineError, Result};
use tracing::{debug, instrument};

/// Native glyph cell size of the bitmap font.
const GLYPH_CELL: u32 = 8;

/// Renders plain text into a single tall RGB bitmap.
#[derive(Debug, Clone)]
pub struct TextRasterizer {
    style: RenderStyle,
}

impl TextRasterizer {
    pub fn new(style: RenderStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &RenderStyle {
        &self.style
    }

    fn cell_width(&self) -> u32 {
        GLYPH_CELL * self.style.glyph_scale
    }

    fn line_height(&self) -> u32 {
        GLYPH_CELL * self.style.glyph_scale + self.style.line_gap_px
    }

    /// Glyphs that fit on one line, or an error if the style leaves no room.
    pub fn columns(&self) -> Result<usize> {
        if self.style.glyph_scale == 0 {
            return Err(RedlineError::ImageError("glyph scale must be at least 1".into()));
        }
        let usable = self
            .style
            .canvas_width_px
            .saturating_sub(2 * self.style.margin_px);
        let columns = usable / self.cell_width();
        if columns == 0 {
            return Err(RedlineError::ImageError(format!(
                "canvas width {}px leaves no room for text",
                self.style.canvas_width_px
            )));
        }
        Ok(columns as usize)
    }

    /// Wrapped lines exactly as they will be painted.
    pub fn layout(&self, text: &str) -> Result<Vec<String>> {
        Ok(wrap_text(text, self.columns()?))
    }

    /// Paint `text` onto a fresh canvas.
    #[instrument(skip(self, text), fields(text_len = text.len()))]
    pub fn render(&self, text: &str) -> Result<RgbImage> {
        let lines = self.layout(text)?;
        let height = u32::try_from(lines.len())
            .ok()
            .and_then(|count| count.checked_mul(self.line_height()))
            .and_then(|body| body.checked_add(2 * self.style.margin_px))
            .ok_or_else(|| RedlineError::ImageError("document too long to rasterize".into()))?;
        if height > self.style.max_canvas_height_px {
            return Err(RedlineError::ImageError(format!(
                "{} lines need a {height}px canvas, above the {}px limit",
                lines.len(),
                self.style.max_canvas_height_px
            )));
        }

        let mut canvas = RgbImage::from_pixel(
            self.style.canvas_width_px,
            height,
            Rgb(self.style.background),
        );

        let ink = Rgb(self.style.foreground);
        for (row, line) in lines.iter().enumerate() {
            let y = self.style.margin_px + row as u32 * self.line_height();
            for (col, ch) in line.chars().enumerate() {
                let x = self.style.margin_px + col as u32 * self.cell_width();
                self.draw_glyph(&mut canvas, x, y, ch, ink);
            }
        }

        debug!(
            lines = lines.len(),
            width = canvas.width(),
            height = canvas.height(),
            "text rasterized"
        );
        Ok(canvas)
    }

    fn draw_glyph(&self, canvas: &mut RgbImage, x: u32, y: u32, ch: char, ink: Rgb<u8>) {
        let Some(bitmap) = glyph(ch) else {
            return;
        };
        let scale = self.style.glyph_scale;
        for (dy, bits) in bitmap.iter().enumerate() {
            for dx in 0..GLYPH_CELL {
                // Bit 0 is the leftmost pixel.
                if *bits & (1u8 << dx) != 0 {
                    let px = x + dx * scale;
                    let py = y + dy as u32 * scale;
                    draw_filled_rect_mut(
                        canvas,
                        Rect::at(px as i32, py as i32).of_size(scale, scale),
                        ink,
                    );
                }
            }
        }
    }
}

/// Bitmap for `ch`, falling back to `?` for characters the font lacks.
fn glyph(ch: char) -> Option<[u8; 8]> {
    BASIC_FONTS
        .get(ch)
        .or_else(|| LATIN_FONTS.get(ch))
        .or_else(|| BASIC_FONTS.get('?'))
}

/// Wrap a multi-line string so that no line exceeds `max_width` characters.
///
/// Splits on existing newlines first, then performs simple word-wrap within each
/// paragraph. Words longer than `max_width` are force-broken.
pub fn wrap_text(text: &str, max_width: usize) -> Vec<String> {
    let max_width = max_width.max(1);
    let mut result = Vec::new();

    for paragraph in text.split('\n') {
        let words: Vec<&str> = paragraph.split_whitespace().collect();
        if words.is_empty() {
            result.push(String::new());
            continue;
        }

        let mut current_line = String::new();
        let mut current_len = 0usize;

        for word in words {
            let word_len = word.chars().count();
            if word_len > max_width {
                if !current_line.is_empty() {
                    result.push(std::mem::take(&mut current_line));
                }
                let chars: Vec<char> = word.chars().collect();
                let mut chunks = chars.chunks(max_width).peekable();
                while let Some(chunk) = chunks.next() {
                    if chunks.peek().is_some() {
                        result.push(chunk.iter().collect());
                    } else {
                        current_line = chunk.iter().collect();
                        current_len = chunk.len();
                    }
                }
            } else if current_line.is_empty() {
                current_line.push_str(word);
                current_len = word_len;
            } else if current_len + 1 + word_len <= max_width {
                current_line.push(' ');
                current_line.push_str(word);
                current_len += 1 + word_len;
            } else {
                result.push(std::mem::replace(&mut current_line, word.to_owned()));
                current_len = word_len;
            }
        }

        if !current_line.is_empty() {
            result.push(current_line);
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn style() -> RenderStyle {
        RenderStyle {
            canvas_width_px: 200,
            margin_px: 4,
            glyph_scale: 1,
            line_gap_px: 2,
            ..RenderStyle::default()
        }
    }

    #[test]
    fn wrap_respects_width_and_paragraphs() {
        let lines = wrap_text("one two three\n\nfour", 7);
        assert_eq!(lines, vec!["one two", "three", "", "four"]);
    }

    #[test]
    fn wrap_breaks_long_words_on_char_boundaries() {
        let lines = wrap_text("ääääää x", 4);
        assert_eq!(lines, vec!["ääää", "ää x"]);
    }

    #[test]
    fn empty_text_is_one_blank_line() {
        assert_eq!(wrap_text("", 10), vec![String::new()]);
    }

    #[test]
    fn canvas_height_follows_line_count() {
        let rasterizer = TextRasterizer::new(style());
        let one = rasterizer.render("hello").expect("render");
        let three = rasterizer.render("a\nb\nc").expect("render");
        assert_eq!(one.width(), 200);
        assert_eq!(one.height(), 2 * 4 + 10);
        assert_eq!(three.height(), 2 * 4 + 3 * 10);
    }

    #[test]
    fn glyphs_leave_ink() {
        let rasterizer = TextRasterizer::new(style());
        let canvas = rasterizer.render("H").expect("render");
        let background = Rgb(rasterizer.style().background);
        assert!(canvas.pixels().any(|px| *px != background));

        let blank = rasterizer.render(" ").expect("render");
        assert!(blank.pixels().all(|px| *px == background));
    }

    #[test]
    fn unusable_style_is_image_error() {
        let cramped = TextRasterizer::new(RenderStyle {
            canvas_width_px: 10,
            margin_px: 5,
            ..style()
        });
        assert!(matches!(
            cramped.render("x"),
            Err(RedlineError::ImageError(_))
        ));

        let zero = TextRasterizer::new(RenderStyle {
            glyph_scale: 0,
            ..style()
        });
        assert!(matches!(zero.columns(), Err(RedlineError::ImageError(_))));
    }

    #[test]
    fn canvas_limit_is_checked_before_allocation() {
        let limited = TextRasterizer::new(RenderStyle {
            max_canvas_height_px: 2 * 4 + 2 * 10,
            ..style()
        });
        assert!(limited.render("a\nb").is_ok());
        assert!(matches!(
            limited.render("a\nb\nc"),
            Err(RedlineError::ImageError(_))
        ));
    }

    #[test]
    fn megabyte_of_prose_exceeds_default_limit() {
        let prose = "The tenant shall keep the premises in good repair. ".repeat(20_000);
        let rasterizer = TextRasterizer::new(RenderStyle::default());
        assert!(matches!(
            rasterizer.render(&prose),
            Err(RedlineError::ImageError(_))
        ));
    }
}
