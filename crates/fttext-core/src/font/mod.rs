//! Bitmap fonts in the BDF format and text rasterization onto a [`Canvas`].
//!
//! [`Canvas`]: crate::display::Canvas

mod bdf;
mod draw;

use std::collections::HashMap;
use std::path::Path;

use tracing::debug;

use crate::{Error, Result};

pub use draw::draw_text;

/// A single rasterized glyph.
///
/// Bitmap rows are stored left-aligned in a `u64`, so the leftmost pixel of a
/// row is bit 63.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Glyph {
    /// Horizontal advance in pixels
    pub device_width: i32,
    /// Bounding box width
    pub width: i32,
    /// Bounding box height
    pub height: i32,
    /// Bounding box offset from the pen position
    pub x_offset: i32,
    /// Bounding box offset from the baseline, positive is up
    pub y_offset: i32,
    rows: Vec<u64>,
}

impl Glyph {
    /// Whether the bitmap has a pixel set at column `x` of row `row`.
    pub fn is_set(&self, x: i32, row: i32) -> bool {
        if x < 0 || x >= self.width || x >= 64 || row < 0 {
            return false;
        }
        self.rows
            .get(row as usize)
            .is_some_and(|bits| bits & (1u64 << (63 - x)) != 0)
    }
}

#[derive(Debug, Clone)]
pub struct Font {
    height: i32,
    baseline: i32,
    glyphs: HashMap<u32, Glyph>,
    default_char: Option<u32>,
}

impl Font {
    /// Load a BDF font from a file
    pub fn load(path: &Path) -> Result<Self> {
        let font_load = |reason: String| Error::FontLoad {
            path: path.display().to_string(),
            reason,
        };

        let bytes = std::fs::read(path).map_err(|e| font_load(e.to_string()))?;
        let font = Self::parse(&String::from_utf8_lossy(&bytes)).map_err(|e| match e {
            Error::FontParse(reason) => font_load(reason),
            other => other,
        })?;

        debug!(
            path = %path.display(),
            glyphs = font.glyphs.len(),
            height = font.height,
            baseline = font.baseline,
            "Loaded font"
        );
        Ok(font)
    }

    /// Parse BDF source text
    pub fn parse(content: &str) -> Result<Self> {
        bdf::parse(content)
    }

    /// Line height in pixels
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Distance from the top of the line to the baseline
    pub fn baseline(&self) -> i32 {
        self.baseline
    }

    /// Number of glyphs in the font
    pub fn glyph_count(&self) -> usize {
        self.glyphs.len()
    }

    /// Glyph for `ch`, falling back to the font's default character.
    pub fn glyph(&self, ch: char) -> Option<&Glyph> {
        self.glyphs
            .get(&(ch as u32))
            .or_else(|| self.default_char.and_then(|code| self.glyphs.get(&code)))
    }

    /// Total advance of `text` in pixels
    pub fn text_width(&self, text: &str) -> i32 {
        text.chars()
            .filter_map(|ch| self.glyph(ch))
            .map(|glyph| glyph.device_width)
            .sum()
    }
}
