//! Render constants: canvas geometry, font-size bounds and layout factors.
#![allow(dead_code)]
//!
//! `LayoutConfig` is immutable and passed explicitly to every layout call. It is
//! fixed at build/deploy time; nothing here is configurable per request.

use serde::{Deserialize, Serialize};

use crate::layout::selector::SearchStrategy;

pub const CANVAS_WIDTH: u32 = 1200;
pub const CANVAS_HEIGHT: u32 = 340;
pub const CANVAS_PADDING: u32 = 20;

pub const MIN_FONT: u32 = 24;
pub const MAX_FONT: u32 = 48;

pub const LINE_HEIGHT: f32 = 1.3;
pub const CHAR_WIDTH_FACTOR: f32 = 0.55;
pub const GAP_FACTOR: f32 = 0.5;
pub const GUTTER_FACTOR: f32 = 2.0;
pub const BULLET_DOT_FACTOR: f32 = 1.2;
pub const MARKER_GAP_FACTOR: f32 = 0.7;

// ────────────────────────────────────────────────────────────────────────────
// Canvas
// ────────────────────────────────────────────────────────────────────────────

/// Fixed output surface. All lengths are pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSpec {
    pub width: u32,
    pub height: u32,
    /// Outer margin applied on all four sides.
    pub padding: u32,
}

impl CanvasSpec {
    pub const fn new(width: u32, height: u32, padding: u32) -> Self {
        Self {
            width,
            height,
            padding,
        }
    }

    pub fn content_width(&self) -> u32 {
        self.width.saturating_sub(2 * self.padding)
    }

    pub fn content_height(&self) -> u32 {
        self.height.saturating_sub(2 * self.padding)
    }
}

impl Default for CanvasSpec {
    fn default() -> Self {
        Self::new(CANVAS_WIDTH, CANVAS_HEIGHT, CANVAS_PADDING)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font range
// ────────────────────────────────────────────────────────────────────────────

/// Closed range of candidate font sizes, `min <= max` always.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontRange {
    min: u32,
    max: u32,
}

impl FontRange {
    /// Bounds given in either order are normalized; a zero size is raised to 1.
    pub fn new(a: u32, b: u32) -> Self {
        let (min, max) = if a <= b { (a, b) } else { (b, a) };
        Self {
            min: min.max(1),
            max: max.max(1),
        }
    }

    pub fn min(&self) -> u32 {
        self.min
    }

    pub fn max(&self) -> u32 {
        self.max
    }

    pub fn contains(&self, size: u32) -> bool {
        (self.min..=self.max).contains(&size)
    }
}

impl Default for FontRange {
    fn default() -> Self {
        Self::new(MIN_FONT, MAX_FONT)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Layout configuration
// ────────────────────────────────────────────────────────────────────────────

/// Every constant the fit search, composer and renderer depend on.
///
/// Factors are multiplied by the font size and rounded half away from zero.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    pub canvas: CanvasSpec,
    pub font_range: FontRange,
    /// Line box height as a multiple of font size.
    pub line_height: f32,
    /// Average glyph advance as a fraction of font size.
    pub char_width_factor: f32,
    /// Vertical space between bullet rows.
    pub gap_factor: f32,
    /// Horizontal space reserved for the marker and its spacing.
    pub gutter_factor: f32,
    pub bullet_dot_factor: f32,
    /// Space between the marker glyph and the text block.
    pub marker_gap_factor: f32,
    pub search: SearchStrategy,
}

impl LayoutConfig {
    pub fn with_canvas(mut self, canvas: CanvasSpec) -> Self {
        self.canvas = canvas;
        self
    }

    pub fn with_font_range(mut self, font_range: FontRange) -> Self {
        self.font_range = font_range;
        self
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        default_layout_config()
    }
}

/// The production constants: 1200×340 card, 20px padding, fonts 24–48px.
pub fn default_layout_config() -> LayoutConfig {
    LayoutConfig {
        canvas: CanvasSpec::default(),
        font_range: FontRange::default(),
        line_height: LINE_HEIGHT,
        char_width_factor: CHAR_WIDTH_FACTOR,
        gap_factor: GAP_FACTOR,
        gutter_factor: GUTTER_FACTOR,
        bullet_dot_factor: BULLET_DOT_FACTOR,
        marker_gap_factor: MARKER_GAP_FACTOR,
        search: SearchStrategy::Linear,
    }
}
