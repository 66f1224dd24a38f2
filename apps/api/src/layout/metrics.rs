//! Derived per-size metrics and the horizontal measurement model.
//!
//! Text width is an approximation: every visible character advances by
//! `font_size * char_width_factor`. Real glyph metrics can be slotted in by
//! implementing `TextMeasure`; nothing downstream depends on the model.

use serde::{Deserialize, Serialize};

use crate::layout::canvas::LayoutConfig;

/// `round(font_size * factor)`, half away from zero.
pub fn scaled(font_size: u32, factor: f32) -> u32 {
    (font_size as f32 * factor).round().max(0.0) as u32
}

// ────────────────────────────────────────────────────────────────────────────
// Layout metrics
// ────────────────────────────────────────────────────────────────────────────

/// Spacing derived from one font size. A pure function of `(font_size, config)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutMetrics {
    pub font_size: u32,
    /// Height of one text line (`font_size * line_height`).
    pub line_box: f32,
    /// Vertical space between bullet rows.
    pub gap: u32,
    pub bullet_dot_size: u32,
    pub gutter: u32,
    pub marker_gap: u32,
    /// Usable text width after the gutter. Shared by every line in a render.
    pub max_text_width: u32,
}

impl LayoutMetrics {
    pub fn for_font_size(font_size: u32, config: &LayoutConfig) -> Self {
        let gutter = scaled(font_size, config.gutter_factor);
        Self {
            font_size,
            line_box: font_size as f32 * config.line_height,
            gap: scaled(font_size, config.gap_factor),
            bullet_dot_size: scaled(font_size, config.bullet_dot_factor),
            gutter,
            marker_gap: scaled(font_size, config.marker_gap_factor),
            max_text_width: config.canvas.content_width().saturating_sub(gutter),
        }
    }

    /// Total height of `line_count` single-line rows, including the gaps between them.
    pub fn block_height(&self, line_count: usize) -> f32 {
        let gaps = line_count.saturating_sub(1);
        line_count as f32 * self.line_box + gaps as f32 * self.gap as f32
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Measurement model
// ────────────────────────────────────────────────────────────────────────────

/// Width of unstyled text at a given font size.
pub trait TextMeasure: Send + Sync {
    fn width(&self, plain: &str, font_size: u32) -> f32;
}

/// Average-advance model: width grows linearly with the character count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AverageCharWidth {
    pub factor: f32,
}

impl AverageCharWidth {
    pub fn new(factor: f32) -> Self {
        Self { factor }
    }

    pub fn from_config(config: &LayoutConfig) -> Self {
        Self::new(config.char_width_factor)
    }

    pub fn advance(&self, font_size: u32) -> f32 {
        font_size as f32 * self.factor
    }
}

impl TextMeasure for AverageCharWidth {
    fn width(&self, plain: &str, font_size: u32) -> f32 {
        plain.chars().count() as f32 * self.advance(font_size)
    }
}
