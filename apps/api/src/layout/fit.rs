//! Fit evaluation — does a candidate font size fit the canvas content area?
#![allow(dead_code)]
//!
//! Two necessary conditions, both linear in font size:
//! - vertical:   `n * line_box + (n - 1) * gap <= content_height`
//! - horizontal: `gutter + widest_plain_width <= content_width`
//!
//! Rows are assumed to stay on one line; wrapping is the renderer's concern.

use serde::{Deserialize, Serialize};

use crate::layout::bullets::BulletList;
use crate::layout::canvas::LayoutConfig;
use crate::layout::metrics::{AverageCharWidth, LayoutMetrics, TextMeasure};
use crate::markup::MarkupGrammar;

/// Bullet lines projected to plain text once, so each candidate size is cheap to check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasuredBlock {
    plain_lines: Vec<String>,
}

impl MeasuredBlock {
    pub fn new(bullets: &BulletList, grammar: &dyn MarkupGrammar) -> Self {
        Self {
            plain_lines: bullets.iter().map(|line| grammar.plain_text(line)).collect(),
        }
    }

    pub fn line_count(&self) -> usize {
        self.plain_lines.len()
    }

    /// Character count of the longest plain line.
    pub fn longest_plain_len(&self) -> usize {
        self.plain_lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0)
    }

    /// Widest line at `font_size` under the given measurement model.
    pub fn widest(&self, font_size: u32, measure: &dyn TextMeasure) -> f32 {
        self.plain_lines
            .iter()
            .map(|l| measure.width(l, font_size))
            .fold(0.0_f32, f32::max)
    }
}

/// Outcome of checking one candidate size, with the numbers behind the verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitEvaluation {
    pub font_size: u32,
    pub needed_height: f32,
    pub available_height: u32,
    pub needed_width: f32,
    pub available_width: u32,
    pub fits_vertically: bool,
    pub fits_horizontally: bool,
}

impl FitEvaluation {
    pub fn fits(&self) -> bool {
        self.fits_vertically && self.fits_horizontally
    }
}

/// Checks one candidate size against both space budgets.
pub fn evaluate_fit(
    block: &MeasuredBlock,
    font_size: u32,
    config: &LayoutConfig,
    measure: &dyn TextMeasure,
) -> FitEvaluation {
    let metrics = LayoutMetrics::for_font_size(font_size, config);
    let available_height = config.canvas.content_height();
    let available_width = config.canvas.content_width();

    let needed_height = metrics.block_height(block.line_count());
    let needed_width = metrics.gutter as f32 + block.widest(font_size, measure);

    FitEvaluation {
        font_size,
        needed_height,
        available_height,
        needed_width,
        available_width,
        fits_vertically: needed_height <= available_height as f32,
        fits_horizontally: needed_width <= available_width as f32,
    }
}

/// Fit predicate under the default average-width model.
pub fn fits(
    font_size: u32,
    bullets: &BulletList,
    config: &LayoutConfig,
    grammar: &dyn MarkupGrammar,
) -> bool {
    let block = MeasuredBlock::new(bullets, grammar);
    evaluate_fit(&block, font_size, config, &AverageCharWidth::from_config(config)).fits()
}
