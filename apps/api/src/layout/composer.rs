//! Layout composition — turns a chosen font size and raw lines into a render-ready plan.
//!
//! Pure: the same inputs always yield an identical plan.

use serde::{Deserialize, Serialize};

use crate::layout::bullets::BulletList;
use crate::layout::canvas::{CanvasSpec, LayoutConfig};
use crate::layout::metrics::LayoutMetrics;
use crate::layout::selector::{select_font_size, FontSelection};
use crate::markup::{MarkupGrammar, Segment};

/// One bullet row, tokenized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlannedLine {
    pub segments: Vec<Segment>,
    pub bullet_dot_size: u32,
    pub max_text_width: u32,
}

/// Everything the renderer needs for one image. Discarded after rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutPlan {
    pub canvas: CanvasSpec,
    pub font_size: u32,
    pub line_height: f32,
    pub metrics: LayoutMetrics,
    pub lines: Vec<PlannedLine>,
}

/// Builds the plan for `bullets` at `font_size`. Metrics are shared by every line.
pub fn compose(
    bullets: &BulletList,
    font_size: u32,
    config: &LayoutConfig,
    grammar: &dyn MarkupGrammar,
) -> LayoutPlan {
    let metrics = LayoutMetrics::for_font_size(font_size, config);
    let lines = bullets
        .iter()
        .map(|line| PlannedLine {
            segments: grammar.tokenize(line),
            bullet_dot_size: metrics.bullet_dot_size,
            max_text_width: metrics.max_text_width,
        })
        .collect();

    LayoutPlan {
        canvas: config.canvas,
        font_size,
        line_height: config.line_height,
        metrics,
        lines,
    }
}

/// Font-size search followed by composition.
pub fn plan_layout(
    bullets: &BulletList,
    config: &LayoutConfig,
    grammar: &dyn MarkupGrammar,
) -> (FontSelection, LayoutPlan) {
    let selection = select_font_size(bullets, config, grammar);
    let plan = compose(bullets, selection.font_size, config, grammar);
    (selection, plan)
}
