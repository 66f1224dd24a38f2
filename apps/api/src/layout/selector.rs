//! Font size selection: the largest size in range whose block fits.
#![allow(dead_code)]
//!
//! `fits` is monotone non-increasing in font size, so a descending linear scan and a
//! binary search over the range return the same answer. When no size fits, the
//! minimum is returned and the renderer is left to clip.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::layout::bullets::BulletList;
use crate::layout::canvas::LayoutConfig;
use crate::layout::fit::{evaluate_fit, FitEvaluation, MeasuredBlock};
use crate::layout::metrics::{AverageCharWidth, TextMeasure};
use crate::markup::MarkupGrammar;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchStrategy {
    /// Scan from `max` down to `min`; first fit wins.
    #[default]
    Linear,
    /// Bisect the monotone predicate. Same result, fewer evaluations on wide ranges.
    Binary,
}

/// The chosen size and whether it actually fits.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FontSelection {
    pub font_size: u32,
    /// False when the minimum was taken as a fallback.
    pub fitted: bool,
    /// Evaluation at the chosen size.
    pub evaluation: FitEvaluation,
}

/// Picks a font size with the average-width model and the configured search.
pub fn select_font_size(
    bullets: &BulletList,
    config: &LayoutConfig,
    grammar: &dyn MarkupGrammar,
) -> FontSelection {
    select_font_size_with(
        bullets,
        config,
        grammar,
        &AverageCharWidth::from_config(config),
        config.search,
    )
}

pub fn select_font_size_with(
    bullets: &BulletList,
    config: &LayoutConfig,
    grammar: &dyn MarkupGrammar,
    measure: &dyn TextMeasure,
    strategy: SearchStrategy,
) -> FontSelection {
    let block = MeasuredBlock::new(bullets, grammar);
    let min = config.font_range.min();
    let max = config.font_range.max();
    let eval = |fs: u32| evaluate_fit(&block, fs, config, measure);

    let found = match strategy {
        SearchStrategy::Linear => (min..=max).rev().map(&eval).find(FitEvaluation::fits),
        SearchStrategy::Binary => binary_search(min, max, &eval),
    };

    match found {
        Some(evaluation) => {
            debug!(
                font_size = evaluation.font_size,
                lines = block.line_count(),
                longest = block.longest_plain_len(),
                "Selected font size"
            );
            FontSelection {
                font_size: evaluation.font_size,
                fitted: true,
                evaluation,
            }
        }
        None => {
            let evaluation = eval(min);
            warn!(
                font_size = min,
                lines = block.line_count(),
                longest = block.longest_plain_len(),
                needed_height = evaluation.needed_height,
                needed_width = evaluation.needed_width,
                "No font size fits; falling back to minimum"
            );
            FontSelection {
                font_size: min,
                fitted: false,
                evaluation,
            }
        }
    }
}

/// Largest size in `[min, max]` that fits, assuming monotonicity.
fn binary_search(
    min: u32,
    max: u32,
    eval: impl Fn(u32) -> FitEvaluation,
) -> Option<FitEvaluation> {
    let mut best = eval(min);
    if !best.fits() {
        return None;
    }
    let (mut lo, mut hi) = (min, max);
    while lo < hi {
        let mid = lo + (hi - lo + 1) / 2;
        let candidate = eval(mid);
        if candidate.fits() {
            lo = mid;
            best = candidate;
        } else {
            hi = mid - 1;
        }
    }
    Some(best)
}
