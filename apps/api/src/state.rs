use std::sync::Arc;

use crate::feed::BulletSource;
use crate::layout::LayoutConfig;
use crate::markup::MarkupGrammar;
use crate::render::{Compositor, EmphasisPolicy, Theme};

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Everything here is immutable after startup; requests share nothing mutable.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable feed source. Default: `HttpBulletSource` over `BULLET_SRC`.
    pub source: Arc<dyn BulletSource>,
    /// Inline markup dialect, chosen via `MARKUP_GRAMMAR`.
    pub grammar: Arc<dyn MarkupGrammar>,
    /// Rasterizer. Default: `SvgCompositor` (resvg).
    pub compositor: Arc<dyn Compositor>,
    pub layout: LayoutConfig,
    pub theme: Theme,
    /// Bold treatment, from `EMPHASIS_STYLE`.
    pub emphasis: EmphasisPolicy,
}
