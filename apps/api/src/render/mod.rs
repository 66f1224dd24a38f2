//! Rendering boundary: layout plan → node tree → raster bytes.

pub mod compositor;
pub mod svg;
pub mod tree;

pub use compositor::{Compositor, RenderError};
pub use svg::SvgCompositor;
pub use tree::{build_render_tree, EmphasisPolicy, Theme};
