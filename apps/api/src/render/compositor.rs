//! Compositor boundary. Turns a `RenderNode` tree into encoded image bytes.
//!
//! Carried in `AppState` as `Arc<dyn Compositor>` so the rasterizer can be swapped
//! (or faked in tests) without touching the layout engine or the handler.

use thiserror::Error;

use crate::render::tree::RenderNode;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("render tree has no canvas size")]
    MissingCanvasSize,

    #[error("cannot allocate a {width}x{height} canvas")]
    CanvasCreationFailed { width: u32, height: u32 },

    #[error("SVG parse error: {0}")]
    Svg(String),

    #[error("PNG encode error: {0}")]
    Encode(String),
}

pub trait Compositor: Send + Sync {
    /// Rasterizes the tree. Output is sized to the root node's width × height.
    fn render(&self, tree: &RenderNode) -> Result<Vec<u8>, RenderError>;

    /// MIME type of the bytes produced by `render`.
    fn content_type(&self) -> &'static str {
        "image/png"
    }
}
