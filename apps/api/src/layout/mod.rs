//! Text-fitting layout engine.
//!
//! Pipeline: `BulletList` → `select_font_size` (fit search) → `compose` → `LayoutPlan`.
//! Everything here is synchronous and free of shared state; the handler runs it
//! inside `tokio::task::spawn_blocking` together with rasterization.

pub mod bullets;
pub mod canvas;
pub mod composer;
pub mod fit;
pub mod metrics;
pub mod selector;

// Re-export the public API consumed by the render boundary, feed and handlers.
pub use bullets::BulletList;
pub use canvas::{default_layout_config, LayoutConfig};
pub use composer::{plan_layout, LayoutPlan};
pub use selector::FontSelection;
