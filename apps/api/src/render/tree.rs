//! Maps a `LayoutPlan` onto the node/style tree consumed by a `Compositor`.
#![allow(dead_code)]
//!
//! Shape:
//! ```text
//! Canvas (width × height, padding, background)
//! └── Column (gap, content width)
//!     └── Row (marker gap)            one per bullet
//!         ├── Marker "•"              bullet_dot_size, line height 1
//!         └── TextBlock               font_size, line_height, max_width
//!             ├── Run / LineBreak     one per segment
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::layout::LayoutPlan;
use crate::markup::{Segment, SegmentStyle};

pub const MARKER_GLYPH: &str = "\u{2022}";

// ────────────────────────────────────────────────────────────────────────────
// Theme and emphasis policy
// ────────────────────────────────────────────────────────────────────────────

/// Colours and typeface for the card.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    pub background: String,
    pub color: String,
    /// Background tint used by `EmphasisPolicy::Highlight`.
    pub highlight: String,
    pub font_family: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: "#ffffff".to_string(),
            color: "#00b3b3".to_string(),
            highlight: "#d9f7f7".to_string(),
            font_family: "Helvetica, Arial, sans-serif".to_string(),
        }
    }
}

/// How bold runs are drawn. Some rasterizers fake bold badly, hence the choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmphasisPolicy {
    /// Bold → weight 700, italic → italic style.
    #[default]
    Weight,
    /// Bold → background tint at normal weight, italic → italic style.
    Highlight,
}

impl FromStr for EmphasisPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "weight" | "bold" => Ok(EmphasisPolicy::Weight),
            "highlight" | "background" => Ok(EmphasisPolicy::Highlight),
            other => Err(format!("unknown emphasis style '{other}'")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Node tree
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FontStyle {
    Normal,
    Italic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NodeKind {
    Canvas,
    Column,
    Row,
    Marker { glyph: String },
    TextBlock,
    Run { text: String },
    LineBreak,
}

/// Box and text properties. Unset fields inherit from the parent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub padding: Option<u32>,
    /// Space between children along the main axis.
    pub gap: Option<u32>,
    pub max_width: Option<u32>,
    pub font_size: Option<u32>,
    pub line_height: Option<f32>,
    pub font_weight: Option<u16>,
    pub font_style: Option<FontStyle>,
    pub font_family: Option<String>,
    pub color: Option<String>,
    pub background: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderNode {
    pub kind: NodeKind,
    pub style: Style,
    pub children: Vec<RenderNode>,
}

impl RenderNode {
    fn new(kind: NodeKind, style: Style, children: Vec<RenderNode>) -> Self {
        Self {
            kind,
            style,
            children,
        }
    }

    /// Bullet rows in render order, or nothing if this is not a canvas tree.
    pub fn rows(&self) -> impl Iterator<Item = &RenderNode> {
        self.children
            .iter()
            .filter(|c| c.kind == NodeKind::Column)
            .flat_map(|c| c.children.iter())
            .filter(|r| r.kind == NodeKind::Row)
    }

    /// Concatenated run text below this node; line breaks become `\n`.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Run { text } => out.push_str(text),
            NodeKind::LineBreak => out.push('\n'),
            _ => self.children.iter().for_each(|c| c.collect_text(out)),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Builder
// ────────────────────────────────────────────────────────────────────────────

pub fn build_render_tree(plan: &LayoutPlan, theme: &Theme, policy: EmphasisPolicy) -> RenderNode {
    let canvas = plan.canvas;
    let metrics = plan.metrics;

    let rows = plan
        .lines
        .iter()
        .map(|line| {
            let marker = RenderNode::new(
                NodeKind::Marker {
                    glyph: MARKER_GLYPH.to_string(),
                },
                Style {
                    font_size: Some(line.bullet_dot_size),
                    line_height: Some(1.0),
                    ..Style::default()
                },
                Vec::new(),
            );
            let text = RenderNode::new(
                NodeKind::TextBlock,
                Style {
                    font_size: Some(plan.font_size),
                    line_height: Some(plan.line_height),
                    max_width: Some(line.max_text_width),
                    ..Style::default()
                },
                line.segments
                    .iter()
                    .map(|s| segment_node(s, theme, policy))
                    .collect(),
            );
            RenderNode::new(
                NodeKind::Row,
                Style {
                    gap: Some(metrics.marker_gap),
                    ..Style::default()
                },
                vec![marker, text],
            )
        })
        .collect();

    let column = RenderNode::new(
        NodeKind::Column,
        Style {
            gap: Some(metrics.gap),
            width: Some(canvas.content_width()),
            ..Style::default()
        },
        rows,
    );

    RenderNode::new(
        NodeKind::Canvas,
        Style {
            width: Some(canvas.width),
            height: Some(canvas.height),
            padding: Some(canvas.padding),
            font_family: Some(theme.font_family.clone()),
            color: Some(theme.color.clone()),
            background: Some(theme.background.clone()),
            ..Style::default()
        },
        vec![column],
    )
}

fn segment_node(segment: &Segment, theme: &Theme, policy: EmphasisPolicy) -> RenderNode {
    if segment.is_break {
        return RenderNode::new(NodeKind::LineBreak, Style::default(), Vec::new());
    }

    let style = match (segment.style, policy) {
        (SegmentStyle::Plain, _) => Style {
            font_weight: Some(400),
            font_style: Some(FontStyle::Normal),
            ..Style::default()
        },
        (SegmentStyle::Bold, EmphasisPolicy::Weight) => Style {
            font_weight: Some(700),
            font_style: Some(FontStyle::Normal),
            ..Style::default()
        },
        (SegmentStyle::Bold, EmphasisPolicy::Highlight) => Style {
            font_weight: Some(400),
            font_style: Some(FontStyle::Normal),
            background: Some(theme.highlight.clone()),
            ..Style::default()
        },
        (SegmentStyle::Italic, _) => Style {
            font_weight: Some(400),
            font_style: Some(FontStyle::Italic),
            ..Style::default()
        },
    };

    RenderNode::new(
        NodeKind::Run {
            text: segment.text.clone(),
        },
        style,
        Vec::new(),
    )
}
