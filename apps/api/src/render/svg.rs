//! SVG compositor: serializes the render tree to SVG and rasterizes it with resvg.
//!
//! The flex-like tree is flattened here: rows stack top to bottom, the marker sits
//! left of the text block, and runs are greedy word-wrapped inside `max_width` using
//! the same average-advance model as the fit search. Anything past the canvas edge
//! is clipped by the SVG viewport.

use std::sync::Arc;

use resvg::usvg::fontdb;
use resvg::{tiny_skia, usvg};
use tracing::debug;

use crate::layout::metrics::{AverageCharWidth, TextMeasure};
use crate::render::compositor::{Compositor, RenderError};
use crate::render::tree::{FontStyle, NodeKind, RenderNode, Style};

/// Approximate baseline position within a line box, as a fraction of font size.
const ASCENT: f32 = 0.8;

pub struct SvgCompositor {
    measure: AverageCharWidth,
    fontdb: Arc<fontdb::Database>,
}

impl SvgCompositor {
    /// Loads system fonts once; reuse the compositor across requests.
    pub fn new(char_width_factor: f32) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        debug!(faces = db.len(), "Loaded system fonts for compositor");
        Self::with_fontdb(char_width_factor, db)
    }

    pub fn with_fontdb(char_width_factor: f32, db: fontdb::Database) -> Self {
        Self {
            measure: AverageCharWidth::new(char_width_factor),
            fontdb: Arc::new(db),
        }
    }

    /// Serializes the tree to a standalone SVG document.
    pub fn to_svg(&self, tree: &RenderNode) -> Result<String, RenderError> {
        let (width, height) = canvas_size(tree)?;
        let padding = tree.style.padding.unwrap_or(0);

        let mut svg = String::new();
        svg.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}">"#
        ));
        if let Some(bg) = &tree.style.background {
            svg.push_str(&format!(
                r#"<rect x="0" y="0" width="{width}" height="{height}" fill="{}"/>"#,
                escape(bg)
            ));
        }

        let family = tree.style.font_family.as_deref().unwrap_or("sans-serif");
        let color = tree.style.color.as_deref().unwrap_or("#000000");
        svg.push_str(&format!(
            r#"<g font-family="{}" fill="{}">"#,
            escape(family),
            escape(color)
        ));

        let x0 = padding as f32;
        let mut y = padding as f32;
        for column in tree.children.iter().filter(|c| c.kind == NodeKind::Column) {
            let row_gap = column.style.gap.unwrap_or(0) as f32;
            for (i, row) in column.children.iter().enumerate() {
                if i > 0 {
                    y += row_gap;
                }
                y += self.write_row(&mut svg, row, x0, y);
            }
        }

        svg.push_str("</g></svg>");
        Ok(svg)
    }

    /// Writes one bullet row at `(x, top)`; returns the row height.
    fn write_row(&self, svg: &mut String, row: &RenderNode, x: f32, top: f32) -> f32 {
        let marker_gap = row.style.gap.unwrap_or(0) as f32;
        let mut cursor = x;
        let mut height = 0.0_f32;

        for child in &row.children {
            match &child.kind {
                NodeKind::Marker { glyph } => {
                    let size = child.style.font_size.unwrap_or(16);
                    let line_box = size as f32 * child.style.line_height.unwrap_or(1.0);
                    let baseline = top + (line_box - size as f32) / 2.0 + size as f32 * ASCENT;
                    svg.push_str(&format!(
                        r#"<text x="{cursor:.1}" y="{baseline:.1}" font-size="{size}">{}</text>"#,
                        escape(glyph)
                    ));
                    cursor += self.measure.width(glyph, size) + marker_gap;
                    height = height.max(line_box);
                }
                NodeKind::TextBlock => {
                    let block_height = self.write_text_block(svg, child, cursor, top);
                    height = height.max(block_height);
                }
                _ => {}
            }
        }
        height
    }

    /// Wraps and writes a text block; returns its height.
    fn write_text_block(&self, svg: &mut String, block: &RenderNode, x: f32, top: f32) -> f32 {
        let size = block.style.font_size.unwrap_or(16);
        let line_box = size as f32 * block.style.line_height.unwrap_or(1.2);
        let max_width = block.style.max_width.map(|w| w as f32).unwrap_or(f32::MAX);
        let advance = self.measure.advance(size);

        let lines = wrap_runs(&block.children, max_width, advance);
        for (i, line) in lines.iter().enumerate() {
            let line_top = top + i as f32 * line_box;
            let baseline = line_top + (line_box - size as f32) / 2.0 + size as f32 * ASCENT;

            let mut offset = x;
            for piece in line {
                let w = piece.text.chars().count() as f32 * advance;
                if let Some(bg) = &piece.style.background {
                    svg.push_str(&format!(
                        r#"<rect x="{offset:.1}" y="{line_top:.1}" width="{w:.1}" height="{line_box:.1}" fill="{}"/>"#,
                        escape(bg)
                    ));
                }
                offset += w;
            }

            svg.push_str(&format!(
                r#"<text x="{x:.1}" y="{baseline:.1}" font-size="{size}" xml:space="preserve">"#
            ));
            for piece in line {
                let weight = piece.style.font_weight.unwrap_or(400);
                let italic = piece.style.font_style == Some(FontStyle::Italic);
                svg.push_str(&format!(
                    r#"<tspan font-weight="{weight}" font-style="{}">{}</tspan>"#,
                    if italic { "italic" } else { "normal" },
                    escape(&piece.text)
                ));
            }
            svg.push_str("</text>");
        }

        lines.len().max(1) as f32 * line_box
    }
}

impl Compositor for SvgCompositor {
    fn render(&self, tree: &RenderNode) -> Result<Vec<u8>, RenderError> {
        let (width, height) = canvas_size(tree)?;
        let svg = self.to_svg(tree)?;

        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fontdb);
        let rtree =
            usvg::Tree::from_str(&svg, &options).map_err(|e| RenderError::Svg(e.to_string()))?;

        let Some(mut pixmap) = tiny_skia::Pixmap::new(width, height) else {
            return Err(RenderError::CanvasCreationFailed { width, height });
        };
        resvg::render(&rtree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(e.to_string()))
    }
}

fn canvas_size(tree: &RenderNode) -> Result<(u32, u32), RenderError> {
    match (tree.style.width, tree.style.height) {
        (Some(w), Some(h)) => Ok((w, h)),
        _ => Err(RenderError::MissingCanvasSize),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Greedy word wrap over styled runs
// ────────────────────────────────────────────────────────────────────────────

/// A same-styled slice of one visual line.
#[derive(Debug, Clone, PartialEq)]
struct Piece<'a> {
    text: String,
    style: &'a Style,
}

/// Splits runs into visual lines no wider than `max_width` at `advance` per char.
///
/// Whitespace at the start of a wrapped line is dropped. A word wider than the
/// line is broken between characters.
fn wrap_runs<'a>(runs: &'a [RenderNode], max_width: f32, advance: f32) -> Vec<Vec<Piece<'a>>> {
    let per_line = if advance > 0.0 {
        ((max_width / advance).floor() as usize).max(1)
    } else {
        usize::MAX
    };

    let mut lines: Vec<Vec<Piece<'a>>> = vec![Vec::new()];
    let mut used = 0usize;

    for run in runs {
        let text = match &run.kind {
            NodeKind::Run { text } => text,
            NodeKind::LineBreak => {
                lines.push(Vec::new());
                used = 0;
                continue;
            }
            _ => continue,
        };

        for word in split_keep_spaces(text) {
            let len = word.chars().count();
            let is_space = word.chars().all(char::is_whitespace);

            if is_space {
                if used > 0 && used + len <= per_line {
                    push_piece(&mut lines, word, &run.style);
                    used += len;
                }
                continue;
            }

            if used > 0 && used + len > per_line {
                lines.push(Vec::new());
                used = 0;
            }

            let mut chars: Vec<char> = word.chars().collect();
            while used + chars.len() > per_line {
                let head: String = chars.drain(..per_line - used).collect();
                push_piece(&mut lines, &head, &run.style);
                lines.push(Vec::new());
                used = 0;
            }
            if !chars.is_empty() {
                used += chars.len();
                let tail: String = chars.into_iter().collect();
                push_piece(&mut lines, &tail, &run.style);
            }
        }
    }

    lines
}

fn push_piece<'a>(lines: &mut [Vec<Piece<'a>>], text: &str, style: &'a Style) {
    let Some(line) = lines.last_mut() else {
        return;
    };
    match line.last_mut() {
        Some(last) if std::ptr::eq(last.style, style) => last.text.push_str(text),
        _ => line.push(Piece {
            text: text.to_string(),
            style,
        }),
    }
}

/// Splits into alternating word / whitespace chunks, keeping every character.
fn split_keep_spaces(text: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut prev_space: Option<bool> = None;
    for (i, ch) in text.char_indices() {
        let space = ch.is_whitespace();
        if prev_space.is_some_and(|p| p != space) {
            out.push(&text[start..i]);
            start = i;
        }
        prev_space = Some(space);
    }
    if start < text.len() {
        out.push(&text[start..]);
    }
    out
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push(char::REPLACEMENT_CHARACTER),
        }
    }
    out
}

/// XML 1.0 `Char`: tab, newline and carriage return are the only allowed controls.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}
