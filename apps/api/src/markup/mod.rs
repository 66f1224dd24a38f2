//! Inline markup: splits one bullet line into flat styled segments.
#![allow(dead_code)]
//!
//! The grammar is a pluggable strategy (`MarkupGrammar`), chosen once at startup
//! via `GrammarKind`. Measurement (`plain_text` / `plain_length`) is derived from
//! `tokenize`, so the layout engine and the renderer always agree on which
//! characters are visible.

pub mod grammar;

use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use grammar::DelimitedGrammar;

// ────────────────────────────────────────────────────────────────────────────
// Segment model
// ────────────────────────────────────────────────────────────────────────────

/// Typographic treatment of a run. Runs never nest: a run is exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentStyle {
    Plain,
    Bold,
    Italic,
}

/// A contiguous styled run within one bullet line.
///
/// A segment with `is_break = true` is a forced line break and carries no text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub style: SegmentStyle,
    pub is_break: bool,
}

impl Segment {
    pub fn plain(text: impl Into<String>) -> Self {
        Self::styled(text, SegmentStyle::Plain)
    }

    pub fn bold(text: impl Into<String>) -> Self {
        Self::styled(text, SegmentStyle::Bold)
    }

    pub fn italic(text: impl Into<String>) -> Self {
        Self::styled(text, SegmentStyle::Italic)
    }

    pub fn styled(text: impl Into<String>, style: SegmentStyle) -> Self {
        Self {
            text: text.into(),
            style,
            is_break: false,
        }
    }

    pub fn line_break() -> Self {
        Self {
            text: String::new(),
            style: SegmentStyle::Plain,
            is_break: true,
        }
    }

    /// Number of visible characters this segment contributes (0 for breaks).
    pub fn visible_len(&self) -> usize {
        if self.is_break {
            0
        } else {
            self.text.chars().count()
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Grammar trait
// ────────────────────────────────────────────────────────────────────────────

/// An inline styling grammar. Implement this to add a markup dialect without
/// touching the layout engine or the renderer.
///
/// `tokenize` is total: malformed or unmatched markers degrade to plain text.
pub trait MarkupGrammar: Send + Sync {
    /// Short identifier used in logs and config (`markdown`, `bracket`, `tag`).
    fn name(&self) -> &'static str;

    fn tokenize(&self, line: &str) -> Vec<Segment>;

    /// The line with all markup syntax removed. Breaks contribute nothing.
    fn plain_text(&self, line: &str) -> String {
        self.tokenize(line)
            .into_iter()
            .filter(|s| !s.is_break)
            .map(|s| s.text)
            .collect()
    }

    /// Visible character count, used only for measurement.
    fn plain_length(&self, line: &str) -> usize {
        self.tokenize(line).iter().map(Segment::visible_len).sum()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Grammar selection
// ────────────────────────────────────────────────────────────────────────────

/// The built-in grammar dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrammarKind {
    /// `**bold**`, `*italic*`
    Markdown,
    /// `[[bold]]`, `[italic]`
    Bracket,
    /// `<b>bold</b>`, `<i>italic</i>`, `<br>`
    Tag,
}

impl GrammarKind {
    pub fn build(self) -> Arc<dyn MarkupGrammar> {
        match self {
            GrammarKind::Markdown => Arc::new(DelimitedGrammar::markdown()),
            GrammarKind::Bracket => Arc::new(DelimitedGrammar::bracket()),
            GrammarKind::Tag => Arc::new(DelimitedGrammar::tag()),
        }
    }
}

impl FromStr for GrammarKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(GrammarKind::Markdown),
            "bracket" => Ok(GrammarKind::Bracket),
            "tag" | "tags" => Ok(GrammarKind::Tag),
            other => Err(format!("unknown markup grammar '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grammar_kind_parses_aliases() {
        assert_eq!("markdown".parse::<GrammarKind>(), Ok(GrammarKind::Markdown));
        assert_eq!(" MD ".parse::<GrammarKind>(), Ok(GrammarKind::Markdown));
        assert_eq!("bracket".parse::<GrammarKind>(), Ok(GrammarKind::Bracket));
        assert_eq!("Tags".parse::<GrammarKind>(), Ok(GrammarKind::Tag));
        assert!("rst".parse::<GrammarKind>().is_err());
    }

    #[test]
    fn test_build_returns_matching_grammar() {
        assert_eq!(GrammarKind::Markdown.build().name(), "markdown");
        assert_eq!(GrammarKind::Bracket.build().name(), "bracket");
        assert_eq!(GrammarKind::Tag.build().name(), "tag");
    }

    #[test]
    fn test_break_segment_has_no_visible_len() {
        assert_eq!(Segment::line_break().visible_len(), 0);
        assert_eq!(Segment::bold("héllo").visible_len(), 5);
    }

    #[test]
    fn test_plain_length_matches_segment_sum_for_every_grammar() {
        let samples = [
            "a **bold** word",
            "*it* and **bo** and *unclosed",
            "[[x]] [y] [[ ]] [",
            "<b>x</b><i>y</i><br>tail<b>open",
            "line\\nbreak\nagain",
            "",
            "***",
        ];
        for kind in [GrammarKind::Markdown, GrammarKind::Bracket, GrammarKind::Tag] {
            let grammar = kind.build();
            for line in samples {
                let sum: usize = grammar.tokenize(line).iter().map(Segment::visible_len).sum();
                assert_eq!(
                    grammar.plain_length(line),
                    sum,
                    "{} disagrees on {line:?}",
                    grammar.name()
                );
                assert_eq!(grammar.plain_text(line).chars().count(), sum);
            }
        }
    }
}
