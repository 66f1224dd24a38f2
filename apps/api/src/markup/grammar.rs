//! Delimiter-pair scanner shared by every built-in markup dialect.
//!
//! One left-to-right pass. At each position:
//! 1. a break token emits a break segment;
//! 2. otherwise the first marker pair (longest opener first) whose closer appears later,
//!    with non-empty content free of openers and breaks, emits a styled run;
//! 3. otherwise the character joins the current plain run.
//!
//! Unmatched markers fall through to step 3, so no visible character is ever dropped.

use super::{MarkupGrammar, Segment, SegmentStyle};

/// An opener/closer pair wrapping a styled run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerPair {
    pub open: &'static str,
    pub close: &'static str,
    pub style: SegmentStyle,
}

impl MarkerPair {
    pub const fn new(open: &'static str, close: &'static str, style: SegmentStyle) -> Self {
        Self { open, close, style }
    }
}

/// Escaped `\n` plus real newlines. Every dialect accepts these.
const COMMON_BREAKS: &[&str] = &["\\n", "\r\n", "\n"];

const MARKDOWN_PAIRS: &[MarkerPair] = &[
    MarkerPair::new("**", "**", SegmentStyle::Bold),
    MarkerPair::new("*", "*", SegmentStyle::Italic),
];

const BRACKET_PAIRS: &[MarkerPair] = &[
    MarkerPair::new("[[", "]]", SegmentStyle::Bold),
    MarkerPair::new("[", "]", SegmentStyle::Italic),
];

const TAG_PAIRS: &[MarkerPair] = &[
    MarkerPair::new("<b>", "</b>", SegmentStyle::Bold),
    MarkerPair::new("<i>", "</i>", SegmentStyle::Italic),
];

const TAG_BREAKS: &[&str] = &["<br/>", "<br />", "<br>"];

/// A flat, single-level grammar described by a marker table.
#[derive(Debug, Clone)]
pub struct DelimitedGrammar {
    name: &'static str,
    pairs: Vec<MarkerPair>,
    breaks: Vec<&'static str>,
}

impl DelimitedGrammar {
    /// Builds a grammar from a marker table. Pairs are tried longest-opener first;
    /// pairs with equal opener length keep their given order.
    pub fn new(name: &'static str, pairs: &[MarkerPair], breaks: &[&'static str]) -> Self {
        let mut pairs = pairs.to_vec();
        pairs.sort_by(|a, b| b.open.len().cmp(&a.open.len()));
        let mut breaks = breaks.to_vec();
        breaks.sort_by(|a, b| b.len().cmp(&a.len()));
        Self {
            name,
            pairs,
            breaks,
        }
    }

    pub fn markdown() -> Self {
        Self::new("markdown", MARKDOWN_PAIRS, COMMON_BREAKS)
    }

    pub fn bracket() -> Self {
        Self::new("bracket", BRACKET_PAIRS, COMMON_BREAKS)
    }

    pub fn tag() -> Self {
        let breaks: Vec<&'static str> = TAG_BREAKS.iter().chain(COMMON_BREAKS).copied().collect();
        Self::new("tag", TAG_PAIRS, &breaks)
    }

    /// Byte length of the break token at the start of `rest`, if any.
    fn break_at(&self, rest: &str) -> Option<usize> {
        self.breaks
            .iter()
            .find(|token| rest.starts_with(**token))
            .map(|token| token.len())
    }

    /// Styled run starting at `rest`: `(style, content, bytes consumed)`.
    fn run_at<'a>(&self, rest: &'a str) -> Option<(SegmentStyle, &'a str, usize)> {
        self.pairs.iter().find_map(|pair| {
            let after_open = rest.strip_prefix(pair.open)?;
            let close_at = after_open.find(pair.close)?;
            let content = &after_open[..close_at];
            if content.is_empty() || !self.is_flat(content) {
                return None;
            }
            Some((
                pair.style,
                content,
                pair.open.len() + close_at + pair.close.len(),
            ))
        })
    }

    /// True when `content` opens no other run and contains no break.
    fn is_flat(&self, content: &str) -> bool {
        !self.pairs.iter().any(|p| content.contains(p.open))
            && !self.breaks.iter().any(|b| content.contains(*b))
    }
}

impl MarkupGrammar for DelimitedGrammar {
    fn name(&self) -> &'static str {
        self.name
    }

    fn tokenize(&self, line: &str) -> Vec<Segment> {
        let mut segments = Vec::new();
        let mut plain = String::new();
        let mut i = 0;

        while i < line.len() {
            let rest = &line[i..];

            if let Some(len) = self.break_at(rest) {
                flush_plain(&mut plain, &mut segments);
                segments.push(Segment::line_break());
                i += len;
                continue;
            }

            if let Some((style, content, len)) = self.run_at(rest) {
                flush_plain(&mut plain, &mut segments);
                segments.push(Segment::styled(content, style));
                i += len;
                continue;
            }

            let Some(ch) = rest.chars().next() else {
                break;
            };
            plain.push(ch);
            i += ch.len_utf8();
        }

        flush_plain(&mut plain, &mut segments);
        segments
    }
}

fn flush_plain(plain: &mut String, segments: &mut Vec<Segment>) {
    if !plain.is_empty() {
        segments.push(Segment::plain(std::mem::take(plain)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn md(line: &str) -> Vec<Segment> {
        DelimitedGrammar::markdown().tokenize(line)
    }

    #[test]
    fn test_markdown_bold_in_middle() {
        let grammar = DelimitedGrammar::markdown();
        assert_eq!(
            grammar.tokenize("a **bold** word"),
            vec![
                Segment::plain("a "),
                Segment::bold("bold"),
                Segment::plain(" word")
            ]
        );
        assert_eq!(grammar.plain_length("a **bold** word"), 11);
    }

    #[test]
    fn test_markdown_italic_and_bold_adjacent() {
        assert_eq!(
            md("*fast***safe**"),
            vec![Segment::italic("fast"), Segment::bold("safe")]
        );
    }

    #[test]
    fn test_empty_line_yields_no_segments() {
        assert!(md("").is_empty());
    }

    #[test]
    fn test_unclosed_markers_stay_plain() {
        assert_eq!(md("**open and half"), vec![Segment::plain("**open and half")]);
        assert_eq!(md("trailing *"), vec![Segment::plain("trailing *")]);
    }

    #[test]
    fn test_empty_pair_stays_plain() {
        assert_eq!(md("****"), vec![Segment::plain("****")]);
        assert_eq!(md("a ** b"), vec![Segment::plain("a ** b")]);
    }

    #[test]
    fn test_nested_markers_do_not_nest() {
        // `**a*b**` cannot be bold because its content opens an italic run.
        let segments = md("**a*b**");
        assert!(segments.iter().all(|s| s.style != SegmentStyle::Bold));
        assert_eq!(DelimitedGrammar::markdown().plain_text("**a*b**"), "*ab**");
    }

    #[test]
    fn test_escaped_and_literal_breaks() {
        assert_eq!(
            md("one\\ntwo\nthree"),
            vec![
                Segment::plain("one"),
                Segment::line_break(),
                Segment::plain("two"),
                Segment::line_break(),
                Segment::plain("three"),
            ]
        );
    }

    #[test]
    fn test_break_inside_markers_prevents_run() {
        let segments = md("**a\\nb**");
        assert!(segments.iter().any(|s| s.is_break));
        assert!(segments.iter().all(|s| s.style == SegmentStyle::Plain));
    }

    #[test]
    fn test_multibyte_text_preserved() {
        let grammar = DelimitedGrammar::markdown();
        assert_eq!(
            grammar.tokenize("café **naïve** ✓"),
            vec![
                Segment::plain("café "),
                Segment::bold("naïve"),
                Segment::plain(" ✓")
            ]
        );
        assert_eq!(grammar.plain_length("café **naïve** ✓"), 12);
    }

    #[test]
    fn test_bracket_grammar() {
        let grammar = DelimitedGrammar::bracket();
        assert_eq!(
            grammar.tokenize("ship [[v2]] [today] [oops"),
            vec![
                Segment::plain("ship "),
                Segment::bold("v2"),
                Segment::plain(" "),
                Segment::italic("today"),
                Segment::plain(" [oops"),
            ]
        );
    }

    #[test]
    fn test_tag_grammar_with_br() {
        let grammar = DelimitedGrammar::tag();
        assert_eq!(
            grammar.tokenize("<b>Up</b> 99%<br/><i>all</i> good<br>"),
            vec![
                Segment::bold("Up"),
                Segment::plain(" 99%"),
                Segment::line_break(),
                Segment::italic("all"),
                Segment::plain(" good"),
                Segment::line_break(),
            ]
        );
    }

    #[test]
    fn test_tag_grammar_unmatched_tag_is_plain() {
        let grammar = DelimitedGrammar::tag();
        assert_eq!(grammar.tokenize("<b>x"), vec![Segment::plain("<b>x")]);
        assert_eq!(grammar.plain_length("<b>x"), 4);
    }

    #[test]
    fn test_segments_are_contiguous_plain_runs_merged() {
        let segments = md("a * b * c");
        // `* b *` is a valid italic run with content " b ".
        assert_eq!(
            segments,
            vec![Segment::plain("a "), Segment::italic(" b "), Segment::plain(" c")]
        );
    }
}
