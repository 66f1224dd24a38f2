//! The ordered list of raw bullet strings to render.
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// Substituted whenever the feed has nothing to show.
pub const PLACEHOLDER_LINE: &str = "No updates available";

/// Raw bullet lines in render order. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletList {
    lines: Vec<String>,
}

impl BulletList {
    /// Wraps the given lines; an empty input becomes the single placeholder line.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines: Vec<String> = lines.into_iter().map(Into::into).collect();
        if lines.is_empty() {
            Self::placeholder()
        } else {
            Self { lines }
        }
    }

    pub fn placeholder() -> Self {
        Self {
            lines: vec![PLACEHOLDER_LINE.to_string()],
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.lines.len() == 1 && self.lines[0] == PLACEHOLDER_LINE
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }
}
