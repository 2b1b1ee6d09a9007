//! Scrollable text region used for the file, old-value, and new-value views.
//!
//! A [`Pane`] stores content that has already been wrapped to its width, one
//! [`PaneLine`] per screen row, plus a vertical offset. All scroll operations clamp
//! the offset to `[0, rows - height]`; none of them ever fail.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use unicode_width::UnicodeWidthChar;

/// How a row should be coloured by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineKind {
    /// Text carried over unchanged.
    #[default]
    Plain,
    /// Text introduced by the plan.
    Added,
    /// Text the plan replaces.
    Removed,
    /// Surrounding lines shown only for orientation.
    Context,
}

/// One wrapped screen row.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PaneLine {
    pub text: String,
    pub kind: LineKind,
}

impl PaneLine {
    pub fn new(text: impl Into<String>, kind: LineKind) -> Self {
        Self { text: text.into(), kind }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Pane {
    lines: Vec<PaneLine>,
    offset: usize,
    width: u16,
    height: u16,
}

impl Pane {
    pub fn new(width: u16, height: u16) -> Self {
        Self { lines: Vec::new(), offset: 0, width, height }
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn lines(&self) -> &[PaneLine] {
        &self.lines
    }

    /// Rows currently inside the viewport.
    pub fn visible_lines(&self) -> &[PaneLine] {
        let start = self.offset.min(self.lines.len());
        let end = (start + self.height as usize).min(self.lines.len());
        &self.lines[start..end]
    }

    /// Replaces the content, keeping the current offset where possible.
    pub fn set_content(&mut self, lines: Vec<PaneLine>) {
        self.lines = lines;
        self.clamp_offset();
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
        self.clamp_offset();
    }

    /// True when the content has more rows than fit in the viewport.
    pub fn is_scrollable(&self) -> bool {
        self.lines.len() > self.height as usize
    }

    pub fn max_offset(&self) -> usize {
        self.lines.len().saturating_sub(self.height as usize)
    }

    pub fn line_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn line_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n).min(self.max_offset());
    }

    /// Scrolls up one page.
    pub fn view_up(&mut self) {
        self.line_up(self.page());
    }

    /// Scrolls down one page.
    pub fn view_down(&mut self) {
        self.line_down(self.page());
    }

    /// Moves the viewport so `row` is the top row, or as close as the content allows.
    pub fn scroll_to_row(&mut self, row: usize) {
        self.offset = row.min(self.max_offset());
    }

    /// Fingerprint of the content only; scroll position and size are excluded.
    pub fn content_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.lines.hash(&mut hasher);
        hasher.finish()
    }

    fn page(&self) -> usize {
        (self.height as usize).max(1)
    }

    fn clamp_offset(&mut self) {
        self.offset = self.offset.min(self.max_offset());
    }
}

/// Hard-wraps `text` into rows no wider than `width` display columns.
///
/// Each logical line (split on `\n`) yields at least one row, so blank lines are
/// kept. Tabs are expanded to four spaces. A `width` of zero disables wrapping.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let mut rows = Vec::new();
    for line in text.lines() {
        let line = line.replace('\t', "    ");
        if width == 0 {
            rows.push(line);
            continue;
        }
        let mut row = String::new();
        let mut row_width = 0;
        for ch in line.chars() {
            let w = ch.width().unwrap_or(0);
            if row_width + w > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            row.push(ch);
            row_width += w;
        }
        rows.push(row);
    }
    rows
}

/// Wraps `text` and tags every produced row with `kind`.
pub fn wrapped_lines(text: &str, width: usize, kind: LineKind) -> Vec<PaneLine> {
    wrap_text(text, width)
        .into_iter()
        .map(|text| PaneLine { text, kind })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(rows: usize, height: u16) -> Pane {
        let mut pane = Pane::new(10, height);
        pane.set_content((0..rows).map(|i| PaneLine::new(i.to_string(), LineKind::Plain)).collect());
        pane
    }

    #[test]
    fn scrolling_clamps_to_content() {
        let mut pane = filled(10, 4);
        assert!(pane.is_scrollable());
        pane.line_down(100);
        assert_eq!(pane.offset(), 6);
        pane.view_up();
        assert_eq!(pane.offset(), 2);
        pane.view_up();
        assert_eq!(pane.offset(), 0);
        pane.view_down();
        assert_eq!(pane.offset(), 4);
        assert_eq!(pane.visible_lines().len(), 4);
        assert_eq!(pane.visible_lines()[0].text, "4");
    }

    #[test]
    fn short_content_is_not_scrollable() {
        let mut pane = filled(3, 4);
        assert!(!pane.is_scrollable());
        pane.line_down(1);
        assert_eq!(pane.offset(), 0);
    }

    #[test]
    fn growing_viewport_pulls_offset_back() {
        let mut pane = filled(10, 4);
        pane.scroll_to_row(6);
        pane.set_size(10, 8);
        assert_eq!(pane.offset(), 2);
    }

    #[test]
    fn content_hash_ignores_offset() {
        let mut pane = filled(10, 4);
        let before = pane.content_hash();
        pane.line_down(3);
        assert_eq!(pane.content_hash(), before);
    }

    #[test]
    fn wrap_splits_long_lines_and_keeps_blank_ones() {
        assert_eq!(wrap_text("abcdef\n\nxy\n", 4), vec!["abcd", "ef", "", "xy"]);
        assert_eq!(wrap_text("abcdef", 0), vec!["abcdef"]);
        assert_eq!(wrap_text("\tx", 3), vec!["   ", " x"]);
    }

    #[test]
    fn wrap_counts_display_width() {
        // Each CJK character is two columns wide.
        assert_eq!(wrap_text("日本語", 4), vec!["日本", "語"]);
    }
}
