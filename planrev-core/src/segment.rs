//! Line-level "what changed" hinting for the whole-file view.
//!
//! This is a greedy, forward-only matcher, not a diff. Each line of the updated body
//! is looked up in the original from the very start; it counts as unchanged only when
//! its first occurrence lies at or after the end of the previous unchanged match.
//! A line that moved earlier, or that repeats text already consumed, is therefore
//! reported as new even when it is byte-identical to original content.

use crate::pane::{wrapped_lines, LineKind, PaneLine};

/// A slice of the updated body and whether it should be highlighted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment<'a> {
    pub text: &'a str,
    pub is_new: bool,
}

/// Splits `updated` into segments tagged new or unchanged relative to `original`.
///
/// With no original (a file that does not exist yet) the whole body is one new
/// segment. Otherwise every newline-terminated line of `updated` is its own
/// segment; a final line without a trailing newline is kept as is.
pub fn segment<'a>(original: Option<&str>, updated: &'a str) -> Vec<Segment<'a>> {
    let Some(original) = original else {
        return vec![Segment { text: updated, is_new: true }];
    };

    let mut last_found = 0usize;
    updated
        .split_inclusive('\n')
        .map(|text| {
            let line = text.strip_suffix('\n').unwrap_or(text);
            let is_new = match original.find(line) {
                Some(at) if at >= last_found => {
                    last_found = at + line.len();
                    false
                }
                _ => true,
            };
            Segment { text, is_new }
        })
        .collect()
}

/// Renders segments as pane rows wrapped to `width`.
///
/// Wrapping happens after tagging, so every row produced from a new line is
/// highlighted.
pub fn segment_lines(segments: &[Segment<'_>], width: usize) -> Vec<PaneLine> {
    segments
        .iter()
        .flat_map(|seg| {
            let kind = if seg.is_new { LineKind::Added } else { LineKind::Plain };
            wrapped_lines(seg.text, width, kind)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(original: Option<&str>, updated: &str) -> Vec<bool> {
        segment(original, updated).iter().map(|s| s.is_new).collect()
    }

    #[test]
    fn new_file_is_a_single_new_segment() {
        let segs = segment(None, "x\ny\n");
        assert_eq!(segs, vec![Segment { text: "x\ny\n", is_new: true }]);
    }

    #[test]
    fn repeated_line_after_cursor_is_new() {
        // The third "a" is first found at offset 0, behind the cursor.
        let segs = segment(Some("a\nb\na\n"), "a\nb\na\n");
        assert_eq!(
            segs,
            vec![
                Segment { text: "a\n", is_new: false },
                Segment { text: "b\n", is_new: false },
                Segment { text: "a\n", is_new: true },
            ]
        );
    }

    #[test]
    fn moved_line_is_new() {
        assert_eq!(tags(Some("one\ntwo\nthree\n"), "three\none\ntwo\n"), vec![false, true, true]);
    }

    #[test]
    fn inserted_line_does_not_advance_cursor() {
        assert_eq!(
            tags(Some("fn a() {}\nfn b() {}\n"), "fn a() {}\nfn inserted() {}\nfn b() {}\n"),
            vec![false, true, false]
        );
    }

    #[test]
    fn missing_trailing_newline_is_preserved() {
        let segs = segment(Some("a\nb"), "a\nb");
        assert_eq!(segs.last().map(|s| s.text), Some("b"));
        assert!(segs.iter().all(|s| !s.is_new));
    }

    #[test]
    fn empty_update_yields_no_segments() {
        assert!(segment(Some("a\n"), "").is_empty());
    }

    #[test]
    fn segmentation_is_deterministic() {
        let original = "use std::io;\n\nfn main() {\n    run();\n}\n";
        let updated = "use std::io;\nuse std::fs;\n\nfn main() {\n    run();\n    done();\n}\n";
        assert_eq!(segment(Some(original), updated), segment(Some(original), updated));
    }

    #[test]
    fn wrapped_rows_inherit_the_segment_tag() {
        let segs = segment(Some("keep\n"), "keep\nabcdefgh\n");
        let rows = segment_lines(&segs, 4);
        let kinds: Vec<LineKind> = rows.iter().map(|r| r.kind).collect();
        assert_eq!(kinds, vec![LineKind::Plain, LineKind::Added, LineKind::Added]);
        assert_eq!(rows[2].text, "efgh");
    }
}
