//! Keeps the three content panes in step with the selection.
//!
//! The file pane shows a whole body (sentinel entries); the old and new panes show one
//! replacement with a few lines of surrounding context. Panes are created lazily on
//! the first resize, because their sizes come from the terminal.

use crate::pane::{wrapped_lines, LineKind, Pane, PaneLine};
use crate::segment::{segment, segment_lines};
use crate::selection::{Entry, SelectionInfo};
use crate::types::{Plan, Replacement};

/// Rows reserved for the status bar below the main area.
const STATUS_ROWS: u16 = 1;
/// Rows and columns taken by a pane border.
const BORDER: u16 = 2;

/// Outer sizes of every screen region for one terminal size.
///
/// Shared by the synchronizer (which sizes the panes) and the renderer (which lays
/// out blocks), so both agree on where content goes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Geometry {
    pub sidebar_width: u16,
    pub main_width: u16,
    pub main_height: u16,
    /// Outer height of the old-value pane; the new-value pane takes the rest.
    pub old_height: u16,
}

impl Geometry {
    /// Splits a `width × height` terminal. The sidebar never takes more than a third.
    pub fn compute(width: u16, height: u16, sidebar_width: u16) -> Self {
        let sidebar_width = sidebar_width.min(width / 3);
        let main_height = height.saturating_sub(STATUS_ROWS);
        Self {
            sidebar_width,
            main_width: width - sidebar_width,
            main_height,
            old_height: main_height / 2,
        }
    }

    pub fn new_height(&self) -> u16 {
        self.main_height - self.old_height
    }

    fn inner(width: u16, height: u16) -> (u16, u16) {
        (width.saturating_sub(BORDER), height.saturating_sub(BORDER))
    }

    pub fn file_inner(&self) -> (u16, u16) {
        Self::inner(self.main_width, self.main_height)
    }

    pub fn old_inner(&self) -> (u16, u16) {
        Self::inner(self.main_width, self.old_height)
    }

    pub fn new_inner(&self) -> (u16, u16) {
        Self::inner(self.main_width, self.new_height())
    }
}

/// Which of the two change panes receives scroll commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChangeFocus {
    #[default]
    Old,
    New,
}

impl ChangeFocus {
    pub fn toggle(self) -> Self {
        match self {
            ChangeFocus::Old => ChangeFocus::New,
            ChangeFocus::New => ChangeFocus::Old,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaneId {
    File,
    Old,
    New,
}

/// What the main area currently displays.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Showing {
    /// Nothing selected (empty plan).
    #[default]
    Nothing,
    /// The file pane, for a sentinel entry.
    File,
    /// The old and new panes, for a replacement.
    Change,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollCommand {
    LineUp(usize),
    LineDown(usize),
    PageUp,
    PageDown,
}

#[derive(Debug, Clone, Default)]
pub struct PaneSet {
    pub file: Pane,
    pub old: Pane,
    pub new: Pane,
}

impl PaneSet {
    pub fn get(&self, id: PaneId) -> &Pane {
        match id {
            PaneId::File => &self.file,
            PaneId::Old => &self.old,
            PaneId::New => &self.new,
        }
    }

    fn get_mut(&mut self, id: PaneId) -> &mut Pane {
        match id {
            PaneId::File => &mut self.file,
            PaneId::Old => &mut self.old,
            PaneId::New => &mut self.new,
        }
    }
}

/// The old/new rendering of one replacement.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeDisplay {
    pub old: Vec<PaneLine>,
    pub new: Vec<PaneLine>,
    /// Logical context lines shown above the replacement.
    pub prepended: usize,
    /// Wrapped rows those context lines occupy; the replacement starts at this row.
    pub first_row: usize,
}

/// Builds the whole-file view: segments highlighted, wrapped to `width`.
pub fn file_display(original: Option<&str>, updated: &str, width: usize) -> Vec<PaneLine> {
    segment_lines(&segment(original, updated), width)
}

/// Builds the old/new views of `rep` with up to `context_lines` lines around it.
///
/// Context comes from the first occurrence of the old span in `haystack` (the
/// original body, or the current body for files without one). Only whole lines are
/// used as context; when the old span is empty or absent no context is shown.
pub fn change_display(
    haystack: Option<&str>,
    rep: &Replacement,
    context_lines: usize,
    width: usize,
) -> ChangeDisplay {
    let (before, after) = surrounding_lines(haystack, &rep.old, context_lines);

    let context = |lines: &[&str]| -> Vec<PaneLine> {
        lines
            .iter()
            .flat_map(|l| wrapped_lines(l, width, LineKind::Context))
            .collect()
    };
    let prefix = context(&before);
    let suffix = context(&after);

    let mut old = prefix.clone();
    old.extend(wrapped_lines(&rep.old, width, LineKind::Removed));
    old.extend(suffix.iter().cloned());

    let mut new = prefix.clone();
    new.extend(wrapped_lines(&rep.new, width, LineKind::Added));
    new.extend(suffix);

    ChangeDisplay { old, new, prepended: before.len(), first_row: prefix.len() }
}

fn surrounding_lines<'a>(
    haystack: Option<&'a str>,
    old: &str,
    context_lines: usize,
) -> (Vec<&'a str>, Vec<&'a str>) {
    let Some(haystack) = haystack else {
        return (Vec::new(), Vec::new());
    };
    if old.is_empty() || context_lines == 0 {
        return (Vec::new(), Vec::new());
    }
    let Some(at) = haystack.find(old) else {
        return (Vec::new(), Vec::new());
    };

    // Whole lines strictly before the line the match starts on.
    let head = &haystack[..at];
    let head = &head[..head.rfind('\n').map(|i| i + 1).unwrap_or(0)];
    let before: Vec<&str> = head.lines().collect();
    let before = before[before.len().saturating_sub(context_lines)..].to_vec();

    // Whole lines strictly after the line the match ends on.
    let tail = &haystack[at + old.len()..];
    let tail = if old.ends_with('\n') {
        tail
    } else {
        tail.find('\n').map(|i| &tail[i + 1..]).unwrap_or("")
    };
    let after: Vec<&str> = tail.lines().take(context_lines).collect();

    (before, after)
}

/// Owns the file, old, and new panes and re-derives their content from a selection.
#[derive(Debug, Clone)]
pub struct Viewports {
    panes: Option<PaneSet>,
    geometry: Geometry,
    focus: ChangeFocus,
    showing: Showing,
    context_lines: usize,
    sidebar_width: u16,
}

impl Viewports {
    pub fn new(context_lines: usize, sidebar_width: u16) -> Self {
        Self {
            panes: None,
            geometry: Geometry::default(),
            focus: ChangeFocus::default(),
            showing: Showing::default(),
            context_lines,
            sidebar_width,
        }
    }

    /// `true` once the first resize has created the panes.
    pub fn is_ready(&self) -> bool {
        self.panes.is_some()
    }

    pub fn panes(&self) -> Option<&PaneSet> {
        self.panes.as_ref()
    }

    pub fn geometry(&self) -> Geometry {
        self.geometry
    }

    pub fn focus(&self) -> ChangeFocus {
        self.focus
    }

    pub fn showing(&self) -> Showing {
        self.showing
    }

    /// Applies a new terminal size.
    ///
    /// The first call creates the panes and scrolls to the selection; later calls
    /// only resize and re-wrap, keeping each pane's offset (clamped).
    pub fn resize(&mut self, width: u16, height: u16, plan: &Plan, info: Option<&SelectionInfo<'_>>) {
        self.geometry = Geometry::compute(width, height, self.sidebar_width);
        let (fw, fh) = self.geometry.file_inner();
        let (ow, oh) = self.geometry.old_inner();
        let (nw, nh) = self.geometry.new_inner();

        let did_init = match self.panes.as_mut() {
            Some(panes) => {
                panes.file.set_size(fw, fh);
                panes.old.set_size(ow, oh);
                panes.new.set_size(nw, nh);
                false
            }
            None => {
                tracing::debug!(width, height, "initialising panes");
                self.panes = Some(PaneSet {
                    file: Pane::new(fw, fh),
                    old: Pane::new(ow, oh),
                    new: Pane::new(nw, nh),
                });
                true
            }
        };
        self.recompute(plan, info, did_init);
    }

    /// Re-derives pane content for `info`.
    ///
    /// Sentinel entries fill the file pane; a replacement fills the old and new panes.
    /// With `scroll_to_replacement` the pane(s) holding the selection are scrolled so
    /// it is visible. A no-op before the first resize.
    pub fn recompute(&mut self, plan: &Plan, info: Option<&SelectionInfo<'_>>, scroll_to_replacement: bool) {
        let context_lines = self.context_lines;
        let Some(panes) = self.panes.as_mut() else {
            return;
        };
        let Some(info) = info else {
            panes.file.set_content(Vec::new());
            panes.old.set_content(Vec::new());
            panes.new.set_content(Vec::new());
            self.showing = Showing::Nothing;
            return;
        };

        match (info.entry, info.replacement) {
            (Entry::Replacement(_), Some(rep)) => {
                let haystack = plan.original_body(info.path).or_else(|| plan.current_body(info.path));
                let display = change_display(haystack, rep, context_lines, panes.old.width() as usize);
                panes.old.set_content(display.old);
                panes.new.set_content(display.new);
                if scroll_to_replacement {
                    panes.old.scroll_to_row(display.first_row);
                    panes.new.scroll_to_row(display.first_row);
                }
                self.showing = Showing::Change;
            }
            (entry, _) => {
                let original = plan.original_body(info.path);
                let updated = match entry {
                    Entry::NewFile => info.result.content.as_deref(),
                    _ => plan.current_body(info.path),
                }
                .unwrap_or_default();
                let lines = file_display(original, updated, panes.file.width() as usize);
                let first_new = lines.iter().position(|l| l.kind == LineKind::Added).unwrap_or(0);
                panes.file.set_content(lines);
                if scroll_to_replacement {
                    panes.file.scroll_to_row(first_new);
                }
                self.showing = Showing::File;
            }
        }
    }

    /// Flips scroll focus between the old and new panes and re-derives content
    /// without scrolling.
    pub fn switch_view(&mut self, plan: &Plan, info: Option<&SelectionInfo<'_>>) {
        self.focus = self.focus.toggle();
        self.recompute(plan, info, false);
    }

    /// The single pane that scroll commands go to, if any.
    ///
    /// Whole-file mode scrolls the file pane. In change mode the focused pane wins if
    /// it can scroll, otherwise the new pane.
    pub fn active_pane(&self) -> Option<PaneId> {
        let panes = self.panes.as_ref()?;
        match self.showing {
            Showing::Nothing => None,
            Showing::File => panes.file.is_scrollable().then_some(PaneId::File),
            Showing::Change => {
                if self.focus == ChangeFocus::Old && panes.old.is_scrollable() {
                    Some(PaneId::Old)
                } else if panes.new.is_scrollable() {
                    Some(PaneId::New)
                } else {
                    None
                }
            }
        }
    }

    /// Routes a scroll command to [`Self::active_pane`]. Returns the pane it moved.
    pub fn scroll(&mut self, command: ScrollCommand) -> Option<PaneId> {
        let id = self.active_pane()?;
        let pane = self.panes.as_mut()?.get_mut(id);
        match command {
            ScrollCommand::LineUp(n) => pane.line_up(n),
            ScrollCommand::LineDown(n) => pane.line_down(n),
            ScrollCommand::PageUp => pane.view_up(),
            ScrollCommand::PageDown => pane.view_down(),
        }
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::tests::{file_result, rep, sample_plan};
    use crate::selection::Selection;
    use crate::types::PlanResult;

    fn long_plan() -> Plan {
        let original: String = (0..40).map(|i| format!("line {i}\n")).collect();
        let current = original.replace("line 20\n", "line twenty\n");
        let mut plan = Plan {
            id: "p".to_owned(),
            branch: "main".to_owned(),
            result: PlanResult::from_results(vec![file_result(
                "long.rs",
                vec![rep("r1", "line 20\n", "line twenty\n")],
                None,
            )]),
            ..Plan::default()
        };
        plan.contexts.insert("long.rs".to_owned(), original);
        plan.files.insert("long.rs".to_owned(), current);
        plan
    }

    #[test]
    fn geometry_splits_the_terminal() {
        let g = Geometry::compute(120, 41, 32);
        assert_eq!(g.sidebar_width, 32);
        assert_eq!(g.main_width, 88);
        assert_eq!(g.main_height, 40);
        assert_eq!(g.old_inner(), (86, 18));
        assert_eq!(g.new_inner(), (86, 18));
        assert_eq!(Geometry::compute(60, 10, 32).sidebar_width, 20);
    }

    #[test]
    fn change_display_adds_context_around_the_span() {
        let haystack = "a\nb\nc\nold\nd\ne\nf\n";
        let display = change_display(Some(haystack), &rep("r", "old\n", "new\n"), 2, 80);
        let texts: Vec<&str> = display.old.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c", "old", "d", "e"]);
        let texts: Vec<&str> = display.new.iter().map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["b", "c", "new", "d", "e"]);
        assert_eq!(display.prepended, 2);
        assert_eq!(display.first_row, 2);
        assert_eq!(display.old[2].kind, LineKind::Removed);
        assert_eq!(display.new[2].kind, LineKind::Added);
        assert_eq!(display.new[0].kind, LineKind::Context);
    }

    #[test]
    fn change_display_without_match_has_no_context() {
        let display = change_display(Some("a\nb\n"), &rep("r", "zzz", "yyy"), 3, 80);
        assert_eq!(display.prepended, 0);
        assert_eq!(display.old.len(), 1);
        let display = change_display(None, &rep("r", "a", "b"), 3, 80);
        assert_eq!(display.first_row, 0);
    }

    #[test]
    fn recompute_before_first_resize_is_a_noop() {
        let plan = sample_plan();
        let sel = Selection::new(&plan);
        let mut vp = Viewports::new(3, 30);
        vp.recompute(&plan, sel.info(&plan).as_ref(), true);
        assert!(!vp.is_ready());
        assert_eq!(vp.showing(), Showing::Nothing);
        assert_eq!(vp.active_pane(), None);
    }

    #[test]
    fn sentinel_fills_the_file_pane() {
        let plan = sample_plan();
        let mut sel = Selection::new(&plan);
        sel.move_file_right(&plan); // b.rs, new-file sentinel on top
        let mut vp = Viewports::new(3, 30);
        vp.resize(100, 30, &plan, sel.info(&plan).as_ref());
        assert_eq!(vp.showing(), Showing::File);
        let file = &vp.panes().unwrap().file;
        assert_eq!(file.lines(), &[PaneLine::new("fn b() {}", LineKind::Added)]);
    }

    #[test]
    fn first_resize_scrolls_to_the_replacement() {
        let plan = long_plan();
        let sel = Selection::new(&plan);
        let mut vp = Viewports::new(3, 30);
        vp.resize(100, 11, &plan, sel.info(&plan).as_ref());
        let panes = vp.panes().unwrap();
        // 3 context + 1 old + 3 context rows in a 3-row pane: replacement row is 3.
        assert_eq!(panes.old.height(), 3);
        assert_eq!(panes.old.lines().len(), 7);
        assert_eq!(panes.old.offset(), 3);
        assert_eq!(panes.new.offset(), 3);

        // Same selection, taller terminals: only the clamp may move the offset.
        vp.resize(100, 13, &plan, sel.info(&plan).as_ref());
        let panes = vp.panes().unwrap();
        assert_eq!(panes.old.height(), 4);
        assert_eq!(panes.old.offset(), 3);
        vp.resize(100, 41, &plan, sel.info(&plan).as_ref());
        assert_eq!(vp.panes().unwrap().old.offset(), 0);
    }

    #[test]
    fn full_file_scrolls_to_first_new_line() {
        let plan = long_plan();
        let mut sel = Selection::new(&plan);
        sel.move_entry_down();
        let mut vp = Viewports::new(3, 30);
        vp.resize(100, 11, &plan, sel.info(&plan).as_ref());
        let file = &vp.panes().unwrap().file;
        assert_eq!(file.lines()[20].kind, LineKind::Added);
        assert_eq!(file.offset(), 20);
        assert_eq!(vp.active_pane(), Some(PaneId::File));
    }

    #[test]
    fn switch_view_keeps_content_and_moves_scroll_focus() {
        let plan = long_plan();
        let sel = Selection::new(&plan);
        let mut vp = Viewports::new(3, 30);
        vp.resize(100, 11, &plan, sel.info(&plan).as_ref());
        let hashes = |vp: &Viewports| {
            let p = vp.panes().unwrap();
            (p.file.content_hash(), p.old.content_hash(), p.new.content_hash())
        };
        let before = hashes(&vp);
        assert_eq!(vp.active_pane(), Some(PaneId::Old));

        vp.switch_view(&plan, sel.info(&plan).as_ref());
        assert_eq!(hashes(&vp), before);
        assert_eq!(vp.focus(), ChangeFocus::New);
        assert_eq!(vp.active_pane(), Some(PaneId::New));
        assert_eq!(vp.scroll(ScrollCommand::LineUp(1)), Some(PaneId::New));
        assert_eq!(vp.panes().unwrap().new.offset(), 2);
        assert_eq!(vp.panes().unwrap().old.offset(), 3);
    }

    #[test]
    fn unscrollable_focus_falls_back_to_new_pane() {
        let mut plan = long_plan();
        // Short old span, long new span.
        let long_new: String = (0..20).map(|i| format!("n{i}\n")).collect();
        let r = plan.result.results_by_path.get_mut("long.rs").unwrap();
        r.replacements[0].new = long_new;
        let sel = Selection::new(&plan);
        let mut vp = Viewports::new(0, 30);
        vp.resize(100, 41, &plan, sel.info(&plan).as_ref());
        assert!(!vp.panes().unwrap().old.is_scrollable());
        assert_eq!(vp.focus(), ChangeFocus::Old);
        assert_eq!(vp.active_pane(), Some(PaneId::New));
        vp.scroll(ScrollCommand::PageDown);
        assert_eq!(vp.panes().unwrap().new.offset(), 2);
    }
}
