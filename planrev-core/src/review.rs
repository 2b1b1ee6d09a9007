//! The review state machine.
//!
//! [`ReviewState::update`] is the only way operator input changes what is shown.
//! Anything that must leave the process (a backend reject, a clipboard write) is
//! returned as an [`Effect`] for the caller to run.

use std::sync::Arc;

use crate::actions::{self, ActionError};
use crate::selection::{Selection, SelectionInfo};
use crate::types::{Plan, RejectTarget};
use crate::viewport::{ScrollCommand, Viewports};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReviewOptions {
    /// Lines of surrounding context shown with a single replacement.
    pub context_lines: usize,
    /// Preferred sidebar width in columns, before the one-third cap.
    pub sidebar_width: u16,
}

impl Default for ReviewOptions {
    fn default() -> Self {
        Self { context_lines: 3, sidebar_width: 32 }
    }
}

/// One operator intent, already decoded from a key or mouse event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    PrevFile,
    NextFile,
    PrevEntry,
    NextEntry,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    SwitchView,
    Reject,
    Copy,
    Resize(u16, u16),
}

/// Work the caller must perform after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Send this reject to the backend, then reload the plan.
    Reject(RejectTarget),
    /// Put this text on the clipboard.
    Copy(String),
}

#[derive(Debug, Clone)]
pub struct ReviewState {
    plan: Arc<Plan>,
    selection: Selection,
    viewports: Viewports,
}

impl ReviewState {
    pub fn new(plan: Arc<Plan>, options: ReviewOptions) -> Self {
        let selection = Selection::new(&plan);
        Self {
            plan,
            selection,
            viewports: Viewports::new(options.context_lines, options.sidebar_width),
        }
    }

    pub fn plan(&self) -> &Plan {
        &self.plan
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn viewports(&self) -> &Viewports {
        &self.viewports
    }

    pub fn info(&self) -> Option<SelectionInfo<'_>> {
        self.selection.info(&self.plan)
    }

    /// Applies one intent.
    ///
    /// # Errors
    ///
    /// [`ActionError::NoSelection`] for a reject or copy with no replacement
    /// selected. State is unchanged in that case.
    pub fn update(&mut self, intent: Intent) -> Result<Option<Effect>, ActionError> {
        match intent {
            Intent::PrevFile => {
                if self.selection.move_file_left(&self.plan) {
                    self.sync(true);
                }
            }
            Intent::NextFile => {
                if self.selection.move_file_right(&self.plan) {
                    self.sync(true);
                }
            }
            Intent::PrevEntry => {
                if self.selection.move_entry_up() {
                    self.sync(true);
                }
            }
            Intent::NextEntry => {
                if self.selection.move_entry_down() {
                    self.sync(true);
                }
            }
            Intent::ScrollUp => {
                self.viewports.scroll(ScrollCommand::LineUp(1));
            }
            Intent::ScrollDown => {
                self.viewports.scroll(ScrollCommand::LineDown(1));
            }
            Intent::PageUp => {
                self.viewports.scroll(ScrollCommand::PageUp);
            }
            Intent::PageDown => {
                self.viewports.scroll(ScrollCommand::PageDown);
            }
            Intent::SwitchView => {
                let info = self.selection.info(&self.plan);
                self.viewports.switch_view(&self.plan, info.as_ref());
            }
            Intent::Resize(width, height) => {
                let info = self.selection.info(&self.plan);
                self.viewports.resize(width, height, &self.plan, info.as_ref());
            }
            Intent::Reject => {
                let target = actions::reject_target(&self.plan, self.info().as_ref())?;
                return Ok(Some(Effect::Reject(target)));
            }
            Intent::Copy => {
                let text = actions::copy_text(self.info().as_ref())?;
                return Ok(Some(Effect::Copy(text)));
            }
        }
        Ok(None)
    }

    /// Swaps in a freshly loaded plan.
    ///
    /// Indices are re-clamped against the new plan before anything reads them, then
    /// the panes are rebuilt and scrolled to the (possibly different) selection.
    pub fn replace_plan(&mut self, plan: Arc<Plan>) {
        tracing::debug!(plan = %plan.id, paths = plan.path_count(), "plan replaced");
        self.plan = plan;
        self.selection.refresh(&self.plan);
        self.sync(true);
    }

    fn sync(&mut self, scroll_to_replacement: bool) {
        let info = self.selection.info(&self.plan);
        self.viewports.recompute(&self.plan, info.as_ref(), scroll_to_replacement);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selection::tests::sample_plan;
    use crate::selection::Entry;
    use crate::viewport::{ChangeFocus, PaneId, Showing};

    fn state() -> ReviewState {
        let mut state = ReviewState::new(Arc::new(sample_plan()), ReviewOptions::default());
        state.update(Intent::Resize(100, 30)).unwrap();
        state
    }

    #[test]
    fn navigation_walks_files_and_entries() {
        let mut s = state();
        assert_eq!(s.viewports().showing(), Showing::Change);
        assert_eq!(s.update(Intent::NextFile).unwrap(), None);
        assert_eq!(s.info().unwrap().path, "b.rs");
        assert_eq!(s.viewports().showing(), Showing::File);

        for _ in 0..6 {
            s.update(Intent::NextEntry).unwrap();
        }
        assert_eq!(s.selection().current_entry(), Some(Entry::FullFile));
        s.update(Intent::PrevEntry).unwrap();
        assert_eq!(s.info().unwrap().replacement.map(|r| r.id.as_str()), Some("r3"));
        assert_eq!(s.viewports().showing(), Showing::Change);

        s.update(Intent::PrevFile).unwrap();
        s.update(Intent::PrevFile).unwrap();
        assert_eq!(s.selection().file_index(), 0);
        assert_eq!(s.selection().entry_index(), 0);
    }

    #[test]
    fn reject_and_copy_produce_effects() {
        let mut s = state();
        match s.update(Intent::Reject).unwrap() {
            Some(Effect::Reject(target)) => assert_eq!(target.replacement_id, "r1"),
            other => panic!("unexpected effect: {other:?}"),
        }
        assert_eq!(s.update(Intent::Copy).unwrap(), Some(Effect::Copy("new a".to_owned())));
    }

    #[test]
    fn actions_on_a_sentinel_fail_without_side_effects() {
        let mut s = state();
        s.update(Intent::NextEntry).unwrap();
        let before = (s.selection().file_index(), s.selection().entry_index());
        assert!(matches!(s.update(Intent::Reject), Err(ActionError::NoSelection)));
        assert!(matches!(s.update(Intent::Copy), Err(ActionError::NoSelection)));
        assert_eq!((s.selection().file_index(), s.selection().entry_index()), before);
    }

    #[test]
    fn switch_view_toggles_focus() {
        let mut s = state();
        assert_eq!(s.viewports().focus(), ChangeFocus::Old);
        s.update(Intent::SwitchView).unwrap();
        assert_eq!(s.viewports().focus(), ChangeFocus::New);
        s.update(Intent::SwitchView).unwrap();
        assert_eq!(s.viewports().focus(), ChangeFocus::Old);
    }

    #[test]
    fn scrolling_a_short_pane_does_nothing() {
        let mut s = state();
        assert_eq!(s.viewports().active_pane(), None);
        s.update(Intent::ScrollDown).unwrap();
        s.update(Intent::PageDown).unwrap();
        let panes = s.viewports().panes().unwrap();
        assert_eq!(panes.get(PaneId::Old).offset(), 0);
        assert_eq!(panes.get(PaneId::New).offset(), 0);
    }

    #[test]
    fn replace_plan_reclamps_the_selection() {
        let mut s = state();
        s.update(Intent::NextFile).unwrap();
        s.update(Intent::NextFile).unwrap();
        assert_eq!(s.info().unwrap().path, "c.rs");

        // c.rs was dropped from the plan.
        let mut smaller = sample_plan();
        smaller.result.sorted_paths.retain(|p| p != "c.rs");
        smaller.result.results_by_path.remove("c.rs");
        s.replace_plan(Arc::new(smaller));
        assert_eq!(s.selection().file_index(), 1);
        assert_eq!(s.info().unwrap().path, "b.rs");
        assert_eq!(s.viewports().showing(), Showing::File);

        s.replace_plan(Arc::new(Plan::default()));
        assert!(s.info().is_none());
        assert_eq!(s.viewports().showing(), Showing::Nothing);
        assert!(matches!(s.update(Intent::Reject), Err(ActionError::NoSelection)));
    }
}
