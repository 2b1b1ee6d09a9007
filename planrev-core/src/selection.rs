//! Which file and which entry within it the operator is looking at.
//!
//! Every path gets a list of navigable [`Entry`] values built from its result:
//! an optional new-file sentinel on top, one entry per replacement, and an optional
//! full-file sentinel at the bottom. Moving up and down is plain indexing into that
//! list, clamped at both ends.

use crate::types::{FileResult, Plan, Replacement};

/// One navigable row in the sidebar for the current path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entry {
    /// Whole proposed body of a file that does not exist yet.
    NewFile,
    /// The replacement at this index in the result's replacement list.
    Replacement(usize),
    /// Whole current body with every pending change highlighted.
    FullFile,
}

impl Entry {
    pub fn is_sentinel(self) -> bool {
        !matches!(self, Entry::Replacement(_))
    }
}

/// Builds the entry list for one result.
///
/// The new-file sentinel is present when the result carries new-file content; the
/// full-file sentinel when any replacement is still pending.
pub fn entries_for(result: &FileResult) -> Vec<Entry> {
    let mut entries = Vec::with_capacity(result.replacements.len() + 2);
    if result.is_new_file() {
        entries.push(Entry::NewFile);
    }
    entries.extend((0..result.replacements.len()).map(Entry::Replacement));
    if result.pending > 0 {
        entries.push(Entry::FullFile);
    }
    entries
}

/// Derived view of the current selection, borrowed from the plan it was built from.
///
/// Because it borrows the [`Plan`], a `SelectionInfo` cannot outlive a plan swap.
#[derive(Debug, Clone, Copy)]
pub struct SelectionInfo<'a> {
    pub path: &'a str,
    pub result: &'a FileResult,
    /// `None` while a sentinel entry is selected.
    pub replacement: Option<&'a Replacement>,
    pub replacements: &'a [Replacement],
    pub entry: Entry,
}

#[derive(Debug, Clone, Default)]
pub struct Selection {
    file_index: usize,
    entry_index: usize,
    entries: Vec<Entry>,
}

impl Selection {
    pub fn new(plan: &Plan) -> Self {
        let mut selection = Self::default();
        selection.refresh(plan);
        selection
    }

    pub fn file_index(&self) -> usize {
        self.file_index
    }

    pub fn entry_index(&self) -> usize {
        self.entry_index
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Number of navigable entries for the current path, sentinels included.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Highest selectable entry index for the current path.
    pub fn max_index(&self) -> usize {
        self.entries.len().saturating_sub(1)
    }

    pub fn current_entry(&self) -> Option<Entry> {
        self.entries.get(self.entry_index).copied()
    }

    /// Moves to the previous file. Returns `false` when already on the first one.
    pub fn move_file_left(&mut self, plan: &Plan) -> bool {
        if self.file_index == 0 {
            return false;
        }
        self.file_index -= 1;
        self.entry_index = 0;
        self.rebuild_entries(plan);
        true
    }

    /// Moves to the next file. Returns `false` when already on the last one.
    pub fn move_file_right(&mut self, plan: &Plan) -> bool {
        if self.file_index + 1 >= plan.path_count() {
            return false;
        }
        self.file_index += 1;
        self.entry_index = 0;
        self.rebuild_entries(plan);
        true
    }

    pub fn move_entry_up(&mut self) -> bool {
        if self.entry_index == 0 {
            return false;
        }
        self.entry_index -= 1;
        true
    }

    pub fn move_entry_down(&mut self) -> bool {
        if self.entry_index >= self.max_index() {
            return false;
        }
        self.entry_index += 1;
        true
    }

    /// Re-validates both indices against a (possibly new) plan.
    ///
    /// Must run after every plan swap: the entry list is rebuilt from `plan` and
    /// both indices are clamped into the new bounds.
    pub fn refresh(&mut self, plan: &Plan) {
        self.file_index = self.file_index.min(plan.path_count().saturating_sub(1));
        self.rebuild_entries(plan);
        self.entry_index = self.entry_index.min(self.max_index());
    }

    /// Resolves the indices against `plan`.
    ///
    /// Returns `None` when the plan has no paths or the current path has no entries.
    pub fn info<'a>(&self, plan: &'a Plan) -> Option<SelectionInfo<'a>> {
        let path = plan.path_at(self.file_index)?;
        let result = plan.result.result_for(path)?;
        let entry = self.current_entry()?;
        let replacement = match entry {
            Entry::Replacement(i) => Some(result.replacements.get(i)?),
            Entry::NewFile | Entry::FullFile => None,
        };
        Some(SelectionInfo {
            path,
            result,
            replacement,
            replacements: &result.replacements,
            entry,
        })
    }

    fn rebuild_entries(&mut self, plan: &Plan) {
        self.entries = plan
            .path_at(self.file_index)
            .and_then(|path| plan.result.result_for(path))
            .map(entries_for)
            .unwrap_or_default();
    }
}
