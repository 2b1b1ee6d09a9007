//! Sidebar renderer: every path under review, with the current path expanded into
//! its navigable entries.

use planrev_core::selection::Entry;
use planrev_core::types::{FileResult, Plan};
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, ListState},
    Frame,
};

use crate::app::AppState;
use crate::theme::Theme;
use crate::ui::layout::panel_block;

/// Renders the sidebar with the selected entry highlighted.
pub fn render_sidebar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let plan = state.review.plan();
    let selection = state.review.selection();
    let title = format!("Files ({})", plan.path_count());
    let block = panel_block(Line::from(title), false, theme);

    let items = sidebar_items(plan, selection.file_index(), selection.entries(), theme);
    let selected_row = (plan.path_count() > 0 && !selection.entries().is_empty())
        .then(|| selection.file_index() + 1 + selection.entry_index());

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .bg(theme.sidebar_highlight_bg)
            .add_modifier(Modifier::BOLD),
    );
    let mut list_state = ListState::default().with_selected(selected_row);
    frame.render_stateful_widget(list, area, &mut list_state);
}

/// One row per path; the path at `file_index` is followed by one row per entry.
fn sidebar_items(plan: &Plan, file_index: usize, entries: &[Entry], theme: &Theme) -> Vec<ListItem<'static>> {
    if plan.path_count() == 0 {
        return vec![ListItem::new(Line::raw("No pending changes"))];
    }

    let mut items = Vec::new();
    for (i, path) in plan.result.sorted_paths.iter().enumerate() {
        let Some(result) = plan.result.result_for(path) else {
            continue;
        };
        let color = if i == file_index { theme.sidebar_file_selected } else { theme.sidebar_file };
        let mut spans = vec![Span::styled(path.clone(), Style::default().fg(color))];
        if result.pending > 0 {
            spans.push(Span::styled(
                format!(" ({})", result.pending),
                Style::default().fg(theme.border_inactive),
            ));
        }
        items.push(ListItem::new(Line::from(spans)));

        if i == file_index {
            items.extend(entries.iter().map(|entry| entry_item(result, *entry, theme)));
        }
    }
    items
}

fn entry_item(result: &FileResult, entry: Entry, theme: &Theme) -> ListItem<'static> {
    let line = match entry {
        Entry::NewFile => Line::styled("  + new file", Style::default().fg(theme.sidebar_sentinel)),
        Entry::FullFile => Line::styled("  = full file", Style::default().fg(theme.sidebar_sentinel)),
        Entry::Replacement(i) => {
            let label = result
                .replacements
                .get(i)
                .map(|rep| preview(&rep.old))
                .unwrap_or_default();
            Line::from(vec![
                Span::styled(format!("  {}. ", i + 1), Style::default().fg(theme.border_inactive)),
                Span::styled(label, Style::default().fg(theme.line_removed)),
            ])
        }
    };
    ListItem::new(line)
}

/// First non-blank line of a span, trimmed. Long labels are clipped by the list.
fn preview(text: &str) -> String {
    text.lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("(empty)")
        .to_owned()
}
