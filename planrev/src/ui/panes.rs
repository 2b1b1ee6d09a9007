//! Pane renderers for the main area.
//!
//! Panes arrive pre-wrapped and pre-tagged from the core, so rendering is a direct
//! mapping of the visible window to styled rows. Only `visible_lines()` is ever
//! materialised, which keeps a frame O(viewport) no matter how long the file is.

use planrev_core::pane::Pane;
use planrev_core::selection::{Entry, SelectionInfo};
use planrev_core::viewport::{PaneId, Showing, Viewports};
use ratatui::{
    layout::Rect,
    style::Style,
    text::Line,
    widgets::{List, ListItem, Paragraph},
    Frame,
};

use crate::theme::Theme;
use crate::ui::layout::{inner_rect, panel_block, AppLayout};

/// Renders whatever the viewports currently show into the main column.
pub fn render_main(
    frame: &mut Frame,
    layout: &AppLayout,
    viewports: &Viewports,
    info: Option<&SelectionInfo<'_>>,
    theme: &Theme,
) {
    let (Some(panes), Some(info)) = (viewports.panes(), info) else {
        let block = panel_block(Line::from("Changes"), false, theme);
        frame.render_widget(Paragraph::new("Nothing to review.").block(block), layout.main);
        return;
    };
    let active = viewports.active_pane();

    match viewports.showing() {
        Showing::File => {
            let kind = if info.entry == Entry::NewFile { "new file" } else { "full file" };
            let title = format!("{} ({kind})", info.path);
            render_pane(frame, layout.main, &title, &panes.file, active == Some(PaneId::File), theme);
        }
        Showing::Change => {
            let index = match info.entry {
                Entry::Replacement(i) => i + 1,
                _ => 0,
            };
            let count = info.replacements.len();
            let old_title = format!("{}  change {index}/{count}  old", info.path);
            render_pane(frame, layout.old, &old_title, &panes.old, active == Some(PaneId::Old), theme);
            render_pane(frame, layout.new, "new", &panes.new, active == Some(PaneId::New), theme);
        }
        Showing::Nothing => {
            let block = panel_block(Line::from("Changes"), false, theme);
            frame.render_widget(Paragraph::new("Nothing to review.").block(block), layout.main);
        }
    }
}

/// Renders one pane's visible window inside a bordered block.
///
/// Scrollable panes show their position in the title.
fn render_pane(frame: &mut Frame, area: Rect, title: &str, pane: &Pane, is_focused: bool, theme: &Theme) {
    let title = if pane.is_scrollable() {
        format!("{title}  [{}-{}/{}]", pane.offset() + 1, visible_end(pane), pane.lines().len())
    } else {
        title.to_owned()
    };
    frame.render_widget(panel_block(Line::from(title), is_focused, theme), area);

    let items: Vec<ListItem> = pane
        .visible_lines()
        .iter()
        .map(|l| ListItem::new(Line::styled(l.text.as_str(), Style::default().fg(theme.line_color(l.kind)))))
        .collect();
    frame.render_widget(List::new(items), inner_rect(area));
}

fn visible_end(pane: &Pane) -> usize {
    pane.offset() + pane.visible_lines().len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use planrev_core::pane::{LineKind, PaneLine};

    #[test]
    fn visible_end_tracks_the_window() {
        let mut pane = Pane::new(10, 3);
        pane.set_content((0..10).map(|i| PaneLine::new(format!("{i}"), LineKind::Plain)).collect());
        assert_eq!(visible_end(&pane), 3);
        pane.line_down(8);
        assert_eq!(pane.offset(), 7);
        assert_eq!(visible_end(&pane), 10);
    }
}
