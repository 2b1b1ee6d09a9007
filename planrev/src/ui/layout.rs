//! Screen layout for planrev.
//!
//! Pure layout arithmetic. Region sizes come from the core [`Geometry`], the same
//! values the panes were sized with, so wrapped content always fits its block.
//!
//! ```text
//! +---------+--------------------------+
//! | sidebar | old value                |
//! |         +--------------------------+
//! |         | new value                |
//! +---------+--------------------------+
//! | status bar                         |
//! +------------------------------------+
//! ```
//!
//! In whole-file mode the old/new split is replaced by a single file pane covering
//! the full main column.

use planrev_core::viewport::Geometry;
use ratatui::{
    layout::{Constraint, Layout, Margin, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Paragraph},
    Frame,
};

use crate::app::{AppState, Mode, StatusKind};
use crate::theme::Theme;

/// Outer rects of every region for one frame. Never store across frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub sidebar: Rect,
    /// The whole main column; the file pane uses all of it.
    pub main: Rect,
    pub old: Rect,
    pub new: Rect,
    pub status_bar: Rect,
}

pub fn compute_layout(area: Rect, geometry: Geometry) -> AppLayout {
    let [body, status_bar] = area.layout(&Layout::vertical([
        Constraint::Length(geometry.main_height),
        Constraint::Fill(1),
    ]));
    let [sidebar, main] = body.layout(&Layout::horizontal([
        Constraint::Length(geometry.sidebar_width),
        Constraint::Fill(1),
    ]));
    let [old, new] = main.layout(&Layout::vertical([
        Constraint::Length(geometry.old_height),
        Constraint::Fill(1),
    ]));
    AppLayout { sidebar, main, old, new, status_bar }
}

/// Returns the inner `Rect` of a panel after removing the 1-cell border on each side.
pub fn inner_rect(area: Rect) -> Rect {
    area.inner(Margin { vertical: 1, horizontal: 1 })
}

/// Builds a bordered `Block` for a panel.
///
/// The panel that receives scroll commands gets a thick border in the active color.
pub fn panel_block<'a>(title: Line<'a>, is_focused: bool, theme: &Theme) -> Block<'a> {
    let border_style = if is_focused {
        Style::default().fg(theme.border_active)
    } else {
        Style::default().fg(theme.border_inactive)
    };
    let border_type = if is_focused { BorderType::Thick } else { BorderType::Plain };

    Block::bordered()
        .title(title)
        .border_type(border_type)
        .border_style(border_style)
}

/// Renders the 1-row status bar at the bottom of the terminal.
///
/// Left: plan name and branch, then the current status message if any. Right: the
/// position within the plan and a help hint.
pub fn render_status_bar(frame: &mut Frame, area: Rect, state: &AppState, theme: &Theme) {
    let plan = state.review.plan();
    let selection = state.review.selection();

    let mut spans = vec![Span::styled(
        format!(" {} ", plan.name),
        Style::default().fg(theme.status_info).add_modifier(Modifier::BOLD),
    )];
    spans.push(Span::raw(format!("@{} ", plan.branch)));
    if let Some(status) = &state.status {
        let color = match status.kind {
            StatusKind::Info => theme.status_info,
            StatusKind::Error => theme.status_error,
        };
        spans.push(Span::raw(" "));
        spans.push(Span::styled(status.text.clone(), Style::default().fg(color)));
    }

    let position = if plan.path_count() == 0 {
        "no pending changes".to_owned()
    } else {
        format!(
            "file {}/{}  entry {}/{}",
            selection.file_index() + 1,
            plan.path_count(),
            selection.entry_index() + 1,
            selection.entry_count()
        )
    };
    let hint = match state.mode {
        Mode::Normal => "? help ",
        Mode::HelpOverlay => "Esc close ",
    };

    let [left, right] = area.layout(&Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Length((position.len() + hint.len() + 2) as u16),
    ]));
    let style = Style::default().bg(theme.status_bar_bg).fg(theme.status_bar_fg);
    frame.render_widget(Paragraph::new(Line::from(spans)).style(style), left);
    frame.render_widget(
        Paragraph::new(Line::from(format!("{position}  {hint}")))
            .style(style)
            .right_aligned(),
        right,
    );
}
