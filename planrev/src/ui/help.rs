//! Help overlay renderer for planrev.
//!
//! Draws a centred modal box over the existing layout. `Clear` erases the background
//! first, inside the same `terminal.draw()` closure as all other panels.

use ratatui::{
    layout::Constraint,
    text::{Line, Text},
    widgets::{Block, Clear, Paragraph, Wrap},
    Frame,
};

use crate::theme::Theme;

/// Renders the help overlay, scrolled vertically by `help_scroll` rows.
///
/// Skipped on terminals narrower than 60 columns.
pub fn render_help_overlay(frame: &mut Frame, theme: &Theme, help_scroll: u16) {
    if frame.area().width < 60 {
        return;
    }

    let overlay_area = frame
        .area()
        .centered(Constraint::Percentage(70), Constraint::Percentage(80));

    frame.render_widget(Clear, overlay_area);

    let block = Block::bordered()
        .title(" Help  (j/k scroll, ? or Esc to dismiss) ")
        .border_style(ratatui::style::Style::default().fg(theme.border_active));

    frame.render_widget(
        Paragraph::new(build_help_text())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((help_scroll, 0)),
        overlay_area,
    );
}

fn build_help_text() -> Text<'static> {
    Text::from(vec![
        Line::from("Files and changes"),
        Line::from("  h / Left        Previous file"),
        Line::from("  l / Right       Next file"),
        Line::from("  k / Up          Previous change"),
        Line::from("  j / Down        Next change"),
        Line::from(""),
        Line::from("Scrolling"),
        Line::from("  K / J           Scroll up / down one line"),
        Line::from("  PgUp / PgDn     Scroll one page"),
        Line::from("  Ctrl-b / Ctrl-f Scroll one page"),
        Line::from("  Mouse wheel     Scroll three lines"),
        Line::from("  Tab             Switch scrolling between old and new value"),
        Line::from(""),
        Line::from("Actions"),
        Line::from("  d               Reject the selected change"),
        Line::from("  c / y           Copy the new value to the clipboard"),
        Line::from("  r               Reload the plan from the store"),
        Line::from(""),
        Line::from("General"),
        Line::from("  ?               Open / close this help overlay"),
        Line::from("  q / Esc         Quit"),
    ])
}
