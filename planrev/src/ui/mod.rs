//! UI rendering module for planrev.
//!
//! `render()` is the single entry point called by the event loop's
//! `terminal.draw()` closure. Layout arithmetic lives in `layout.rs`, the sidebar in
//! `sidebar.rs`, and the content panes in `panes.rs`.

mod layout;
pub mod help;
pub mod keybindings;
pub mod panes;
pub mod sidebar;

use ratatui::Frame;

use crate::app::{AppState, Mode};
use crate::theme::Theme;
use layout::{compute_layout, render_status_bar};

/// Renders one complete frame: sidebar, main area, status bar, and the help
/// overlay on top when it is open.
///
/// Rendering never mutates state; pane sizes were fixed by the last resize.
pub fn render(frame: &mut Frame, state: &AppState, theme: &Theme) {
    let viewports = state.review.viewports();
    let layout = compute_layout(frame.area(), viewports.geometry());

    if layout.sidebar.width > 0 {
        sidebar::render_sidebar(frame, layout.sidebar, state, theme);
    }
    let info = state.review.info();
    panes::render_main(frame, &layout, viewports, info.as_ref(), theme);
    render_status_bar(frame, layout.status_bar, state, theme);

    if state.mode == Mode::HelpOverlay {
        help::render_help_overlay(frame, theme, state.help_scroll);
    }
}
