//! Core of the planrev reviewer: the plan model, the local plan store, and the
//! terminal-independent review state (selection, panes, scrolling, actions).

pub mod actions;
pub mod api;
pub mod db;
pub mod pane;
pub mod review;
pub mod schema;
pub mod segment;
pub mod selection;
pub mod types;
pub mod viewport;
