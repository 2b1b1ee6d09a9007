//! planrev: terminal reviewer for machine-generated change plans.
//!
//! Entry point for the `planrev` binary. `review` wires together the terminal
//! lifecycle (`tui`), the unified event bus (`event`), the store worker (`worker`),
//! rendering (`ui`), and the review state from `planrev-core`. `import` and `list`
//! work on the plan store without touching the terminal.
//!
//! # Startup sequence for `review`
//!
//! 1. Load config, install the log file subscriber, resolve the theme.
//! 2. Open the plan store and load the plan. Errors here are ordinary `anyhow`
//!    errors because the terminal has not been touched yet.
//! 3. `install_panic_hook()`, then `register_sigterm()`.
//! 4. `init_tui()` enters the alternate screen and raw mode.
//! 5. Spawn the event task and the store worker, feed the initial terminal size.
//!
//! After step 4 the `?` operator is only used inside the Render arm: draw errors
//! break out of the loop and still reach `restore_tui()`.

mod app;
mod clipboard;
mod config;
mod event;
mod logging;
mod theme;
mod tui;
mod ui;
mod worker;

use std::path::{Path, PathBuf};
use std::sync::atomic::Ordering;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use planrev_core::api::{ChangeApi, SqliteStore};
use planrev_core::review::{Intent, ReviewOptions, ReviewState};
use planrev_core::types::PlanSnapshot;

use crate::config::Config;
use crate::event::AppEvent;
use crate::ui::keybindings::{handle_key, handle_mouse, KeyAction};

#[derive(Parser, Debug)]
#[command(name = "planrev")]
#[command(author, version, about = "Review proposed code replacements in the terminal")]
struct Cli {
    /// Plan store database (overrides `db_path` from config)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Theme: dark or catppuccin-mocha (overrides config)
    #[arg(long, global = true)]
    theme: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open a plan in the reviewer
    Review {
        plan_id: String,
        #[arg(short, long, default_value = "main")]
        branch: String,
    },
    /// Store a plan snapshot (JSON) and print its id
    Import { file: PathBuf },
    /// List stored plans
    List,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    logging::init(&config.log_file)?;

    let store = open_store(&config).await?;
    match cli.command {
        Command::Review { plan_id, branch } => review(store, &config, plan_id, branch).await,
        Command::Import { file } => import(&store, &file).await,
        Command::List => list(&store).await,
    }
}

async fn open_store(config: &Config) -> anyhow::Result<SqliteStore> {
    if let Some(dir) = config.db_path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating store directory {}", dir.display()))?;
    }
    let path = config.db_path.to_string_lossy();
    SqliteStore::open(&path)
        .await
        .map_err(|e| anyhow::anyhow!("opening plan store {path}: {e}"))
}

async fn import(store: &SqliteStore, file: &Path) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(file)
        .with_context(|| format!("reading {}", file.display()))?;
    let snapshot: PlanSnapshot = serde_json::from_str(&raw)
        .with_context(|| format!("parsing plan snapshot {}", file.display()))?;
    let files = snapshot.files.len();
    let plan_id = planrev_core::db::import_plan(store.connection(), snapshot)
        .await
        .map_err(|e| anyhow::anyhow!("storing plan: {e}"))?;
    tracing::info!(plan = %plan_id, files, "plan imported");
    println!("{plan_id}");
    Ok(())
}

async fn list(store: &SqliteStore) -> anyhow::Result<()> {
    let plans = planrev_core::db::list_plans(store.connection())
        .await
        .map_err(|e| anyhow::anyhow!("listing plans: {e}"))?;
    for plan in plans {
        println!("{}  {:<12} {:>4} pending  {}", plan.id, plan.branch, plan.pending, plan.name);
    }
    Ok(())
}

async fn review(store: SqliteStore, config: &Config, plan_id: String, branch: String) -> anyhow::Result<()> {
    let plan = store
        .load_plan(&plan_id, &branch)
        .await
        .map_err(|e| anyhow::anyhow!("{e}"))?;
    tracing::info!(plan = %plan.id, branch = %plan.branch, paths = plan.path_count(), "opening review");

    let theme = theme::Theme::from_name(&config.theme);
    let options = ReviewOptions {
        context_lines: config.context_lines,
        sidebar_width: config.sidebar_width,
    };
    let review = ReviewState::new(Arc::new(plan), options);

    tui::install_panic_hook();
    let term_flag = tui::register_sigterm();
    let mut terminal = tui::init_tui()?;

    let handler = event::EventHandler::new();
    event::spawn_event_task(handler.tx.clone());
    let mut rx = handler.rx;

    let (store_tx, store_rx) = tokio::sync::mpsc::unbounded_channel();
    worker::spawn_store_worker(store, plan_id, branch, store_rx, handler.tx.clone());

    let mut state = app::AppState::new(
        review,
        store_tx,
        Box::new(clipboard::SystemClipboard::new()),
    );
    // Panes are created by the first resize, so feed the current size right away.
    match terminal.size() {
        Ok(size) => state.apply(Intent::Resize(size.width, size.height)),
        Err(e) => tracing::warn!("reading terminal size: {e}"),
    }

    let result = run_loop(&mut terminal, &mut state, &mut rx, &term_flag, &theme).await;

    // Restore the terminal at the single exit point, whatever the loop returned.
    tui::restore_tui()?;
    result
}

/// Event loop. Exits via `break` on quit, SIGTERM, or channel close; only a draw
/// error returns early.
async fn run_loop(
    terminal: &mut tui::Tui,
    state: &mut app::AppState,
    rx: &mut tokio::sync::mpsc::UnboundedReceiver<AppEvent>,
    term_flag: &std::sync::atomic::AtomicBool,
    theme: &theme::Theme,
) -> anyhow::Result<()> {
    'event_loop: loop {
        tokio::select! {
            // Heartbeat: SIGTERM is checked at least every 50ms even when idle.
            _ = tokio::time::sleep(std::time::Duration::from_millis(50)) => {
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
            maybe_event = rx.recv() => {
                match maybe_event {
                    Some(AppEvent::Render) => {
                        terminal.draw(|frame| ui::render(frame, state, theme))?;
                    }
                    Some(AppEvent::Key(key)) => {
                        if handle_key(key, state) == KeyAction::Quit {
                            break 'event_loop;
                        }
                    }
                    Some(AppEvent::Mouse(mouse)) => {
                        handle_mouse(mouse, state);
                    }
                    Some(AppEvent::Resize(w, h)) => state.apply(Intent::Resize(w, h)),
                    Some(AppEvent::Tick) => state.tick(),
                    Some(AppEvent::PlanLoaded(plan)) => state.on_plan_loaded(plan),
                    Some(AppEvent::PlanLoadFailed(e)) => state.on_plan_load_failed(&e),
                    Some(AppEvent::RejectFinished(result)) => state.on_reject_finished(result),
                    None => break 'event_loop,
                }
                if term_flag.load(Ordering::Relaxed) {
                    break 'event_loop;
                }
            }
        }
    }
    tracing::info!("review closed");
    Ok(())
}
