//! `gsdash`: terminal dashboard for a grid-search task server.
//!
//! Polls the server's task and resource lists, and lets the user search,
//! cancel tasks and upload new tasks or resources. Configuration via CLI
//! flags, environment variables, or config file
//! (`~/.config/gsdash/config.toml`).
//!
//! ```bash
//! # Against a local server
//! cargo run --bin gsdash
//!
//! # Elsewhere, opening the resource list
//! cargo run --bin gsdash -- --base-url http://gs.internal:5000 --route /resources
//!
//! # Or via environment variables
//! GSDASH_URL=http://gs.internal:5000 GSDASH_LOG=debug cargo run --bin gsdash
//! ```

use std::io;
use std::path::Path;
use std::sync::Arc;

use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tokio::sync::mpsc;
use tracing_appender::non_blocking::WorkerGuard;

use gsdash::app::App;
use gsdash::config::{CliArgs, ClientConfig};
use gsdash::net::{self, NetCommand, NetEvent};
use gsdash::notice::Notice;
use gsdash::ui;

#[tokio::main]
async fn main() -> io::Result<()> {
    let cli = CliArgs::parse();

    // Load and resolve configuration (CLI args > env > config file > defaults).
    let config = match ClientConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Warning: ignoring configuration, using defaults: {e}");
            ClientConfig::default()
        }
    };

    // Initialize logging before terminal setup (logs go to file, not stdout).
    let _log_guard = init_logging(&cli.log_level, cli.log_file.as_deref());

    tracing::info!(base_url = %config.base_url, "gsdash starting");

    let api = config.api_client().map_err(|e| {
        eprintln!("Error: {e}");
        io::Error::new(io::ErrorKind::InvalidInput, e)
    })?;

    // Set up terminal.
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, api, &config);

    // Restore terminal.
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    tracing::info!("gsdash exiting");
    result
}

/// Initialize file-based logging.
///
/// Logs are written to a file (never stdout, since ratatui owns the terminal).
/// Returns a [`WorkerGuard`] that must be held until shutdown to ensure all
/// buffered log entries are flushed.
fn init_logging(level: &str, file_path: Option<&Path>) -> Option<WorkerGuard> {
    let default_path = std::env::temp_dir().join("gsdash.log");
    let log_path = file_path.unwrap_or(&default_path);

    let log_dir = log_path.parent()?;
    let file_name = log_path.file_name()?.to_str()?;

    let file_appender = tracing_appender::rolling::never(log_dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_env_filter(env_filter)
        .with_ansi(false)
        .init();

    Some(guard)
}

/// Main application loop.
fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    api: gsdash::api::ApiClient,
    config: &ClientConfig,
) -> io::Result<()> {
    let mut app = App::new(config.page_size)
        .with_base_url(config.base_url.clone())
        .with_timestamp_format(config.timestamp_format.clone());

    let (cmd_tx, mut evt_rx, _net_handle) = net::spawn_net(Arc::new(api), config.to_net_config());

    let activate = app.navigate(config.start_route.path());
    dispatch(&mut app, &cmd_tx, activate);

    loop {
        // Step 1: Draw the UI frame.
        terminal.draw(|frame| ui::draw(frame, &app))?;

        // Step 2: Drain all pending NetEvents (non-blocking).
        drain_net_events(&mut app, &mut evt_rx);

        // Step 3: Poll for terminal input events.
        if event::poll(config.poll_timeout)?
            && let Event::Key(key) = event::read()?
        {
            if key.kind != KeyEventKind::Press {
                continue;
            }

            if let Some(net_cmd) = app.handle_key_event(key) {
                dispatch(&mut app, &cmd_tx, net_cmd);
            }
        }

        if app.should_quit {
            let _ = cmd_tx.try_send(NetCommand::Shutdown);
            return Ok(());
        }
    }
}

/// Hand a command to the networking layer without blocking the UI.
fn dispatch(app: &mut App, tx: &mpsc::Sender<NetCommand>, cmd: NetCommand) {
    match tx.try_send(cmd) {
        Ok(()) => {}
        Err(mpsc::error::TrySendError::Full(cmd)) => {
            tracing::warn!(?cmd, "command dropped, network busy");
            app.push_notice(Notice::failure("Network busy, try again"));
        }
        Err(mpsc::error::TrySendError::Closed(_)) => {
            tracing::error!("network task gone");
            app.push_notice(Notice::failure("Network disconnected"));
        }
    }
}

/// Drain all pending `NetEvent`s from the receiver and apply them to the app.
fn drain_net_events(app: &mut App, rx: &mut mpsc::Receiver<NetEvent>) {
    while let Ok(event) = rx.try_recv() {
        app.apply_net_event(event);
    }
}
