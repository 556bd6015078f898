// Binary includes library modules - some public API items are only for library consumers
#![allow(unused)]

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    Terminal,
};

mod app;
mod client;
mod data;
mod events;
mod source;
mod ui;

use app::{App, View};
use client::HealthClient;
use source::{DataSource, FileSource, HttpSource};

#[derive(Parser, Debug)]
#[command(name = "blinkwatch")]
#[command(about = "Terminal dashboard for recorder fleet health")]
struct Args {
    /// Health endpoint URL to poll (e.g., https://listenin.example/health)
    #[arg(short, long, conflicts_with = "file")]
    url: Option<String>,

    /// Path to a health JSON file (same body the endpoint serves)
    #[arg(short, long, default_value = "health.json", conflicts_with = "url")]
    file: PathBuf,

    /// Endpoint poll interval (e.g., "5s", "500ms"; only used with --url)
    #[arg(long, default_value = "5s")]
    poll: String,

    /// HTTP request timeout (only used with --url)
    #[arg(long, default_value = "10s")]
    timeout: String,

    /// Projection refresh interval in seconds (how often "ago" text advances)
    #[arg(short, long, default_value = "1")]
    refresh: u64,

    /// Age after which an event's "ago" text is de-emphasized (e.g., "5m")
    #[arg(long, default_value = "5m")]
    text_stale: String,

    /// Silence window after which a device is shown offline (e.g., "1m")
    #[arg(long, default_value = "1m")]
    blink_stale: String,

    /// Export current state to JSON file and exit (file mode only)
    #[arg(short, long, conflicts_with = "url")]
    export: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Log to stderr so the alternate screen stays clean; silence by default,
    // RUST_LOG=blinkwatch=debug to see poll activity
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let text_stale =
        data::duration::parse_duration(&args.text_stale).unwrap_or(Duration::from_secs(300));
    let blink_stale =
        data::duration::parse_duration(&args.blink_stale).unwrap_or(Duration::from_secs(60));

    let thresholds = data::Thresholds {
        text_stale: chrono::Duration::from_std(text_stale)?,
        blink_stale: chrono::Duration::from_std(blink_stale)?,
    };

    // Handle export mode (non-interactive)
    if let Some(export_path) = args.export {
        return export_to_file(&args.file, &export_path, &thresholds);
    }

    // Handle HTTP endpoint mode
    if let Some(ref url) = args.url {
        let poll = data::duration::parse_duration(&args.poll).unwrap_or(Duration::from_secs(5));
        let timeout =
            data::duration::parse_duration(&args.timeout).unwrap_or(Duration::from_secs(10));
        return run_with_http(url, poll, timeout, thresholds);
    }

    // Default: file-based mode
    run_with_file(&args.file, thresholds, Duration::from_secs(args.refresh))
}

/// Run with a file-based data source
fn run_with_file(path: &PathBuf, thresholds: data::Thresholds, refresh: Duration) -> Result<()> {
    let source = Box::new(FileSource::new(path));
    run_tui(source, thresholds, refresh)
}

/// Run with an HTTP endpoint data source
fn run_with_http(
    url: &str,
    poll: Duration,
    timeout: Duration,
    thresholds: data::Thresholds,
) -> Result<()> {
    // Build a tokio runtime for the poll loop; it must stay alive for the
    // whole TUI session
    let rt = tokio::runtime::Runtime::new()?;

    let source = {
        let _guard = rt.enter();
        let client = HealthClient::new(url, timeout);
        HttpSource::start(client, poll)
    };

    // Re-project every second so the "ago" phrases advance between polls
    let result = run_tui(Box::new(source), thresholds, Duration::from_secs(1));

    rt.shutdown_timeout(Duration::from_secs(1));

    result
}

/// Run the TUI with the given data source
fn run_tui(
    source: Box<dyn DataSource>,
    thresholds: data::Thresholds,
    refresh_interval: Duration,
) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Setup panic hook to restore terminal
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic);
    }));

    // Create app and load initial data
    let mut app = App::new(source, thresholds);
    let _ = app.reload_data();

    // Run the main loop
    let result = run_app(&mut terminal, &mut app, refresh_interval);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    refresh_interval: Duration,
) -> Result<()> {
    let mut last_refresh = Instant::now();

    // Minimum terminal size for usable display
    const MIN_WIDTH: u16 = 60;
    const MIN_HEIGHT: u16 = 12;

    while app.running {
        // Draw UI
        terminal.draw(|frame| {
            let area = frame.area();

            // Check for minimum terminal size
            if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
                let msg = format!(
                    "Terminal too small: {}x{}\nMinimum: {}x{}\n\nResize to continue",
                    area.width, area.height, MIN_WIDTH, MIN_HEIGHT
                );
                let paragraph = ratatui::widgets::Paragraph::new(msg)
                    .alignment(ratatui::layout::Alignment::Center)
                    .style(ratatui::style::Style::default().fg(ratatui::style::Color::Yellow));
                let centered = ratatui::layout::Rect::new(0, area.height / 2 - 2, area.width, 5);
                frame.render_widget(paragraph, centered);
                return;
            }

            let chunks = Layout::vertical([
                Constraint::Length(1), // Header bar
                Constraint::Length(1), // Tabs
                Constraint::Min(8),    // Content
                Constraint::Length(1), // Status bar
            ])
            .split(area);

            // Render header with fleet overview
            ui::common::render_header(frame, app, chunks[0]);

            // Render tabs
            ui::common::render_tabs(frame, app, chunks[1]);

            // Render current view
            match app.current_view {
                View::Grid => ui::grid::render(frame, app, chunks[2]),
                View::List => ui::list::render(frame, app, chunks[2]),
                View::Table => ui::table::render(frame, app, chunks[2]),
            }

            // Render status bar
            ui::common::render_status_bar(frame, app, chunks[3]);

            // Render detail overlay if active
            if app.show_detail_overlay {
                ui::detail::render_overlay(frame, app, area);
            }

            // Render help overlay if active
            if app.show_help {
                ui::common::render_help(frame, app, area);
            }
        })?;

        // Poll for events with a short timeout
        if let Some(event) = events::poll_event(Duration::from_millis(100))? {
            match event {
                Event::Key(key) => events::handle_key_event(app, key),
                Event::Mouse(mouse) => {
                    // Content starts after header (1) + tabs (1) + table header (1)
                    events::handle_mouse_event(app, mouse, 3);
                }
                Event::Resize(_, _) => {
                    // Terminal will redraw on next iteration
                }
                _ => {}
            }
        }

        // Auto-refresh data periodically
        if last_refresh.elapsed() >= refresh_interval {
            let _ = app.reload_data();
            last_refresh = Instant::now();
        }
    }

    Ok(())
}

/// Export current fleet state to a JSON file without entering the TUI
fn export_to_file(
    health_path: &std::path::Path,
    export_path: &std::path::Path,
    thresholds: &data::Thresholds,
) -> Result<()> {
    let text = std::fs::read_to_string(health_path)?;
    let snapshot: source::HealthSnapshot = serde_json::from_str(&text)?;
    let board = data::BoardData::from_snapshot(&snapshot, chrono::Utc::now(), thresholds);

    let report = app::export_report(&board, &format!("file: {}", health_path.display()));
    std::fs::write(export_path, serde_json::to_string_pretty(&report)?)?;

    println!("Exported fleet state to: {}", export_path.display());
    Ok(())
}
