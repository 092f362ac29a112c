use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::*;

mod app;
mod backend;
mod command_line;
mod config;
mod events;
mod text_layout;
mod theme;
mod tutorial;
mod typewriter;
mod ui;
mod worker;

use app::{App, AppSettings};
use backend::{GameBackend, HttpBackend};
use config::{BACKEND_URL_ENV, ClientConfig, expand_home};
use events::AppEvent;
use theme::Theme;
use worker::{BackendRequest, BackendWorker};

const MAX_BACKEND_EVENTS_PER_LOOP: usize = 128;
const EVENT_POLL_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Parser, Debug)]
#[command(name = "adventure-terminal")]
#[command(about = "Terminal client for a procedurally generated text adventure")]
#[command(version)]
struct Cli {
    /// Story engine base URL (beats ADVENTURE_BACKEND_URL and the config file)
    #[arg(long)]
    backend_url: Option<String>,

    /// Configuration file path (default: ~/.adventure-terminal/config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log file path (default: logging.file from the config)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Verbose logging (-v, -vv for more)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Skip the boot sequence
    #[arg(long)]
    skip_boot: bool,

    /// Print the story engine's run status as JSON and exit
    #[arg(long)]
    check: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = ClientConfig::load(cli.config.as_deref())?;

    let log_path = match &cli.log_file {
        Some(path) => path.clone(),
        None => expand_home(&config.logging.file)?,
    };
    if let Err(err) = init_logging(&log_path, &config.logging.level, cli.verbose) {
        eprintln!(
            "warning: logging disabled, cannot open '{}': {err}",
            log_path.display()
        );
    }

    let backend_url =
        config.resolve_backend_url(cli.backend_url.as_deref(), std::env::var(BACKEND_URL_ENV).ok());
    let engine = HttpBackend::new(&backend_url, config.request_timeout())
        .with_context(|| format!("failed to build HTTP client for {backend_url}"))?;
    log::info!("story engine at {}", engine.base_url());

    if cli.check {
        return run_check(&engine);
    }

    let settings = AppSettings {
        skip_boot: cli.skip_boot || config.ui.skip_boot,
        typewriter_per_char: config.typewriter_per_char(),
        history_limit: config.ui.history_limit,
    };
    let theme = Theme::load_or_default(expand_home(&config.ui.theme_file)?);
    let worker = BackendWorker::new(Arc::new(engine), config.backend.classify_intent);

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let terminal_backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(terminal_backend)?;
    terminal.clear()?;
    let result = run_app(&mut terminal, App::new(settings), &theme, &worker);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        DisableMouseCapture,
        LeaveAlternateScreen
    )?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        log::error!("client stopped: {err:#}");
    }
    result
}

/// The terminal belongs to the UI, so log lines only ever go to a file.
fn init_logging(path: &Path, level: &str, verbosity: u8) -> io::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let base_level = match verbosity {
        0 => log::LevelFilter::from_str(level).unwrap_or(log::LevelFilter::Info),
        1 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(base_level)
        .target(env_logger::Target::Pipe(Box::new(file)))
        .format(|fmt, record| {
            writeln!(
                fmt,
                "{} [{}] {}",
                chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .try_init()
        .map_err(io::Error::other)
}

fn run_check(engine: &dyn GameBackend) -> anyhow::Result<()> {
    let status = engine
        .status()
        .context("story engine status check failed")?;
    println!("{}", serde_json::to_string_pretty(&status)?);
    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    mut app: App,
    theme: &Theme,
    worker: &BackendWorker,
) -> anyhow::Result<()> {
    dispatch(worker, app.start());
    let mut last_tick = Instant::now();

    while app.running {
        for event in worker.drain_events_limited(MAX_BACKEND_EVENTS_PER_LOOP) {
            let requests = app.on_backend_event(event);
            dispatch(worker, requests);
        }

        terminal.draw(|frame| ui::render(frame, &app, theme))?;

        let event = events::next_event(EVENT_POLL_INTERVAL)?;
        let size = terminal.size()?;
        let screen = Rect::new(0, 0, size.width, size.height);
        let requests = match event {
            AppEvent::MouseLeftClick(x, y) => match ui::hit_test(screen, &app, x, y) {
                Some(target) => app.handle_click(target),
                None => Vec::new(),
            },
            AppEvent::ScrollDown => {
                let requests = app.handle_event(event);
                app.clamp_scene_scroll(ui::description_max_scroll(screen, &app));
                requests
            }
            event => app.handle_event(event),
        };
        dispatch(worker, requests);

        let now = Instant::now();
        let requests = app.on_tick(now.duration_since(last_tick));
        last_tick = now;
        dispatch(worker, requests);
    }

    log::info!("client exiting");
    Ok(())
}

fn dispatch(worker: &BackendWorker, requests: Vec<BackendRequest>) {
    for request in requests {
        log::debug!("dispatching {request:?}");
        worker.send(request);
    }
}
