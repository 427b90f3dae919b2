use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use clinic_dash::app::{self, App};
use clinic_dash::config::{self, Config, SourceKind};
use clinic_dash::infrastructure::{create_provider, RuntimeBridge, RuntimeCommand};
use clinic_dash::{logging, ui};

#[derive(Debug, Parser)]
#[command(
    name = "clinic-dash",
    version,
    about = "Terminal admin dashboard for clinic appointments"
)]
struct Args {
    /// Appointment source (overrides `source` in the config file)
    #[arg(long, value_enum)]
    source: Option<SourceKind>,

    /// Base URL of the appointments API (http source)
    #[arg(long)]
    url: Option<String>,

    /// SQLite database file (sqlite source)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Insert demo appointments into an empty sqlite database
    #[arg(long)]
    seed: bool,

    /// Write status changes back to the source
    #[arg(long)]
    persist: bool,

    /// Config file (default: $CLINIC_DASH_CONFIG or ~/.config/clinic-dash/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log file (default: ~/.local/share/clinic-dash/clinic-dash.log)
    #[arg(long)]
    log_file: Option<PathBuf>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(log_path) = args.log_file.clone().or_else(config::default_log_path) {
        if let Err(err) = logging::init(&log_path) {
            eprintln!("logging disabled: {err:#}");
        }
    }

    let config = merge_args(&args, load_config(&args));
    let provider_config = config.provider_config()?;
    let source_name = provider_config.display();
    tracing::info!(source = %source_name, persist = config.persist_status, "starting");

    let provider = create_provider(provider_config)?;
    let runtime = RuntimeBridge::new(provider)?;
    let app = App::new(config.theme.clone(), source_name, config.persist_status);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, app, &runtime);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        tracing::error!(error = %format!("{err:#}"), "exited with error");
        eprintln!("{err:?}");
    }

    Ok(())
}

fn load_config(args: &Args) -> Config {
    match &args.config {
        Some(path) => config::load_or_default(path),
        None => config::load(),
    }
}

/// CLI arguments take precedence over the config file
fn merge_args(args: &Args, mut config: Config) -> Config {
    if let Some(source) = args.source {
        config.source = source;
    }
    if let Some(url) = args.url.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        config.url = Some(url.to_string());
        if args.source.is_none() {
            config.source = SourceKind::Http;
        }
    }
    if let Some(db) = args.db.as_ref() {
        config.db_path = Some(db.display().to_string());
        if args.source.is_none() && args.url.is_none() {
            config.source = SourceKind::Sqlite;
        }
    }
    config.seed |= args.seed;
    config.persist_status |= args.persist;
    config
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    runtime: &RuntimeBridge,
) -> Result<()> {
    let tick_rate = Duration::from_millis(200);
    let mut last_tick = Instant::now();

    loop {
        pump_background(&mut app, runtime);
        terminal.draw(|f| ui::draw(f, &app))?;
        if app.should_quit {
            let _ = runtime.send(RuntimeCommand::Shutdown);
            return Ok(());
        }

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                let action = app::action_for_key(key, app.help_open);
                app.apply(action);
            }
        }

        if last_tick.elapsed() >= tick_rate {
            app.on_tick();
            last_tick = Instant::now();
        }
    }
}

fn pump_background(app: &mut App, runtime: &RuntimeBridge) {
    for event in runtime.poll_events() {
        app.apply_runtime_event(event);
    }

    if let Some(ticket) = app.take_fetch_request() {
        if let Err(err) = runtime.send(RuntimeCommand::FetchAppointments { ticket }) {
            app.view_model.apply_fetch(ticket, Err(err));
        }
    }
    for (id, status) in app.take_persist_requests() {
        if let Err(err) = runtime.send(RuntimeCommand::PersistStatus { id, status }) {
            tracing::warn!(%id, error = %err, "persist request dropped");
        }
    }
}
