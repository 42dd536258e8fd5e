use clap::Parser;
use color_eyre::{eyre::eyre, Result};
use perf_visualizer::{
    app::{App, Source},
    cli::{Cli, Command, MonitorArgs},
    config::Config,
    controller::Controller,
    export, logging,
    metrics::{
        collector::MetricsCollector, source::ProcessSource, store::SeriesStore,
        trend::analyze_session,
    },
    session::storage::FileSessionSlot,
    tui::{
        event::poll_event,
        screens::monitoring::MonitoringScreen,
        terminal::{self, Tui},
    },
};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    match cli.command.unwrap_or(Command::Monitor(MonitorArgs::default())) {
        Command::Monitor(args) => monitor(&config, args).await,
        Command::View { file } => view(&config, &file).await,
        Command::Analyze { file, window, json } => analyze(&config, &file, window, json),
    }
}

async fn monitor(config: &Config, args: MonitorArgs) -> Result<()> {
    let dir = export::data_dir(config.storage_dir.as_deref());
    let log_path = logging::init_file(&dir)?;

    let source = match args.pid {
        Some(pid) => ProcessSource::attach(pid)?,
        None => ProcessSource::current(),
    };
    let capacity = args.capacity.unwrap_or(config.history_size);
    let interval = args.interval.unwrap_or_else(|| config.interval());

    let store = Arc::new(RwLock::new(SeriesStore::new(capacity)?));
    let collector = MetricsCollector::new(Arc::new(source), store.clone(), interval);
    tracing::info!(
        source = %collector.source_name(),
        capacity,
        log = %log_path.display(),
        "starting monitor"
    );

    let app = App::new(Source::Live, collector.source_name(), config.trend.clone());
    let slot = FileSessionSlot::new(&dir);
    let mut controller = Controller::new(
        app,
        store,
        Some(collector),
        Box::new(slot),
        config.storage_dir.clone(),
    );
    controller.start_collecting();

    run_interactive(&mut controller).await
}

async fn view(config: &Config, file: &Path) -> Result<()> {
    let dir = export::data_dir(config.storage_dir.as_deref());
    logging::init_file(&dir)?;

    let session = export::read_session_file(file)?
        .ok_or_else(|| eyre!("{} does not contain a session", file.display()))?;
    tracing::info!(
        path = %file.display(),
        samples = session.total_samples(),
        "opening session"
    );

    let store = Arc::new(RwLock::new(SeriesStore::new(config.history_size)?));
    let label = file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| file.display().to_string());
    let app = App::new(Source::Replay, label, config.trend.clone());
    let slot = FileSessionSlot::new(&dir);
    let mut controller = Controller::new(
        app,
        store,
        None,
        Box::new(slot),
        config.storage_dir.clone(),
    );
    controller.load_session(&session).await;

    run_interactive(&mut controller).await
}

fn analyze(config: &Config, file: &Path, window: Option<Duration>, json: bool) -> Result<()> {
    logging::init_stderr()?;

    let session = export::read_session_file(file)?
        .ok_or_else(|| eyre!("{} does not contain a session", file.display()))?;

    let mut trend = config.trend.clone();
    if let Some(window) = window {
        trend.window_secs = window.as_secs().max(1);
    }

    let report = analyze_session(&session, &trend);
    if json {
        println!("{}", report.to_json()?);
    } else {
        println!("{}", report);
    }
    Ok(())
}

async fn run_interactive(controller: &mut Controller) -> Result<()> {
    let mut terminal = terminal::setup_terminal()?;
    let result = event_loop(&mut terminal, controller).await;

    controller.shutdown().await;
    terminal::restore_terminal(&mut terminal)?;
    result
}

async fn event_loop(terminal: &mut Tui, controller: &mut Controller) -> Result<()> {
    while !controller.app.should_quit {
        let snapshot = controller.snapshot().await;
        terminal.draw(|frame| {
            MonitoringScreen::render(frame, &controller.app, &snapshot);
        })?;

        let event = poll_event(Duration::from_millis(100), controller.input_mode())?;
        controller.handle_event(event).await;
    }
    Ok(())
}
