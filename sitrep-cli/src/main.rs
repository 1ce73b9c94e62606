mod app;
mod event;
mod fetch;
mod theme;
mod ui;

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::{Parser, Subcommand};
use crossterm::event::{Event as TermEvent, KeyCode, KeyModifiers};
use ratatui::DefaultTerminal;
use tokio::sync::mpsc;

use sitrep_core::store;

use app::App;
use event::AppEvent;

#[derive(Parser)]
#[command(name = "sitrep", about = "Conflict event tracker: ingest, reconcile, watch")]
struct Args {
    /// Path to the persisted event document
    #[arg(long, env = "SITREP_STORE", default_value = "data/events.json")]
    store: PathBuf,

    /// Config file (defaults to ~/.sitrep/config.json, else built-ins)
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Create the empty store document (first run only)
    Init,
    /// Query the feed adapter and reconcile the results into the store
    Fetch {
        /// Command to run after the store content changed (deployment trigger)
        #[arg(long)]
        on_change: Option<String>,
    },
    /// Live feed dashboard
    Watch,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    match &args.command {
        Command::Init => {
            init_logging();
            store::init(&args.store)?;
            println!("created {}", args.store.display());
            Ok(())
        }
        Command::Fetch { on_change } => {
            init_logging();
            fetch::run(&args.store, args.config.as_deref(), on_change.as_deref()).await
        }
        Command::Watch => watch(&args).await,
    }
}

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();
}

async fn watch(args: &Args) -> anyhow::Result<()> {
    // Snapshot before touching the terminal; a missing store is a normal
    // error message, not a garbled screen.
    let snapshot = store::load(&args.store)?;
    let app = App::new(&snapshot);

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        ratatui::restore();
        default_hook(info);
    }));

    let terminal = ratatui::init();
    let result = run_app(terminal, app).await;
    ratatui::restore();
    result
}

async fn run_app(mut terminal: DefaultTerminal, mut app: App) -> anyhow::Result<()> {
    let (app_tx, mut app_rx) = mpsc::unbounded_channel::<AppEvent>();
    let stop = Arc::new(AtomicBool::new(false));

    // Terminal event reader, polling so it can observe the stop flag.
    let term_tx = app_tx.clone();
    let stop_reader = Arc::clone(&stop);
    tokio::task::spawn_blocking(move || {
        while !stop_reader.load(Ordering::Relaxed) {
            if crossterm::event::poll(std::time::Duration::from_millis(50)).unwrap_or(false) {
                match crossterm::event::read() {
                    Ok(ev) => {
                        if term_tx.send(AppEvent::Terminal(ev)).is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
        }
    });

    // One tick per second drives the marquee, the badge clock, and the
    // periodic simulated append.
    let tick_tx = app_tx.clone();
    let stop_tick = Arc::clone(&stop);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(std::time::Duration::from_secs(1));
        loop {
            interval.tick().await;
            if stop_tick.load(Ordering::Relaxed) {
                break;
            }
            if tick_tx.send(AppEvent::Tick).is_err() {
                break;
            }
        }
    });

    loop {
        terminal.draw(|frame| ui::draw(frame, &app))?;

        let event = match app_rx.recv().await {
            Some(e) => e,
            None => break,
        };

        match event {
            AppEvent::Terminal(TermEvent::Key(key)) => {
                if key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c')
                {
                    break;
                }
                match key.code {
                    KeyCode::Char('q') | KeyCode::Esc => break,
                    KeyCode::Char('c') => app.cycle_country(),
                    KeyCode::Char('t') => app.cycle_kind(),
                    KeyCode::Char('x') => app.clear_filters(),
                    KeyCode::Up => app.scroll_up(1),
                    KeyCode::Down => {
                        let vh = viewport_height(&terminal)?;
                        app.scroll_down(1, vh);
                    }
                    KeyCode::PageUp => app.scroll_up(10),
                    KeyCode::PageDown => {
                        let vh = viewport_height(&terminal)?;
                        app.scroll_down(10, vh);
                    }
                    _ => {}
                }
            }
            AppEvent::Terminal(_) => {}
            AppEvent::Tick => app.on_tick(),
        }
    }

    stop.store(true, Ordering::Relaxed);
    Ok(())
}

/// Event-list rows: total height minus the four chrome lines.
fn viewport_height(terminal: &DefaultTerminal) -> anyhow::Result<usize> {
    let size = terminal.size()?;
    Ok(size.height.saturating_sub(4) as usize)
}
