//! `doris`: review dashboard for public-procurement contracts.
//!
//! # Usage
//!
//! ```
//! doris                                   # terminal dashboard
//! doris --seed contracts.json tui
//! doris list --sector ICT --sort risk_high
//! doris similar 4 --limit 3
//! doris upload 4 smlouva.pdf
//! doris analyze "Město Brno"
//! ```

mod app;
mod client;
mod commands;
mod settings;
mod ui;

use std::{fs::OpenOptions, io, path::PathBuf, sync::Mutex, time::Duration};

use anyhow::{Context, Result};
use app::App;
use clap::{Parser, Subcommand};
use commands::ListArgs;
use crossterm::{
  event::{self, Event, KeyEventKind},
  execute,
  terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use settings::{Overrides, Settings};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

// ─── CLI args ─────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "doris", version, about = "Review dashboard for public-procurement contracts")]
struct Args {
  /// Path to a TOML config file.
  #[arg(short, long, value_name = "FILE", default_value = "doris.toml", global = true)]
  config: PathBuf,

  /// JSON contract seed (default: built-in demo contracts).
  #[arg(long, value_name = "FILE", global = true)]
  seed: Option<PathBuf>,

  /// Base URL of the document storage backend.
  #[arg(long, global = true)]
  storage_url: Option<String>,

  /// Chat-completion endpoint used for deep search.
  #[arg(long, global = true)]
  analysis_url: Option<String>,

  /// Log file used while the dashboard owns the terminal.
  #[arg(long, value_name = "FILE", global = true)]
  log_file: Option<PathBuf>,

  #[command(subcommand)]
  command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
  /// Open the terminal dashboard (default).
  Tui,

  /// Print one status bucket after filtering and sorting.
  List(ListArgs),

  /// Contracts in the same sector as <ID>, best price match first.
  Similar {
    id: String,
    #[arg(long, default_value_t = 5)]
    limit: usize,
  },

  /// List documents attached to a contract.
  Docs { id: String },

  /// Attach a file to a contract.
  Upload { id: String, file: PathBuf },

  /// Download a document of a contract by name.
  Download {
    id:   String,
    name: String,
    /// Target directory (default: `download_dir` setting).
    #[arg(long, value_name = "DIR")]
    out:  Option<PathBuf>,
  },

  /// Run a deep search on a subject name and print the report.
  Analyze { subject: String },
}

// ─── Entry point ──────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
  let args = Args::parse();

  let settings = Settings::load(&args.config, Overrides {
    seed_path:    args.seed,
    storage_url:  args.storage_url,
    analysis_url: args.analysis_url,
    log_file:     args.log_file,
  })?;

  let command = args.command.unwrap_or(Command::Tui);
  init_tracing(&settings, matches!(command, Command::Tui))?;

  match command {
    Command::Tui => run_tui(&settings).await,
    Command::List(list) => commands::list(&settings, &list).await,
    Command::Similar { id, limit } => commands::similar(&settings, &id, limit).await,
    Command::Docs { id } => commands::docs(&settings, &id).await,
    Command::Upload { id, file } => commands::upload(&settings, &id, &file).await,
    Command::Download { id, name, out } => commands::download(&settings, &id, &name, out).await,
    Command::Analyze { subject } => commands::analyze(&settings, &subject).await,
  }
}

/// Log to stderr, or to the log file when the dashboard owns the terminal.
fn init_tracing(settings: &Settings, to_file: bool) -> Result<()> {
  let filter = EnvFilter::builder()
    .with_default_directive(LevelFilter::INFO.into())
    .from_env_lossy();

  if to_file {
    let file = OpenOptions::new()
      .create(true)
      .append(true)
      .open(&settings.log_file)
      .with_context(|| format!("opening log file {}", settings.log_file.display()))?;
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_ansi(false)
      .with_writer(Mutex::new(file))
      .init();
  } else {
    tracing_subscriber::fmt()
      .with_env_filter(filter)
      .with_writer(io::stderr)
      .init();
  }
  Ok(())
}

// ─── Dashboard ────────────────────────────────────────────────────────────────

async fn run_tui(settings: &Settings) -> Result<()> {
  let store = commands::open_store(settings).await?;
  let doc_client = commands::document_client(settings)?;
  let analyzer = commands::analysis_client(settings)?;

  let mut app = App::new(store, doc_client, analyzer, settings.download_dir.clone());
  app.load_contracts().await?;
  tracing::info!(contracts = app.contracts.len(), "dashboard started");

  enable_raw_mode().context("enabling raw mode")?;
  let mut stdout = io::stdout();
  execute!(stdout, EnterAlternateScreen).context("entering alternate screen")?;
  let backend = CrosstermBackend::new(stdout);
  let mut terminal = Terminal::new(backend).context("creating terminal")?;

  let run_result = run_event_loop(&mut terminal, &mut app).await;

  // Restore the terminal regardless of the result.
  disable_raw_mode().ok();
  execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
  terminal.show_cursor().ok();

  run_result
}

async fn run_event_loop(
  terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
  app: &mut App,
) -> Result<()> {
  loop {
    app.drain_events().await?;
    terminal.draw(|f| ui::draw(f, app)).context("drawing frame")?;

    // Poll for an event, yielding control to tokio while waiting.
    let maybe_event = tokio::task::block_in_place(|| {
      if event::poll(Duration::from_millis(50))? {
        Ok::<_, io::Error>(Some(event::read()?))
      } else {
        Ok(None)
      }
    })?;

    if let Some(Event::Key(key)) = maybe_event
      && key.kind == KeyEventKind::Press
      && !app.handle_key(key).await?
    {
      break;
    }
  }

  Ok(())
}
