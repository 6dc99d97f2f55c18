// main.rs - Terminal Game of Life: flags, logging, and the event loop
// Uses the conway engine for all simulation state

use std::fs::File;
use std::path::PathBuf;
use std::sync::{Mutex, mpsc};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use conway::runner::shared;
use conway::{Boundary, Grid, GridConfig, Rules, Runner, patterns};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::DefaultTerminal;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod ui;

use app::{Action, App};

/// How long the event loop waits for a key before redrawing.
const FRAME: Duration = Duration::from_millis(33);

/// Conway's Game of Life with arbitrary rules, in the terminal.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of columns and rows.
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..))]
    size: u16,

    /// Number of rows, overriding --size.
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    rows: Option<u16>,

    /// Number of columns, overriding --size.
    #[arg(long, value_parser = clap::value_parser!(u16).range(1..))]
    cols: Option<u16>,

    /// Probability for a living cell in the initial conditions.
    #[arg(long, default_value_t = 0.3)]
    filling: f64,

    /// Boundary: periodic (0), empty (1) or full (2).
    #[arg(long, default_value_t = Boundary::Periodic)]
    border: Boundary,

    /// Birth/survival rule in B/S notation.
    #[arg(long, default_value_t = Rules::classic())]
    rule: Rules,

    /// Milliseconds between generations while playing.
    #[arg(
        long = "interval-ms",
        default_value_t = 200,
        value_parser = clap::value_parser!(u64).range(10..=10_000)
    )]
    interval_ms: u64,

    /// Seed for the initial fill and for fill/clear, for reproducible boards.
    #[arg(long)]
    seed: Option<u64>,

    /// Start from a named pattern (glider, pulsar, ...) instead of a random fill.
    #[arg(long)]
    pattern: Option<String>,

    /// Skip the interface: compute this many steps, print the board and exit.
    #[arg(long)]
    steps: Option<u64>,

    /// Write logs here. RUST_LOG selects the level (default info).
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

impl Args {
    fn grid_config(&self) -> GridConfig {
        GridConfig {
            rows: usize::from(self.rows.unwrap_or(self.size)),
            cols: usize::from(self.cols.unwrap_or(self.size)),
            rules: self.rule,
            boundary: self.border,
            fill_probability: if self.pattern.is_some() { 0.0 } else { self.filling },
            seed: self.seed,
        }
    }
}

fn init_logging(args: &Args) -> Result<()> {
    let filter = || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    if let Some(path) = &args.log_file {
        let file = File::create(path)
            .with_context(|| format!("cannot open log file {}", path.display()))?;
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .init();
    } else if args.steps.is_some() {
        // Headless: stderr is free.
        tracing_subscriber::fmt()
            .with_env_filter(filter())
            .with_writer(std::io::stderr)
            .init();
    }
    Ok(())
}

fn build_grid(args: &Args) -> Result<Grid> {
    let mut grid = Grid::from_config(args.grid_config())?;
    if let Some(name) = &args.pattern {
        let Some(pattern) = patterns::find(name) else {
            let known: Vec<_> = patterns::PATTERNS.iter().map(|p| p.name).collect();
            bail!("unknown pattern {name:?}, known: {}", known.join(", "));
        };
        let placed = pattern.stamp_centered(&mut grid);
        info!(pattern = pattern.name, placed, "pattern stamped");
    }
    Ok(grid)
}

fn run_headless(mut grid: Grid, steps: u64) {
    for _ in 0..steps {
        grid.step();
    }
    print!("{grid}");
    println!(
        "step {}  alive {}  {}  {}",
        grid.steps(),
        grid.alive(),
        grid.rules(),
        grid.boundary()
    );
}

fn run(terminal: &mut DefaultTerminal, app: &mut App) -> Result<()> {
    while !app.should_quit() {
        app.drain_generations();
        terminal.draw(|frame| ui::draw(frame, app))?;

        if event::poll(FRAME)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Some(action) = Action::from_key(key) {
                        app.apply(action);
                    }
                }
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(&args)?;

    let grid = build_grid(&args)?;
    info!(rows = grid.rows(), cols = grid.cols(), alive = grid.alive(), "starting");

    if let Some(steps) = args.steps {
        run_headless(grid, steps);
        return Ok(());
    }

    let runtime = tokio::runtime::Runtime::new().context("cannot start the tokio runtime")?;
    let (tx, rx) = mpsc::channel();
    let runner = Runner::new(shared(grid), runtime.handle().clone())
        .with_interval(Duration::from_millis(args.interval_ms))
        .with_observer(move |generation| {
            let _ = tx.send(*generation);
        });
    let mut app = App::new(runner, rx);

    let mut terminal = ratatui::init();
    let result = run(&mut terminal, &mut app);
    ratatui::restore();

    info!(steps = app.runner().read(|g| g.steps()), "bye");
    result
}
