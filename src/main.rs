use std::fs::File;
use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Instant;

use clap::Parser;
use grid_snake::config::{CELL_PIXEL_SIZE, DEFAULT_CANVAS, GridSize, IDLE_POLL_INTERVAL};
use grid_snake::game::{GameEngine, StepOutcome};
use grid_snake::input::{GameInput, InputHandler};
use grid_snake::renderer;
use grid_snake::terminal_runtime::{TerminalSession, restore_terminal};
use grid_snake::theme::{Palette, PaletteError, resolve_palette};
use grid_snake::timer::IntervalTimer;
use thiserror::Error;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(version, about = "Classic Snake in the terminal")]
struct Cli {
    /// Seed food placement for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file overriding the default colours.
    #[arg(long, value_name = "PATH")]
    palette: Option<PathBuf>,

    /// Write logs to this file (set RUST_LOG to change the level).
    #[arg(long = "log-file", value_name = "PATH")]
    log_file: Option<PathBuf>,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("terminal error: {0}")]
    Terminal(#[from] io::Error),
    #[error(transparent)]
    Palette(#[from] PaletteError),
    #[error("failed to open log file {path}: {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

fn main() {
    if let Err(error) = try_main() {
        eprintln!("grid-snake: {error}");
        std::process::exit(1);
    }
}

fn try_main() -> Result<(), AppError> {
    let cli = Cli::parse();

    if let Some(path) = cli.log_file.as_deref() {
        init_tracing(path)?;
    }

    // Resolve before touching the terminal so errors print normally.
    let palette = resolve_palette(cli.palette.as_deref())?;

    install_panic_hook();
    run(&cli, &palette)
}

fn init_tracing(path: &std::path::Path) -> Result<(), AppError> {
    let file = File::create(path).map_err(|source| AppError::LogFile {
        path: path.to_path_buf(),
        source,
    })?;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init();

    Ok(())
}

fn run(cli: &Cli, palette: &Palette) -> Result<(), AppError> {
    let bounds = GridSize::from_canvas(DEFAULT_CANVAS, CELL_PIXEL_SIZE);
    let mut engine = match cli.seed {
        Some(seed) => GameEngine::with_seed(bounds, IntervalTimer::new(), seed),
        None => GameEngine::new(bounds, IntervalTimer::new()),
    };
    let mut input = InputHandler::new();
    let mut session = TerminalSession::enter(bounds)?;

    info!(
        width = bounds.width,
        height = bounds.height,
        seed = ?cli.seed,
        "session started"
    );

    loop {
        session
            .terminal_mut()
            .draw(|frame| renderer::render(frame, &engine, palette))?;

        let timeout = engine
            .timer()
            .time_until_due(Instant::now())
            .unwrap_or(IDLE_POLL_INTERVAL);

        match input.poll_input(timeout)? {
            Some(GameInput::Quit) => break,
            Some(GameInput::Start) => {
                engine.start();
            }
            Some(GameInput::Direction(direction)) => {
                engine.handle_direction_input(direction);
            }
            None => {}
        }

        if engine.timer_mut().poll_due(Instant::now()) {
            log_outcome(engine.step());
        }
    }

    info!(score = engine.score(), "session ended");
    Ok(())
}

fn log_outcome(outcome: StepOutcome) {
    if let StepOutcome::Ate {
        score,
        new_interval_ms,
    } = outcome
    {
        debug!(score, ?new_interval_ms, "food eaten");
    }
}

fn install_panic_hook() {
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |panic_info| {
        restore_terminal();
        default_hook(panic_info);
    }));
}
