use std::io::{self, BufRead};

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use sweeper_core::{CellCount, Coord, DEFAULT_SIZE, GameConfig, GameEngine, SafeZone};

use command::{Command, USAGE, parse_command};
use render::{JsonRenderer, Renderer, TextRenderer};

mod command;
mod render;

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum SafeZoneArg {
    /// The first cell and its neighbors
    Neighborhood,
    /// Linear index neighbors, wrapping across row ends
    LinearIndex,
}

impl From<SafeZoneArg> for SafeZone {
    fn from(arg: SafeZoneArg) -> Self {
        match arg {
            SafeZoneArg::Neighborhood => SafeZone::Neighborhood,
            SafeZoneArg::LinearIndex => SafeZone::LinearIndex,
        }
    }
}

#[derive(Parser, Debug)]
#[command(version, about = "Clear a square minefield from the terminal", long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,

    /// Side length of the square board
    #[arg(short, long, default_value_t = DEFAULT_SIZE)]
    size: Coord,

    /// Number of mines, one per five cells when omitted
    #[arg(short, long)]
    mines: Option<CellCount>,

    /// Force a seed instead of random
    #[arg(long)]
    seed: Option<u64>,

    /// Cells kept clear around the first reveal
    #[arg(long, value_enum, default_value_t = SafeZoneArg::Neighborhood)]
    safe_zone: SafeZoneArg,

    /// Print every update as a JSON line instead of drawing the board
    #[arg(long)]
    json: bool,
}

impl Args {
    fn game_config(&self) -> Result<GameConfig> {
        let mines = self.mines.unwrap_or(GameConfig::default_mines(self.size));
        let config = GameConfig::with_mines(self.size, mines)
            .with_context(|| format!("invalid board of size {} with {} mines", self.size, mines))?;
        Ok(config.with_safe_zone(self.safe_zone.into()))
    }
}

fn init_logging(filter: log::LevelFilter) -> Result<()> {
    use tracing_subscriber::filter::LevelFilter;

    let level = match filter {
        log::LevelFilter::Off => LevelFilter::OFF,
        log::LevelFilter::Error => LevelFilter::ERROR,
        log::LevelFilter::Warn => LevelFilter::WARN,
        log::LevelFilter::Info => LevelFilter::INFO,
        log::LevelFilter::Debug => LevelFilter::DEBUG,
        log::LevelFilter::Trace => LevelFilter::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!(err))
        .context("Error initializing logger")
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose.log_level_filter())?;

    let config = args.game_config()?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!("seed: {seed}, config: {config:?}");

    let mut engine = GameEngine::new(config, seed)?;
    let stdout = io::stdout().lock();
    let mut renderer: Box<dyn Renderer> = if args.json {
        Box::new(JsonRenderer::new(stdout))
    } else {
        Box::new(TextRenderer::new(stdout, config.size))
    };

    renderer.draw_full(&engine)?;
    for line in io::stdin().lock().lines() {
        let line = line.context("Could not read input")?;
        match parse_command(&line, engine.size()) {
            Ok(Command::Act(action)) => {
                let update = engine.handle(action);
                log::debug!("{action:?} -> {:?}", update.outcome);
                renderer.draw(&update, &engine)?;
            }
            Ok(Command::Outside) => renderer.note("outside the board", &engine)?,
            Ok(Command::Quit) => break,
            Ok(Command::Empty) => {}
            Err(err) => renderer.note(&format!("{err}; {USAGE}"), &engine)?,
        }
    }

    log::debug!("App finished");
    Ok(())
}
