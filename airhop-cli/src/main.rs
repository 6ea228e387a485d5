mod reports;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use airhop_game::{AirportCatalog, GameEngine, SqliteStore};
use reports::{Outcome, PlayerStatus, Seeded, VisitCheck};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable, coloured summary
    Console,
    /// Machine-readable JSON envelope
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "airhop", version)]
#[command(about = "Fly between airports, track range, time and every airport you reach")]
struct Args {
    /// SQLite database file (`:memory:` for a throwaway database)
    #[arg(long, default_value = "airhop.sqlite3", global = true)]
    db: PathBuf,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console, global = true)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long, global = true)]
    output: Option<PathBuf>,

    /// Verbose logging (debug level unless RUST_LOG says otherwise)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Subcommand)]
enum Command {
    /// Load airports from a JSON catalog into the database
    Seed {
        #[arg(long)]
        catalog: PathBuf,
    },
    /// Show a player's state, creating the player if the name is new
    Status {
        #[arg(long)]
        player: String,
    },
    /// Fly a player to another airport and save progress
    Fly {
        #[arg(long)]
        player: String,
        /// Destination airport ident; must be seeded in the database
        #[arg(long)]
        to: String,
    },
    /// Check whether a player has visited an airport
    Visited {
        #[arg(long)]
        player: String,
        #[arg(long)]
        airport: String,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let store = open_store(&args.db)?;
    let engine = GameEngine::new(store);
    let outcome = run_command(&engine, &args.command)?;
    write_report(&args, &outcome)
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let env = env_logger::Env::default().default_filter_or(default_filter);
    let _ = env_logger::Builder::from_env(env).try_init();
}

fn open_store(path: &Path) -> Result<SqliteStore> {
    SqliteStore::open(path).with_context(|| format!("opening database {}", path.display()))
}

fn run_command(engine: &GameEngine<SqliteStore>, command: &Command) -> Result<Outcome> {
    match command {
        Command::Seed { catalog } => {
            let catalog = AirportCatalog::from_path(catalog)?;
            for airport in &catalog.airports {
                engine
                    .store()
                    .upsert_airport(airport)
                    .with_context(|| format!("seeding airport {}", airport.ident))?;
            }
            log::info!("seeded {} airports", catalog.airports.len());
            Ok(Outcome::Seeded(Seeded {
                airports: catalog.airports.len(),
            }))
        }
        Command::Status { player } => {
            let player = engine
                .player(player)
                .with_context(|| format!("loading player {player}"))?;
            let airport = engine
                .airport_for(&player, &player.location)
                .with_context(|| format!("loading airport {}", player.location))?;
            Ok(Outcome::Status(PlayerStatus::new(player, airport.name)))
        }
        Command::Fly { player, to } => {
            let mut player = engine
                .player(player)
                .with_context(|| format!("loading player {player}"))?;
            let report = engine
                .fly(&mut player, to)
                .with_context(|| format!("flying {} to {to}", player.name))?;
            Ok(Outcome::Flight(report))
        }
        Command::Visited { player, airport } => {
            let player = engine
                .player(player)
                .with_context(|| format!("loading player {player}"))?;
            let airport = engine
                .airport_for(&player, airport)
                .with_context(|| format!("loading airport {airport}"))?;
            Ok(Outcome::Visited(VisitCheck {
                player: player.name,
                airport: airport.ident,
                visited: airport.visited,
            }))
        }
    }
}

fn write_report(args: &Args, outcome: &Outcome) -> Result<()> {
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Json => reports::generate_json_report(&mut output_target, outcome)?,
        ReportFormat::Console => reports::generate_console_report(&mut output_target, outcome)?,
    }
    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}
