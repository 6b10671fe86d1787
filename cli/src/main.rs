use std::io::{self, BufReader, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use persona_console::{Console, LogEngine, Logger, RenderOptions, Terminal};
use persona_console_roster::{ConsoleConfig, Roster};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "persona-console")]
#[command(version, about = "Interactive console for switching npc and player sessions")]
struct Cli {
    /// Console configuration file (YAML).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Roster file (YAML or JSON); overrides the configured roster.
    #[arg(long, value_name = "FILE")]
    roster: Option<PathBuf>,

    /// Prompt text; overrides the configured prompt.
    #[arg(long, value_name = "TEXT")]
    prompt: Option<String>,

    /// Show DEBUG entries and enable debug diagnostics on stderr.
    #[arg(long)]
    debug: bool,

    /// Disable colored output.
    #[arg(long)]
    no_color: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    if let Err(err) = run(cli) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

/// Diagnostics go to stderr so they never mix with console output.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: Cli) -> Result<(), String> {
    let config = match &cli.config {
        Some(path) => ConsoleConfig::load(path)
            .map_err(|e| format!("failed to load config {}: {e}", path.display()))?,
        None => ConsoleConfig::default(),
    };
    debug!(?config, "configuration loaded");

    let options = RenderOptions {
        prompt: cli.prompt.clone().unwrap_or_else(|| config.prompt.clone()),
        color: config.color && !cli.no_color && io::stdout().is_terminal(),
        show_debug: config.show_debug || cli.debug,
    };
    let mut engine = LogEngine::new(Terminal::stdout(options));
    engine
        .start()
        .map_err(|e| format!("failed to start log engine: {e}"))?;
    let logger = engine.logger();

    let roster_path = cli
        .roster
        .clone()
        .or_else(|| config.roster_path(cli.config.as_deref()));
    let roster = match roster_path {
        Some(path) => load_roster(&logger, &path)?,
        None => {
            logger.info("No roster configured");
            Roster::empty()
        }
    };

    let console = Console::with_builtins(logger.clone(), Arc::new(roster))
        .map_err(|e| format!("failed to register commands: {e}"))?;
    logger.info("Type 'help' to list commands");

    let input = console
        .spawn(BufReader::new(io::stdin()))
        .map_err(|e| e.to_string())?;
    input
        .join()
        .map_err(|_| "input thread panicked".to_string())?;

    engine.stop().map_err(|e| e.to_string())?;
    info!("console exited");
    Ok(())
}

fn load_roster(logger: &Logger, path: &Path) -> Result<Roster, String> {
    let progress = logger.progress("Loading roster", 2);
    progress.set_sub_message(path.display().to_string());

    let roster = match Roster::from_file(path) {
        Ok(roster) => roster,
        Err(err) => {
            progress.fail(err.to_string());
            return Err(format!("failed to load roster {}: {err}", path.display()));
        }
    };

    progress.step_with(format!("{} npcs", roster.npcs().len()));
    progress.step_with(format!("{} players", roster.players().len()));
    debug!(path = %path.display(), records = roster.len(), "roster loaded");
    Ok(roster)
}
