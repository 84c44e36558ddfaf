//! Bubble Pop entry point
//!
//! Native shell: reads hand-tracking frames as JSON lines from a file (or
//! stdin with `-`), logs the HUD and sound triggers, and writes the session
//! summary to the configured telemetry file (or the log).
//!
//! Usage: `bubble-pop [STREAM|-] [--config PATH] [--user-id ID]`

use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;

use bubble_pop::input::{HandTracker, JsonLinesTracker};
use bubble_pop::output::LogOutput;
use bubble_pop::settings::DEFAULT_SETTINGS_FILE;
use bubble_pop::telemetry::{JsonLinesSink, LogSink, TelemetrySink};
use bubble_pop::{Game, GameError, Settings};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about = "Gesture-driven bubble popping game", long_about = None)]
struct Cli {
    /// JSON-lines tracking stream to replay; reads stdin when absent or `-`
    stream: Option<PathBuf>,
    /// Settings file
    #[arg(short, long, default_value = DEFAULT_SETTINGS_FILE)]
    config: PathBuf,
    /// Record this player in the settings file before playing
    #[arg(short, long)]
    user_id: Option<u64>,
}

fn open_tracker(
    stream: Option<&PathBuf>,
    frame_rate: u32,
) -> Result<Box<dyn HandTracker>, GameError> {
    match stream {
        Some(path) if path.as_os_str() != "-" => {
            Ok(Box::new(JsonLinesTracker::open(path, frame_rate)?))
        }
        _ => Ok(Box::new(JsonLinesTracker::new(BufReader::new(io::stdin())))),
    }
}

fn run(cli: Cli) -> Result<(), GameError> {
    let mut settings = Settings::load(&cli.config);
    let saved = cli.user_id.map(|id| settings.remember_user(id, &cli.config));
    if let Some(Err(e)) = saved {
        log::warn!("Could not save settings to {}: {e}", cli.config.display());
    }

    // Tracking must be available before any session can start
    let tracker = open_tracker(cli.stream.as_ref(), settings.tick_rate)?;

    let sink: Box<dyn TelemetrySink> = match &settings.telemetry_path {
        Some(path) => Box::new(JsonLinesSink::new(path)),
        None => Box::new(LogSink),
    };

    let mut game = Game::new(settings, Box::new(LogOutput::default()), sink);
    game.run(tracker)?;

    for summary in game.summaries() {
        log::info!(
            "Final Score: {}  Level Reached: {}  Accuracy: {:.1}%",
            summary.score,
            summary.level,
            summary.accuracy_percentage
        );
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Bubble Pop starting...");

    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
