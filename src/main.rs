//! # GID Headless Driver
//!
//! Builds a game session and lets the stair-seeking autopilot play it,
//! printing the message log as it goes.

use clap::Parser;
use gid::{AutoexploreState, GameConfig, GameSession, GidResult, RunState};
use log::{error, info};

/// Command line arguments for the headless driver.
#[derive(Parser, Debug)]
#[command(name = "gid")]
#[command(about = "A turn-based dungeon crawler, played by its autopilot")]
#[command(version)]
struct Args {
    /// Random seed for dungeon generation; overrides the config file
    #[arg(short, long)]
    seed: Option<u64>,

    /// Maximum number of player intents to resolve
    #[arg(short, long, default_value_t = 1000)]
    turns: u64,

    /// JSON game configuration
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() {
    let args = Args::parse();
    initialize_logging(&args.log_level);

    info!("Starting GID v{}", gid::VERSION);
    if let Err(err) = run(&args) {
        error!("{}", err);
        eprintln!("error: {}", err);
        std::process::exit(1);
    }
}

/// Initializes the logging system based on the specified log level.
fn initialize_logging(log_level: &str) {
    #[cfg(feature = "dev-tools")]
    {
        let filter = tracing_subscriber::EnvFilter::try_new(log_level)
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .init();
        tracing::debug!("tracing subscriber installed");
    }

    #[cfg(not(feature = "dev-tools"))]
    {
        env_logger::Builder::new()
            .parse_filters(log_level)
            .format_timestamp(None)
            .init();
    }
}

fn run(args: &Args) -> GidResult<()> {
    let mut config = match &args.config {
        Some(path) => GameConfig::load(path)?,
        None => GameConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.generation.seed = seed;
    }

    let mut session = GameSession::new(config)?;
    for message in session.message_log().iter() {
        println!("{}", message.text);
    }

    let mut autopilot = AutoexploreState::new();
    autopilot.toggle();

    let mut intents = 0;
    while intents < args.turns {
        let Some(intent) = autopilot.next_intent(&session) else {
            break;
        };
        for message in session.run_turn(intent)? {
            println!("{}", message.text);
        }
        intents += 1;
    }

    println!();
    println!("Turns taken:   {}", session.time());
    println!("Dungeon level: {}", session.floor().dungeon_level);
    println!("Score:         {}", session.score());
    match (session.state(), session.death_record()) {
        (RunState::Dead, Some(record)) => {
            println!("{} {} on level {}.", record.name, record.cause, record.dungeon_level);
            println!("{}", record.to_json()?);
        }
        _ => {
            if let Some(player) = session.player() {
                println!("{} survives with {}/{} hp.", player.name, player.hp(), player.max_hp());
            }
        }
    }
    Ok(())
}
