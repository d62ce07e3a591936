//! Mafia simulator CLI - plays randomized bot games against the engine.
//!
//! Every bot is a tokio task reading its own notification feed, so a run
//! exercises joins, role dealing, phase transitions, and fan-out the same
//! way a transport would.

mod bot;

use std::time::Instant;

use bot::Bot;
use clap::Parser;
use mafia_core::{telemetry, EngineConfig, MafiaService, Notification, Role};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use tracing::{info, warn};

const BOT_NAMES: [&str; 4] = ["ada", "bo", "cy", "dee"];

#[derive(Parser)]
#[command(name = "mafia-simulator")]
#[command(about = "Play randomized bot games against the mafia engine")]
struct Args {
    /// Number of games to simulate
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Base seed for deterministic role deals and bot choices
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Debug, Serialize)]
struct GameReport {
    game: u32,
    session: String,
    winner: &'static str,
    mafia: String,
    nights: u32,
    survivors: Vec<String>,
}

#[derive(Debug, Serialize)]
struct Summary {
    games: u32,
    completed: u32,
    mafia_wins: u32,
    civilian_wins: u32,
    elapsed_ms: u128,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Silent by default, only warnings and errors
    telemetry::init_tracing(if args.verbose { "debug" } else { "warn" });

    let config = EngineConfig::from_env()?;
    let service = match args.seed {
        Some(seed) => MafiaService::with_seed(config, seed),
        None => MafiaService::new(config),
    };
    info!(games = args.games, seed = ?args.seed, "Starting simulation");

    let start = Instant::now();
    let mut summary = Summary {
        games: args.games,
        completed: 0,
        mafia_wins: 0,
        civilian_wins: 0,
        elapsed_ms: 0,
    };

    for game in 1..=args.games {
        match run_game(&service, game, args.seed).await {
            Ok(report) => {
                summary.completed += 1;
                if report.winner == "mafia" {
                    summary.mafia_wins += 1;
                } else {
                    summary.civilian_wins += 1;
                }
                println!("{}", serde_json::to_string(&report)?);
            }
            Err(e) => warn!(game, error = %e, "Game failed"),
        }
    }

    summary.elapsed_ms = start.elapsed().as_millis();
    println!("{}", serde_json::to_string(&summary)?);
    Ok(())
}

async fn run_game(
    service: &MafiaService,
    game: u32,
    seed: Option<u64>,
) -> Result<GameReport, Box<dyn std::error::Error>> {
    let session = format!("sim-{game}");

    // The last joiner's START waits in its queue until it subscribes.
    let mut bots = Vec::with_capacity(BOT_NAMES.len());
    for (i, name) in BOT_NAMES.iter().enumerate() {
        service.join(&session, name)?;
        let stream = service.subscribe(&session, name)?;
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed ^ (u64::from(game) << 8) ^ i as u64),
            None => StdRng::from_os_rng(),
        };
        bots.push(Bot::new(
            name.to_string(),
            session.clone(),
            service.clone(),
            stream,
            rng,
        ));
    }

    let handles: Vec<_> = bots.into_iter().map(|bot| tokio::spawn(bot.play())).collect();
    let mut finish: Option<(Role, Notification)> = None;
    for handle in handles {
        if let Some(outcome) = handle.await? {
            finish.get_or_insert(outcome);
        }
    }
    let Some((role, Notification::Finish { game_state, mafia })) = finish else {
        return Err(format!("{session} ended without a FINISH").into());
    };

    let mafia_won = game_state.is_alive(&mafia);
    info!(
        %session,
        reported_by = %role,
        mafia_won,
        roster = %service.describe(&session)?,
        "Game finished"
    );

    Ok(GameReport {
        game,
        session,
        winner: if mafia_won { "mafia" } else { "civilians" },
        mafia,
        nights: game_state.date,
        survivors: game_state.alive_players,
    })
}
