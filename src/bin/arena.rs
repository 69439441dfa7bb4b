use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::Parser;
use serde::Serialize;

use grid_duel::ai::{play_game, Agent, Difficulty, Engine, EngineAgent, Personality};
use grid_duel::config::EngineConfig;
use grid_duel::game::{GameOutcome, Side, Variant};

/// Pit two engine tiers against each other.
#[derive(Parser)]
#[command(name = "arena", about = "Play engine-vs-engine matches")]
struct Cli {
    /// Game to play: connection or drop
    #[arg(long, default_value = "connection")]
    game: String,

    /// Connection board size (3..=7)
    #[arg(long, default_value_t = 3)]
    size: usize,

    /// Tier playing side A
    #[arg(long, default_value = "master")]
    first: Difficulty,

    /// Tier playing side B
    #[arg(long, default_value = "intermediate")]
    second: Difficulty,

    /// Personality used by both engines
    #[arg(long, default_value = "balanced")]
    personality: Personality,

    /// Number of games
    #[arg(long, default_value_t = 10)]
    games: u64,

    /// Base RNG seed; game i uses seed + i
    #[arg(long)]
    seed: Option<u64>,

    /// Path to TOML configuration file
    #[arg(long, default_value = "engine.toml")]
    config: PathBuf,

    /// Print the summary as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    first: String,
    second: String,
    games: u64,
    first_wins: u64,
    second_wins: u64,
    draws: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let variant = match cli.game.as_str() {
        "connection" => Variant::Connection { size: cli.size },
        "drop" => Variant::Drop,
        other => bail!("unknown game '{}' (expected 'connection' or 'drop')", other),
    };

    let config = EngineConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    let mut summary = Summary {
        games: cli.games,
        ..Default::default()
    };

    for game in 0..cli.games {
        let seeded = |offset: u64| EngineConfig {
            seed: cli
                .seed
                .or(config.seed)
                .map(|s| s.wrapping_add(game * 2 + offset)),
            ..config.clone()
        };
        let mut first = EngineAgent::new(Engine::new(seeded(0))?, cli.first, cli.personality);
        let mut second = EngineAgent::new(Engine::new(seeded(1))?, cli.second, cli.personality);
        summary.first = first.name().to_string();
        summary.second = second.name().to_string();

        let state = play_game(variant, &mut first, &mut second)
            .with_context(|| format!("playing game {}", game + 1))?;

        let result = match state.outcome() {
            Some(GameOutcome::Winner(Side::A)) => {
                summary.first_wins += 1;
                "first wins"
            }
            Some(GameOutcome::Winner(Side::B)) => {
                summary.second_wins += 1;
                "second wins"
            }
            Some(GameOutcome::Draw) | None => {
                summary.draws += 1;
                "draw"
            }
        };

        if !cli.json {
            println!("Game {}: {}\n{}\n", game + 1, result, state.board());
        }
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!(
            "{} vs {}: {} games, {} / {} / {} (first / second / draw)",
            summary.first,
            summary.second,
            summary.games,
            summary.first_wins,
            summary.second_wins,
            summary.draws
        );
    }

    Ok(())
}
