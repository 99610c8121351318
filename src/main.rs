use clap::Parser;
use pokemon_battle_engine::{BattleConfig, BattleResult, BattleSession, Catalog};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Plays one configured battle to the end with both sides on the opponent policy.
#[derive(Parser, Debug)]
#[command(name = "pokemon-battle-engine", version, about)]
struct Cli {
    /// RON battle description. Plays the bundled rival battle when omitted.
    config: Option<PathBuf>,

    /// Overrides the config's seed.
    #[arg(long)]
    seed: Option<u64>,

    /// Gives up after this many turns.
    #[arg(long, default_value_t = 500)]
    max_turns: u32,
}

fn main() -> BattleResult<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => BattleConfig::load(path)?,
        None => BattleConfig::default_demo()?,
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    let catalog = Arc::new(Catalog::load_default()?);
    let mut session = config.build_session(&catalog)?;
    play(&mut session, cli.max_turns)?;

    for line in session.log() {
        println!("{}", line);
    }
    match serde_json::to_string_pretty(&session.status()) {
        Ok(json) => println!("{}", json),
        Err(err) => warn!(%err, "could not serialize the final status"),
    }
    if let Some(report) = session.outcome() {
        info!(outcome = ?report.outcome, turns = report.turns, prize = report.prize_money, "done");
    }
    Ok(())
}

fn play(session: &mut BattleSession, max_turns: u32) -> BattleResult<()> {
    session.start()?;
    while !session.is_over() {
        if session.state().turn_number >= max_turns {
            warn!(max_turns, "turn limit reached, stopping");
            break;
        }
        session.auto_resolve_turn()?;
    }
    Ok(())
}
