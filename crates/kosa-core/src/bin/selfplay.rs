//! Play one seeded random game and print the result as JSON.
//!
//! Usage: `kosa-selfplay [seed] [max_turns] [rules_dir]`

use kosa_core::{load_rules, run_selfplay, RulesSource, SelfPlayConfig};
use tracing::info;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter("kosa_core=info")
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut config = SelfPlayConfig::default();
    if let Some(seed) = args.first().and_then(|s| s.parse().ok()) {
        config.seed = seed;
    }
    if let Some(max_turns) = args.get(1).and_then(|s| s.parse().ok()) {
        config.max_turns = max_turns;
    }
    let source = match args.get(2) {
        Some(dir) => RulesSource::Path(dir.clone()),
        None => RulesSource::Embedded,
    };

    let rules = match load_rules(source) {
        Ok(rules) => rules,
        Err(e) => {
            tracing::error!("Failed to load rules: {}", e);
            std::process::exit(1);
        }
    };

    info!(seed = config.seed, max_turns = config.max_turns, "starting self-play");
    let result = match run_selfplay(rules, &config) {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Self-play failed: {}", e);
            std::process::exit(1);
        }
    };
    info!(
        turns = result.turns,
        finished = result.finished,
        winner = ?result.winner,
        "self-play done"
    );

    match serde_json::to_string_pretty(&result) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("Failed to encode result: {}", e);
            std::process::exit(1);
        }
    }
}
