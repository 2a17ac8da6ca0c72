//! Headless self-play: seeded random games driven only through the read API and options.

use kosa_protocol::{log_hash, Action, Faction, MatKind, PlayerId, WireError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::game::{Game, GameError};
use crate::rng::GameRng;
use crate::rules::{Rules, RulesError};
use crate::score::PlayerStats;
use crate::turn::TurnState;

/// Configuration for self-play simulation.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SelfPlayConfig {
    /// Faction and mat per seat, in join order.
    pub seats: Vec<(Faction, MatKind)>,
    /// Random seed for determinism.
    pub seed: u64,
    /// Turns before the game is abandoned unfinished.
    pub max_turns: u32,
    /// Chance of following a primary action with its secondary when one is available.
    pub secondary_chance: f32,
}

impl Default for SelfPlayConfig {
    fn default() -> Self {
        Self {
            seats: vec![
                (Faction::Black, MatKind::Industrial),
                (Faction::Green, MatKind::Agricultural),
            ],
            seed: 42,
            max_turns: 500,
            secondary_chance: 0.75,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelfPlayResult {
    pub seed: u64,
    /// Turns started; a secondary action belongs to the turn of its primary.
    pub turns: u32,
    pub actions: u32,
    /// A player reached the star limit.
    pub finished: bool,
    /// The player due to move had no legal action.
    pub stalled: bool,
    /// Highest score; `None` on a tie.
    pub winner: Option<PlayerId>,
    pub players: Vec<PlayerStats>,
    pub events: usize,
    pub log_hash: u64,
}

#[derive(Debug, Error)]
pub enum SelfPlayError {
    #[error(transparent)]
    Rules(#[from] RulesError),
    #[error("enumerated option was refused: {0}")]
    Game(#[from] GameError),
    #[error(transparent)]
    Wire(#[from] WireError),
}

pub fn run_selfplay(rules: Rules, config: &SelfPlayConfig) -> Result<SelfPlayResult, SelfPlayError> {
    let mut game = Game::with_seats(rules, &config.seats)?;
    let mut rng = GameRng::seed_from_u64(config.seed);
    let mut turns = 0;
    let mut actions = 0;
    let mut stalled = false;

    while turns < config.max_turns {
        if let TurnState::After {
            player,
            action: Action::Top(_),
        } = game.turn_state()
        {
            let bottoms: Vec<Action> = game
                .available_bottom_actions(player)
                .into_iter()
                .map(Action::from)
                .collect();
            if !bottoms.is_empty() && rng.gen_bool(config.secondary_chance) {
                take_random(&mut game, &mut rng, player, &bottoms)?;
                actions += 1;
                continue;
            }
        }

        let Some(player) = game.current_player() else {
            break;
        };
        let choices = game.available_actions(player);
        if choices.is_empty() {
            stalled = true;
            break;
        }
        take_random(&mut game, &mut rng, player, &choices)?;
        turns += 1;
        actions += 1;
    }

    let players = game.stats();
    let best = players.iter().map(|p| p.score).max().unwrap_or(0);
    let leaders: Vec<PlayerId> = players
        .iter()
        .filter(|p| p.score == best)
        .map(|p| p.id)
        .collect();

    Ok(SelfPlayResult {
        seed: config.seed,
        turns,
        actions,
        finished: game.game_over(),
        stalled,
        winner: match leaders.as_slice() {
            [only] => Some(*only),
            _ => None,
        },
        players,
        events: game.events().len(),
        log_hash: log_hash(game.events())?,
    })
}

fn take_random(
    game: &mut Game,
    rng: &mut GameRng,
    player: PlayerId,
    actions: &[Action],
) -> Result<(), SelfPlayError> {
    let Some(action) = rng.choose(actions).copied() else {
        return Ok(());
    };
    let options = game.available_options(player, action);
    let Some(option) = rng.choose(&options).cloned() else {
        return Ok(());
    };
    debug!(player = player.0, %action, ?option, "self-play move");
    game.apply_option(player, option)?;
    Ok(())
}
