//! Event-sourced rules engine for Kosa.
//!
//! The event log is the only state: every query folds it, every command validates
//! against it and then appends. See [`Game`] for the command surface.

pub mod availability;
pub mod board;
pub mod config;
pub mod game;
pub mod info;
pub mod log;
pub mod player;
pub mod record;
pub mod resources;
pub mod rng;
pub mod rules;
pub mod score;
pub mod selfplay;
pub mod turn;

pub use availability::payment_options;
pub use board::Board;
pub use config::{EngineConfig, ScoreTier};
pub use game::{Game, GameError, IllegalActionReason};
pub use info::BalanceKind;
pub use log::EventLog;
pub use player::Player;
pub use record::RecordError;
pub use resources::ResourceCounts;
pub use rng::GameRng;
pub use rules::{load_rules, Cost, FactionSetup, MatColumn, PlayerMat, Rules, RulesError, RulesSource};
pub use score::{player_score, player_stats, PlayerStats};
pub use selfplay::{run_selfplay, SelfPlayConfig, SelfPlayError, SelfPlayResult};
pub use turn::TurnState;

pub use kosa_protocol as protocol;
