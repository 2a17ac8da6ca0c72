//! Whose turn it is, derived from the last `Action` event.
//!
//! A turn is one primary action, optionally followed by the secondary action of
//! the same mat column (or of a column joined by an upgrade). The next player in
//! join order may then act with anything outside the column just used.

use kosa_protocol::{Action, BottomAction, Event, EventKind, PlayerId, TopAction};
use serde::{Deserialize, Serialize};

use crate::game::{GameError, IllegalActionReason};
use crate::info;
use crate::log::EventLog;
use crate::player::Player;

/// Position of the game in its turn cycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state")]
pub enum TurnState {
    /// Nobody has acted; only the first player may.
    NotStarted,
    /// `player` took `action` most recently.
    After { player: PlayerId, action: Action },
    Over,
}

pub fn last_action(log: &EventLog) -> Option<(PlayerId, Action)> {
    log.last_of(&[EventKind::Action], |_| true)
        .and_then(|e| match e {
            Event::Action { player, action } => Some((*player, *action)),
            _ => None,
        })
}

pub fn turn_state(log: &EventLog) -> TurnState {
    if info::game_over(log) {
        return TurnState::Over;
    }
    match last_action(log) {
        None => TurnState::NotStarted,
        Some((player, action)) => TurnState::After { player, action },
    }
}

/// Join-order successor of `player`, wrapping to the first. A lone player follows themself.
pub fn next_player(players: &[Player], player: PlayerId) -> Option<PlayerId> {
    let index = players.iter().position(|p| p.id == player)?;
    players.get((index + 1) % players.len()).map(|p| p.id)
}

/// Whether `top` and `bottom` form a column for this player, printed or upgraded.
pub fn paired(log: &EventLog, player: &Player, top: TopAction, bottom: BottomAction) -> bool {
    player.mat.paired(top, bottom)
        || info::upgrades(log, player.id)
            .iter()
            .any(|pair| *pair == (top, bottom))
}

/// Whether two actions sit in the same column of the player's mat.
pub fn same_column(log: &EventLog, player: &Player, a: Action, b: Action) -> bool {
    match (a, b) {
        (Action::Top(x), Action::Top(y)) => x == y,
        (Action::Bottom(x), Action::Bottom(y)) => x == y,
        (Action::Top(top), Action::Bottom(bottom)) | (Action::Bottom(bottom), Action::Top(top)) => {
            paired(log, player, top, bottom)
        }
    }
}

/// Accepts `action` for `player` at the current position, or says why not.
pub fn check_action(
    log: &EventLog,
    players: &[Player],
    player: &Player,
    action: Action,
) -> Result<(), GameError> {
    let illegal = |reason| Err(GameError::IllegalAction { reason });

    let (last_player, last) = match turn_state(log) {
        TurnState::Over => return illegal(IllegalActionReason::GameOver),
        TurnState::NotStarted => {
            return match players.first() {
                Some(first) if first.id == player.id => Ok(()),
                _ => illegal(IllegalActionReason::NotStartingPlayer),
            };
        }
        TurnState::After { player, action } => (player, action),
    };

    if last_player == player.id {
        if let (Action::Top(top), Action::Bottom(bottom)) = (last, action) {
            return if paired(log, player, top, bottom) {
                Ok(())
            } else {
                illegal(IllegalActionReason::UnpairedSecondary)
            };
        }
    }

    if next_player(players, last_player) != Some(player.id) {
        return illegal(IllegalActionReason::NotYourTurn);
    }
    if same_column(log, player, last, action) {
        return illegal(IllegalActionReason::SameColumn);
    }
    Ok(())
}
