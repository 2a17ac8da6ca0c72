//! Save and resume whole sessions through `GameRecord`.

use std::collections::BTreeSet;

use kosa_protocol::{GameRecord, PlayerId, RECORD_VERSION};
use thiserror::Error;

use crate::game::Game;
use crate::player::Player;
use crate::rules::{Rules, RulesError};

#[derive(Debug, Error)]
pub enum RecordError {
    #[error("unsupported record version {found}; expected {expected}")]
    UnsupportedVersion { found: u32, expected: u32 },
    #[error(transparent)]
    Rules(#[from] RulesError),
    #[error("event for {0}, who is not seated in this record")]
    UnknownPlayer(PlayerId),
    #[error("{0} is seated twice")]
    DuplicatePlayer(PlayerId),
}

impl Game {
    pub fn to_record(&self) -> GameRecord {
        GameRecord {
            version: RECORD_VERSION,
            players: self.players().iter().map(Player::setup).collect(),
            events: self.events().to_vec(),
        }
    }

    /// Rebuild a game from a record. The record's log already holds the setup events.
    pub fn from_record(record: GameRecord, rules: Rules) -> Result<Self, RecordError> {
        if record.version != RECORD_VERSION {
            return Err(RecordError::UnsupportedVersion {
                found: record.version,
                expected: RECORD_VERSION,
            });
        }

        let mut seated = BTreeSet::new();
        for setup in &record.players {
            if !seated.insert(setup.id) {
                return Err(RecordError::DuplicatePlayer(setup.id));
            }
        }
        if let Some(stranger) = record
            .events
            .iter()
            .map(|e| e.player())
            .find(|id| !seated.contains(id))
        {
            return Err(RecordError::UnknownPlayer(stranger));
        }

        let players = record
            .players
            .iter()
            .map(|setup| Player::from_setup(setup, &rules))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Game::restore(rules, players, record.events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{load_rules, RulesSource};
    use kosa_protocol::{Event, Faction, MatKind, PlayerSetup};

    fn game() -> Game {
        let rules = load_rules(RulesSource::Embedded).expect("rules load");
        Game::with_seats(
            rules,
            &[
                (Faction::Black, MatKind::Industrial),
                (Faction::Green, MatKind::Agricultural),
            ],
        )
        .expect("seats")
    }

    #[test]
    fn record_restores_the_same_game() {
        let mut game = game();
        game.bolster_power(PlayerId(1)).expect("bolster");
        let record = game.to_record();
        assert_eq!(record.version, RECORD_VERSION);
        assert_eq!(record.players.len(), 2);

        let rules = load_rules(RulesSource::Embedded).expect("rules load");
        let restored = Game::from_record(record, rules).expect("restore");
        assert_eq!(restored.events(), game.events());
        assert_eq!(restored.power(PlayerId(1)), 3);
        assert_eq!(restored.current_player(), Some(PlayerId(2)));
    }

    #[test]
    fn rejects_other_versions() {
        let mut record = game().to_record();
        record.version = 99;
        let rules = load_rules(RulesSource::Embedded).expect("rules load");
        assert!(matches!(
            Game::from_record(record, rules),
            Err(RecordError::UnsupportedVersion { found: 99, .. })
        ));
    }

    #[test]
    fn rejects_events_of_strangers() {
        let mut record = game().to_record();
        record.events.push(Event::Pass {
            player: PlayerId(5),
        });
        let rules = load_rules(RulesSource::Embedded).expect("rules load");
        assert!(matches!(
            Game::from_record(record, rules),
            Err(RecordError::UnknownPlayer(PlayerId(5)))
        ));
    }

    #[test]
    fn rejects_double_seats() {
        let mut record = game().to_record();
        record.players.push(PlayerSetup {
            id: PlayerId(1),
            faction: Faction::Red,
            mat: MatKind::Militant,
        });
        let rules = load_rules(RulesSource::Embedded).expect("rules load");
        assert!(matches!(
            Game::from_record(record, rules),
            Err(RecordError::DuplicatePlayer(PlayerId(1)))
        ));
    }
}
