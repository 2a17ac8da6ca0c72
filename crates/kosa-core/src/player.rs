use kosa_protocol::{CombatCard, Event, Faction, MatKind, PlayerId, PlayerSetup, Unit, Worker};

use crate::rules::{PlayerMat, Rules, RulesError};

/// A seat at the table: faction, player mat, and the events that set the player up.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub faction: Faction,
    pub mat: PlayerMat,
    /// Faction setup first, then the mat's starting popularity and coins.
    pub setup_events: Vec<Event>,
}

impl Player {
    pub fn new(
        id: PlayerId,
        faction: Faction,
        mat: MatKind,
        rules: &Rules,
    ) -> Result<Self, RulesError> {
        let setup = rules.faction(faction)?;
        let mat = rules.mat(mat)?.clone();

        let mut setup_events = vec![Event::Deploy {
            player: id,
            unit: Unit::Character,
            location: setup.home.clone(),
        }];
        for (i, field) in setup.workers.iter().enumerate() {
            setup_events.push(Event::Deploy {
                player: id,
                unit: Unit::Worker(Worker(i as u8 + 1)),
                location: field.clone(),
            });
        }
        setup_events.push(Event::Power {
            player: id,
            delta: setup.power,
        });
        for _ in 0..setup.combat_cards {
            setup_events.push(Event::GainCombatCard {
                player: id,
                card: CombatCard(rules.config.combat_card_value),
            });
        }
        setup_events.push(Event::Popularity {
            player: id,
            delta: mat.popularity,
        });
        setup_events.push(Event::Coins {
            player: id,
            delta: mat.coins,
        });

        Ok(Self {
            id,
            faction,
            mat,
            setup_events,
        })
    }

    pub fn from_setup(setup: &PlayerSetup, rules: &Rules) -> Result<Self, RulesError> {
        Self::new(setup.id, setup.faction, setup.mat, rules)
    }

    pub fn setup(&self) -> PlayerSetup {
        PlayerSetup {
            id: self.id,
            faction: self.faction,
            mat: self.mat.kind,
        }
    }
}
