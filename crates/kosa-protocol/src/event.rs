use serde::{Deserialize, Serialize};

use crate::{
    Action, BottomAction, BuildingKind, CombatCard, Field, PlayerId, RecruitReward, Resource, Star,
    TopAction, Unit,
};

/// Every fact the engine records. Fully serializable; never edited once logged.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// An action category was taken.
    Action { player: PlayerId, action: Action },

    // Balances
    Coins { player: PlayerId, delta: i32 },
    Power { player: PlayerId, delta: i32 },
    Popularity { player: PlayerId, delta: i32 },

    // Resources
    GainResources {
        player: PlayerId,
        resources: Vec<Resource>,
    },
    SpendResources {
        player: PlayerId,
        resources: Vec<Resource>,
    },

    // Board
    Deploy {
        player: PlayerId,
        unit: Unit,
        location: Field,
    },
    Move {
        player: PlayerId,
        unit: Unit,
        destination: Field,
    },
    Build {
        player: PlayerId,
        location: Field,
        building: BuildingKind,
    },

    GainCombatCard { player: PlayerId, card: CombatCard },
    /// A recruit reward claimed through the given secondary action.
    Enlist {
        player: PlayerId,
        reward: RecruitReward,
        action: BottomAction,
    },
    /// A permanent extra pairing between a primary and a secondary action.
    Upgrade {
        player: PlayerId,
        top: TopAction,
        bottom: BottomAction,
    },
    Star { player: PlayerId, star: Star },

    // Game flow
    Pass { player: PlayerId },
    GameEnd { player: PlayerId },
}

/// Discriminant of [`Event`], used to filter the log.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    Action,
    Coins,
    Power,
    Popularity,
    GainResources,
    SpendResources,
    Deploy,
    Move,
    Build,
    GainCombatCard,
    Enlist,
    Upgrade,
    Star,
    Pass,
    GameEnd,
}

impl Event {
    pub fn player(&self) -> PlayerId {
        match self {
            Event::Action { player, .. }
            | Event::Coins { player, .. }
            | Event::Power { player, .. }
            | Event::Popularity { player, .. }
            | Event::GainResources { player, .. }
            | Event::SpendResources { player, .. }
            | Event::Deploy { player, .. }
            | Event::Move { player, .. }
            | Event::Build { player, .. }
            | Event::GainCombatCard { player, .. }
            | Event::Enlist { player, .. }
            | Event::Upgrade { player, .. }
            | Event::Star { player, .. }
            | Event::Pass { player }
            | Event::GameEnd { player } => *player,
        }
    }

    pub fn kind(&self) -> EventKind {
        match self {
            Event::Action { .. } => EventKind::Action,
            Event::Coins { .. } => EventKind::Coins,
            Event::Power { .. } => EventKind::Power,
            Event::Popularity { .. } => EventKind::Popularity,
            Event::GainResources { .. } => EventKind::GainResources,
            Event::SpendResources { .. } => EventKind::SpendResources,
            Event::Deploy { .. } => EventKind::Deploy,
            Event::Move { .. } => EventKind::Move,
            Event::Build { .. } => EventKind::Build,
            Event::GainCombatCard { .. } => EventKind::GainCombatCard,
            Event::Enlist { .. } => EventKind::Enlist,
            Event::Upgrade { .. } => EventKind::Upgrade,
            Event::Star { .. } => EventKind::Star,
            Event::Pass { .. } => EventKind::Pass,
            Event::GameEnd { .. } => EventKind::GameEnd,
        }
    }

    /// Unit and field named by a deploy or move.
    pub fn placement(&self) -> Option<(Unit, &Field)> {
        match self {
            Event::Deploy { unit, location, .. } => Some((*unit, location)),
            Event::Move {
                unit, destination, ..
            } => Some((*unit, destination)),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Terrain, TopAction};

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::Action {
            player: PlayerId(1),
            action: Action::Top(TopAction::Bolster),
        };
        let json = serde_json::to_string(&event).expect("encode");
        assert_eq!(json, r#"{"type":"Action","player":1,"action":"BOLSTER"}"#);
    }

    #[test]
    fn kind_and_player_follow_the_variant() {
        let event = Event::Move {
            player: PlayerId(2),
            unit: Unit::Character,
            destination: Field::new("m6", Terrain::Mountain),
        };
        assert_eq!(event.kind(), EventKind::Move);
        assert_eq!(event.player(), PlayerId(2));
        let (unit, field) = event.placement().expect("move places a unit");
        assert_eq!(unit, Unit::Character);
        assert_eq!(field.id.as_str(), "m6");
        assert!(Event::Pass { player: PlayerId(2) }.placement().is_none());
    }
}
