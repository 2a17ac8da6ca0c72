use std::collections::BTreeMap;

use kosa_protocol::{
    Action, BottomAction, Faction, Field, MatKind, ResourceKind, Terrain, TopAction,
};
use serde::{Deserialize, Serialize};

use crate::board::Board;
use crate::config::EngineConfig;
use crate::rules::RulesError;

#[derive(Debug, Deserialize)]
pub(crate) struct RawBoard {
    pub fields: BTreeMap<String, RawField>,
    #[serde(default)]
    pub rivers: Vec<[String; 2]>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawField {
    pub terrain: Terrain,
    #[serde(default)]
    pub neighbours: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMats {
    pub mats: BTreeMap<MatKind, RawMat>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawMat {
    pub number: u8,
    pub popularity: i32,
    pub coins: i32,
    pub columns: Vec<RawColumn>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawColumn {
    pub top: TopAction,
    pub bottom: BottomAction,
    pub cost: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFactions {
    pub factions: BTreeMap<Faction, RawFaction>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFaction {
    pub home: String,
    pub workers: Vec<String>,
    pub power: i32,
    pub combat_cards: u8,
}

/// What a secondary action costs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cost {
    pub kind: ResourceKind,
    pub count: u32,
}

/// One mat column: a primary action and the secondary action it unlocks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatColumn {
    pub top: TopAction,
    pub bottom: BottomAction,
    pub cost: Cost,
}

/// A player mat: turn-order number, starting popularity and coins, and four columns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerMat {
    pub kind: MatKind,
    pub number: u8,
    pub popularity: i32,
    pub coins: i32,
    pub columns: Vec<MatColumn>,
}

impl PlayerMat {
    pub(crate) fn compile(kind: MatKind, raw: RawMat) -> Result<Self, RulesError> {
        let columns = raw
            .columns
            .into_iter()
            .map(|c| MatColumn {
                top: c.top,
                bottom: c.bottom,
                cost: Cost {
                    kind: c.bottom.cost_kind(),
                    count: c.cost,
                },
            })
            .collect::<Vec<_>>();

        // Each action must appear in exactly one column.
        let complete = columns.len() == TopAction::ALL.len()
            && TopAction::ALL
                .iter()
                .all(|top| columns.iter().filter(|c| c.top == *top).count() == 1)
            && BottomAction::ALL
                .iter()
                .all(|bottom| columns.iter().filter(|c| c.bottom == *bottom).count() == 1);
        if !complete {
            return Err(RulesError::InvalidMat(kind.to_string()));
        }

        Ok(Self {
            kind,
            number: raw.number,
            popularity: raw.popularity,
            coins: raw.coins,
            columns,
        })
    }

    pub fn cost(&self, bottom: BottomAction) -> Cost {
        self.columns
            .iter()
            .find(|c| c.bottom == bottom)
            .map(|c| c.cost)
            .unwrap_or(Cost {
                kind: bottom.cost_kind(),
                count: 0,
            })
    }

    pub fn column_of(&self, action: Action) -> Option<usize> {
        self.columns.iter().position(|c| match action {
            Action::Top(top) => c.top == top,
            Action::Bottom(bottom) => c.bottom == bottom,
        })
    }

    /// Whether the printed mat puts `top` and `bottom` in the same column.
    pub fn paired(&self, top: TopAction, bottom: BottomAction) -> bool {
        self.columns
            .iter()
            .any(|c| c.top == top && c.bottom == bottom)
    }
}

/// Starting position of a faction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FactionSetup {
    pub faction: Faction,
    pub home: Field,
    pub workers: Vec<Field>,
    pub power: i32,
    pub combat_cards: u8,
}

/// Everything static about a game: the board, the mats, the factions and the limits.
#[derive(Clone, Debug)]
pub struct Rules {
    pub board: Board,
    pub mats: BTreeMap<MatKind, PlayerMat>,
    pub factions: BTreeMap<Faction, FactionSetup>,
    pub config: EngineConfig,
}

impl Rules {
    pub fn mat(&self, kind: MatKind) -> Result<&PlayerMat, RulesError> {
        self.mats
            .get(&kind)
            .ok_or_else(|| RulesError::MissingId(kind.to_string()))
    }

    pub fn faction(&self, faction: Faction) -> Result<&FactionSetup, RulesError> {
        self.factions
            .get(&faction)
            .ok_or_else(|| RulesError::MissingId(faction.to_string()))
    }
}
