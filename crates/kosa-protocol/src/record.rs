use serde::{Deserialize, Serialize};

use crate::{Event, Faction, MatKind, PlayerId};

/// Current save-record schema version.
pub const RECORD_VERSION: u32 = 1;

/// A whole session: who sat down with which faction and mat, and the full event log.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameRecord {
    /// Save-record schema version.
    pub version: u32,
    /// Players in join order; the first one starts.
    #[serde(default)]
    pub players: Vec<PlayerSetup>,
    /// Complete event log, setup events included.
    #[serde(default)]
    pub events: Vec<Event>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerSetup {
    pub id: PlayerId,
    pub faction: Faction,
    pub mat: MatKind,
}
