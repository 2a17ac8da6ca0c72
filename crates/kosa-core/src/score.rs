//! End-of-game scoring and per-player summaries.

use kosa_protocol::{
    BottomAction, Building, CombatCard, Faction, Field, MatKind, PlayerId, RecruitReward, Star,
    Terrain, TopAction, Unit,
};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::info;
use crate::log::EventLog;
use crate::player::Player;
use crate::resources::ResourceCounts;

/// Coins plus the popularity tier's payout for stars, territories and resource pairs.
///
/// Home bases do not count as territory.
pub fn player_score(log: &EventLog, player: PlayerId, config: &EngineConfig) -> i32 {
    let tier = config.score_tier(info::popularity(log, player));
    let stars = info::stars(log, player).len() as i32;
    let territories = info::territories(log, player)
        .iter()
        .filter(|f| f.terrain != Terrain::Homebase)
        .count() as i32;
    let pairs = (info::resources(log, player).total() / 2) as i32;

    info::coins(log, player)
        + stars * tier.per_star
        + territories * tier.per_territory
        + pairs * tier.per_resource_pair
}

/// Every derived fact about one player, for clients and self-play reports.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub id: PlayerId,
    pub faction: Faction,
    pub mat: MatKind,
    pub coins: i32,
    pub power: i32,
    pub popularity: i32,
    pub resources: ResourceCounts,
    pub units: Vec<(Unit, Field)>,
    pub territories: Vec<Field>,
    pub buildings: Vec<Building>,
    pub combat_cards: Vec<CombatCard>,
    pub enlistments: Vec<(RecruitReward, BottomAction)>,
    pub upgrades: Vec<(TopAction, BottomAction)>,
    pub stars: Vec<Star>,
    pub score: i32,
}

pub fn player_stats(log: &EventLog, player: &Player, config: &EngineConfig) -> PlayerStats {
    let id = player.id;
    PlayerStats {
        id,
        faction: player.faction,
        mat: player.mat.kind,
        coins: info::coins(log, id),
        power: info::power(log, id),
        popularity: info::popularity(log, id),
        resources: info::resources(log, id),
        units: info::unit_locations(log, id),
        territories: info::territories(log, id),
        buildings: info::buildings(log, id),
        combat_cards: info::combat_cards(log, id),
        enlistments: info::enlistments(log, id),
        upgrades: info::upgrades(log, id),
        stars: info::stars(log, id),
        score: player_score(log, id, config),
    }
}
