//! Derived state: every fact about a player is a fold over the event log.
//!
//! Nothing here mutates anything; calling a query twice on the same log gives the
//! same answer.

use std::collections::BTreeSet;
use std::fmt;

use kosa_protocol::{
    BottomAction, Building, CombatCard, Event, EventKind, Field, FieldId, Mech, PlayerId,
    RecruitReward, Resource, Star, TopAction, Unit, Worker,
};
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::game::GameError;
use crate::log::EventLog;
use crate::resources::ResourceCounts;

/// The three counters kept as signed deltas.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BalanceKind {
    Coins,
    Power,
    Popularity,
}

impl BalanceKind {
    pub const fn event_kind(self) -> EventKind {
        match self {
            BalanceKind::Coins => EventKind::Coins,
            BalanceKind::Power => EventKind::Power,
            BalanceKind::Popularity => EventKind::Popularity,
        }
    }
}

impl fmt::Display for BalanceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BalanceKind::Coins => "coin",
            BalanceKind::Power => "power",
            BalanceKind::Popularity => "popularity",
        })
    }
}

/// Sum of every delta of `kind` attributed to `player`.
pub fn balance(log: &EventLog, player: PlayerId, kind: BalanceKind) -> i32 {
    log.filter_by(player, kind.event_kind())
        .map(|event| match event {
            Event::Coins { delta, .. }
            | Event::Power { delta, .. }
            | Event::Popularity { delta, .. } => *delta,
            _ => 0,
        })
        .sum()
}

pub fn coins(log: &EventLog, player: PlayerId) -> i32 {
    balance(log, player, BalanceKind::Coins)
}

pub fn power(log: &EventLog, player: PlayerId) -> i32 {
    balance(log, player, BalanceKind::Power)
}

pub fn popularity(log: &EventLog, player: PlayerId) -> i32 {
    balance(log, player, BalanceKind::Popularity)
}

/// Where the last deploy or move of `unit` put it.
pub fn unit_location(log: &EventLog, player: PlayerId, unit: Unit) -> Result<Field, GameError> {
    log.last_of(&[EventKind::Deploy, EventKind::Move], |e| {
        e.player() == player && e.placement().is_some_and(|(u, _)| u == unit)
    })
    .and_then(|e| e.placement())
    .map(|(_, field)| field.clone())
    .ok_or(GameError::UnitNotDeployed { unit })
}

/// Current location of every placed unit, in the order the units first appeared.
pub fn unit_locations(log: &EventLog, player: PlayerId) -> Vec<(Unit, Field)> {
    let mut placed: Vec<(Unit, Field)> = Vec::new();
    for event in log.iter().filter(|e| e.player() == player) {
        let Some((unit, field)) = event.placement() else {
            continue;
        };
        match placed.iter_mut().find(|(u, _)| *u == unit) {
            Some(entry) => entry.1 = field.clone(),
            None => placed.push((unit, field.clone())),
        }
    }
    placed
}

/// Units with at least one deploy event.
pub fn units(log: &EventLog, player: PlayerId) -> BTreeSet<Unit> {
    log.filter_by(player, EventKind::Deploy)
        .filter_map(|e| e.placement())
        .map(|(unit, _)| unit)
        .collect()
}

pub fn workers(log: &EventLog, player: PlayerId) -> Vec<Worker> {
    units(log, player)
        .into_iter()
        .filter_map(Unit::as_worker)
        .collect()
}

pub fn mechs(log: &EventLog, player: PlayerId) -> Vec<Mech> {
    units(log, player)
        .into_iter()
        .filter_map(Unit::as_mech)
        .collect()
}

/// Workers of `player` currently standing on `field`.
pub fn workers_on(log: &EventLog, player: PlayerId, field: &FieldId) -> usize {
    unit_locations(log, player)
        .iter()
        .filter(|(unit, location)| unit.as_worker().is_some() && &location.id == field)
        .count()
}

/// Every unit of every player currently on `field`.
pub fn units_at(log: &EventLog, field: &FieldId) -> Vec<(PlayerId, Unit)> {
    let players: BTreeSet<PlayerId> = log.iter().map(Event::player).collect();
    players
        .into_iter()
        .flat_map(|player| {
            unit_locations(log, player)
                .into_iter()
                .filter(|(_, location)| &location.id == field)
                .map(move |(unit, _)| (player, unit))
        })
        .collect()
}

/// Fields occupied by the player's units, de-duplicated, in first-appearance order.
pub fn territories(log: &EventLog, player: PlayerId) -> Vec<Field> {
    let mut fields: Vec<Field> = Vec::new();
    for (_, field) in unit_locations(log, player) {
        if !fields.contains(&field) {
            fields.push(field);
        }
    }
    fields
}

pub fn controls(log: &EventLog, player: PlayerId, field: &FieldId) -> bool {
    territories(log, player).iter().any(|f| &f.id == field)
}

/// Gained resources minus spent ones. Each spent token removes the first equal gained token.
pub fn available_resources(log: &EventLog, player: PlayerId) -> Vec<Resource> {
    let mut available: Vec<Resource> = log
        .filter_by(player, EventKind::GainResources)
        .flat_map(|e| match e {
            Event::GainResources { resources, .. } => resources.as_slice(),
            _ => &[],
        })
        .cloned()
        .collect();

    let spent = log
        .filter_by(player, EventKind::SpendResources)
        .flat_map(|e| match e {
            Event::SpendResources { resources, .. } => resources.as_slice(),
            _ => &[],
        });
    for resource in spent {
        if let Some(index) = available.iter().position(|r| r == resource) {
            available.remove(index);
        }
    }
    available
}

/// Available resources lying on fields the player controls; only these can pay costs.
pub fn usable_resources(log: &EventLog, player: PlayerId) -> Vec<Resource> {
    let territories = territories(log, player);
    available_resources(log, player)
        .into_iter()
        .filter(|r| territories.contains(&r.location))
        .collect()
}

pub fn resources(log: &EventLog, player: PlayerId) -> ResourceCounts {
    usable_resources(log, player).iter().collect()
}

/// Whether every token in `wanted` can be taken from `pool`, counting duplicates.
pub fn contains_all(pool: &[Resource], wanted: &[Resource]) -> bool {
    let mut remaining = pool.to_vec();
    wanted.iter().all(|resource| {
        match remaining.iter().position(|r| r == resource) {
            Some(index) => {
                remaining.swap_remove(index);
                true
            }
            None => false,
        }
    })
}

pub fn buildings(log: &EventLog, player: PlayerId) -> Vec<Building> {
    log.filter_by(player, EventKind::Build)
        .filter_map(|e| match e {
            Event::Build {
                location, building, ..
            } => Some(Building {
                kind: *building,
                location: location.clone(),
            }),
            _ => None,
        })
        .collect()
}

/// The structure on `field`, whoever built it.
pub fn building_at(log: &EventLog, field: &FieldId) -> Option<(PlayerId, Building)> {
    log.filter(EventKind::Build).find_map(|e| match e {
        Event::Build {
            player,
            location,
            building,
        } if &location.id == field => Some((
            *player,
            Building {
                kind: *building,
                location: location.clone(),
            },
        )),
        _ => None,
    })
}

pub fn combat_cards(log: &EventLog, player: PlayerId) -> Vec<CombatCard> {
    log.filter_by(player, EventKind::GainCombatCard)
        .filter_map(|e| match e {
            Event::GainCombatCard { card, .. } => Some(*card),
            _ => None,
        })
        .collect()
}

pub fn enlistments(log: &EventLog, player: PlayerId) -> Vec<(RecruitReward, BottomAction)> {
    log.filter_by(player, EventKind::Enlist)
        .filter_map(|e| match e {
            Event::Enlist { reward, action, .. } => Some((*reward, *action)),
            _ => None,
        })
        .collect()
}

pub fn upgrades(log: &EventLog, player: PlayerId) -> Vec<(TopAction, BottomAction)> {
    log.filter_by(player, EventKind::Upgrade)
        .filter_map(|e| match e {
            Event::Upgrade { top, bottom, .. } => Some((*top, *bottom)),
            _ => None,
        })
        .collect()
}

/// Stars in the order they were granted.
pub fn stars(log: &EventLog, player: PlayerId) -> Vec<Star> {
    log.filter_by(player, EventKind::Star)
        .filter_map(|e| match e {
            Event::Star { star, .. } => Some(*star),
            _ => None,
        })
        .collect()
}

/// Whether `player` currently meets the condition for `star`.
///
/// Combat and objectives are not modelled, so those stars are never earned here.
pub fn star_condition(log: &EventLog, player: PlayerId, star: Star, config: &EngineConfig) -> bool {
    match star {
        Star::AllUpgrades => upgrades(log, player).len() >= config.upgrade_count,
        Star::AllMechs => mechs(log, player).len() >= usize::from(config.max_mechs),
        Star::AllBuildings => buildings(log, player).len() >= config.building_count,
        Star::AllRecruits => enlistments(log, player).len() >= config.recruit_count,
        Star::AllWorkers => workers(log, player).len() >= usize::from(config.max_workers),
        Star::MaxPopularity => popularity(log, player) >= config.max_popularity,
        Star::MaxPower => power(log, player) >= config.max_power,
        Star::Objective | Star::FirstCombatWin | Star::SecondCombatWin => false,
    }
}

pub fn game_over(log: &EventLog) -> bool {
    log.filter(EventKind::GameEnd).next().is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use kosa_protocol::{BuildingKind, ResourceKind, Terrain};

    const P: PlayerId = PlayerId(1);
    const Q: PlayerId = PlayerId(2);

    fn black() -> Field {
        Field::new("black", Terrain::Homebase)
    }

    fn m6() -> Field {
        Field::new("m6", Terrain::Mountain)
    }

    fn t8() -> Field {
        Field::new("t8", Terrain::Tundra)
    }

    fn white() -> Field {
        Field::new("white", Terrain::Homebase)
    }

    fn deploy(unit: Unit, location: Field) -> Event {
        Event::Deploy {
            player: P,
            unit,
            location,
        }
    }

    fn start() -> EventLog {
        let mut log = EventLog::new();
        log.add(deploy(Unit::Character, black()))
            .add(deploy(Unit::Worker(Worker(1)), m6()))
            .add(deploy(Unit::Worker(Worker(2)), t8()));
        log
    }

    fn resource(location: Field, kind: ResourceKind) -> Resource {
        Resource::new(location, kind)
    }

    #[test]
    fn balances_sum_deltas_and_default_to_zero() {
        let mut log = EventLog::new();
        log.add(Event::Coins { player: P, delta: 4 })
            .add(Event::Coins { player: P, delta: -1 })
            .add(Event::Coins { player: Q, delta: 7 });
        assert_eq!(coins(&log, P), 3);
        assert_eq!(coins(&log, Q), 7);
        assert_eq!(power(&log, P), 0);
        assert_eq!(popularity(&log, PlayerId(9)), 0);
    }

    #[test]
    fn unit_location_follows_latest_move() {
        let mut log = start();
        assert_eq!(unit_location(&log, P, Unit::Character), Ok(black()));
        log.add(Event::Move {
            player: P,
            unit: Unit::Character,
            destination: m6(),
        });
        assert_eq!(unit_location(&log, P, Unit::Character), Ok(m6()));
        assert_eq!(
            unit_location(&log, P, Unit::Mech(Mech(1))),
            Err(GameError::UnitNotDeployed {
                unit: Unit::Mech(Mech(1))
            })
        );
        assert!(unit_location(&log, Q, Unit::Character).is_err());
    }

    #[test]
    fn territories_are_deduplicated_in_order() {
        let mut log = start();
        assert_eq!(territories(&log, P), vec![black(), m6(), t8()]);
        log.add(Event::Move {
            player: P,
            unit: Unit::Character,
            destination: m6(),
        });
        assert_eq!(territories(&log, P), vec![m6(), t8()]);
        assert!(controls(&log, P, &FieldId::new("t8")));
        assert!(!controls(&log, P, &FieldId::new("black")));
    }

    #[test]
    fn units_and_workers() {
        let mut log = start();
        log.add(deploy(Unit::Mech(Mech(1)), m6()));
        let all = units(&log, P);
        assert_eq!(all.len(), 4);
        assert!(all.contains(&Unit::Character));
        assert_eq!(workers(&log, P), vec![Worker(1), Worker(2)]);
        assert_eq!(mechs(&log, P), vec![Mech(1)]);
        assert_eq!(workers_on(&log, P, &FieldId::new("m6")), 1);
        assert_eq!(units_at(&log, &FieldId::new("m6")).len(), 2);
    }

    #[test]
    fn spending_removes_first_matching_tokens() {
        let mut log = start();
        log.add(Event::GainResources {
            player: P,
            resources: vec![resource(black(), ResourceKind::Food); 5],
        })
        .add(Event::SpendResources {
            player: P,
            resources: vec![resource(black(), ResourceKind::Food); 3],
        });
        assert_eq!(resources(&log, P).food, 2);
        assert_eq!(available_resources(&log, P).len(), 2);
    }

    #[test]
    fn spending_is_exact_by_location_and_kind() {
        let mut log = start();
        let gained = vec![
            resource(black(), ResourceKind::Wood),
            resource(m6(), ResourceKind::Wood),
            resource(black(), ResourceKind::Wood),
            resource(m6(), ResourceKind::Wood),
            resource(black(), ResourceKind::Wood),
        ];
        log.add(Event::GainResources {
            player: P,
            resources: gained,
        })
        .add(Event::SpendResources {
            player: P,
            resources: vec![
                resource(black(), ResourceKind::Wood),
                resource(m6(), ResourceKind::Wood),
                resource(black(), ResourceKind::Wood),
            ],
        });
        assert_eq!(
            available_resources(&log, P),
            vec![
                resource(m6(), ResourceKind::Wood),
                resource(black(), ResourceKind::Wood),
            ]
        );
    }

    #[test]
    fn only_controlled_resources_are_usable() {
        let mut log = start();
        log.add(Event::GainResources {
            player: P,
            resources: vec![
                resource(m6(), ResourceKind::Metal),
                resource(white(), ResourceKind::Metal),
            ],
        });
        assert_eq!(available_resources(&log, P).len(), 2);
        assert_eq!(resources(&log, P).metal, 1);
    }

    #[test]
    fn contains_all_respects_multiplicity() {
        let wood = resource(m6(), ResourceKind::Wood);
        let pool = vec![wood.clone(), wood.clone()];
        assert!(contains_all(&pool, &[wood.clone(), wood.clone()]));
        assert!(!contains_all(&pool, &[wood.clone(), wood.clone(), wood]));
        assert!(contains_all(&pool, &[]));
    }

    #[test]
    fn buildings_are_attributed() {
        let mut log = start();
        log.add(Event::Build {
            player: P,
            location: m6(),
            building: BuildingKind::Mill,
        });
        assert_eq!(
            buildings(&log, P),
            vec![Building {
                kind: BuildingKind::Mill,
                location: m6()
            }]
        );
        assert!(buildings(&log, Q).is_empty());
        assert_eq!(building_at(&log, &FieldId::new("m6")).map(|(p, _)| p), Some(P));
        assert!(building_at(&log, &FieldId::new("t8")).is_none());
    }

    #[test]
    fn star_conditions() {
        let config = EngineConfig::default();
        let mut log = start();
        assert!(!star_condition(&log, P, Star::MaxPower, &config));
        log.add(Event::Power { player: P, delta: 16 });
        assert!(star_condition(&log, P, Star::MaxPower, &config));

        for n in 3..=8 {
            log.add(deploy(Unit::Worker(Worker(n)), black()));
        }
        assert!(star_condition(&log, P, Star::AllWorkers, &config));
        assert!(!star_condition(&log, P, Star::FirstCombatWin, &config));
        assert!(!star_condition(&log, P, Star::Objective, &config));

        for _ in 0..6 {
            log.add(Event::Upgrade {
                player: P,
                top: TopAction::Bolster,
                bottom: BottomAction::Enlist,
            });
        }
        assert!(star_condition(&log, P, Star::AllUpgrades, &config));
    }

    #[test]
    fn game_over_needs_a_game_end_event() {
        let mut log = start();
        assert!(!game_over(&log));
        log.add(Event::GameEnd { player: P });
        assert!(game_over(&log));
    }
}
