use std::collections::BTreeSet;

use kosa_protocol::{
    Action, ActionOption, BottomAction, Building, BuildingKind, CombatCard, Event, Faction, Field,
    FieldId, MatKind, Mech, PlayerId, RecruitReward, Resource, ResourceKind, Star, Terrain,
    TopAction, Unit, Worker,
};
use thiserror::Error;
use tracing::{debug, info, trace};

use crate::info::{self, BalanceKind};
use crate::log::EventLog;
use crate::player::Player;
use crate::resources::ResourceCounts;
use crate::rules::{Rules, RulesError};
use crate::score::{self, PlayerStats};
use crate::turn::{self, TurnState};

/// Why an action category was refused at this point of the turn cycle.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum IllegalActionReason {
    #[error("You are not the starting player.")]
    NotStartingPlayer,
    #[error("It is not your turn yet.")]
    NotYourTurn,
    #[error("Cannot use actions from the same column.")]
    SameColumn,
    #[error("Cannot use this bottom action with the last top action.")]
    UnpairedSecondary,
    #[error("Cannot produce twice on {field}.")]
    SameField { field: Field },
    #[error("{top} is already paired with {bottom}.")]
    AlreadyPaired { top: TopAction, bottom: BottomAction },
    #[error("No upgrades left.")]
    NoUpgradesLeft,
    #[error("The game is over.")]
    GameOver,
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("{reason}")]
    IllegalAction { reason: IllegalActionReason },
    #[error("{unit} is not allowed to move from {from} to {to}.")]
    IllegalMove { unit: Unit, from: Field, to: Field },
    #[error("{unit} has not been deployed yet.")]
    UnitNotDeployed { unit: Unit },
    #[error("{required} {kind}(s) required, but only {available} {kind}(s) available.")]
    InsufficientBalance {
        kind: BalanceKind,
        required: i32,
        available: i32,
    },
    #[error("{kind} is at {current}, above the ceiling of {ceiling}.")]
    BalanceAboveCeiling {
        kind: BalanceKind,
        current: i32,
        ceiling: i32,
    },
    #[error("Not enough resources of type {kind}; {required} required, but only {available} available.")]
    InsufficientResources {
        kind: ResourceKind,
        required: u32,
        available: u32,
    },
    #[error("The provided resources contain only {provided} of type {kind}; {required} required.")]
    InsufficientPayment {
        kind: ResourceKind,
        required: u32,
        provided: u32,
    },
    #[error(
        "The provided resources ({}) are not among your available resources ({}).",
        list(.provided),
        list(.available)
    )]
    ResourcesNotAvailable {
        provided: Vec<Resource>,
        available: Vec<Resource>,
    },
    #[error("Exactly {required} resource(s) of type {kind} required, but {provided} resource(s) provided.")]
    Overpayment {
        kind: ResourceKind,
        required: u32,
        provided: u32,
    },
    #[error("Building {building} has already been built.")]
    BuildingAlreadyBuilt { building: BuildingKind },
    #[error("{location} already has another building.")]
    LocationOccupiedByBuilding { location: Field },
    #[error("{mech} has already been deployed.")]
    MechAlreadyDeployed { mech: Mech },
    #[error("{location} is not controlled by {player}.")]
    LocationNotControlled { player: PlayerId, location: Field },
    #[error("unknown unit: {0}")]
    UnknownUnit(Unit),
    #[error("unknown player: {0}")]
    UnknownPlayer(PlayerId),
    #[error("unknown field: {0}")]
    UnknownField(FieldId),
}

fn list(resources: &[Resource]) -> String {
    resources
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Events a command appends after its `Action` event.
enum Append {
    Always(Event),
    /// Skipped when a structurally equal event is already logged.
    IfNew(Event),
}

/// A game session: static rules, players in join order and the event log.
///
/// The log is the only state. Every read recomputes from it, and every command
/// validates fully before appending, so a failed command leaves the log untouched.
#[derive(Clone, Debug)]
pub struct Game {
    rules: Rules,
    players: Vec<Player>,
    log: EventLog,
}

impl Game {
    /// New game; the log starts with every player's setup events in join order.
    pub fn new(rules: Rules, players: Vec<Player>) -> Self {
        let log = players
            .iter()
            .flat_map(|p| p.setup_events.iter().cloned())
            .collect();
        Self {
            rules,
            players,
            log,
        }
    }

    /// New game with players numbered 1.. in the order given.
    pub fn with_seats(rules: Rules, seats: &[(Faction, MatKind)]) -> Result<Self, RulesError> {
        let players = seats
            .iter()
            .enumerate()
            .map(|(i, (faction, mat))| {
                let id = u8::try_from(i + 1).map_err(|_| RulesError::TooManySeats(seats.len()))?;
                Player::new(PlayerId(id), *faction, *mat, &rules)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules, players))
    }

    /// Resume a game from its complete log. Setup events are expected to be in `events`.
    pub fn restore(rules: Rules, players: Vec<Player>, events: Vec<Event>) -> Self {
        Self {
            rules,
            players,
            log: EventLog::from(events),
        }
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player(&self, id: PlayerId) -> Result<&Player, GameError> {
        self.players
            .iter()
            .find(|p| p.id == id)
            .ok_or(GameError::UnknownPlayer(id))
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn events(&self) -> &[Event] {
        self.log.events()
    }

    pub fn field(&self, id: &FieldId) -> Result<Field, GameError> {
        self.rules
            .board
            .field(id)
            .ok_or_else(|| GameError::UnknownField(id.clone()))
    }

    // ---- Read API ----

    pub fn coins(&self, player: PlayerId) -> i32 {
        info::coins(&self.log, player)
    }

    pub fn power(&self, player: PlayerId) -> i32 {
        info::power(&self.log, player)
    }

    pub fn popularity(&self, player: PlayerId) -> i32 {
        info::popularity(&self.log, player)
    }

    pub fn balance(&self, player: PlayerId, kind: BalanceKind) -> i32 {
        info::balance(&self.log, player, kind)
    }

    pub fn unit_location(&self, player: PlayerId, unit: Unit) -> Result<Field, GameError> {
        info::unit_location(&self.log, player, unit)
    }

    pub fn units(&self, player: PlayerId) -> BTreeSet<Unit> {
        info::units(&self.log, player)
    }

    pub fn workers(&self, player: PlayerId) -> Vec<Worker> {
        info::workers(&self.log, player)
    }

    pub fn mechs(&self, player: PlayerId) -> Vec<Mech> {
        info::mechs(&self.log, player)
    }

    pub fn workers_on(&self, player: PlayerId, field: &FieldId) -> usize {
        info::workers_on(&self.log, player, field)
    }

    pub fn units_at(&self, field: &FieldId) -> Vec<(PlayerId, Unit)> {
        info::units_at(&self.log, field)
    }

    pub fn territories(&self, player: PlayerId) -> Vec<Field> {
        info::territories(&self.log, player)
    }

    pub fn available_resources(&self, player: PlayerId) -> Vec<Resource> {
        info::available_resources(&self.log, player)
    }

    pub fn usable_resources(&self, player: PlayerId) -> Vec<Resource> {
        info::usable_resources(&self.log, player)
    }

    pub fn resources(&self, player: PlayerId) -> ResourceCounts {
        info::resources(&self.log, player)
    }

    pub fn buildings(&self, player: PlayerId) -> Vec<Building> {
        info::buildings(&self.log, player)
    }

    pub fn combat_cards(&self, player: PlayerId) -> Vec<CombatCard> {
        info::combat_cards(&self.log, player)
    }

    pub fn enlistments(&self, player: PlayerId) -> Vec<(RecruitReward, BottomAction)> {
        info::enlistments(&self.log, player)
    }

    pub fn upgrades(&self, player: PlayerId) -> Vec<(TopAction, BottomAction)> {
        info::upgrades(&self.log, player)
    }

    pub fn stars(&self, player: PlayerId) -> Vec<Star> {
        info::stars(&self.log, player)
    }

    pub fn game_over(&self) -> bool {
        info::game_over(&self.log)
    }

    pub fn turn_state(&self) -> TurnState {
        turn::turn_state(&self.log)
    }

    /// Player due to start the next turn; `None` once the game is over.
    pub fn current_player(&self) -> Option<PlayerId> {
        match self.turn_state() {
            TurnState::Over => None,
            TurnState::NotStarted => self.players.first().map(|p| p.id),
            TurnState::After { player, .. } => turn::next_player(&self.players, player),
        }
    }

    /// Score of every player, in join order.
    pub fn score(&self) -> Vec<(PlayerId, i32)> {
        self.players
            .iter()
            .map(|p| (p.id, score::player_score(&self.log, p.id, &self.rules.config)))
            .collect()
    }

    pub fn stats(&self) -> Vec<PlayerStats> {
        self.players
            .iter()
            .map(|p| score::player_stats(&self.log, p, &self.rules.config))
            .collect()
    }

    // ---- Commands ----

    /// Move `unit` to `destination`.
    pub fn move_unit(
        &mut self,
        player: PlayerId,
        unit: Unit,
        destination: &FieldId,
    ) -> Result<&mut Self, GameError> {
        let action = Action::Top(TopAction::Move);
        self.check_turn(player, action)?;
        let from = info::unit_location(&self.log, player, unit)?;
        let to = self.field(destination)?;
        let distance = self.rules.config.move_distance;
        if !self.rules.board.is_reachable(&from.id, &to.id, distance) {
            return Err(GameError::IllegalMove { unit, from, to });
        }
        Ok(self.commit(
            player,
            action,
            vec![Append::Always(Event::Move {
                player,
                unit,
                destination: to,
            })],
        ))
    }

    pub fn gain_coins(&mut self, player: PlayerId) -> Result<&mut Self, GameError> {
        let action = Action::Top(TopAction::Move);
        self.check_turn(player, action)?;
        Ok(self.commit(
            player,
            action,
            vec![Append::Always(Event::Coins { player, delta: 1 })],
        ))
    }

    pub fn bolster_power(&mut self, player: PlayerId) -> Result<&mut Self, GameError> {
        let action = Action::Top(TopAction::Bolster);
        self.check_turn(player, action)?;
        self.require_balance(player, BalanceKind::Coins, 1)?;
        let config = &self.rules.config;
        let gain = config
            .bolster_power
            .min(config.max_power - info::power(&self.log, player))
            .max(0);
        Ok(self.commit(
            player,
            action,
            vec![
                Append::Always(Event::Power {
                    player,
                    delta: gain,
                }),
                Append::Always(Event::Coins { player, delta: -1 }),
            ],
        ))
    }

    pub fn bolster_combat_cards(&mut self, player: PlayerId) -> Result<&mut Self, GameError> {
        let action = Action::Top(TopAction::Bolster);
        self.check_turn(player, action)?;
        self.require_balance(player, BalanceKind::Coins, 1)?;
        let card = CombatCard(self.rules.config.combat_card_value);
        Ok(self.commit(
            player,
            action,
            vec![
                Append::Always(Event::GainCombatCard { player, card }),
                Append::Always(Event::Coins { player, delta: -1 }),
            ],
        ))
    }

    /// Pay a coin for one resource of each kind at the worker's location.
    pub fn trade_resources(
        &mut self,
        player: PlayerId,
        worker: Worker,
        kind1: ResourceKind,
        kind2: ResourceKind,
    ) -> Result<&mut Self, GameError> {
        let action = Action::Top(TopAction::Trade);
        self.check_turn(player, action)?;
        self.require_balance(player, BalanceKind::Coins, 1)?;
        let location = info::unit_location(&self.log, player, worker.into())?;
        Ok(self.commit(
            player,
            action,
            vec![
                Append::Always(Event::Coins { player, delta: -1 }),
                Append::Always(Event::GainResources {
                    player,
                    resources: vec![
                        Resource::new(location.clone(), kind1),
                        Resource::new(location, kind2),
                    ],
                }),
            ],
        ))
    }

    pub fn trade_popularity(&mut self, player: PlayerId) -> Result<&mut Self, GameError> {
        let action = Action::Top(TopAction::Trade);
        self.check_turn(player, action)?;
        self.require_balance(player, BalanceKind::Coins, 1)?;
        let ceiling = self.rules.config.max_popularity;
        let current = info::popularity(&self.log, player);
        if current > ceiling {
            return Err(GameError::BalanceAboveCeiling {
                kind: BalanceKind::Popularity,
                current,
                ceiling,
            });
        }
        let gain = if current >= ceiling { 0 } else { 1 };
        Ok(self.commit(
            player,
            action,
            vec![
                Append::Always(Event::Coins { player, delta: -1 }),
                Append::Always(Event::Popularity {
                    player,
                    delta: gain,
                }),
            ],
        ))
    }

    /// Produce on two distinct controlled fields.
    ///
    /// With enough workers on the board, producing first costs power, then
    /// popularity, then coins. Villages recruit one worker per worker present
    /// instead of yielding resources.
    pub fn produce(
        &mut self,
        player: PlayerId,
        field1: &FieldId,
        field2: &FieldId,
    ) -> Result<&mut Self, GameError> {
        let action = Action::Top(TopAction::Produce);
        self.check_turn(player, action)?;
        let first = self.field(field1)?;
        let second = self.field(field2)?;
        for field in [&first, &second] {
            if !info::controls(&self.log, player, &field.id) {
                return Err(GameError::LocationNotControlled {
                    player,
                    location: field.clone(),
                });
            }
        }
        if first == second {
            return Err(GameError::IllegalAction {
                reason: IllegalActionReason::SameField { field: first },
            });
        }

        let charges = self.produce_charges(player);
        for kind in &charges {
            self.require_balance(player, *kind, 1)?;
        }
        let mut effects: Vec<Append> = charges
            .into_iter()
            .map(|kind| Append::Always(charge(player, kind)))
            .collect();

        let workers = info::workers(&self.log, player);
        let mut worker_count = workers.len();
        let mut next_number = workers.iter().map(|w| w.0).max().unwrap_or(0);
        for field in [&first, &second] {
            effects.extend(
                self.production_on(player, field, &mut worker_count, &mut next_number)
                    .into_iter()
                    .map(Append::Always),
            );
        }
        Ok(self.commit(player, action, effects))
    }

    pub fn build(
        &mut self,
        player: PlayerId,
        worker: Worker,
        building: BuildingKind,
        resources: Vec<Resource>,
    ) -> Result<&mut Self, GameError> {
        let action = Action::Bottom(BottomAction::Build);
        self.check_turn(player, action)?;
        let location = info::unit_location(&self.log, player, worker.into())?;
        if info::buildings(&self.log, player)
            .iter()
            .any(|b| b.kind == building)
        {
            return Err(GameError::BuildingAlreadyBuilt { building });
        }
        self.check_payment(player, BottomAction::Build, &resources)?;
        if info::building_at(&self.log, &location.id).is_some() {
            return Err(GameError::LocationOccupiedByBuilding { location });
        }
        Ok(self.commit(
            player,
            action,
            vec![
                Append::Always(Event::SpendResources { player, resources }),
                Append::Always(Event::Build {
                    player,
                    location,
                    building,
                }),
            ],
        ))
    }

    /// Deploy `mech` where `worker` stands.
    pub fn deploy(
        &mut self,
        player: PlayerId,
        worker: Worker,
        mech: Mech,
        resources: Vec<Resource>,
    ) -> Result<&mut Self, GameError> {
        let action = Action::Bottom(BottomAction::Deploy);
        self.check_turn(player, action)?;
        if mech.0 == 0 || mech.0 > self.rules.config.max_mechs {
            return Err(GameError::UnknownUnit(mech.into()));
        }
        self.check_payment(player, BottomAction::Deploy, &resources)?;
        if info::units(&self.log, player).contains(&Unit::Mech(mech)) {
            return Err(GameError::MechAlreadyDeployed { mech });
        }
        let location = info::unit_location(&self.log, player, worker.into())?;
        Ok(self.commit(
            player,
            action,
            vec![
                Append::Always(Event::SpendResources { player, resources }),
                Append::Always(Event::Deploy {
                    player,
                    unit: mech.into(),
                    location,
                }),
            ],
        ))
    }

    /// Claim `reward` for enlisting under `bottom`. Claiming the same pair again records nothing new.
    pub fn enlist(
        &mut self,
        player: PlayerId,
        bottom: BottomAction,
        reward: RecruitReward,
        resources: Vec<Resource>,
    ) -> Result<&mut Self, GameError> {
        let action = Action::Bottom(BottomAction::Enlist);
        self.check_turn(player, action)?;
        self.check_payment(player, BottomAction::Enlist, &resources)?;
        Ok(self.commit(
            player,
            action,
            vec![
                Append::IfNew(Event::Enlist {
                    player,
                    reward,
                    action: bottom,
                }),
                Append::Always(Event::SpendResources { player, resources }),
            ],
        ))
    }

    /// Permanently pair `top` with `bottom` for this player.
    ///
    /// Refused for a pair already joined on the mat or by an earlier upgrade,
    /// and once every upgrade has been taken.
    pub fn upgrade(
        &mut self,
        player: PlayerId,
        top: TopAction,
        bottom: BottomAction,
        resources: Vec<Resource>,
    ) -> Result<&mut Self, GameError> {
        let action = Action::Bottom(BottomAction::Upgrade);
        self.check_turn(player, action)?;
        if turn::paired(&self.log, self.player(player)?, top, bottom) {
            return Err(GameError::IllegalAction {
                reason: IllegalActionReason::AlreadyPaired { top, bottom },
            });
        }
        if info::upgrades(&self.log, player).len() >= self.rules.config.upgrade_count {
            return Err(GameError::IllegalAction {
                reason: IllegalActionReason::NoUpgradesLeft,
            });
        }
        self.check_payment(player, BottomAction::Upgrade, &resources)?;
        Ok(self.commit(
            player,
            action,
            vec![
                Append::Always(Event::SpendResources { player, resources }),
                Append::Always(Event::Upgrade {
                    player,
                    top,
                    bottom,
                }),
            ],
        ))
    }

    /// Run the command an enumerated option stands for.
    pub fn apply_option(
        &mut self,
        player: PlayerId,
        option: ActionOption,
    ) -> Result<&mut Self, GameError> {
        match option {
            ActionOption::Move { unit, destination } => {
                self.move_unit(player, unit, &destination)
            }
            ActionOption::GainCoins => self.gain_coins(player),
            ActionOption::BolsterPower => self.bolster_power(player),
            ActionOption::BolsterCombatCards => self.bolster_combat_cards(player),
            ActionOption::TradeResources {
                worker,
                kind1,
                kind2,
            } => self.trade_resources(player, worker, kind1, kind2),
            ActionOption::TradePopularity => self.trade_popularity(player),
            ActionOption::Produce { field1, field2 } => self.produce(player, &field1, &field2),
            ActionOption::Build {
                worker,
                building,
                resources,
            } => self.build(player, worker, building, resources),
            ActionOption::Deploy {
                worker,
                mech,
                resources,
            } => self.deploy(player, worker, mech, resources),
            ActionOption::Enlist {
                bottom,
                reward,
                resources,
            } => self.enlist(player, bottom, reward, resources),
            ActionOption::Upgrade {
                top,
                bottom,
                resources,
            } => self.upgrade(player, top, bottom, resources),
        }
    }

    // ---- Internals ----

    fn check_turn(&self, player: PlayerId, action: Action) -> Result<(), GameError> {
        turn::check_action(&self.log, &self.players, self.player(player)?, action)
    }

    fn require_balance(
        &self,
        player: PlayerId,
        kind: BalanceKind,
        required: i32,
    ) -> Result<(), GameError> {
        let available = info::balance(&self.log, player, kind);
        if available < required {
            return Err(GameError::InsufficientBalance {
                kind,
                required,
                available,
            });
        }
        Ok(())
    }

    /// Validate a secondary action's payment against the player's usable resources.
    ///
    /// The payment must be exactly the cost: `cost.count` tokens, all of `cost.kind`.
    fn check_payment(
        &self,
        player: PlayerId,
        bottom: BottomAction,
        supplied: &[Resource],
    ) -> Result<(), GameError> {
        let cost = self.player(player)?.mat.cost(bottom);
        let usable = info::usable_resources(&self.log, player);
        let count = |resources: &[Resource]| {
            resources.iter().filter(|r| r.kind == cost.kind).count() as u32
        };

        let available = count(&usable);
        if available < cost.count {
            return Err(GameError::InsufficientResources {
                kind: cost.kind,
                required: cost.count,
                available,
            });
        }
        if !info::contains_all(&usable, supplied) {
            return Err(GameError::ResourcesNotAvailable {
                provided: supplied.to_vec(),
                available: usable,
            });
        }
        let provided = count(supplied);
        if provided < cost.count {
            return Err(GameError::InsufficientPayment {
                kind: cost.kind,
                required: cost.count,
                provided,
            });
        }
        if supplied.len() as u32 != cost.count {
            return Err(GameError::Overpayment {
                kind: cost.kind,
                required: cost.count,
                provided: supplied.len() as u32,
            });
        }
        Ok(())
    }

    /// Balances charged by a produce action, given the player's worker count.
    pub(crate) fn produce_charges(&self, player: PlayerId) -> Vec<BalanceKind> {
        let config = &self.rules.config;
        let workers = info::workers(&self.log, player).len();
        [
            (config.produce_power_threshold, BalanceKind::Power),
            (config.produce_popularity_threshold, BalanceKind::Popularity),
            (config.produce_coins_threshold, BalanceKind::Coins),
        ]
        .into_iter()
        .filter(|(threshold, _)| workers >= *threshold)
        .map(|(_, kind)| kind)
        .collect()
    }

    fn production_on(
        &self,
        player: PlayerId,
        field: &Field,
        worker_count: &mut usize,
        next_number: &mut u8,
    ) -> Vec<Event> {
        let present = info::workers_on(&self.log, player, &field.id);
        if present == 0 {
            return Vec::new();
        }
        if field.terrain == Terrain::Village {
            let max = usize::from(self.rules.config.max_workers);
            let recruits = present.min(max.saturating_sub(*worker_count));
            *worker_count += recruits;
            return (0..recruits)
                .map(|_| {
                    *next_number += 1;
                    Event::Deploy {
                        player,
                        unit: Unit::Worker(Worker(*next_number)),
                        location: field.clone(),
                    }
                })
                .collect();
        }
        match field.terrain.produces() {
            Some(kind) => vec![Event::GainResources {
                player,
                resources: vec![Resource::new(field.clone(), kind); present],
            }],
            None => Vec::new(),
        }
    }

    /// Append the action and its effects, then grant stars and pass if the turn is done.
    fn commit(&mut self, player: PlayerId, action: Action, effects: Vec<Append>) -> &mut Self {
        let before = self.log.len();
        self.log.add(Event::Action { player, action });
        for effect in effects {
            match effect {
                Append::Always(event) => self.log.add(event),
                Append::IfNew(event) => self.log.add_if_new(event),
            };
        }
        debug!(
            player = player.0,
            %action,
            appended = self.log.len() - before,
            "action committed"
        );

        self.grant_stars(player);
        if !self.game_over() {
            self.pass_if_done(player, action);
        }
        self
    }

    fn grant_stars(&mut self, player: PlayerId) {
        let config = &self.rules.config;
        let mut held = info::stars(&self.log, player);
        for star in Star::ALL {
            if held.len() >= config.star_limit {
                break;
            }
            if held.contains(star) || !info::star_condition(&self.log, player, *star, config) {
                continue;
            }
            self.log.add(Event::Star {
                player,
                star: *star,
            });
            held.push(*star);
            info!(player = player.0, %star, stars = held.len(), "star granted");

            if held.len() == config.star_limit {
                self.log.add(Event::GameEnd { player });
                info!(player = player.0, "game over");
            }
        }
    }

    /// A turn ends after a secondary action, or after a primary with no secondary left to take.
    fn pass_if_done(&mut self, player: PlayerId, action: Action) {
        if action.is_top() && !self.available_bottom_actions(player).is_empty() {
            return;
        }
        self.log.add(Event::Pass { player });
        trace!(player = player.0, "pass");
    }
}

fn charge(player: PlayerId, kind: BalanceKind) -> Event {
    match kind {
        BalanceKind::Coins => Event::Coins { player, delta: -1 },
        BalanceKind::Power => Event::Power { player, delta: -1 },
        BalanceKind::Popularity => Event::Popularity { player, delta: -1 },
    }
}
