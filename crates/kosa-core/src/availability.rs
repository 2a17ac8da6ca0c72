//! What a player may do next, as concrete `ActionOption`s.
//!
//! Every option returned here is accepted by `Game::apply_option` unchanged.

use std::collections::BTreeSet;

use kosa_protocol::{
    Action, ActionOption, BottomAction, BuildingKind, Field, Mech, PlayerId, RecruitReward,
    Resource, ResourceKind, TopAction, Unit, Worker,
};

use crate::game::Game;
use crate::info;
use crate::rules::Cost;
use crate::turn;

impl Game {
    pub fn available_top_actions(&self, player: PlayerId) -> Vec<TopAction> {
        TopAction::ALL
            .iter()
            .copied()
            .filter(|top| !self.available_options(player, (*top).into()).is_empty())
            .collect()
    }

    pub fn available_bottom_actions(&self, player: PlayerId) -> Vec<BottomAction> {
        BottomAction::ALL
            .iter()
            .copied()
            .filter(|bottom| !self.available_options(player, (*bottom).into()).is_empty())
            .collect()
    }

    pub fn available_actions(&self, player: PlayerId) -> Vec<Action> {
        Action::all()
            .filter(|action| !self.available_options(player, *action).is_empty())
            .collect()
    }

    /// Every legal concrete option for `action`, or nothing if `player` may not take it now.
    pub fn available_options(&self, player: PlayerId, action: Action) -> Vec<ActionOption> {
        let Ok(seat) = self.player(player) else {
            return Vec::new();
        };
        if turn::check_action(self.log(), self.players(), seat, action).is_err() {
            return Vec::new();
        }
        match action {
            Action::Top(TopAction::Move) => self.move_options(player),
            Action::Top(TopAction::Bolster) => self.bolster_options(player),
            Action::Top(TopAction::Trade) => self.trade_options(player),
            Action::Top(TopAction::Produce) => self.produce_options(player),
            Action::Bottom(BottomAction::Build) => self.build_options(player),
            Action::Bottom(BottomAction::Deploy) => self.deploy_options(player),
            Action::Bottom(BottomAction::Enlist) => self.enlist_options(player),
            Action::Bottom(BottomAction::Upgrade) => self.upgrade_options(player),
        }
    }

    fn move_options(&self, player: PlayerId) -> Vec<ActionOption> {
        let distance = self.rules().config.move_distance;
        let mut options: Vec<ActionOption> = info::unit_locations(self.log(), player)
            .into_iter()
            .flat_map(|(unit, from)| {
                self.rules()
                    .board
                    .reachable_from(&from.id, distance)
                    .into_iter()
                    .map(move |to| ActionOption::Move {
                        unit,
                        destination: to.id,
                    })
            })
            .collect();
        options.push(ActionOption::GainCoins);
        options
    }

    fn bolster_options(&self, player: PlayerId) -> Vec<ActionOption> {
        if self.coins(player) < 1 {
            return Vec::new();
        }
        vec![ActionOption::BolsterPower, ActionOption::BolsterCombatCards]
    }

    fn trade_options(&self, player: PlayerId) -> Vec<ActionOption> {
        if self.coins(player) < 1 {
            return Vec::new();
        }
        let mut options = Vec::new();
        for (worker, _) in self.worker_sites(player) {
            for (i, kind1) in ResourceKind::ALL.iter().enumerate() {
                for kind2 in &ResourceKind::ALL[i..] {
                    options.push(ActionOption::TradeResources {
                        worker,
                        kind1: *kind1,
                        kind2: *kind2,
                    });
                }
            }
        }
        if self.popularity(player) <= self.rules().config.max_popularity {
            options.push(ActionOption::TradePopularity);
        }
        options
    }

    fn produce_options(&self, player: PlayerId) -> Vec<ActionOption> {
        let affordable = self
            .produce_charges(player)
            .into_iter()
            .all(|kind| self.balance(player, kind) >= 1);
        if !affordable {
            return Vec::new();
        }
        let fields = self.territories(player);
        let mut options = Vec::new();
        for (i, first) in fields.iter().enumerate() {
            for second in &fields[i + 1..] {
                options.push(ActionOption::Produce {
                    field1: first.id.clone(),
                    field2: second.id.clone(),
                });
            }
        }
        options
    }

    fn build_options(&self, player: PlayerId) -> Vec<ActionOption> {
        let built: BTreeSet<BuildingKind> =
            self.buildings(player).iter().map(|b| b.kind).collect();
        let payments = self.payments(player, BottomAction::Build);
        let mut options = Vec::new();
        for (worker, site) in self.worker_sites(player) {
            if info::building_at(self.log(), &site.id).is_some() {
                continue;
            }
            for building in BuildingKind::ALL.iter().filter(|b| !built.contains(*b)) {
                for resources in &payments {
                    options.push(ActionOption::Build {
                        worker,
                        building: *building,
                        resources: resources.clone(),
                    });
                }
            }
        }
        options
    }

    fn deploy_options(&self, player: PlayerId) -> Vec<ActionOption> {
        let deployed = self.units(player);
        let Some(mech) = (1..=self.rules().config.max_mechs)
            .map(Mech)
            .find(|m| !deployed.contains(&Unit::Mech(*m)))
        else {
            return Vec::new();
        };
        let payments = self.payments(player, BottomAction::Deploy);
        let mut options = Vec::new();
        for (worker, _) in self.worker_sites(player) {
            for resources in &payments {
                options.push(ActionOption::Deploy {
                    worker,
                    mech,
                    resources: resources.clone(),
                });
            }
        }
        options
    }

    fn enlist_options(&self, player: PlayerId) -> Vec<ActionOption> {
        let claimed = self.enlistments(player);
        let payments = self.payments(player, BottomAction::Enlist);
        let mut options = Vec::new();
        for bottom in BottomAction::ALL
            .iter()
            .filter(|b| claimed.iter().all(|(_, action)| action != *b))
        {
            for reward in RecruitReward::ALL
                .iter()
                .filter(|r| claimed.iter().all(|(reward, _)| reward != *r))
            {
                for resources in &payments {
                    options.push(ActionOption::Enlist {
                        bottom: *bottom,
                        reward: *reward,
                        resources: resources.clone(),
                    });
                }
            }
        }
        options
    }

    fn upgrade_options(&self, player: PlayerId) -> Vec<ActionOption> {
        let Ok(seat) = self.player(player) else {
            return Vec::new();
        };
        if self.upgrades(player).len() >= self.rules().config.upgrade_count {
            return Vec::new();
        }
        let payments = self.payments(player, BottomAction::Upgrade);
        let mut options = Vec::new();
        for top in TopAction::ALL {
            for bottom in BottomAction::ALL {
                if turn::paired(self.log(), seat, *top, *bottom) {
                    continue;
                }
                for resources in &payments {
                    options.push(ActionOption::Upgrade {
                        top: *top,
                        bottom: *bottom,
                        resources: resources.clone(),
                    });
                }
            }
        }
        options
    }

    /// One worker per occupied field, the lowest-numbered one.
    fn worker_sites(&self, player: PlayerId) -> Vec<(Worker, Field)> {
        let mut sites: Vec<(Worker, Field)> = Vec::new();
        for (unit, field) in info::unit_locations(self.log(), player) {
            let Some(worker) = unit.as_worker() else {
                continue;
            };
            match sites.iter_mut().find(|(_, f)| *f == field) {
                Some(site) if worker < site.0 => site.0 = worker,
                Some(_) => {}
                None => sites.push((worker, field)),
            }
        }
        sites
    }

    /// Distinct ways to pay the cost of `bottom` from usable resources.
    fn payments(&self, player: PlayerId, bottom: BottomAction) -> Vec<Vec<Resource>> {
        let Ok(seat) = self.player(player) else {
            return Vec::new();
        };
        payment_options(&self.usable_resources(player), seat.mat.cost(bottom))
    }
}

/// Every distinct distribution of `cost.count` tokens of `cost.kind` over the
/// locations holding them, locations taken in first-appearance order.
pub fn payment_options(usable: &[Resource], cost: Cost) -> Vec<Vec<Resource>> {
    let mut piles: Vec<(Field, usize)> = Vec::new();
    for resource in usable.iter().filter(|r| r.kind == cost.kind) {
        match piles.iter_mut().find(|(f, _)| *f == resource.location) {
            Some(pile) => pile.1 += 1,
            None => piles.push((resource.location.clone(), 1)),
        }
    }

    let mut out = Vec::new();
    let mut taken = vec![0; piles.len()];
    distribute(&piles, 0, cost.count as usize, &mut taken, &mut out, cost.kind);
    out
}

fn distribute(
    piles: &[(Field, usize)],
    index: usize,
    remaining: usize,
    taken: &mut [usize],
    out: &mut Vec<Vec<Resource>>,
    kind: ResourceKind,
) {
    if remaining == 0 {
        out.push(
            piles
                .iter()
                .zip(taken.iter())
                .flat_map(|((field, _), n)| {
                    std::iter::repeat_with(|| Resource::new(field.clone(), kind)).take(*n)
                })
                .collect(),
        );
        return;
    }
    let Some((_, size)) = piles.get(index) else {
        return;
    };
    let rest: usize = piles[index + 1..].iter().map(|(_, n)| n).sum();
    let least = remaining.saturating_sub(rest);
    for n in (least..=remaining.min(*size)).rev() {
        taken[index] = n;
        distribute(piles, index + 1, remaining - n, taken, out, kind);
    }
    taken[index] = 0;
}
