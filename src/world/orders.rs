//! Per-group turn: production, unit orders, storage release.
//!
//! Units act one at a time in ascending id order against the live grid, so
//! a unit sees the moves and kills of units that acted before it in the
//! same turn.

use rand::seq::IndexedRandom;
use tracing::debug;

use crate::world::{DotId, DotKind, GroupId, Position, UNIT_PRODUCTION_COST, World};

/// What a unit sees around itself at decision time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Survey {
    /// Neighbouring tiles holding a foreign dot.
    pub adjacent_targets: Vec<Position>,
    /// Tiles within engagement range holding a foreign dot.
    pub reachable_targets: Vec<Position>,
    /// Neighbouring tiles the unit may step onto.
    pub movable: Vec<Position>,
}

/// A unit's decision for the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Order {
    /// Attack the occupant of a tile.
    Attack(Position),
    /// Step onto a tile.
    Move(Position),
}

impl World {
    /// Run one full turn for a group.
    pub(crate) fn take_turn(&mut self, group: GroupId) {
        self.produce(group);
        self.command_units(group);
        self.release_storage(group);
    }

    /// Spend storage on units while some city has an empty storage slot.
    pub(crate) fn produce(&mut self, group: GroupId) {
        let mut idle_cities: Vec<DotId> = self.cities(group, |slot| slot.is_none());
        loop {
            let affordable = self
                .groups
                .get(&group)
                .is_some_and(|g| g.storage >= UNIT_PRODUCTION_COST);
            if !affordable {
                break;
            }
            let Some(&city) = idle_cities.choose(&mut self.rng) else {
                break;
            };
            idle_cities.retain(|&c| c != city);

            if let Some(g) = self.groups.get_mut(&group) {
                g.try_spend(UNIT_PRODUCTION_COST);
            }
            let unit = self.create_dot(group, DotKind::Unit);
            if let Some(c) = self.dots.get_mut(&city) {
                c.unit_storage = Some(unit);
            }
            debug!(group, city, unit, "unit produced");
        }
    }

    /// Let every placed unit of the group act once.
    pub(crate) fn command_units(&mut self, group: GroupId) {
        let units: Vec<DotId> = self
            .groups
            .get(&group)
            .map(|g| {
                g.dots
                    .iter()
                    .copied()
                    .filter(|id| self.dots.get(id).is_some_and(|d| d.is_unit()))
                    .collect()
            })
            .unwrap_or_default();

        for unit in units {
            let ready = self
                .dots
                .get(&unit)
                .is_some_and(|d| d.tile.is_some() && d.movement > 0);
            if !ready {
                continue;
            }
            let Some(order) = self.decide(unit) else {
                continue;
            };
            if let Some(d) = self.dots.get_mut(&unit) {
                d.spend_movement();
            }
            match order {
                Order::Attack(target) => {
                    if let Some(outcome) = self.attack(unit, target)
                        && outcome.destroyed
                    {
                        debug!(group, unit, defender = outcome.defender, "defender destroyed");
                    }
                }
                Order::Move(to) => {
                    self.place_unit(unit, to);
                }
            }
        }
    }

    /// Deploy each city's stored unit onto a random empty neighbour.
    pub(crate) fn release_storage(&mut self, group: GroupId) {
        let cities = self.cities(group, |slot| slot.is_some());
        for city in cities {
            let Some((at, stored)) = self
                .dots
                .get(&city)
                .and_then(|c| c.tile.zip(c.unit_storage))
            else {
                continue;
            };
            let empty: Vec<Position> = self
                .torus()
                .nearby(at)
                .into_iter()
                .filter(|&p| self.grid.tile(p).is_empty())
                .collect();
            let Some(&to) = empty.choose(&mut self.rng) else {
                continue;
            };
            if let Some(c) = self.dots.get_mut(&city) {
                c.unit_storage = None;
            }
            self.enlist(stored);
            self.place_unit(stored, to);
        }
    }

    /// Inspect the unit's surroundings. Empty if the unit is not placed.
    #[must_use]
    pub fn survey(&self, unit: DotId) -> Survey {
        let Some((group, at, range)) = self
            .dots
            .get(&unit)
            .and_then(|d| d.tile.map(|t| (d.group, t, d.range)))
        else {
            return Survey::default();
        };

        let foreign_claimed = |p: Position| {
            self.grid
                .tile(p)
                .claimants
                .iter()
                .any(|id| self.dots.get(id).is_some_and(|d| d.group != group))
        };
        let foreign_occupied = |p: Position| {
            self.grid
                .tile(p)
                .occupant
                .and_then(|id| self.dots.get(&id))
                .is_some_and(|d| d.group != group)
        };

        let standing_in_enemy_claim = foreign_claimed(at);
        let mut survey = Survey::default();
        for p in self.torus().nearby(at) {
            if foreign_occupied(p) {
                survey.adjacent_targets.push(p);
            } else if self.grid.tile(p).is_empty()
                && (!foreign_claimed(p) || !standing_in_enemy_claim)
            {
                survey.movable.push(p);
            }
        }

        let mut reachable: Vec<Position> = self
            .torus()
            .in_range(at, range)
            .filter(|&p| foreign_occupied(p))
            .collect();
        reachable.sort_unstable();
        reachable.dedup();
        survey.reachable_targets = reachable;
        survey
    }

    /// Pick the unit's order: adjacent enemy, then any enemy in range, then
    /// a random movable tile.
    pub(crate) fn decide(&mut self, unit: DotId) -> Option<Order> {
        let survey = self.survey(unit);
        if let Some(&target) = survey.adjacent_targets.choose(&mut self.rng) {
            return Some(Order::Attack(target));
        }
        if let Some(&target) = survey.reachable_targets.choose(&mut self.rng) {
            return Some(Order::Attack(target));
        }
        survey.movable.choose(&mut self.rng).map(|&to| Order::Move(to))
    }

    fn cities(&self, group: GroupId, slot: impl Fn(Option<DotId>) -> bool) -> Vec<DotId> {
        self.groups
            .get(&group)
            .map(|g| {
                g.dots
                    .iter()
                    .copied()
                    .filter(|id| {
                        self.dots
                            .get(id)
                            .is_some_and(|d| d.is_city() && slot(d.unit_storage))
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}
