//! Mediator-owned bookkeeping: the ordered driver registry and the
//! passenger → driver assignment table.

use std::collections::HashMap;

use bevy_ecs::prelude::{Entity, Resource};

/// Signed-in drivers in sign-in order. Duplicate sign-ins are kept as separate entries.
#[derive(Debug, Clone, Default, Resource)]
pub struct DriverRegistry {
    drivers: Vec<Entity>,
}

impl DriverRegistry {
    pub fn push(&mut self, driver: Entity) {
        self.drivers.push(driver);
    }

    /// Removes the first entry for `driver`. Returns false if it was not registered.
    pub fn remove_one(&mut self, driver: Entity) -> bool {
        match self.drivers.iter().position(|entry| *entry == driver) {
            Some(index) => {
                self.drivers.remove(index);
                true
            }
            None => false,
        }
    }

    /// Number of registry entries for `driver`.
    pub fn entries_for(&self, driver: Entity) -> usize {
        self.drivers.iter().filter(|entry| **entry == driver).count()
    }

    pub fn as_slice(&self) -> &[Entity] {
        &self.drivers
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.drivers.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

/// Active passenger → driver pairings. One entry per passenger.
#[derive(Debug, Clone, Default, Resource)]
pub struct ActiveAssignments {
    by_passenger: HashMap<Entity, Entity>,
}

impl ActiveAssignments {
    pub fn driver_for(&self, passenger: Entity) -> Option<Entity> {
        self.by_passenger.get(&passenger).copied()
    }

    pub fn passenger_for(&self, driver: Entity) -> Option<Entity> {
        self.by_passenger
            .iter()
            .find(|(_, assigned)| **assigned == driver)
            .map(|(passenger, _)| *passenger)
    }

    /// Pairs `passenger` with `driver`. Callers check `driver_for` first; an existing
    /// pairing is never overwritten.
    pub fn assign(&mut self, passenger: Entity, driver: Entity) -> bool {
        if self.by_passenger.contains_key(&passenger) {
            return false;
        }
        self.by_passenger.insert(passenger, driver);
        true
    }

    pub fn release(&mut self, passenger: Entity) -> Option<Entity> {
        self.by_passenger.remove(&passenger)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Entity, Entity)> + '_ {
        self.by_passenger.iter().map(|(p, d)| (*p, *d))
    }

    pub fn len(&self) -> usize {
        self.by_passenger.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_passenger.is_empty()
    }
}
