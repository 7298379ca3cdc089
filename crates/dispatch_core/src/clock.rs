use std::cmp::Ordering;
use std::collections::BinaryHeap;

use bevy_ecs::prelude::{Entity, Resource};

use crate::ride::Location;

pub const ONE_SEC_MS: u64 = 1000;
pub const ONE_MIN_MS: u64 = 60 * ONE_SEC_MS;

/// A participant action waiting for its turn on the clock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduledAction {
    RequestRide(Entity),
    CancelRide(Entity),
    ChangePickup(Entity, Location),
    SignIn(Entity),
    SignOff(Entity),
    CompleteTrip(Entity),
}

impl ScheduledAction {
    pub fn subject(&self) -> Entity {
        match self {
            ScheduledAction::RequestRide(entity)
            | ScheduledAction::CancelRide(entity)
            | ScheduledAction::ChangePickup(entity, _)
            | ScheduledAction::SignIn(entity)
            | ScheduledAction::SignOff(entity)
            | ScheduledAction::CompleteTrip(entity) => *entity,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub timestamp: u64,
    /// Insertion counter; events at the same timestamp pop in scheduling order.
    pub seq: u64,
    pub action: ScheduledAction,
}

impl Ord for Event {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering to make BinaryHeap a min-heap by (timestamp, seq).
        other
            .timestamp
            .cmp(&self.timestamp)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Event {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug, Default, Resource)]
pub struct SimulationClock {
    now: u64,
    next_seq: u64,
    events: BinaryHeap<Event>,
}

impl SimulationClock {
    pub fn now(&self) -> u64 {
        self.now
    }

    /// Schedules `action` at `timestamp`. Timestamps in the past run at `now`.
    pub fn schedule_at(&mut self, timestamp: u64, action: ScheduledAction) {
        let timestamp = timestamp.max(self.now);
        let seq = self.next_seq;
        self.next_seq += 1;
        self.events.push(Event {
            timestamp,
            seq,
            action,
        });
    }

    pub fn schedule_in(&mut self, delay_ms: u64, action: ScheduledAction) {
        self.schedule_at(self.now.saturating_add(delay_ms), action);
    }

    pub fn schedule_in_mins(&mut self, delay_mins: u64, action: ScheduledAction) {
        self.schedule_in(delay_mins.saturating_mul(ONE_MIN_MS), action);
    }

    pub fn pop_next(&mut self) -> Option<Event> {
        let event = self.events.pop()?;
        self.now = event.timestamp;
        Some(event)
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn pending(&self) -> usize {
        self.events.len()
    }
}
