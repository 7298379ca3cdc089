//! Simulation runner: owns the shared mediator plus the participant handles, and
//! replays scheduled actions through those handles.
//!
//! Each step pops the next event from the mediator's [SimulationClock] and applies
//! it through the matching [PassengerHandle] or [DriverHandle], so the scripted
//! actions go through exactly the path a host program would use.
//!
//! [SimulationClock]: crate::clock::SimulationClock

use bevy_ecs::prelude::Entity;
use tracing::{debug, info};

use crate::clock::{Event, ScheduledAction};
use crate::error::{DispatchError, DispatchResult};
use crate::mediator::{DispatchMediator, SharedMediator};
use crate::participants::{DriverHandle, PassengerHandle};
use crate::ride::{Location, RideCategory};
use crate::scenario::DispatchConfig;

pub struct Simulation {
    mediator: SharedMediator,
    passengers: Vec<PassengerHandle>,
    drivers: Vec<DriverHandle>,
}

impl Simulation {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            mediator: DispatchMediator::new(config).shared(),
            passengers: Vec::new(),
            drivers: Vec::new(),
        }
    }

    pub fn mediator(&self) -> &SharedMediator {
        &self.mediator
    }

    pub fn add_driver(
        &mut self,
        name: impl Into<String>,
        category: RideCategory,
        distance_miles: Option<u16>,
    ) -> Entity {
        let handle = DriverHandle::join(&self.mediator, name, category, distance_miles);
        let entity = handle.entity();
        self.drivers.push(handle);
        entity
    }

    pub fn add_passenger(
        &mut self,
        name: impl Into<String>,
        category: RideCategory,
        pickup: Location,
    ) -> Entity {
        let handle = PassengerHandle::join(&self.mediator, name, category, pickup);
        let entity = handle.entity();
        self.passengers.push(handle);
        entity
    }

    pub fn drivers(&self) -> &[DriverHandle] {
        &self.drivers
    }

    pub fn passengers(&self) -> &[PassengerHandle] {
        &self.passengers
    }

    pub fn driver(&self, entity: Entity) -> Option<&DriverHandle> {
        self.drivers.iter().find(|handle| handle.entity() == entity)
    }

    pub fn passenger(&self, entity: Entity) -> Option<&PassengerHandle> {
        self.passengers.iter().find(|handle| handle.entity() == entity)
    }

    pub fn driver_named(&self, name: &str) -> Option<&DriverHandle> {
        self.drivers
            .iter()
            .find(|handle| handle.name().is_ok_and(|n| n == name))
    }

    pub fn passenger_named(&self, name: &str) -> Option<&PassengerHandle> {
        self.passengers
            .iter()
            .find(|handle| handle.name().is_ok_and(|n| n == name))
    }

    pub fn schedule_at(&self, timestamp: u64, action: ScheduledAction) {
        self.mediator
            .borrow_mut()
            .clock_mut()
            .schedule_at(timestamp, action);
    }

    pub fn now(&self) -> u64 {
        self.mediator.borrow().clock().now()
    }

    pub fn pending(&self) -> usize {
        self.mediator.borrow().clock().pending()
    }

    /// Applies one action through the owning participant's handle.
    pub fn apply(&self, action: &ScheduledAction) -> DispatchResult {
        let subject = action.subject();
        let unknown = || DispatchError::UnknownParticipant(subject);
        match action {
            ScheduledAction::RequestRide(passenger) => {
                self.passenger(*passenger).ok_or_else(unknown)?.request_ride()
            }
            ScheduledAction::CancelRide(passenger) => {
                self.passenger(*passenger).ok_or_else(unknown)?.cancel_ride()
            }
            ScheduledAction::ChangePickup(passenger, location) => self
                .passenger(*passenger)
                .ok_or_else(unknown)?
                .change_pickup(location.clone()),
            ScheduledAction::SignIn(driver) => self.driver(*driver).ok_or_else(unknown)?.sign_in(),
            ScheduledAction::SignOff(driver) => {
                self.driver(*driver).ok_or_else(unknown)?.sign_off()
            }
            ScheduledAction::CompleteTrip(driver) => {
                self.driver(*driver).ok_or_else(unknown)?.complete_trip()
            }
        }
    }

    /// Pops and applies the next event. Returns `None` once the clock is empty.
    pub fn step(&self) -> Option<(Event, DispatchResult)> {
        let event = self.mediator.borrow_mut().clock_mut().pop_next()?;
        let result = self.apply(&event.action);
        match &result {
            Ok(outcome) => debug!(timestamp_ms = event.timestamp, %outcome, "step applied"),
            Err(error) => debug!(timestamp_ms = event.timestamp, %error, "step rejected"),
        }
        Some((event, result))
    }
}

/// Runs until the clock has no events left or `max_steps` is reached.
/// Returns the number of steps executed.
pub fn run_until_empty(simulation: &Simulation, max_steps: usize) -> usize {
    let mut steps = 0;
    while steps < max_steps {
        if simulation.step().is_none() {
            break;
        }
        steps += 1;
    }
    let mediator = simulation.mediator().borrow();
    let telemetry = mediator.telemetry();
    info!(
        steps,
        sim_time_ms = mediator.clock().now(),
        assigned = telemetry.rides_assigned,
        rejected = telemetry.rejected(),
        "simulation run finished"
    );
    steps
}
