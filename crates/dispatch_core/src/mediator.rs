//! The dispatch mediator: sole owner of the driver registry and the assignment
//! table, and the only path by which passengers and drivers affect each other.
//!
//! Participants live as entities in the mediator's ECS world. Every call turns into
//! a [Notice], which is inserted as [CurrentNotice] before the dispatch schedule
//! runs once. The system that owns the notice's action writes the result into
//! [NoticeOutcome]; the mediator then records it in [DispatchTelemetry] and hands it
//! back to the caller. Calls complete synchronously and never leave the registry
//! or the assignment table half-updated.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use bevy_ecs::prelude::{Entity, Mut, Resource, Schedule, World};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info_span;

use crate::clock::SimulationClock;
use crate::ecs::{Driver, DriverStatus, Passenger, Pickup, Radio};
use crate::error::{DispatchError, DispatchResult};
use crate::notice::{CurrentNotice, DispatchAction, Notice, NoticeOutcome};
use crate::registry::{ActiveAssignments, DriverRegistry};
use crate::ride::{Location, RequestKind, RideCategory};
use crate::scenario::DispatchConfig;
use crate::systems::dispatch_schedule;
use crate::telemetry::{DispatchCounts, DispatchTelemetry};

/// Shared handle owned by the host; participants keep a `Weak` to it.
pub type SharedMediator = Rc<RefCell<DispatchMediator>>;

/// Seeded RNG for driver distances.
#[derive(Debug, Resource)]
pub struct DispatchRng(pub StdRng);

pub struct DispatchMediator {
    world: World,
    schedule: Schedule,
}

impl fmt::Debug for DispatchMediator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchMediator")
            .field("registry", &self.registry())
            .field("assignments", &self.assignments().len())
            .finish()
    }
}

impl Default for DispatchMediator {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}

impl DispatchMediator {
    pub fn new(config: DispatchConfig) -> Self {
        let mut world = World::new();
        world.insert_resource(SimulationClock::default());
        world.insert_resource(DriverRegistry::default());
        world.insert_resource(ActiveAssignments::default());
        world.insert_resource(NoticeOutcome::default());
        world.insert_resource(DispatchTelemetry::default());
        world.insert_resource(config.selection.create());
        world.insert_resource(DispatchRng(StdRng::seed_from_u64(config.seed)));
        world.insert_resource(config);
        Self {
            world,
            schedule: dispatch_schedule(),
        }
    }

    pub fn shared(self) -> SharedMediator {
        Rc::new(RefCell::new(self))
    }

    /// Creates a free driver that is not yet signed in. Without an explicit distance,
    /// one is drawn uniformly from `0..=max_driver_distance_miles`.
    pub fn spawn_driver(
        &mut self,
        name: impl Into<String>,
        category: RideCategory,
        distance_miles: Option<u16>,
    ) -> Entity {
        let distance_miles = distance_miles.unwrap_or_else(|| self.random_distance());
        self.world
            .spawn((
                Driver {
                    name: name.into(),
                    category,
                    status: DriverStatus::Free,
                    distance_miles,
                },
                Radio::default(),
            ))
            .id()
    }

    /// Creates an idle passenger.
    pub fn spawn_passenger(
        &mut self,
        name: impl Into<String>,
        category: RideCategory,
        pickup: Location,
    ) -> Entity {
        self.world
            .spawn((
                Passenger {
                    name: name.into(),
                    category,
                    has_active_request: false,
                },
                Pickup(pickup),
            ))
            .id()
    }

    fn random_distance(&mut self) -> u16 {
        let max = self.world.resource::<DispatchConfig>().max_driver_distance_miles;
        self.world
            .resource_mut::<DispatchRng>()
            .0
            .gen_range(0..=max)
    }

    pub fn add_driver(&mut self, driver: Entity) -> DispatchResult {
        self.dispatch(Notice {
            subject: driver,
            action: DispatchAction::SignIn,
        })
    }

    pub fn remove_driver(&mut self, driver: Entity) -> DispatchResult {
        self.dispatch(Notice {
            subject: driver,
            action: DispatchAction::SignOff,
        })
    }

    pub fn notify(&mut self, passenger: Entity, kind: RequestKind) -> DispatchResult {
        self.dispatch(Notice {
            subject: passenger,
            action: kind.into(),
        })
    }

    /// Moves an assigned passenger's pickup and re-radios their driver. A passenger
    /// without a ride keeps the old pickup and gets `NoActiveRequest`.
    pub fn change_pickup(&mut self, passenger: Entity, location: Location) -> DispatchResult {
        if self.assigned_driver(passenger).is_some() {
            if let Some(mut pickup) = self.world.get_mut::<Pickup>(passenger) {
                pickup.0 = location;
            }
        }
        self.notify(passenger, RequestKind::LocationChange)
    }

    pub fn complete_trip(&mut self, driver: Entity) -> DispatchResult {
        self.dispatch(Notice {
            subject: driver,
            action: DispatchAction::TripCompleted,
        })
    }

    /// Signs off every free driver. Busy drivers stay registered and are returned
    /// in registry order.
    pub fn clear_registry(&mut self) -> Vec<Entity> {
        let entries = self.registry().to_vec();
        let mut retained = Vec::new();
        for driver in entries {
            if self.remove_driver(driver).is_err() && !retained.contains(&driver) {
                retained.push(driver);
            }
        }
        retained
    }

    fn dispatch(&mut self, notice: Notice) -> DispatchResult {
        let subject = self.name_of(notice.subject).unwrap_or("unknown").to_string();
        let _span = info_span!("dispatch", action = %notice.action, %subject).entered();

        self.world.insert_resource(CurrentNotice(notice));
        self.world.insert_resource(NoticeOutcome::default());
        self.schedule.run(&mut self.world);

        let result = self
            .world
            .resource_mut::<NoticeOutcome>()
            .0
            .take()
            .unwrap_or(Err(DispatchError::UnknownParticipant(notice.subject)));

        let now = self.world.resource::<SimulationClock>().now();
        self.world
            .resource_mut::<DispatchTelemetry>()
            .record(now, &subject, notice.action, &result);
        result
    }

    pub fn registry(&self) -> &[Entity] {
        self.world.resource::<DriverRegistry>().as_slice()
    }

    pub fn assignments(&self) -> &ActiveAssignments {
        self.world.resource::<ActiveAssignments>()
    }

    pub fn assigned_driver(&self, passenger: Entity) -> Option<Entity> {
        self.assignments().driver_for(passenger)
    }

    pub fn driver(&self, driver: Entity) -> Option<&Driver> {
        self.world.get::<Driver>(driver)
    }

    pub fn passenger(&self, passenger: Entity) -> Option<&Passenger> {
        self.world.get::<Passenger>(passenger)
    }

    pub fn pickup(&self, passenger: Entity) -> Option<&Location> {
        self.world.get::<Pickup>(passenger).map(|pickup| &pickup.0)
    }

    /// Instructions radioed to a driver so far, oldest first.
    pub fn radio_log(&self, driver: Entity) -> &[Location] {
        self.world
            .get::<Radio>(driver)
            .map(|radio| radio.instructions.as_slice())
            .unwrap_or(&[])
    }

    pub fn name_of(&self, entity: Entity) -> Option<&str> {
        if let Some(driver) = self.driver(entity) {
            return Some(&driver.name);
        }
        self.passenger(entity).map(|passenger| passenger.name.as_str())
    }

    pub fn telemetry(&self) -> &DispatchTelemetry {
        self.world.resource::<DispatchTelemetry>()
    }

    pub fn clock(&self) -> &SimulationClock {
        self.world.resource::<SimulationClock>()
    }

    pub fn clock_mut(&mut self) -> Mut<'_, SimulationClock> {
        self.world.resource_mut::<SimulationClock>()
    }

    pub fn config(&self) -> &DispatchConfig {
        self.world.resource::<DispatchConfig>()
    }

    pub fn counts(&self) -> DispatchCounts {
        let mut counts = DispatchCounts {
            registry_entries: self.registry().len(),
            active_assignments: self.assignments().len(),
            ..Default::default()
        };
        for entity in self.world.iter_entities() {
            if let Some(driver) = entity.get::<Driver>() {
                match driver.status {
                    DriverStatus::Free => counts.drivers_free += 1,
                    DriverStatus::Busy => counts.drivers_busy += 1,
                }
            }
            if let Some(passenger) = entity.get::<Passenger>() {
                if passenger.has_active_request {
                    counts.passengers_assigned += 1;
                } else {
                    counts.passengers_idle += 1;
                }
            }
        }
        counts
    }

    pub fn world(&self) -> &World {
        &self.world
    }
}
