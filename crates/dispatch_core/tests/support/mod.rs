#![allow(dead_code)]

use bevy_ecs::prelude::Entity;
use dispatch_core::mediator::DispatchMediator;
use dispatch_core::ride::{Location, RideCategory};
use dispatch_core::test_helpers::{create_test_mediator, signed_in_driver, test_pickup};
use dispatch_core::validate::validate_dispatch_state;

/// Builder for driver fixtures.
#[derive(Clone, Debug)]
pub struct DriverBuilder {
    name: String,
    category: RideCategory,
    distance_miles: u16,
    signed_in: bool,
}

impl Default for DriverBuilder {
    fn default() -> Self {
        Self {
            name: "John".to_string(),
            category: RideCategory::GeneralPurpose,
            distance_miles: 5,
            signed_in: true,
        }
    }
}

impl DriverBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: RideCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_distance(mut self, distance_miles: u16) -> Self {
        self.distance_miles = distance_miles;
        self
    }

    pub fn signed_out(mut self) -> Self {
        self.signed_in = false;
        self
    }

    /// Spawn the driver fixture into the provided mediator.
    pub fn spawn(self, mediator: &mut DispatchMediator) -> Entity {
        if self.signed_in {
            return signed_in_driver(mediator, &self.name, self.category, self.distance_miles);
        }
        mediator.spawn_driver(self.name, self.category, Some(self.distance_miles))
    }
}

/// Builder for passenger fixtures.
#[derive(Clone, Debug)]
pub struct PassengerBuilder {
    name: String,
    category: RideCategory,
    pickup: Location,
}

impl Default for PassengerBuilder {
    fn default() -> Self {
        Self {
            name: "Fyodor".to_string(),
            category: RideCategory::GeneralPurpose,
            pickup: test_pickup(),
        }
    }
}

impl PassengerBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_category(mut self, category: RideCategory) -> Self {
        self.category = category;
        self
    }

    pub fn with_pickup(mut self, pickup: &str) -> Self {
        self.pickup = Location::new(pickup);
        self
    }

    pub fn spawn(self, mediator: &mut DispatchMediator) -> Entity {
        mediator.spawn_passenger(self.name, self.category, self.pickup)
    }
}

pub fn mediator() -> DispatchMediator {
    create_test_mediator()
}

/// Fails the test with every violation listed.
pub fn assert_consistent(mediator: &DispatchMediator) {
    let violations = validate_dispatch_state(mediator);
    assert!(
        violations.is_empty(),
        "dispatch state inconsistent:\n{}",
        violations.join("\n")
    );
}
