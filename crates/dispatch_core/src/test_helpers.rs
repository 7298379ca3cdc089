//! Test helpers for common test setup and utilities.
//!
//! This module provides shared test utilities to reduce duplication across test files.

use bevy_ecs::prelude::Entity;

use crate::mediator::DispatchMediator;
use crate::ride::{Location, RideCategory};
use crate::scenario::DispatchConfig;

/// A standard pickup address used across test files for consistency.
pub const TEST_PICKUP: &str = "Main St. 52";

/// A second address for pickup changes.
pub const TEST_OTHER_PICKUP: &str = "Harbor Rd. 7";

pub fn test_pickup() -> Location {
    Location::new(TEST_PICKUP)
}

pub fn test_other_pickup() -> Location {
    Location::new(TEST_OTHER_PICKUP)
}

/// Create a mediator with a fixed seed and the default selection policy.
pub fn create_test_mediator() -> DispatchMediator {
    DispatchMediator::new(DispatchConfig {
        seed: 42,
        ..Default::default()
    })
}

/// Spawn a driver at a fixed distance and sign them in.
///
/// # Panics
///
/// Panics if the sign-in is rejected (should never happen for a fresh driver).
pub fn signed_in_driver(
    mediator: &mut DispatchMediator,
    name: &str,
    category: RideCategory,
    distance_miles: u16,
) -> Entity {
    let driver = mediator.spawn_driver(name, category, Some(distance_miles));
    mediator
        .add_driver(driver)
        .expect("fresh driver should sign in");
    driver
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_in_driver_is_registered_and_free() {
        let mut mediator = create_test_mediator();
        let driver = signed_in_driver(&mut mediator, "John", RideCategory::GeneralPurpose, 3);
        assert_eq!(mediator.registry(), &[driver]);
        assert!(mediator.driver(driver).expect("driver").is_free());
    }

    #[test]
    fn test_pickups_differ() {
        assert_ne!(test_pickup(), test_other_pickup());
    }
}
