use std::collections::HashSet;

use crate::ecs::{Driver, DriverStatus, Passenger};
use crate::mediator::DispatchMediator;

/// Checks the registry/assignment invariants against participant state:
/// every assigned driver is busy and serves a single passenger, every busy driver is
/// assigned, and a passenger's request flag matches the assignment table.
/// Returns one message per violation; an empty list means the state is consistent.
pub fn validate_dispatch_state(mediator: &DispatchMediator) -> Vec<String> {
    let mut violations = Vec::new();
    let assignments = mediator.assignments();

    let mut assigned_drivers = HashSet::new();
    for (passenger, driver) in assignments.iter() {
        if !assigned_drivers.insert(driver) {
            violations.push(format!(
                "Driver {}: assigned to more than one passenger",
                driver.to_bits()
            ));
        }
        match mediator.driver(driver) {
            Some(state) if state.status == DriverStatus::Busy => {}
            Some(state) => violations.push(format!(
                "Driver {} ({}): assigned to passenger {} but marked free",
                driver.to_bits(),
                state.name,
                passenger.to_bits()
            )),
            None => violations.push(format!(
                "Passenger {}: assigned to missing driver {}",
                passenger.to_bits(),
                driver.to_bits()
            )),
        }
    }

    for entity in mediator.world().iter_entities() {
        if let Some(driver) = entity.get::<Driver>() {
            if driver.status == DriverStatus::Busy && !assigned_drivers.contains(&entity.id()) {
                violations.push(format!(
                    "Driver {} ({}): busy without an assignment",
                    entity.id().to_bits(),
                    driver.name
                ));
            }
        }
        if let Some(passenger) = entity.get::<Passenger>() {
            let assigned = assignments.driver_for(entity.id()).is_some();
            if passenger.has_active_request != assigned {
                violations.push(format!(
                    "Passenger {} ({}): has_active_request={} but assigned={}",
                    entity.id().to_bits(),
                    passenger.name,
                    passenger.has_active_request,
                    assigned
                ));
            }
        }
    }

    for driver in mediator.registry() {
        if mediator.driver(*driver).is_none() {
            violations.push(format!(
                "Registry entry {}: not a driver",
                driver.to_bits()
            ));
        }
    }

    violations
}
