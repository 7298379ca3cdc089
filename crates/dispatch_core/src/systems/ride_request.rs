use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::{info, warn};

use crate::ecs::{Driver, DriverStatus, Passenger, Pickup, Radio};
use crate::error::{DispatchError, DispatchOutcome};
use crate::matching::{Candidate, DriverSelectionResource};
use crate::notice::{CurrentNotice, DispatchAction, NoticeOutcome};
use crate::registry::{ActiveAssignments, DriverRegistry};

pub fn ride_request_system(
    notice: Res<CurrentNotice>,
    registry: Res<DriverRegistry>,
    selection: Res<DriverSelectionResource>,
    mut assignments: ResMut<ActiveAssignments>,
    mut outcome: ResMut<NoticeOutcome>,
    mut passengers: Query<(&mut Passenger, &Pickup)>,
    mut drivers: Query<(&mut Driver, &mut Radio)>,
) {
    let Some(passenger_entity) = notice.subject_for(DispatchAction::RideRequest) else {
        return;
    };
    let Ok((mut passenger, pickup)) = passengers.get_mut(passenger_entity) else {
        outcome.fail(DispatchError::UnknownParticipant(passenger_entity));
        return;
    };

    info!(
        passenger = %passenger.name,
        pickup = %pickup.0,
        category = %passenger.category,
        "new ride requested, looking for a driver"
    );

    if let Some(assigned) = assignments.driver_for(passenger_entity) {
        let driver = drivers
            .get(assigned)
            .map(|(driver, _)| driver.name.clone())
            .unwrap_or_default();
        warn!(passenger = %passenger.name, %driver, "ride already requested");
        outcome.fail(DispatchError::DuplicateRequest {
            passenger: passenger.name.clone(),
            driver,
        });
        return;
    }

    // Registry order is sign-in order; duplicate sign-ins appear more than once.
    let candidates: Vec<Candidate> = registry
        .iter()
        .filter_map(|entity| {
            drivers.get(entity).ok().map(|(driver, _)| Candidate {
                driver: entity,
                category: driver.category,
                free: driver.is_free(),
                distance_miles: driver.distance_miles,
            })
        })
        .collect();

    let Some(driver_entity) = selection.select(passenger.category, &candidates) else {
        info!(passenger = %passenger.name, "hang in there, we are still looking");
        outcome.fail(DispatchError::NoMatchFound {
            passenger: passenger.name.clone(),
            category: passenger.category,
        });
        return;
    };
    let Ok((mut driver, mut radio)) = drivers.get_mut(driver_entity) else {
        outcome.fail(DispatchError::UnknownParticipant(driver_entity));
        return;
    };

    if !assignments.assign(passenger_entity, driver_entity) {
        warn!(passenger = %passenger.name, "assignment already exists, leaving driver free");
        let driver = assignments
            .driver_for(passenger_entity)
            .and_then(|assigned| drivers.get(assigned).ok())
            .map(|(driver, _)| driver.name.clone())
            .unwrap_or_default();
        outcome.fail(DispatchError::DuplicateRequest {
            passenger: passenger.name.clone(),
            driver,
        });
        return;
    }
    driver.status = DriverStatus::Busy;
    passenger.has_active_request = true;
    radio.instructions.push(pickup.0.clone());

    info!(
        driver = %driver.name,
        passenger = %passenger.name,
        pickup = %pickup.0,
        distance_miles = driver.distance_miles,
        policy = selection.name(),
        "driver assigned"
    );
    info!(driver = %driver.name, "radio: move to {} to get the passenger", pickup.0);

    outcome.set(Ok(DispatchOutcome::DriverAssigned {
        driver: driver_entity,
        driver_name: driver.name.clone(),
        distance_miles: driver.distance_miles,
        pickup: pickup.0.clone(),
    }));
}
