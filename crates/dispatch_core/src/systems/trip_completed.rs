use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::{info, warn};

use crate::ecs::{Driver, DriverStatus, Passenger};
use crate::error::{DispatchError, DispatchOutcome};
use crate::notice::{CurrentNotice, DispatchAction, NoticeOutcome};
use crate::registry::ActiveAssignments;

/// A busy driver reports the job done: the pairing is dropped and both sides go idle.
pub fn trip_completed_system(
    notice: Res<CurrentNotice>,
    mut assignments: ResMut<ActiveAssignments>,
    mut outcome: ResMut<NoticeOutcome>,
    mut drivers: Query<&mut Driver>,
    mut passengers: Query<&mut Passenger>,
) {
    let Some(driver_entity) = notice.subject_for(DispatchAction::TripCompleted) else {
        return;
    };
    let Ok(mut driver) = drivers.get_mut(driver_entity) else {
        outcome.fail(DispatchError::UnknownParticipant(driver_entity));
        return;
    };
    let Some(passenger_entity) = assignments.passenger_for(driver_entity) else {
        warn!(driver = %driver.name, "no job to complete");
        outcome.fail(DispatchError::no_active_request(driver.name.clone()));
        return;
    };

    assignments.release(passenger_entity);
    driver.status = DriverStatus::Free;
    let passenger_name = match passengers.get_mut(passenger_entity) {
        Ok(mut passenger) => {
            passenger.has_active_request = false;
            passenger.name.clone()
        }
        Err(_) => String::new(),
    };

    info!(
        driver = %driver.name,
        passenger = %passenger_name,
        "trip completed, driver free to dispatch again"
    );

    outcome.set(Ok(DispatchOutcome::TripCompleted {
        passenger: passenger_entity,
        passenger_name,
    }));
}
