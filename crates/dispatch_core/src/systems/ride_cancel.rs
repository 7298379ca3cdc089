use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::{info, warn};

use crate::ecs::{Driver, DriverStatus, Passenger, Pickup};
use crate::error::{DispatchError, DispatchOutcome};
use crate::notice::{CurrentNotice, DispatchAction, NoticeOutcome};
use crate::registry::ActiveAssignments;

pub fn ride_cancel_system(
    notice: Res<CurrentNotice>,
    mut assignments: ResMut<ActiveAssignments>,
    mut outcome: ResMut<NoticeOutcome>,
    mut passengers: Query<(&mut Passenger, &Pickup)>,
    mut drivers: Query<&mut Driver>,
) {
    let Some(passenger_entity) = notice.subject_for(DispatchAction::RideCancel) else {
        return;
    };
    let Ok((mut passenger, pickup)) = passengers.get_mut(passenger_entity) else {
        outcome.fail(DispatchError::UnknownParticipant(passenger_entity));
        return;
    };

    let Some(driver_entity) = assignments.release(passenger_entity) else {
        warn!(passenger = %passenger.name, "no ride to cancel");
        outcome.fail(DispatchError::no_active_request(passenger.name.clone()));
        return;
    };

    passenger.has_active_request = false;
    let driver_name = match drivers.get_mut(driver_entity) {
        Ok(mut driver) => {
            driver.status = DriverStatus::Free;
            driver.name.clone()
        }
        Err(_) => String::new(),
    };

    info!(
        passenger = %passenger.name,
        pickup = %pickup.0,
        driver = %driver_name,
        category = %passenger.category,
        "ride cancelled, driver freed and ready for new dispatch"
    );

    outcome.set(Ok(DispatchOutcome::RideCancelled {
        driver: driver_entity,
        driver_name,
    }));
}
