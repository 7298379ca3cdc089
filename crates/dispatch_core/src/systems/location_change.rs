use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::{info, warn};

use crate::ecs::{Driver, Passenger, Pickup, Radio};
use crate::error::{DispatchError, DispatchOutcome};
use crate::notice::{CurrentNotice, DispatchAction, NoticeOutcome};
use crate::registry::ActiveAssignments;

/// Re-radios the assigned driver with the passenger's current pickup.
/// The assignment itself is left as is.
pub fn location_change_system(
    notice: Res<CurrentNotice>,
    assignments: Res<ActiveAssignments>,
    mut outcome: ResMut<NoticeOutcome>,
    passengers: Query<(&Passenger, &Pickup)>,
    mut drivers: Query<(&Driver, &mut Radio)>,
) {
    let Some(passenger_entity) = notice.subject_for(DispatchAction::LocationChange) else {
        return;
    };
    let Ok((passenger, pickup)) = passengers.get(passenger_entity) else {
        outcome.fail(DispatchError::UnknownParticipant(passenger_entity));
        return;
    };
    let Some(driver_entity) = assignments.driver_for(passenger_entity) else {
        warn!(passenger = %passenger.name, "no ride was requested");
        outcome.fail(DispatchError::no_active_request(passenger.name.clone()));
        return;
    };
    let Ok((driver, mut radio)) = drivers.get_mut(driver_entity) else {
        outcome.fail(DispatchError::UnknownParticipant(driver_entity));
        return;
    };

    radio.instructions.push(pickup.0.clone());
    info!(
        passenger = %passenger.name,
        pickup = %pickup.0,
        driver = %driver.name,
        category = %passenger.category,
        "pickup changed, redirecting driver"
    );
    info!(driver = %driver.name, "radio: move to {} to get the passenger", pickup.0);

    outcome.set(Ok(DispatchOutcome::PickupChanged {
        driver: driver_entity,
        driver_name: driver.name.clone(),
        pickup: pickup.0.clone(),
    }));
}
