//! Driver sign-in and sign-off.

use bevy_ecs::prelude::{Query, Res, ResMut};
use tracing::{info, warn};

use crate::ecs::Driver;
use crate::error::{DispatchError, DispatchOutcome};
use crate::notice::{CurrentNotice, DispatchAction, NoticeOutcome};
use crate::registry::DriverRegistry;

/// Appends the driver to the registry. Signing in twice adds a second entry.
pub fn driver_sign_in_system(
    notice: Res<CurrentNotice>,
    mut registry: ResMut<DriverRegistry>,
    mut outcome: ResMut<NoticeOutcome>,
    drivers: Query<&Driver>,
) {
    let Some(driver_entity) = notice.subject_for(DispatchAction::SignIn) else {
        return;
    };
    let Ok(driver) = drivers.get(driver_entity) else {
        outcome.fail(DispatchError::UnknownParticipant(driver_entity));
        return;
    };

    let existing = registry.entries_for(driver_entity);
    if existing > 0 {
        warn!(
            driver = %driver.name,
            entries = existing + 1,
            "driver already signed in, adding another registry entry"
        );
    }
    registry.push(driver_entity);
    info!(
        driver = %driver.name,
        category = %driver.category,
        registered = registry.len(),
        "new driver signed in"
    );

    outcome.set(Ok(DispatchOutcome::DriverSignedIn {
        registered: registry.len(),
    }));
}

/// Removes one registry entry for a free driver; busy drivers stay put.
pub fn driver_sign_off_system(
    notice: Res<CurrentNotice>,
    mut registry: ResMut<DriverRegistry>,
    mut outcome: ResMut<NoticeOutcome>,
    drivers: Query<&Driver>,
) {
    let Some(driver_entity) = notice.subject_for(DispatchAction::SignOff) else {
        return;
    };
    let Ok(driver) = drivers.get(driver_entity) else {
        outcome.fail(DispatchError::UnknownParticipant(driver_entity));
        return;
    };

    if !driver.is_free() {
        warn!(driver = %driver.name, "cannot remove driver with unhandled job");
        outcome.fail(DispatchError::DriverBusy {
            driver: driver.name.clone(),
        });
        return;
    }

    let was_registered = registry.remove_one(driver_entity);
    if was_registered {
        info!(driver = %driver.name, "driver removed from active drivers, see you soon");
    } else {
        warn!(driver = %driver.name, "driver was not signed in");
    }

    outcome.set(Ok(DispatchOutcome::DriverSignedOff { was_registered }));
}
