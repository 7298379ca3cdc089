pub mod driver_roster;
pub mod location_change;
pub mod ride_cancel;
pub mod ride_request;
pub mod trip_completed;

use bevy_ecs::prelude::Schedule;
use bevy_ecs::schedule::IntoSystemConfigs;

use driver_roster::{driver_sign_in_system, driver_sign_off_system};
use location_change::location_change_system;
use ride_cancel::ride_cancel_system;
use ride_request::ride_request_system;
use trip_completed::trip_completed_system;

/// Schedule run once per notice. Every system returns early unless the current
/// notice carries its action, so exactly one of them does work per run.
pub fn dispatch_schedule() -> Schedule {
    let mut schedule = Schedule::default();
    schedule.add_systems(
        (
            driver_sign_in_system,
            driver_sign_off_system,
            ride_request_system,
            ride_cancel_system,
            location_change_system,
            trip_completed_system,
        )
            .chain(),
    );
    schedule
}
