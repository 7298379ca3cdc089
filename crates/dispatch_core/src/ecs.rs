use bevy_ecs::prelude::Component;
use serde::Serialize;

use crate::ride::{Location, RideCategory};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    Free,
    Busy,
}

#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct Driver {
    pub name: String,
    pub category: RideCategory,
    pub status: DriverStatus,
    /// Miles from the dispatch target, fixed when the driver joins.
    pub distance_miles: u16,
}

impl Driver {
    pub fn is_free(&self) -> bool {
        self.status == DriverStatus::Free
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct Passenger {
    pub name: String,
    pub category: RideCategory,
    /// True while the passenger holds an assignment.
    pub has_active_request: bool,
}

/// Where the passenger wants to be picked up.
#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct Pickup(pub Location);

/// "Go to location" instructions a driver has received, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Component)]
pub struct Radio {
    pub instructions: Vec<Location>,
}
