//! Dispatch outcomes and the errors reported back to passengers and drivers.
//!
//! None of these errors are fatal: the mediator leaves its registry and
//! assignment table untouched whenever it reports one.

use std::fmt;

use bevy_ecs::prelude::Entity;
use thiserror::Error;

use crate::ride::{Location, RideCategory};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("no free {category} driver for {passenger}, still looking")]
    NoMatchFound {
        passenger: String,
        category: RideCategory,
    },
    #[error("{passenger} already has a ride with {driver}")]
    DuplicateRequest { passenger: String, driver: String },
    #[error("{participant} has no active ride")]
    NoActiveRequest { participant: String },
    #[error("cannot sign off {driver} while a job is unhandled")]
    DriverBusy { driver: String },
    #[error("entity {0:?} is not a participant of this mediator")]
    UnknownParticipant(Entity),
    #[error("dispatch mediator is no longer available")]
    MediatorUnavailable,
    #[error("dispatch mediator is already borrowed by the host")]
    MediatorBusy,
}

impl DispatchError {
    pub fn no_active_request(participant: impl Into<String>) -> Self {
        Self::NoActiveRequest {
            participant: participant.into(),
        }
    }

    /// Short, stable label for telemetry export.
    pub fn code(&self) -> &'static str {
        match self {
            DispatchError::NoMatchFound { .. } => "no_match_found",
            DispatchError::DuplicateRequest { .. } => "duplicate_request",
            DispatchError::NoActiveRequest { .. } => "no_active_request",
            DispatchError::DriverBusy { .. } => "driver_busy",
            DispatchError::UnknownParticipant(_) => "unknown_participant",
            DispatchError::MediatorUnavailable => "mediator_unavailable",
            DispatchError::MediatorBusy => "mediator_busy",
        }
    }
}

/// Successful result of a mediator call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    DriverAssigned {
        driver: Entity,
        driver_name: String,
        distance_miles: u16,
        pickup: Location,
    },
    RideCancelled {
        driver: Entity,
        driver_name: String,
    },
    PickupChanged {
        driver: Entity,
        driver_name: String,
        pickup: Location,
    },
    TripCompleted {
        passenger: Entity,
        passenger_name: String,
    },
    DriverSignedIn {
        registered: usize,
    },
    /// `was_registered` is false when the driver had already left the registry.
    DriverSignedOff {
        was_registered: bool,
    },
}

impl DispatchOutcome {
    pub fn code(&self) -> &'static str {
        match self {
            DispatchOutcome::DriverAssigned { .. } => "driver_assigned",
            DispatchOutcome::RideCancelled { .. } => "ride_cancelled",
            DispatchOutcome::PickupChanged { .. } => "pickup_changed",
            DispatchOutcome::TripCompleted { .. } => "trip_completed",
            DispatchOutcome::DriverSignedIn { .. } => "driver_signed_in",
            DispatchOutcome::DriverSignedOff { .. } => "driver_signed_off",
        }
    }

    /// Driver the outcome refers to, if any.
    pub fn driver(&self) -> Option<Entity> {
        match self {
            DispatchOutcome::DriverAssigned { driver, .. }
            | DispatchOutcome::RideCancelled { driver, .. }
            | DispatchOutcome::PickupChanged { driver, .. } => Some(*driver),
            _ => None,
        }
    }
}

impl fmt::Display for DispatchOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchOutcome::DriverAssigned {
                driver_name,
                distance_miles,
                pickup,
                ..
            } => write!(
                f,
                "driver {driver_name} assigned, {distance_miles} miles away, pickup at {pickup}"
            ),
            DispatchOutcome::RideCancelled { driver_name, .. } => {
                write!(f, "ride cancelled, driver {driver_name} free to dispatch again")
            }
            DispatchOutcome::PickupChanged {
                driver_name,
                pickup,
                ..
            } => write!(f, "driver {driver_name} redirected to {pickup}"),
            DispatchOutcome::TripCompleted { passenger_name, .. } => {
                write!(f, "trip with {passenger_name} completed")
            }
            DispatchOutcome::DriverSignedIn { registered } => {
                write!(f, "driver signed in, {registered} registry entries")
            }
            DispatchOutcome::DriverSignedOff { was_registered: true } => {
                f.write_str("driver signed off")
            }
            DispatchOutcome::DriverSignedOff {
                was_registered: false,
            } => f.write_str("driver was not signed in"),
        }
    }
}

pub type DispatchResult<T = DispatchOutcome> = Result<T, DispatchError>;
