//! Telemetry: per-outcome counters and an ordered log of every mediator call.

use bevy_ecs::prelude::Resource;
use serde::Serialize;

use crate::error::{DispatchError, DispatchOutcome, DispatchResult};
use crate::notice::DispatchAction;

/// One handled notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DispatchRecord {
    pub timestamp_ms: u64,
    pub subject: String,
    pub action: DispatchAction,
    pub accepted: bool,
    /// Outcome or error code, e.g. `driver_assigned` or `no_match_found`.
    pub result: String,
    pub detail: String,
}

/// Collects dispatch telemetry. Inserted as a resource by the mediator.
#[derive(Debug, Clone, Default, Serialize, Resource)]
pub struct DispatchTelemetry {
    pub rides_assigned: u64,
    pub rides_cancelled: u64,
    pub pickups_changed: u64,
    pub trips_completed: u64,
    pub sign_ins: u64,
    pub sign_offs: u64,
    pub no_match_found: u64,
    pub duplicate_requests: u64,
    pub no_active_request: u64,
    pub sign_offs_rejected: u64,
    pub records: Vec<DispatchRecord>,
}

impl DispatchTelemetry {
    pub fn record(
        &mut self,
        timestamp_ms: u64,
        subject: &str,
        action: DispatchAction,
        result: &DispatchResult,
    ) {
        match result {
            Ok(outcome) => self.count_outcome(outcome),
            Err(error) => self.count_error(error),
        }
        let (accepted, code, detail) = match result {
            Ok(outcome) => (true, outcome.code(), outcome.to_string()),
            Err(error) => (false, error.code(), error.to_string()),
        };
        self.records.push(DispatchRecord {
            timestamp_ms,
            subject: subject.to_string(),
            action,
            accepted,
            result: code.to_string(),
            detail,
        });
    }

    fn count_outcome(&mut self, outcome: &DispatchOutcome) {
        let counter = match outcome {
            DispatchOutcome::DriverAssigned { .. } => &mut self.rides_assigned,
            DispatchOutcome::RideCancelled { .. } => &mut self.rides_cancelled,
            DispatchOutcome::PickupChanged { .. } => &mut self.pickups_changed,
            DispatchOutcome::TripCompleted { .. } => &mut self.trips_completed,
            DispatchOutcome::DriverSignedIn { .. } => &mut self.sign_ins,
            DispatchOutcome::DriverSignedOff { .. } => &mut self.sign_offs,
        };
        *counter = counter.saturating_add(1);
    }

    fn count_error(&mut self, error: &DispatchError) {
        let counter = match error {
            DispatchError::NoMatchFound { .. } => &mut self.no_match_found,
            DispatchError::DuplicateRequest { .. } => &mut self.duplicate_requests,
            DispatchError::NoActiveRequest { .. } => &mut self.no_active_request,
            DispatchError::DriverBusy { .. } => &mut self.sign_offs_rejected,
            // Not a dispatch decision; only the log keeps these.
            DispatchError::UnknownParticipant(_)
            | DispatchError::MediatorUnavailable
            | DispatchError::MediatorBusy => return,
        };
        *counter = counter.saturating_add(1);
    }

    pub fn rejected(&self) -> usize {
        self.records.iter().filter(|record| !record.accepted).count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Aggregated participant counts at a point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DispatchCounts {
    pub registry_entries: usize,
    pub drivers_free: usize,
    pub drivers_busy: usize,
    pub passengers_idle: usize,
    pub passengers_assigned: usize,
    pub active_assignments: usize,
}
