//! The notification currently being handled by the dispatch schedule.
//!
//! The mediator inserts [CurrentNotice], runs the schedule once, and takes the
//! result the matching system left in [NoticeOutcome].

use std::fmt;

use bevy_ecs::prelude::{Entity, Resource};
use serde::Serialize;

use crate::error::{DispatchError, DispatchResult};
use crate::ride::RequestKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchAction {
    RideRequest,
    RideCancel,
    LocationChange,
    SignIn,
    SignOff,
    TripCompleted,
}

impl From<RequestKind> for DispatchAction {
    fn from(kind: RequestKind) -> Self {
        match kind {
            RequestKind::LocationChange => DispatchAction::LocationChange,
            RequestKind::RideRequest => DispatchAction::RideRequest,
            RequestKind::RideCancel => DispatchAction::RideCancel,
        }
    }
}

impl fmt::Display for DispatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DispatchAction::RideRequest => "ride request",
            DispatchAction::RideCancel => "ride cancel",
            DispatchAction::LocationChange => "location change",
            DispatchAction::SignIn => "sign in",
            DispatchAction::SignOff => "sign off",
            DispatchAction::TripCompleted => "trip completed",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Notice {
    pub subject: Entity,
    pub action: DispatchAction,
}

#[derive(Debug, Clone, Copy, Resource)]
pub struct CurrentNotice(pub Notice);

impl CurrentNotice {
    /// Subject of the notice when it carries `action`.
    pub fn subject_for(&self, action: DispatchAction) -> Option<Entity> {
        (self.0.action == action).then_some(self.0.subject)
    }
}

#[derive(Debug, Default, Resource)]
pub struct NoticeOutcome(pub Option<DispatchResult>);

impl NoticeOutcome {
    pub fn set(&mut self, result: DispatchResult) {
        self.0 = Some(result);
    }

    pub fn fail(&mut self, error: DispatchError) {
        self.0 = Some(Err(error));
    }
}
