use bevy_ecs::prelude::Entity;

use crate::ride::RideCategory;

use super::algorithm::{Candidate, DriverSelection};

/// First eligible driver in sign-in order.
///
/// This is the default dispatch rule: walk the registry front to back and hand the
/// ride to the first free driver whose specialization the passenger accepts. Distance
/// is ignored, which keeps the outcome predictable for a given sign-in order.
#[derive(Debug, Default, Clone, Copy)]
pub struct FirstEligible;

impl DriverSelection for FirstEligible {
    fn select(&self, passenger: RideCategory, candidates: &[Candidate]) -> Option<Entity> {
        candidates
            .iter()
            .find(|candidate| candidate.is_eligible_for(passenger))
            .map(|candidate| candidate.driver)
    }

    fn name(&self) -> &'static str {
        "first_eligible"
    }
}
