use bevy_ecs::prelude::Entity;

use crate::ride::RideCategory;

use super::algorithm::{Candidate, DriverSelection};

/// Closest eligible driver by distance from the dispatch target.
/// Ties go to the driver that signed in first.
#[derive(Debug, Default, Clone, Copy)]
pub struct NearestEligible;

impl DriverSelection for NearestEligible {
    fn select(&self, passenger: RideCategory, candidates: &[Candidate]) -> Option<Entity> {
        let mut best: Option<&Candidate> = None;
        for candidate in candidates {
            if !candidate.is_eligible_for(passenger) {
                continue;
            }
            // Strict comparison keeps the earlier registry entry on ties.
            if best.map_or(true, |current| candidate.distance_miles < current.distance_miles) {
                best = Some(candidate);
            }
        }
        best.map(|candidate| candidate.driver)
    }

    fn name(&self) -> &'static str {
        "nearest_eligible"
    }
}
