use bevy_ecs::prelude::Entity;

use crate::ride::RideCategory;

/// One registry entry as seen by a selection policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub driver: Entity,
    pub category: RideCategory,
    pub free: bool,
    pub distance_miles: u16,
}

impl Candidate {
    /// Free and specialized in something the passenger accepts.
    pub fn is_eligible_for(&self, passenger: RideCategory) -> bool {
        self.free && passenger.accepts(self.category)
    }
}

/// Policy the mediator uses to pick a driver for a ride request.
///
/// Candidates arrive in registry (sign-in) order. A driver signed in twice shows up
/// twice; policies only ever return one of the listed drivers.
///
/// # Examples
///
/// ```rust
/// use bevy_ecs::prelude::Entity;
/// use dispatch_core::matching::{Candidate, DriverSelection, FirstEligible};
/// use dispatch_core::ride::RideCategory;
///
/// let candidates = [Candidate {
///     driver: Entity::from_raw(1),
///     category: RideCategory::PetFriendly,
///     free: true,
///     distance_miles: 4,
/// }];
/// let picked = FirstEligible.select(RideCategory::PetFriendly, &candidates);
/// assert_eq!(picked, Some(Entity::from_raw(1)));
/// ```
pub trait DriverSelection: Send + Sync {
    /// Returns the chosen driver, or `None` when no candidate is eligible.
    fn select(&self, passenger: RideCategory, candidates: &[Candidate]) -> Option<Entity>;

    /// Policy name for logs.
    fn name(&self) -> &'static str;
}
