pub mod algorithm;
pub mod first_eligible;
pub mod nearest_eligible;

use bevy_ecs::prelude::Resource;

pub use algorithm::{Candidate, DriverSelection};
pub use first_eligible::FirstEligible;
pub use nearest_eligible::NearestEligible;

/// Resource wrapper for the driver selection trait object.
#[derive(Resource)]
pub struct DriverSelectionResource(pub Box<dyn DriverSelection>);

impl DriverSelectionResource {
    pub fn new(selection: Box<dyn DriverSelection>) -> Self {
        Self(selection)
    }
}

impl std::ops::Deref for DriverSelectionResource {
    type Target = dyn DriverSelection;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}
