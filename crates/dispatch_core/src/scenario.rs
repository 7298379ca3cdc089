//! Scenario setup: dispatch configuration, random participant/action generation,
//! and the scripted narrated demo.
//!
//! Random scenarios sign every driver in at time zero and spread passenger and
//! driver actions uniformly over a configurable window. The same seed always
//! produces the same participants, distances and action sequence.

use std::path::{Path, PathBuf};

use bevy_ecs::prelude::{Entity, Resource};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::clock::{ScheduledAction, ONE_MIN_MS};
use crate::matching::{DriverSelectionResource, FirstEligible, NearestEligible};
use crate::ride::{Location, RideCategory};
use crate::runner::Simulation;

/// Drivers are generated between 0 and this many miles from the dispatch target.
pub const MAX_DRIVER_DISTANCE_MILES: u16 = 15;

/// Default window over which random actions are spread: 2 hours (simulation ms).
const DEFAULT_ACTION_WINDOW_MS: u64 = 2 * 60 * ONE_MIN_MS;

/// Offset between the distance RNG and the action RNG so they never share a stream.
const ACTION_SEED_OFFSET: u64 = 0x5eed;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SelectionPolicy {
    #[default]
    FirstEligible,
    NearestEligible,
}

impl SelectionPolicy {
    pub fn create(self) -> DriverSelectionResource {
        match self {
            SelectionPolicy::FirstEligible => DriverSelectionResource::new(Box::new(FirstEligible)),
            SelectionPolicy::NearestEligible => {
                DriverSelectionResource::new(Box::new(NearestEligible))
            }
        }
    }
}

/// Mediator settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Resource)]
#[serde(default)]
pub struct DispatchConfig {
    /// Seed for driver distances and random scenario actions.
    pub seed: u64,
    pub max_driver_distance_miles: u16,
    pub selection: SelectionPolicy,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            max_driver_distance_miles: MAX_DRIVER_DISTANCE_MILES,
            selection: SelectionPolicy::default(),
        }
    }
}

/// Participant count per ride category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CategoryCounts {
    pub general_purpose: usize,
    pub women_for_women: usize,
    pub pet_friendly: usize,
}

impl CategoryCounts {
    pub fn new(general_purpose: usize, women_for_women: usize, pet_friendly: usize) -> Self {
        Self {
            general_purpose,
            women_for_women,
            pet_friendly,
        }
    }

    pub fn get(&self, category: RideCategory) -> usize {
        match category {
            RideCategory::GeneralPurpose => self.general_purpose,
            RideCategory::WomenForWomen => self.women_for_women,
            RideCategory::PetFriendly => self.pet_friendly,
        }
    }

    fn get_mut(&mut self, category: RideCategory) -> &mut usize {
        match category {
            RideCategory::GeneralPurpose => &mut self.general_purpose,
            RideCategory::WomenForWomen => &mut self.women_for_women,
            RideCategory::PetFriendly => &mut self.pet_friendly,
        }
    }

    pub fn total(&self) -> usize {
        self.general_purpose + self.women_for_women + self.pet_friendly
    }

    pub fn iter(&self) -> impl Iterator<Item = (RideCategory, usize)> + '_ {
        RideCategory::ALL
            .into_iter()
            .map(|category| (category, self.get(category)))
    }
}

#[derive(Error, Debug)]
pub enum ScenarioError {
    #[error("failed to read scenario file {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid scenario JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid scenario: {0}")]
    Invalid(String),
}

/// Parameters for building a random scenario.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScenarioParams {
    pub dispatch: DispatchConfig,
    pub drivers: CategoryCounts,
    pub passengers: CategoryCounts,
    /// Pool of pickup addresses passengers start at and move between.
    pub pickup_locations: Vec<String>,
    pub num_actions: usize,
    pub action_window_ms: u64,
}

impl Default for ScenarioParams {
    fn default() -> Self {
        Self {
            dispatch: DispatchConfig::default(),
            drivers: CategoryCounts::new(4, 2, 2),
            passengers: CategoryCounts::new(6, 2, 2),
            pickup_locations: [
                "Main St. 52",
                "Industrial St. 23",
                "Russian St. 1",
                "Frog Ave. 13B",
                "Harbor Rd. 7",
                "Station Sq. 2",
            ]
            .into_iter()
            .map(String::from)
            .collect(),
            num_actions: 200,
            action_window_ms: DEFAULT_ACTION_WINDOW_MS,
        }
    }
}

impl ScenarioParams {
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.dispatch.seed = seed;
        self
    }

    pub fn with_selection(mut self, selection: SelectionPolicy) -> Self {
        self.dispatch.selection = selection;
        self
    }

    pub fn with_drivers(mut self, category: RideCategory, count: usize) -> Self {
        *self.drivers.get_mut(category) = count;
        self
    }

    pub fn with_passengers(mut self, category: RideCategory, count: usize) -> Self {
        *self.passengers.get_mut(category) = count;
        self
    }

    pub fn with_num_actions(mut self, num_actions: usize) -> Self {
        self.num_actions = num_actions;
        self
    }

    pub fn with_action_window_mins(mut self, minutes: u64) -> Self {
        self.action_window_ms = minutes.saturating_mul(ONE_MIN_MS);
        self
    }

    pub fn with_pickup_locations<I, S>(mut self, locations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.pickup_locations = locations.into_iter().map(Into::into).collect();
        self
    }

    pub fn from_json_str(json: &str) -> Result<Self, ScenarioError> {
        let params: Self = serde_json::from_str(json)?;
        params.validate()?;
        Ok(params)
    }

    pub fn from_json_path(path: impl AsRef<Path>) -> Result<Self, ScenarioError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.passengers.total() > 0 && self.pickup_locations.is_empty() {
            return Err(ScenarioError::Invalid(
                "pickup_locations must not be empty when passengers are configured".to_string(),
            ));
        }
        if self.num_actions > 0 {
            if self.action_window_ms == 0 {
                return Err(ScenarioError::Invalid(
                    "action_window_ms must be positive when actions are generated".to_string(),
                ));
            }
            if self.drivers.total() + self.passengers.total() == 0 {
                return Err(ScenarioError::Invalid(
                    "actions need at least one driver or passenger".to_string(),
                ));
            }
        }
        Ok(())
    }
}

fn short_label(category: RideCategory) -> &'static str {
    match category {
        RideCategory::GeneralPurpose => "casual",
        RideCategory::WomenForWomen => "wfw",
        RideCategory::PetFriendly => "pet",
    }
}

/// Builds participants and schedules the random action sequence.
pub fn build_scenario(params: &ScenarioParams) -> Result<Simulation, ScenarioError> {
    params.validate()?;

    let mut simulation = Simulation::new(params.dispatch);
    let mut rng = StdRng::seed_from_u64(params.dispatch.seed.wrapping_add(ACTION_SEED_OFFSET));

    let mut drivers: Vec<Entity> = Vec::with_capacity(params.drivers.total());
    for (category, count) in params.drivers.iter() {
        for i in 0..count {
            let name = format!("{}-driver-{}", short_label(category), i + 1);
            let driver = simulation.add_driver(name, category, None);
            simulation.schedule_at(0, ScheduledAction::SignIn(driver));
            drivers.push(driver);
        }
    }

    let locations: Vec<Location> = params
        .pickup_locations
        .iter()
        .map(|address| Location::new(address.as_str()))
        .collect();
    let mut passengers: Vec<Entity> = Vec::with_capacity(params.passengers.total());
    for (category, count) in params.passengers.iter() {
        for i in 0..count {
            let name = format!("{}-passenger-{}", short_label(category), i + 1);
            let pickup = locations
                .choose(&mut rng)
                .cloned()
                .unwrap_or_else(|| Location::new("unknown"));
            passengers.push(simulation.add_passenger(name, category, pickup));
        }
    }

    for _ in 0..params.num_actions {
        let timestamp = rng.gen_range(0..params.action_window_ms);
        if let Some(action) = random_action(&mut rng, &passengers, &drivers, &locations) {
            simulation.schedule_at(timestamp, action);
        }
    }

    Ok(simulation)
}

fn random_action(
    rng: &mut StdRng,
    passengers: &[Entity],
    drivers: &[Entity],
    locations: &[Location],
) -> Option<ScheduledAction> {
    let passenger_turn = match (passengers.is_empty(), drivers.is_empty()) {
        (true, true) => return None,
        (false, true) => true,
        (true, false) => false,
        (false, false) => rng.gen_bool(0.6),
    };

    if passenger_turn {
        let passenger = *passengers.choose(rng)?;
        let roll = rng.gen_range(0..100);
        let action = if roll < 60 {
            ScheduledAction::RequestRide(passenger)
        } else if roll < 80 {
            ScheduledAction::CancelRide(passenger)
        } else {
            let location = locations.choose(rng)?.clone();
            ScheduledAction::ChangePickup(passenger, location)
        };
        Some(action)
    } else {
        let driver = *drivers.choose(rng)?;
        let roll = rng.gen_range(0..100);
        let action = if roll < 60 {
            ScheduledAction::CompleteTrip(driver)
        } else if roll < 80 {
            ScheduledAction::SignOff(driver)
        } else {
            ScheduledAction::SignIn(driver)
        };
        Some(action)
    }
}

/// The classic narrated script: four drivers and four passengers, each passenger
/// asking for a ride as they join, followed by cancellations, a pickup correction,
/// a duplicate request, and a driver break of 30 minutes.
pub fn scripted_demo(config: DispatchConfig) -> Simulation {
    use RideCategory::{GeneralPurpose, PetFriendly, WomenForWomen};
    use ScheduledAction::{CancelRide, ChangePickup, RequestRide, SignIn, SignOff};

    let mut simulation = Simulation::new(config);

    let john = simulation.add_driver("John", GeneralPurpose, None);
    let natalie = simulation.add_driver("Natalie", WomenForWomen, None);
    let todd = simulation.add_driver("Todd", PetFriendly, None);
    let amanda = simulation.add_driver("Amanda", WomenForWomen, None);
    for driver in [john, natalie, todd, amanda] {
        simulation.schedule_at(0, SignIn(driver));
    }

    let laura = simulation.add_passenger("Laura", WomenForWomen, "Main St. 52".into());
    let mark = simulation.add_passenger("Mark", PetFriendly, "Industrail St. 23".into());
    let fyodor = simulation.add_passenger("Fyodor", GeneralPurpose, "Russian St. 1".into());
    let bogdan = simulation.add_passenger("Bogdan", GeneralPurpose, "Frog Ave. 13B".into());
    for passenger in [laura, mark, fyodor, bogdan] {
        simulation.schedule_at(0, RequestRide(passenger));
    }

    simulation.schedule_at(0, CancelRide(laura));
    simulation.schedule_at(0, ChangePickup(mark, "Industrial St. 23".into()));
    simulation.schedule_at(0, RequestRide(fyodor));
    simulation.schedule_at(0, CancelRide(bogdan));
    simulation.schedule_at(0, CancelRide(bogdan));

    simulation.schedule_at(0, SignOff(todd));
    simulation.schedule_at(0, SignOff(natalie));
    simulation.schedule_at(30 * ONE_MIN_MS, SignIn(natalie));
    simulation.schedule_at(30 * ONE_MIN_MS, RequestRide(laura));

    simulation
}
