//! Ride categories, passenger request kinds and pickup locations.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Service class a passenger asks for and a driver specializes in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RideCategory {
    GeneralPurpose,
    WomenForWomen,
    PetFriendly,
}

impl RideCategory {
    pub const ALL: [RideCategory; 3] = [
        RideCategory::GeneralPurpose,
        RideCategory::WomenForWomen,
        RideCategory::PetFriendly,
    ];

    /// Human-readable label used in dispatch narration.
    pub fn label(self) -> &'static str {
        match self {
            RideCategory::GeneralPurpose => "Casual",
            RideCategory::WomenForWomen => "Women for Women",
            RideCategory::PetFriendly => "Pet transport",
        }
    }

    /// Whether a passenger of this category may ride with a driver specialized in `driver`.
    ///
    /// General-purpose passengers accept any driver; every other category needs an
    /// exact specialization match.
    pub fn accepts(self, driver: RideCategory) -> bool {
        self == RideCategory::GeneralPurpose || self == driver
    }
}

impl fmt::Display for RideCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// What a passenger is asking the mediator to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestKind {
    LocationChange,
    RideRequest,
    RideCancel,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            RequestKind::LocationChange => "location change",
            RequestKind::RideRequest => "ride request",
            RequestKind::RideCancel => "ride cancel",
        };
        f.write_str(label)
    }
}

/// Free-form pickup address ("Main St. 52").
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Location(String);

impl Location {
    pub fn new(address: impl Into<String>) -> Self {
        Self(address.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Location {
    fn from(address: &str) -> Self {
        Self::new(address)
    }
}

impl From<String> for Location {
    fn from(address: String) -> Self {
        Self(address)
    }
}
