pub mod clock;
pub mod ecs;
pub mod error;
pub mod matching;
pub mod mediator;
pub mod notice;
pub mod participants;
pub mod registry;
pub mod ride;
pub mod runner;
pub mod scenario;
pub mod systems;
pub mod telemetry;
pub mod validate;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;
