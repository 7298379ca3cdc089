mod support;

use dispatch_core::clock::{ScheduledAction, ONE_MIN_MS};
use dispatch_core::error::{DispatchError, DispatchOutcome};
use dispatch_core::ride::Location;
use dispatch_core::runner::{run_until_empty, Simulation};
use dispatch_core::scenario::{scripted_demo, DispatchConfig};
use support::assert_consistent;

fn entity(simulation: &Simulation, name: &str) -> bevy_ecs::prelude::Entity {
    simulation
        .driver_named(name)
        .map(|driver| driver.entity())
        .or_else(|| simulation.passenger_named(name).map(|p| p.entity()))
        .unwrap_or_else(|| panic!("no participant named {name}"))
}

#[test]
fn scripted_demo_produces_narrated_outcomes_in_order() {
    let simulation = scripted_demo(DispatchConfig::default());
    let natalie = entity(&simulation, "Natalie");
    let todd = entity(&simulation, "Todd");
    let john = entity(&simulation, "John");
    let amanda = entity(&simulation, "Amanda");

    let mut outcomes = Vec::new();
    while let Some((event, result)) = simulation.step() {
        outcomes.push((event.timestamp, event.action, result));
        assert_consistent(&simulation.mediator().borrow());
    }

    // Four sign-ins open the script.
    let results: Vec<_> = outcomes.iter().skip(4).map(|(_, _, r)| r.clone()).collect();
    assert_eq!(results.len(), 15);

    assert_eq!(results[0].as_ref().ok().and_then(|o| o.driver()), Some(natalie));
    assert_eq!(results[1].as_ref().ok().and_then(|o| o.driver()), Some(todd));
    assert_eq!(results[2].as_ref().ok().and_then(|o| o.driver()), Some(john));
    assert_eq!(results[3].as_ref().ok().and_then(|o| o.driver()), Some(amanda));
    assert!(matches!(
        &results[4],
        Ok(DispatchOutcome::RideCancelled { driver_name, .. }) if driver_name == "Natalie"
    ));
    assert!(matches!(
        &results[5],
        Ok(DispatchOutcome::PickupChanged { driver_name, pickup, .. })
            if driver_name == "Todd" && pickup.as_str() == "Industrial St. 23"
    ));
    assert_eq!(
        results[6],
        Err(DispatchError::DuplicateRequest {
            passenger: "Fyodor".to_string(),
            driver: "John".to_string(),
        })
    );
    assert!(matches!(
        &results[7],
        Ok(DispatchOutcome::RideCancelled { driver_name, .. }) if driver_name == "Amanda"
    ));
    assert_eq!(results[8], Err(DispatchError::no_active_request("Bogdan")));
    assert_eq!(
        results[9],
        Err(DispatchError::DriverBusy {
            driver: "Todd".to_string()
        })
    );
    assert_eq!(
        results[10],
        Ok(DispatchOutcome::DriverSignedOff {
            was_registered: true
        })
    );

    let (timestamp, action, result) = &outcomes[4 + 11];
    assert_eq!(*timestamp, 30 * ONE_MIN_MS);
    assert_eq!(*action, ScheduledAction::SignIn(natalie));
    assert!(result.is_ok());
    assert_eq!(results[12].as_ref().ok().and_then(|o| o.driver()), Some(amanda));
}

#[test]
fn scripted_demo_final_state() {
    let simulation = scripted_demo(DispatchConfig::default());
    run_until_empty(&simulation, usize::MAX);

    let mediator = simulation.mediator().borrow();
    let pairs = [("Mark", "Todd"), ("Fyodor", "John"), ("Laura", "Amanda")];
    for (passenger, driver) in pairs {
        assert_eq!(
            mediator.assigned_driver(entity(&simulation, passenger)),
            Some(entity(&simulation, driver)),
            "{passenger} should ride with {driver}"
        );
    }
    assert_eq!(mediator.assigned_driver(entity(&simulation, "Bogdan")), None);

    let natalie = entity(&simulation, "Natalie");
    assert!(mediator.driver(natalie).expect("natalie").is_free());
    let registry: Vec<_> = mediator
        .registry()
        .iter()
        .filter_map(|driver| mediator.name_of(*driver))
        .collect();
    assert_eq!(registry, vec!["John", "Todd", "Amanda", "Natalie"]);

    let todd = entity(&simulation, "Todd");
    assert_eq!(
        mediator.radio_log(todd),
        &[
            Location::new("Industrail St. 23"),
            Location::new("Industrial St. 23")
        ]
    );

    let telemetry = mediator.telemetry();
    assert_eq!(telemetry.rides_assigned, 5);
    assert_eq!(telemetry.rides_cancelled, 2);
    assert_eq!(telemetry.duplicate_requests, 1);
    assert_eq!(telemetry.no_active_request, 1);
    assert_eq!(telemetry.sign_offs_rejected, 1);
    assert_eq!(telemetry.records.len(), 19);
}

#[test]
fn dropping_the_simulation_invalidates_handles() {
    let simulation = scripted_demo(DispatchConfig::default());
    let laura = simulation
        .passenger_named("Laura")
        .expect("laura")
        .clone();
    drop(simulation);

    assert_eq!(laura.request_ride(), Err(DispatchError::MediatorUnavailable));
}
