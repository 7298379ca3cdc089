mod support;

use dispatch_core::error::{DispatchError, DispatchOutcome};
use dispatch_core::ride::{Location, RequestKind, RideCategory};
use dispatch_core::test_helpers::{test_other_pickup, test_pickup};
use support::{assert_consistent, mediator, DriverBuilder, PassengerBuilder};

#[test]
fn request_then_cancel_round_trips_driver_status() {
    let mut mediator = mediator();
    let driver = DriverBuilder::new("John").spawn(&mut mediator);
    let passenger = PassengerBuilder::new("Fyodor").spawn(&mut mediator);

    let outcome = mediator
        .notify(passenger, RequestKind::RideRequest)
        .expect("ride assigned");
    assert_eq!(outcome.driver(), Some(driver));
    assert_eq!(mediator.assigned_driver(passenger), Some(driver));
    assert!(!mediator.driver(driver).expect("driver").is_free());
    assert!(mediator.passenger(passenger).expect("passenger").has_active_request);
    assert_consistent(&mediator);

    let outcome = mediator
        .notify(passenger, RequestKind::RideCancel)
        .expect("ride cancelled");
    assert!(matches!(outcome, DispatchOutcome::RideCancelled { driver: d, .. } if d == driver));
    assert_eq!(mediator.assigned_driver(passenger), None);
    assert!(mediator.driver(driver).expect("driver").is_free());
    assert!(!mediator.passenger(passenger).expect("passenger").has_active_request);
    assert_consistent(&mediator);
}

#[test]
fn pet_request_without_pet_driver_finds_no_match() {
    let mut mediator = mediator();
    DriverBuilder::new("John").spawn(&mut mediator);
    DriverBuilder::new("Natalie")
        .with_category(RideCategory::WomenForWomen)
        .spawn(&mut mediator);
    let passenger = PassengerBuilder::new("Mark")
        .with_category(RideCategory::PetFriendly)
        .spawn(&mut mediator);

    let result = mediator.notify(passenger, RequestKind::RideRequest);

    assert_eq!(
        result,
        Err(DispatchError::NoMatchFound {
            passenger: "Mark".to_string(),
            category: RideCategory::PetFriendly,
        })
    );
    assert!(mediator.assignments().is_empty());
    assert!(!mediator.passenger(passenger).expect("passenger").has_active_request);
    assert_eq!(mediator.telemetry().no_match_found, 1);
}

#[test]
fn no_match_can_be_retried_once_a_driver_signs_in() {
    let mut mediator = mediator();
    let passenger = PassengerBuilder::new("Mark")
        .with_category(RideCategory::PetFriendly)
        .spawn(&mut mediator);
    assert!(mediator.notify(passenger, RequestKind::RideRequest).is_err());

    let todd = DriverBuilder::new("Todd")
        .with_category(RideCategory::PetFriendly)
        .spawn(&mut mediator);
    let outcome = mediator
        .notify(passenger, RequestKind::RideRequest)
        .expect("second attempt assigned");

    assert_eq!(outcome.driver(), Some(todd));
}

#[test]
fn pickup_change_reradios_same_driver() {
    let mut mediator = mediator();
    let driver = DriverBuilder::new("Todd")
        .with_category(RideCategory::PetFriendly)
        .spawn(&mut mediator);
    let passenger = PassengerBuilder::new("Mark")
        .with_category(RideCategory::PetFriendly)
        .with_pickup("Industrail St. 23")
        .spawn(&mut mediator);
    mediator
        .notify(passenger, RequestKind::RideRequest)
        .expect("assigned");

    let outcome = mediator
        .change_pickup(passenger, Location::new("Industrial St. 23"))
        .expect("pickup changed");

    assert_eq!(
        outcome,
        DispatchOutcome::PickupChanged {
            driver,
            driver_name: "Todd".to_string(),
            pickup: Location::new("Industrial St. 23"),
        }
    );
    assert_eq!(mediator.assigned_driver(passenger), Some(driver));
    assert_eq!(
        mediator.radio_log(driver).last(),
        Some(&Location::new("Industrial St. 23"))
    );
    assert_eq!(mediator.radio_log(driver).len(), 2);
    assert_consistent(&mediator);
}

#[test]
fn cancel_without_ride_changes_nothing() {
    let mut mediator = mediator();
    let driver = DriverBuilder::new("John").spawn(&mut mediator);
    let assigned = PassengerBuilder::new("Fyodor").spawn(&mut mediator);
    let idle = PassengerBuilder::new("Bogdan").spawn(&mut mediator);
    mediator
        .notify(assigned, RequestKind::RideRequest)
        .expect("assigned");
    let registry_before = mediator.registry().to_vec();

    for _ in 0..2 {
        let result = mediator.notify(idle, RequestKind::RideCancel);
        assert_eq!(result, Err(DispatchError::no_active_request("Bogdan")));
    }

    assert_eq!(mediator.registry(), registry_before.as_slice());
    assert_eq!(mediator.assignments().len(), 1);
    assert_eq!(mediator.assigned_driver(assigned), Some(driver));
    assert_eq!(mediator.telemetry().no_active_request, 2);
}

#[test]
fn duplicate_request_keeps_existing_assignment() {
    let mut mediator = mediator();
    let first = DriverBuilder::new("John").spawn(&mut mediator);
    let second = DriverBuilder::new("Amanda").spawn(&mut mediator);
    let passenger = PassengerBuilder::new("Fyodor").spawn(&mut mediator);
    mediator
        .notify(passenger, RequestKind::RideRequest)
        .expect("assigned");

    let result = mediator.notify(passenger, RequestKind::RideRequest);

    assert_eq!(
        result,
        Err(DispatchError::DuplicateRequest {
            passenger: "Fyodor".to_string(),
            driver: "John".to_string(),
        })
    );
    assert_eq!(mediator.assigned_driver(passenger), Some(first));
    assert!(mediator.driver(second).expect("driver").is_free());
    assert_consistent(&mediator);
}

#[test]
fn busy_driver_cannot_sign_off() {
    let mut mediator = mediator();
    let driver = DriverBuilder::new("Todd")
        .with_category(RideCategory::PetFriendly)
        .spawn(&mut mediator);
    let passenger = PassengerBuilder::new("Mark")
        .with_category(RideCategory::PetFriendly)
        .spawn(&mut mediator);
    mediator
        .notify(passenger, RequestKind::RideRequest)
        .expect("assigned");

    let result = mediator.remove_driver(driver);

    assert_eq!(
        result,
        Err(DispatchError::DriverBusy {
            driver: "Todd".to_string()
        })
    );
    assert_eq!(mediator.registry(), &[driver]);
    assert!(!mediator.driver(driver).expect("driver").is_free());
    assert_eq!(mediator.telemetry().sign_offs_rejected, 1);
}

#[test]
fn free_driver_signs_off_and_is_no_longer_dispatched() {
    let mut mediator = mediator();
    let driver = DriverBuilder::new("Natalie")
        .with_category(RideCategory::WomenForWomen)
        .spawn(&mut mediator);
    let passenger = PassengerBuilder::new("Laura")
        .with_category(RideCategory::WomenForWomen)
        .spawn(&mut mediator);

    assert_eq!(
        mediator.remove_driver(driver),
        Ok(DispatchOutcome::DriverSignedOff {
            was_registered: true
        })
    );
    assert!(mediator.registry().is_empty());
    assert!(mediator.notify(passenger, RequestKind::RideRequest).is_err());

    assert_eq!(
        mediator.remove_driver(driver),
        Ok(DispatchOutcome::DriverSignedOff {
            was_registered: false
        })
    );
}

#[test]
fn completed_trip_frees_driver_and_passenger() {
    let mut mediator = mediator();
    let driver = DriverBuilder::new("John").spawn(&mut mediator);
    let passenger = PassengerBuilder::new("Fyodor").spawn(&mut mediator);
    mediator
        .notify(passenger, RequestKind::RideRequest)
        .expect("assigned");

    let outcome = mediator.complete_trip(driver).expect("completed");

    assert_eq!(
        outcome,
        DispatchOutcome::TripCompleted {
            passenger,
            passenger_name: "Fyodor".to_string(),
        }
    );
    assert!(mediator.driver(driver).expect("driver").is_free());
    assert_eq!(mediator.assigned_driver(passenger), None);
    assert_eq!(
        mediator.complete_trip(driver),
        Err(DispatchError::no_active_request("John"))
    );
    assert_consistent(&mediator);
}

#[test]
fn general_purpose_passenger_rides_with_any_free_driver() {
    let mut mediator = mediator();
    let busy = DriverBuilder::new("John").spawn(&mut mediator);
    let pet = DriverBuilder::new("Todd")
        .with_category(RideCategory::PetFriendly)
        .spawn(&mut mediator);
    let first = PassengerBuilder::new("Fyodor").spawn(&mut mediator);
    let second = PassengerBuilder::new("Bogdan").spawn(&mut mediator);

    assert_eq!(
        mediator
            .notify(first, RequestKind::RideRequest)
            .expect("assigned")
            .driver(),
        Some(busy)
    );
    assert_eq!(
        mediator
            .notify(second, RequestKind::RideRequest)
            .expect("assigned")
            .driver(),
        Some(pet)
    );
}

#[test]
fn specialized_passenger_skips_other_categories() {
    let mut mediator = mediator();
    DriverBuilder::new("John").spawn(&mut mediator);
    let natalie = DriverBuilder::new("Natalie")
        .with_category(RideCategory::WomenForWomen)
        .spawn(&mut mediator);
    let passenger = PassengerBuilder::new("Laura")
        .with_category(RideCategory::WomenForWomen)
        .spawn(&mut mediator);

    let outcome = mediator
        .notify(passenger, RequestKind::RideRequest)
        .expect("assigned");

    assert_eq!(outcome.driver(), Some(natalie));
}

#[test]
fn signed_out_driver_is_never_matched() {
    let mut mediator = mediator();
    DriverBuilder::new("John").signed_out().spawn(&mut mediator);
    let passenger = PassengerBuilder::new("Fyodor").spawn(&mut mediator);

    assert!(matches!(
        mediator.notify(passenger, RequestKind::RideRequest),
        Err(DispatchError::NoMatchFound { .. })
    ));
}

#[test]
fn pickup_change_without_ride_keeps_old_pickup() {
    let mut mediator = mediator();
    let driver = DriverBuilder::new("John").spawn(&mut mediator);
    let passenger = PassengerBuilder::new("Bogdan").spawn(&mut mediator);

    let result = mediator.change_pickup(passenger, test_other_pickup());

    assert_eq!(result, Err(DispatchError::no_active_request("Bogdan")));
    assert_eq!(mediator.pickup(passenger), Some(&test_pickup()));
    assert!(mediator.radio_log(driver).is_empty());
    assert_eq!(mediator.telemetry().pickups_changed, 0);
}
