//! Drive the mediator directly through participant handles, without the clock.
//!
//! Run with: cargo run -p dispatch_core --example handles_walkthrough

use dispatch_core::mediator::DispatchMediator;
use dispatch_core::participants::{DriverHandle, PassengerHandle};
use dispatch_core::ride::RideCategory;
use dispatch_core::scenario::DispatchConfig;

fn main() {
    let mediator = DispatchMediator::new(DispatchConfig::default()).shared();

    let todd = DriverHandle::join(&mediator, "Todd", RideCategory::PetFriendly, Some(3));
    let mark = PassengerHandle::join(
        &mediator,
        "Mark",
        RideCategory::PetFriendly,
        "Industrail St. 23",
    );

    let steps = [
        ("Mark asks for a ride", mark.request_ride()),
        ("Todd signs in", todd.sign_in()),
        ("Mark asks again", mark.request_ride()),
        ("Mark fixes the address", mark.change_pickup("Industrial St. 23")),
        ("Todd tries to go home", todd.sign_off()),
        ("Todd drops Mark off", todd.complete_trip()),
        ("Todd signs off", todd.sign_off()),
    ];
    for (label, result) in steps {
        match result {
            Ok(outcome) => println!("{label}: {outcome}"),
            Err(error) => println!("{label}: {error}"),
        }
    }

    println!("Todd's radio log: {:?}", todd.radio_log().unwrap_or_default());
    println!("Counts: {:?}", mediator.borrow().counts());
}
