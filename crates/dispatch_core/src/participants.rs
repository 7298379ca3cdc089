//! Client-side handles for passengers and drivers.
//!
//! A handle owns nothing but its entity id and a non-owning reference to the shared
//! mediator. Every action goes through the mediator; handles never talk to each
//! other. Once the host drops the mediator, every call reports
//! [DispatchError::MediatorUnavailable]; while the host holds a conflicting borrow
//! of it, calls report [DispatchError::MediatorBusy].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use bevy_ecs::prelude::Entity;

use crate::error::{DispatchError, DispatchResult};
use crate::mediator::{DispatchMediator, SharedMediator};
use crate::ride::{Location, RequestKind, RideCategory};

#[derive(Debug, Clone)]
struct MediatorRef(Weak<RefCell<DispatchMediator>>);

impl MediatorRef {
    fn new(mediator: &SharedMediator) -> Self {
        Self(Rc::downgrade(mediator))
    }

    fn with<T>(
        &self,
        f: impl FnOnce(&mut DispatchMediator) -> DispatchResult<T>,
    ) -> DispatchResult<T> {
        let mediator = self.0.upgrade().ok_or(DispatchError::MediatorUnavailable)?;
        let mut mediator = mediator
            .try_borrow_mut()
            .map_err(|_| DispatchError::MediatorBusy)?;
        f(&mut *mediator)
    }

    /// Reads participant state; `None` from `f` means the entity is not known.
    fn read<T>(
        &self,
        f: impl FnOnce(&DispatchMediator) -> Option<T>,
        entity: Entity,
    ) -> DispatchResult<T> {
        let mediator = self.0.upgrade().ok_or(DispatchError::MediatorUnavailable)?;
        let mediator = mediator
            .try_borrow()
            .map_err(|_| DispatchError::MediatorBusy)?;
        f(&*mediator).ok_or(DispatchError::UnknownParticipant(entity))
    }
}

#[derive(Debug, Clone)]
pub struct PassengerHandle {
    entity: Entity,
    mediator: MediatorRef,
}

impl PassengerHandle {
    /// Registers an idle passenger with the mediator. No ride is requested yet.
    pub fn join(
        mediator: &SharedMediator,
        name: impl Into<String>,
        category: RideCategory,
        pickup: impl Into<Location>,
    ) -> Self {
        let entity = mediator
            .borrow_mut()
            .spawn_passenger(name, category, pickup.into());
        Self {
            entity,
            mediator: MediatorRef::new(mediator),
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn request_ride(&self) -> DispatchResult {
        self.mediator
            .with(|mediator| mediator.notify(self.entity, RequestKind::RideRequest))
    }

    pub fn cancel_ride(&self) -> DispatchResult {
        self.mediator
            .with(|mediator| mediator.notify(self.entity, RequestKind::RideCancel))
    }

    pub fn change_pickup(&self, location: impl Into<Location>) -> DispatchResult {
        let location = location.into();
        self.mediator
            .with(|mediator| mediator.change_pickup(self.entity, location))
    }

    pub fn name(&self) -> DispatchResult<String> {
        self.mediator.read(
            |mediator| mediator.passenger(self.entity).map(|p| p.name.clone()),
            self.entity,
        )
    }

    pub fn category(&self) -> DispatchResult<RideCategory> {
        self.mediator.read(
            |mediator| mediator.passenger(self.entity).map(|p| p.category),
            self.entity,
        )
    }

    pub fn pickup(&self) -> DispatchResult<Location> {
        self.mediator
            .read(|mediator| mediator.pickup(self.entity).cloned(), self.entity)
    }

    pub fn has_active_request(&self) -> DispatchResult<bool> {
        self.mediator.read(
            |mediator| mediator.passenger(self.entity).map(|p| p.has_active_request),
            self.entity,
        )
    }

    pub fn assigned_driver(&self) -> DispatchResult<Option<Entity>> {
        self.mediator.read(
            |mediator| Some(mediator.assigned_driver(self.entity)),
            self.entity,
        )
    }
}

#[derive(Debug, Clone)]
pub struct DriverHandle {
    entity: Entity,
    mediator: MediatorRef,
}

impl DriverHandle {
    /// Creates a free driver. `distance_miles` of `None` draws a random distance.
    /// The driver is not signed in until [DriverHandle::sign_in].
    pub fn join(
        mediator: &SharedMediator,
        name: impl Into<String>,
        category: RideCategory,
        distance_miles: Option<u16>,
    ) -> Self {
        let entity = mediator
            .borrow_mut()
            .spawn_driver(name, category, distance_miles);
        Self {
            entity,
            mediator: MediatorRef::new(mediator),
        }
    }

    pub fn entity(&self) -> Entity {
        self.entity
    }

    pub fn sign_in(&self) -> DispatchResult {
        self.mediator
            .with(|mediator| mediator.add_driver(self.entity))
    }

    pub fn sign_off(&self) -> DispatchResult {
        self.mediator
            .with(|mediator| mediator.remove_driver(self.entity))
    }

    pub fn complete_trip(&self) -> DispatchResult {
        self.mediator
            .with(|mediator| mediator.complete_trip(self.entity))
    }

    pub fn name(&self) -> DispatchResult<String> {
        self.mediator.read(
            |mediator| mediator.driver(self.entity).map(|d| d.name.clone()),
            self.entity,
        )
    }

    pub fn is_free(&self) -> DispatchResult<bool> {
        self.mediator.read(
            |mediator| mediator.driver(self.entity).map(|d| d.is_free()),
            self.entity,
        )
    }

    pub fn distance_miles(&self) -> DispatchResult<u16> {
        self.mediator.read(
            |mediator| mediator.driver(self.entity).map(|d| d.distance_miles),
            self.entity,
        )
    }

    pub fn is_signed_in(&self) -> DispatchResult<bool> {
        self.mediator.read(
            |mediator| Some(mediator.registry().contains(&self.entity)),
            self.entity,
        )
    }

    pub fn radio_log(&self) -> DispatchResult<Vec<Location>> {
        self.mediator.read(
            |mediator| Some(mediator.radio_log(self.entity).to_vec()),
            self.entity,
        )
    }
}
