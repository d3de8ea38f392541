use std::rc::Rc;

use super::{Service, Shared, Slot};
use crate::error::{Error, Result};
use crate::lifecycle::{LifecycleHandle, LifecycleHost};

fn construct<T: Service + Default>(slot: &Rc<Slot<T>>, host: &dyn LifecycleHost) -> Shared<T> {
    let handle = host.create_handle(slot.name());
    let mut service = T::default();
    service.on_initialize();
    slot.install(service, handle, T::on_deinitialize)
}

/// Container that builds its service on first access.
pub struct LazyManager<T> {
    slot: Rc<Slot<T>>,
    host: Rc<dyn LifecycleHost>,
}

impl<T: Service + Default> LazyManager<T> {
    pub(crate) fn new(slot: Rc<Slot<T>>, host: Rc<dyn LifecycleHost>) -> Self {
        Self { slot, host }
    }

    /// The live instance, constructed and initialized if there is none.
    pub fn current(&self) -> Shared<T> {
        match self.slot.get() {
            Some(instance) => instance,
            None => construct(&self.slot, self.host.as_ref()),
        }
    }

    /// The live instance, without constructing one.
    pub fn current_if_initialized(&self) -> Option<Shared<T>> {
        self.slot.get()
    }

    /// Lifecycle handle bound to the live instance.
    pub fn handle(&self) -> Option<LifecycleHandle> {
        self.slot.handle()
    }
}

impl<T> Clone for LazyManager<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            host: self.host.clone(),
        }
    }
}

/// Container whose service must be initialized explicitly.
pub struct Manager<T> {
    slot: Rc<Slot<T>>,
    host: Rc<dyn LifecycleHost>,
}

impl<T: Service + Default> Manager<T> {
    pub(crate) fn new(slot: Rc<Slot<T>>, host: Rc<dyn LifecycleHost>) -> Self {
        Self { slot, host }
    }

    /// Construct the service. Fails if an instance is already live.
    pub fn initialize(&self) -> Result<Shared<T>> {
        if self.slot.get().is_some() {
            return Err(Error::AlreadyInitialized(self.slot.name()));
        }
        Ok(construct(&self.slot, self.host.as_ref()))
    }

    /// The live instance. Fails if the service has not been initialized.
    pub fn current(&self) -> Result<Shared<T>> {
        self.slot
            .get()
            .ok_or(Error::NotInitialized(self.slot.name()))
    }

    pub fn try_current(&self) -> Option<Shared<T>> {
        self.slot.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.slot.get().is_some()
    }

    pub fn handle(&self) -> Option<LifecycleHandle> {
        self.slot.handle()
    }
}

impl<T> Clone for Manager<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            host: self.host.clone(),
        }
    }
}
