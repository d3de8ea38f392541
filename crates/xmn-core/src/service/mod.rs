//! Lifecycle-scoped singleton services.
//!
//! A [`ServiceContext`] owns one container slot per container type and hands
//! out cheap container handles:
//!
//! - [`LazyManager`] builds its service on first access,
//! - [`Manager`] requires an explicit [`Manager::initialize`],
//! - [`SettingsManager`] builds a persisted, observable [`Settings`] document.
//!
//! Construction is pulled by whoever asks for the service. Destruction is
//! pushed by the host: every instance is bound to a [`LifecycleHandle`], and
//! destroying the handle runs the service's deinitialization hook and empties
//! the slot so the next access starts fresh.
//!
//! Everything here is single-threaded (`Rc`/`RefCell`) and meant to run on
//! the host's update thread.

mod manager;
mod settings;

use std::any::{Any, TypeId, type_name};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{debug, warn};

use crate::lifecycle::{LifecycleHandle, LifecycleHost};
use crate::packs::PackRegistry;

pub use manager::{LazyManager, Manager};
pub use settings::{
    SETTINGS_FILE, Settings, SettingsManager, SettingsService, SubscriptionId, settings_path,
};

/// Shared handle to a live service instance.
pub type Shared<T> = Rc<RefCell<T>>;

/// Hooks run around a service's lifetime.
pub trait Service: 'static {
    /// Runs once after construction, before the instance is handed out.
    fn on_initialize(&mut self) {}

    /// Runs once when the bound lifecycle handle is destroyed.
    ///
    /// Skipped, with a warning, if the instance is still borrowed at that point.
    fn on_deinitialize(&mut self) {}
}

/// Last path segment of a type name, without generic arguments.
pub(crate) fn short_type_name<T: ?Sized>() -> &'static str {
    let full = type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

struct Live<V> {
    instance: Shared<V>,
    handle: LifecycleHandle,
}

/// Storage for at most one instance of `V`.
pub(crate) struct Slot<V> {
    name: &'static str,
    live: RefCell<Option<Live<V>>>,
}

impl<V: 'static> Slot<V> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            live: RefCell::new(None),
        }
    }

    pub(crate) fn name(&self) -> &'static str {
        self.name
    }

    pub(crate) fn get(&self) -> Option<Shared<V>> {
        self.live.borrow().as_ref().map(|live| live.instance.clone())
    }

    pub(crate) fn handle(&self) -> Option<LifecycleHandle> {
        self.live.borrow().as_ref().map(|live| live.handle.clone())
    }

    /// Store an initialized instance and bind its teardown to `handle`.
    pub(crate) fn install(
        self: &Rc<Self>,
        value: V,
        handle: LifecycleHandle,
        deinit: fn(&mut V),
    ) -> Shared<V> {
        let instance = Rc::new(RefCell::new(value));
        let slot = Rc::downgrade(self);
        let bound = Rc::downgrade(&instance);
        let name = self.name;

        handle.set_on_destroy(move || teardown(name, slot, bound, deinit));

        *self.live.borrow_mut() = Some(Live {
            instance: instance.clone(),
            handle,
        });
        debug!("Service {} initialized", self.name);
        instance
    }

    /// Remove `instance` if it is still the live one.
    fn release(&self, instance: &Shared<V>) {
        let mut live = self.live.borrow_mut();
        if live
            .as_ref()
            .is_some_and(|l| Rc::ptr_eq(&l.instance, instance))
        {
            *live = None;
        }
    }
}

fn teardown<V>(
    name: &'static str,
    slot: Weak<Slot<V>>,
    instance: Weak<RefCell<V>>,
    deinit: fn(&mut V),
) where
    V: 'static,
{
    let Some(instance) = instance.upgrade() else {
        return;
    };
    if let Some(slot) = slot.upgrade() {
        slot.release(&instance);
    }
    match instance.try_borrow_mut() {
        Ok(mut service) => {
            deinit(&mut service);
            debug!("Service {} deinitialized", name);
        }
        Err(_) => warn!(
            "Service {} is borrowed during teardown, skipping its deinitialization",
            name
        ),
    }
}

/// Process-wide owner of service containers.
///
/// Containers are keyed by their own type, so `LazyManager<T>` and
/// `Manager<T>` for the same `T` are separate singletons. Teardown order is
/// whatever order the host destroys handles in; [`LifecycleScope`] destroys
/// newest first. Dropping the context drops its instances without running
/// deinitialization hooks.
///
/// [`LifecycleScope`]: crate::lifecycle::LifecycleScope
pub struct ServiceContext {
    host: Rc<dyn LifecycleHost>,
    packs: Rc<dyn PackRegistry>,
    slots: RefCell<HashMap<TypeId, Rc<dyn Any>>>,
}

impl ServiceContext {
    pub fn new(host: Rc<dyn LifecycleHost>, packs: Rc<dyn PackRegistry>) -> Self {
        Self {
            host,
            packs,
            slots: RefCell::new(HashMap::new()),
        }
    }

    pub fn host(&self) -> &Rc<dyn LifecycleHost> {
        &self.host
    }

    pub fn packs(&self) -> &Rc<dyn PackRegistry> {
        &self.packs
    }

    /// Number of containers handed out so far.
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    /// Container that builds `T` on first access.
    pub fn lazy<T: Service + Default>(&self) -> LazyManager<T> {
        LazyManager::new(
            self.slot::<LazyManager<T>, T>(short_type_name::<T>()),
            self.host.clone(),
        )
    }

    /// Container that requires explicit initialization of `T`.
    pub fn manager<T: Service + Default>(&self) -> Manager<T> {
        Manager::new(
            self.slot::<Manager<T>, T>(short_type_name::<T>()),
            self.host.clone(),
        )
    }

    /// Container for the persisted settings of `T`.
    pub fn settings<T: SettingsService>(&self) -> SettingsManager<T> {
        SettingsManager::new(
            self.slot::<SettingsManager<T>, Settings<T>>(short_type_name::<T>()),
            self.host.clone(),
            self.packs.clone(),
        )
    }

    fn slot<C: 'static, V: 'static>(&self, name: &'static str) -> Rc<Slot<V>> {
        let entry = self
            .slots
            .borrow_mut()
            .entry(TypeId::of::<C>())
            .or_insert_with(|| Rc::new(Slot::<V>::new(name)) as Rc<dyn Any>)
            .clone();

        match entry.downcast::<Slot<V>>() {
            Ok(slot) => slot,
            Err(_) => unreachable!("slot for {} holds another value type", type_name::<C>()),
        }
    }
}

impl fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceContext")
            .field("containers", &self.len())
            .finish_non_exhaustive()
    }
}
