//! Host lifecycle binding.
//!
//! The host hands out named [`LifecycleHandle`]s and fires each one's
//! destruction callback when the entity it stands for is torn down. Services
//! register their teardown on a handle; they never destroy it themselves.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::debug;

/// Capability to create lifecycle-bound handles.
pub trait LifecycleHost {
    fn create_handle(&self, name: &str) -> LifecycleHandle;
}

type DestroyCallback = Box<dyn FnOnce()>;

enum HandleState {
    Alive(Option<DestroyCallback>),
    Destroyed,
}

struct HandleInner {
    name: String,
    state: RefCell<HandleState>,
}

/// A named, one-shot destruction signal shared between the host and a service.
#[derive(Clone)]
pub struct LifecycleHandle {
    inner: Rc<HandleInner>,
}

impl LifecycleHandle {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(HandleInner {
                name: name.into(),
                state: RefCell::new(HandleState::Alive(None)),
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn is_destroyed(&self) -> bool {
        matches!(*self.inner.state.borrow(), HandleState::Destroyed)
    }

    /// Register the destruction callback, replacing any previous one.
    /// Ignored once the handle has been destroyed.
    pub fn set_on_destroy(&self, callback: impl FnOnce() + 'static) {
        if let HandleState::Alive(slot) = &mut *self.inner.state.borrow_mut() {
            *slot = Some(Box::new(callback));
        }
    }

    /// Fire the destruction signal.
    ///
    /// Returns false if the handle was already destroyed. The callback runs
    /// after the handle is marked destroyed, so it may inspect or clone the
    /// handle freely.
    pub fn destroy(&self) -> bool {
        let previous = self.inner.state.replace(HandleState::Destroyed);
        match previous {
            HandleState::Destroyed => false,
            HandleState::Alive(callback) => {
                debug!("Destroying lifecycle handle {}", self.inner.name);
                if let Some(callback) = callback {
                    callback();
                }
                true
            }
        }
    }

    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for LifecycleHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LifecycleHandle")
            .field("name", &self.inner.name)
            .field("destroyed", &self.is_destroyed())
            .finish()
    }
}

/// In-process host that owns every handle it creates.
///
/// Dropping the scope tears down all live handles, newest first.
#[derive(Debug, Default)]
pub struct LifecycleScope {
    handles: RefCell<Vec<LifecycleHandle>>,
}

impl LifecycleScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of handles that have not been destroyed yet.
    pub fn live(&self) -> usize {
        self.handles
            .borrow()
            .iter()
            .filter(|h| !h.is_destroyed())
            .count()
    }

    /// Destroy every live handle with the given name. Returns how many fired.
    pub fn destroy(&self, name: &str) -> usize {
        let targets: Vec<LifecycleHandle> = self
            .handles
            .borrow()
            .iter()
            .filter(|h| h.name() == name)
            .cloned()
            .collect();
        let fired = targets.iter().filter(|h| h.destroy()).count();
        self.prune();
        fired
    }

    /// Destroy all handles in reverse creation order.
    pub fn teardown(&self) {
        let handles = self.handles.take();
        for handle in handles.iter().rev() {
            handle.destroy();
        }
    }

    fn prune(&self) {
        self.handles.borrow_mut().retain(|h| !h.is_destroyed());
    }
}

impl LifecycleHost for LifecycleScope {
    fn create_handle(&self, name: &str) -> LifecycleHandle {
        self.prune();
        let handle = LifecycleHandle::new(name);
        self.handles.borrow_mut().push(handle.clone());
        debug!("Created lifecycle handle {}", name);
        handle
    }
}

impl Drop for LifecycleScope {
    fn drop(&mut self) {
        self.teardown();
    }
}
