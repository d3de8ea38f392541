//! Persisted, observable settings.
//!
//! A settings type is a plain serde struct. Its document lives at
//! `<pack directory>/settings.json`, where the pack is the enabled pack whose
//! name matches [`SettingsService::module_name`]. Loading merges the document
//! over the in-memory defaults; a document that cannot be read back is
//! replaced by the current state instead of failing.

use std::fmt;
use std::fs;
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{Shared, Slot};
use crate::error::{Error, Result};
use crate::lifecycle::{LifecycleHandle, LifecycleHost};
use crate::packs::PackRegistry;

/// File name of the settings document inside a pack directory.
pub const SETTINGS_FILE: &str = "settings.json";

/// A settings type managed by a [`SettingsManager`].
///
/// Fields marked `#[serde(skip)]` are not persisted.
pub trait SettingsService: Serialize + DeserializeOwned + Default + 'static {
    /// Name of the pack that owns the settings document.
    ///
    /// Defaults to the crate name of the implementing type.
    fn module_name() -> &'static str {
        let name = std::any::type_name::<Self>();
        name.split("::").next().unwrap_or(name)
    }

    /// Runs while the settings are being built, before changes are persisted
    /// or announced. Loads the document by default.
    fn on_initialize(settings: &mut Settings<Self>) -> Result<()> {
        settings.load()
    }

    /// Runs once when the bound lifecycle handle is destroyed.
    fn on_deinitialize(_settings: &mut Settings<Self>) {}

    /// Move state that is not persisted from `previous` into settings that
    /// were just read back from the document.
    ///
    /// Loading rebuilds the value from the document, so fields marked
    /// `#[serde(skip)]` come back as their defaults unless copied here.
    fn retain_unpersisted(&mut self, _previous: Self) {}
}

/// Resolve the settings document path for `module` among the enabled packs.
pub fn settings_path(packs: &dyn PackRegistry, module: &str) -> Result<PathBuf> {
    match packs.find(module)? {
        Some(pack) => Ok(pack.directory.join(SETTINGS_FILE)),
        None => Err(Error::PackNotFound {
            module: module.to_string(),
        }),
    }
}

/// Token returned by [`Settings::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Subscriber<T> = Box<dyn FnMut(&T)>;

/// Settings state plus its document location and change subscribers.
pub struct Settings<T> {
    value: T,
    path: PathBuf,
    initialized: bool,
    subscribers: Vec<(SubscriptionId, Subscriber<T>)>,
    next_subscription: u64,
}

impl<T: SettingsService> Settings<T> {
    /// Build settings for `T`: resolve the document, run the initialization
    /// hook, then start persisting and announcing changes.
    pub fn open(packs: &dyn PackRegistry) -> Result<Self> {
        let path = settings_path(packs, T::module_name())?;
        Self::open_at(path)
    }

    /// Like [`open`](Self::open) with an explicit document path.
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let mut settings = Self {
            value: T::default(),
            path: path.into(),
            initialized: false,
            subscribers: Vec::new(),
            next_subscription: 0,
        };
        T::on_initialize(&mut settings)?;
        settings.initialized = true;
        Ok(settings)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether construction has finished and changes are persisted.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Read the document and merge it over the current state.
    ///
    /// A missing document is created from the current state. A document that
    /// cannot be read or parsed is overwritten with the current state.
    pub fn load(&mut self) -> Result<()> {
        if !self.path.exists() {
            info!("No settings at {:?}, writing defaults", self.path);
            return self.save();
        }

        match self.merge_document() {
            Ok(()) => {
                info!("Loaded settings from {:?}", self.path);
                Ok(())
            }
            Err(e) => {
                warn!(
                    "Failed to read settings at {:?}: {}, rewriting with current values",
                    self.path, e
                );
                self.save()
            }
        }
    }

    fn merge_document(&mut self) -> Result<()> {
        let content = fs::read_to_string(&self.path)?;
        let document: Value = serde_json::from_str(&content)?;
        let mut merged = serde_json::to_value(&self.value)?;
        merge(&mut merged, document);
        let loaded: T = serde_json::from_value(merged)?;
        let previous = std::mem::replace(&mut self.value, loaded);
        self.value.retain_unpersisted(previous);
        Ok(())
    }

    /// Write the full current state, replacing the previous document.
    pub fn save(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.value)?;
        fs::write(&self.path, json)?;
        debug!("Saved settings to {:?}", self.path);
        Ok(())
    }

    /// Set a tracked field.
    ///
    /// When the value differs, it is stored and, once initialized, the
    /// document is saved and subscribers are notified. Returns whether the
    /// value changed.
    pub fn set<U: PartialEq>(
        &mut self,
        field: impl FnOnce(&mut T) -> &mut U,
        value: U,
    ) -> Result<bool> {
        let slot = field(&mut self.value);
        if *slot == value {
            return Ok(false);
        }
        *slot = value;
        self.changed()?;
        Ok(true)
    }

    fn changed(&mut self) -> Result<()> {
        if !self.initialized {
            return Ok(());
        }
        self.save()?;
        for (_, subscriber) in self.subscribers.iter_mut() {
            subscriber(&self.value);
        }
        Ok(())
    }

    /// Register a change callback. Callbacks run in subscription order.
    ///
    /// Callbacks receive the new state directly; they must not borrow the
    /// shared settings handle that is being mutated.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a change callback. Unknown ids are ignored; returns whether one
    /// was removed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T> Deref for Settings<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: fmt::Debug> fmt::Debug for Settings<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("value", &self.value)
            .field("path", &self.path)
            .field("initialized", &self.initialized)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

/// Merge `patch` into `target`: objects are merged key by key, recursively;
/// any other value replaces the target.
fn merge(target: &mut Value, patch: Value) {
    match (target, patch) {
        (Value::Object(target), Value::Object(patch)) => {
            for (key, value) in patch {
                merge(target.entry(key).or_insert(Value::Null), value);
            }
        }
        (target, patch) => *target = patch,
    }
}

/// Container that lazily builds the persisted settings of `T`.
pub struct SettingsManager<T: SettingsService> {
    slot: Rc<Slot<Settings<T>>>,
    host: Rc<dyn LifecycleHost>,
    packs: Rc<dyn PackRegistry>,
}

impl<T: SettingsService> SettingsManager<T> {
    pub(crate) fn new(
        slot: Rc<Slot<Settings<T>>>,
        host: Rc<dyn LifecycleHost>,
        packs: Rc<dyn PackRegistry>,
    ) -> Self {
        Self { slot, host, packs }
    }

    /// The live settings, built on first access.
    ///
    /// Fails when no enabled pack matches the module name, or when the
    /// initialization hook fails.
    pub fn current(&self) -> Result<Shared<Settings<T>>> {
        if let Some(settings) = self.slot.get() {
            return Ok(settings);
        }

        let handle = self.host.create_handle(self.slot.name());
        let settings = match Settings::<T>::open(self.packs.as_ref()) {
            Ok(s) => s,
            Err(e) => {
                handle.destroy();
                return Err(e);
            }
        };
        Ok(self.slot.install(settings, handle, deinitialize::<T>))
    }

    pub fn current_if_initialized(&self) -> Option<Shared<Settings<T>>> {
        self.slot.get()
    }

    pub fn handle(&self) -> Option<LifecycleHandle> {
        self.slot.handle()
    }
}

fn deinitialize<T: SettingsService>(settings: &mut Settings<T>) {
    T::on_deinitialize(settings);
}

impl<T: SettingsService> Clone for SettingsManager<T> {
    fn clone(&self) -> Self {
        Self {
            slot: self.slot.clone(),
            host: self.host.clone(),
            packs: self.packs.clone(),
        }
    }
}
