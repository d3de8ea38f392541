pub mod accessor;
pub mod counters;
pub mod dump;
pub mod error;
pub mod lifecycle;
pub mod packs;
pub mod service;
pub mod version;

pub use accessor::{
    DynFieldGetter, DynFieldSetter, ErasedFieldGetter, ErasedFieldSetter, FieldGetter,
    FieldLookup, FieldSetter, Reflect, TypeInfo, field_get, field_get_dyn, field_get_erased,
    field_set, field_set_dyn, field_set_erased,
};
pub use counters::{FloatCounter, IntCounter};
pub use dump::{SceneNode, dump_scene, dump_scene_to};
pub use error::{Error, Result};
pub use lifecycle::{LifecycleHandle, LifecycleHost, LifecycleScope};
pub use packs::{DirectoryPacks, Pack, PackManifest, PackRegistry, StaticPacks};
pub use service::{
    LazyManager, Manager, Service, ServiceContext, Settings, SettingsManager, SettingsService,
    Shared, SubscriptionId,
};
pub use version::Version;
