//! Field accessor synthesis.
//!
//! Every function here resolves the field and the conversion between its
//! storage type and the requested type once, and returns an accessor that
//! only performs the access. A missing field, or a setter requested for a
//! read-only field, yields `Ok(None)`; use [`TypeInfo::lookup`] to tell the
//! two apart. A requested type that cannot be converted to or from the
//! storage type is an error at synthesis time.

use std::any::{Any, TypeId, type_name};
use std::fmt;

use tracing::debug;

use super::field::{FieldInfo, TypeInfo};
use super::numeric::Conversion;
use super::Reflect;
use crate::error::{Error, Result};

fn resolve_conversion<F: 'static>(
    info: &TypeInfo,
    field: &FieldInfo,
    from: TypeId,
    to: TypeId,
) -> Result<Conversion> {
    Conversion::resolve(from, to).ok_or(Error::AccessorShape {
        type_name: info.name(),
        field: field.name(),
        field_type: field.value_type().name(),
        requested: type_name::<F>(),
    })
}

fn source_error(info: &TypeInfo, field: &FieldInfo) -> Error {
    Error::SourceType {
        type_name: info.name(),
        field: field.name(),
    }
}

/// Reads a field from a statically typed source.
pub struct FieldGetter<S, F> {
    field: &'static str,
    read: Box<dyn Fn(&S) -> Option<F>>,
}

impl<S, F> FieldGetter<S, F> {
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn get(&self, source: &S) -> F {
        match (self.read)(source) {
            Some(value) => value,
            None => unreachable!("field `{}` was type checked at synthesis", self.field),
        }
    }
}

/// Reads a field from a source passed as `&dyn Any`.
pub struct DynFieldGetter<F> {
    field: &'static str,
    read: Box<dyn Fn(&dyn Any) -> Result<F>>,
}

impl<F> DynFieldGetter<F> {
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn get(&self, source: &dyn Any) -> Result<F> {
        (self.read)(source)
    }
}

/// Reads a field as a boxed value from a source passed as `&dyn Any`.
pub struct ErasedFieldGetter {
    field: &'static str,
    read: Box<dyn Fn(&dyn Any) -> Result<Box<dyn Any>>>,
}

impl ErasedFieldGetter {
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn get(&self, source: &dyn Any) -> Result<Box<dyn Any>> {
        (self.read)(source)
    }
}

/// Writes a field of a statically typed source.
pub struct FieldSetter<S, F> {
    field: &'static str,
    write: Box<dyn Fn(&mut S, F) -> bool>,
}

impl<S, F> FieldSetter<S, F> {
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn set(&self, source: &mut S, value: F) {
        if !(self.write)(source, value) {
            unreachable!("field `{}` was type checked at synthesis", self.field);
        }
    }
}

/// Writes a typed value into a field of a source passed as `&mut dyn Any`.
pub struct DynFieldSetter<F> {
    field: &'static str,
    write: Box<dyn Fn(&mut dyn Any, F) -> Result<()>>,
}

impl<F> DynFieldSetter<F> {
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn set(&self, source: &mut dyn Any, value: F) -> Result<()> {
        (self.write)(source, value)
    }
}

/// Writes a boxed value into a field of a source passed as `&mut dyn Any`.
/// The value must have the field's exact storage type.
pub struct ErasedFieldSetter {
    field: &'static str,
    write: Box<dyn Fn(&mut dyn Any, Box<dyn Any>) -> Result<()>>,
}

impl ErasedFieldSetter {
    pub fn field(&self) -> &'static str {
        self.field
    }

    pub fn set(&self, source: &mut dyn Any, value: Box<dyn Any>) -> Result<()> {
        (self.write)(source, value)
    }
}

macro_rules! impl_debug {
    ($($name:ident $(<$($param:ident),*>)?),*) => {
        $(
            impl$(<$($param),*>)? fmt::Debug for $name$(<$($param),*>)? {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.debug_struct(stringify!($name))
                        .field("field", &self.field)
                        .finish_non_exhaustive()
                }
            }
        )*
    };
}

impl_debug!(
    FieldGetter<S, F>,
    DynFieldGetter<F>,
    ErasedFieldGetter,
    FieldSetter<S, F>,
    DynFieldSetter<F>,
    ErasedFieldSetter
);

/// Build a getter for field `name` of `S`, returning it as `F`.
pub fn field_get<S, F>(name: &str) -> Result<Option<FieldGetter<S, F>>>
where
    S: Reflect,
    F: Clone + 'static,
{
    let info = S::type_info();
    let Some(field) = info.field(name) else {
        debug!("No field `{}` on {}", name, info.name());
        return Ok(None);
    };
    let field = *field;
    let conversion =
        resolve_conversion::<F>(info, &field, field.value_type().id(), TypeId::of::<F>())?;
    debug!(
        "Synthesized getter for {}::{} as {}",
        info.name(),
        field.name(),
        type_name::<F>()
    );

    Ok(Some(FieldGetter {
        field: field.name(),
        read: Box::new(move |source: &S| {
            field
                .read(source)
                .and_then(|value| conversion.apply::<F>(value))
        }),
    }))
}

/// Build a getter for field `name` of the type described by `info`, taking the
/// source as `&dyn Any` and returning the value as `F`.
pub fn field_get_dyn<F>(info: &'static TypeInfo, name: &str) -> Result<Option<DynFieldGetter<F>>>
where
    F: Clone + 'static,
{
    let Some(field) = info.field(name) else {
        debug!("No field `{}` on {}", name, info.name());
        return Ok(None);
    };
    let field = *field;
    let conversion =
        resolve_conversion::<F>(info, &field, field.value_type().id(), TypeId::of::<F>())?;
    debug!(
        "Synthesized dynamic getter for {}::{} as {}",
        info.name(),
        field.name(),
        type_name::<F>()
    );

    Ok(Some(DynFieldGetter {
        field: field.name(),
        read: Box::new(move |source: &dyn Any| {
            field
                .read(source)
                .and_then(|value| conversion.apply::<F>(value))
                .ok_or_else(|| source_error(info, &field))
        }),
    }))
}

/// Build a getter returning a boxed copy of field `name` of the type described by `info`.
pub fn field_get_erased(info: &'static TypeInfo, name: &str) -> Option<ErasedFieldGetter> {
    let Some(field) = info.field(name) else {
        debug!("No field `{}` on {}", name, info.name());
        return None;
    };
    let field = *field;
    debug!("Synthesized erased getter for {}::{}", info.name(), field.name());

    Some(ErasedFieldGetter {
        field: field.name(),
        read: Box::new(move |source: &dyn Any| {
            field
                .read(source)
                .and_then(|value| field.value_type().snapshot(value))
                .ok_or_else(|| source_error(info, &field))
        }),
    })
}

fn writable_field(info: &TypeInfo, name: &str) -> Option<FieldInfo> {
    match info.field(name) {
        None => {
            debug!("No field `{}` on {}", name, info.name());
            None
        }
        Some(field) if field.is_read_only() => {
            debug!("Field {}::{} is read-only", info.name(), name);
            None
        }
        Some(field) => Some(*field),
    }
}

/// Build a setter for field `name` of `S`, accepting values of type `F`.
pub fn field_set<S, F>(name: &str) -> Result<Option<FieldSetter<S, F>>>
where
    S: Reflect,
    F: 'static,
{
    let info = S::type_info();
    let Some(field) = writable_field(info, name) else {
        return Ok(None);
    };
    let conversion =
        resolve_conversion::<F>(info, &field, TypeId::of::<F>(), field.value_type().id())?;
    debug!(
        "Synthesized setter for {}::{} from {}",
        info.name(),
        field.name(),
        type_name::<F>()
    );

    Ok(Some(FieldSetter {
        field: field.name(),
        write: Box::new(move |source: &mut S, value: F| {
            let Some(value) = conversion.apply_boxed(Box::new(value)) else {
                return false;
            };
            field
                .write(source)
                .is_some_and(|slot| field.value_type().store(slot, value))
        }),
    }))
}

/// Build a setter for field `name` of the type described by `info`, taking the
/// source as `&mut dyn Any` and values of type `F`.
pub fn field_set_dyn<F>(info: &'static TypeInfo, name: &str) -> Result<Option<DynFieldSetter<F>>>
where
    F: 'static,
{
    let Some(field) = writable_field(info, name) else {
        return Ok(None);
    };
    let conversion =
        resolve_conversion::<F>(info, &field, TypeId::of::<F>(), field.value_type().id())?;
    debug!(
        "Synthesized dynamic setter for {}::{} from {}",
        info.name(),
        field.name(),
        type_name::<F>()
    );

    Ok(Some(DynFieldSetter {
        field: field.name(),
        write: Box::new(move |source: &mut dyn Any, value: F| {
            let slot = field
                .write(source)
                .ok_or_else(|| source_error(info, &field))?;
            let stored = conversion
                .apply_boxed(Box::new(value))
                .is_some_and(|value| field.value_type().store(slot, value));
            if stored {
                Ok(())
            } else {
                Err(Error::ValueType {
                    type_name: info.name(),
                    field: field.name(),
                    expected: field.value_type().name(),
                })
            }
        }),
    }))
}

/// Build a setter for field `name` of the type described by `info` that takes
/// both the source and the value dynamically.
pub fn field_set_erased(info: &'static TypeInfo, name: &str) -> Option<ErasedFieldSetter> {
    let field = writable_field(info, name)?;
    debug!("Synthesized erased setter for {}::{}", info.name(), field.name());

    Some(ErasedFieldSetter {
        field: field.name(),
        write: Box::new(move |source: &mut dyn Any, value: Box<dyn Any>| {
            let slot = field
                .write(source)
                .ok_or_else(|| source_error(info, &field))?;
            if field.value_type().store(slot, value) {
                Ok(())
            } else {
                Err(Error::ValueType {
                    type_name: info.name(),
                    field: field.name(),
                    expected: field.value_type().name(),
                })
            }
        }),
    })
}
