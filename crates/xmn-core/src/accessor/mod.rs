//! Field accessors built from compile-time field tables.
//!
//! A type opts in with [`reflect_fields!`](crate::reflect_fields), which
//! generates its [`TypeInfo`]: one entry per listed field with its
//! visibility, storage type and raw projection functions. The `synth`
//! functions turn a `(type, field name)` pair into a typed getter or setter.
//!
//! ```
//! use xmn_core::accessor::{Reflect, field_get, field_set};
//! use xmn_core::reflect_fields;
//!
//! struct Depot {
//!     pub name: String,
//!     stock: u32,
//! }
//!
//! reflect_fields!(Depot {
//!     pub name: String => ro,
//!     stock: u32 => rw,
//! });
//!
//! let stock = field_get::<Depot, u64>("stock").unwrap().unwrap();
//! let set_stock = field_set::<Depot, u32>("stock").unwrap().unwrap();
//!
//! let mut depot = Depot { name: "north".into(), stock: 3 };
//! set_stock.set(&mut depot, 10);
//! assert_eq!(stock.get(&depot), 10);
//! assert!(field_set::<Depot, String>("name").unwrap().is_none());
//! ```

mod field;
mod numeric;
mod synth;

use std::any::Any;

pub use field::*;
pub use numeric::NumericKind;
pub use synth::*;

/// Types with a generated field table.
pub trait Reflect: Any + Sized {
    fn type_info() -> &'static TypeInfo;
}

/// Generate a [`Reflect`] implementation from a field list.
///
/// Each entry is `visibility name: Type => access`, where `access` is `rw`
/// for a writable field or `ro` for a read-only one. Only a bare `pub` makes
/// the field public to lookups. Field types must be `Clone + 'static`. The
/// macro must be invoked where the listed fields are accessible.
///
/// The declared type must be the field's actual type:
///
/// ```compile_fail
/// use xmn_core::reflect_fields;
///
/// struct Depot {
///     stock: u16,
/// }
///
/// reflect_fields!(Depot {
///     stock: u32 => rw,
/// });
/// ```
#[macro_export]
macro_rules! reflect_fields {
    (@write $ty:ty, $field:ident : $fty:ty, rw) => {
        ::std::option::Option::Some({
            fn write(
                source: &mut dyn ::std::any::Any,
            ) -> ::std::option::Option<&mut dyn ::std::any::Any> {
                source.downcast_mut::<$ty>().map(|s| {
                    let field: &mut $fty = &mut s.$field;
                    field as &mut dyn ::std::any::Any
                })
            }
            write as $crate::accessor::WriteFn
        })
    };
    (@write $ty:ty, $field:ident : $fty:ty, ro) => {
        ::std::option::Option::None
    };
    ($ty:ty { $( $vis:vis $field:ident : $fty:ty => $access:ident ),* $(,)? }) => {
        impl $crate::accessor::Reflect for $ty {
            fn type_info() -> &'static $crate::accessor::TypeInfo {
                static INFO: ::std::sync::OnceLock<$crate::accessor::TypeInfo> =
                    ::std::sync::OnceLock::new();
                INFO.get_or_init(|| {
                    $crate::accessor::TypeInfo::new::<$ty>(::std::vec![
                        $(
                            $crate::accessor::FieldInfo::new(
                                ::std::stringify!($field),
                                $crate::accessor::Visibility::from_token(::std::stringify!($vis)),
                                $crate::accessor::ValueType::of::<$fty>(),
                                {
                                    fn read(
                                        source: &dyn ::std::any::Any,
                                    ) -> ::std::option::Option<&dyn ::std::any::Any> {
                                        source.downcast_ref::<$ty>().map(|s| {
                                            let field: &$fty = &s.$field;
                                            field as &dyn ::std::any::Any
                                        })
                                    }
                                    read as $crate::accessor::ReadFn
                                },
                                $crate::reflect_fields!(@write $ty, $field: $fty, $access),
                            ),
                        )*
                    ])
                })
            }
        }
    };
}
