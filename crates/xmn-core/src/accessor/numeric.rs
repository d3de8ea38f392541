//! Numeric conversions between primitive field types.
//!
//! A field of one primitive numeric type may be read or written through an
//! accessor typed with another. The conversion follows `as` cast semantics
//! (truncating between integers, saturating from floats).

use std::any::{Any, TypeId};

use strum::{Display, EnumIter, IntoEnumIterator};

#[derive(Debug, Clone, Copy)]
enum Number {
    Int(i128),
    UInt(u128),
    Float(f64),
}

macro_rules! numeric_kinds {
    ($( $kind:ident => $ty:ty as $repr:ident ),* $(,)?) => {
        /// Primitive numeric types that accessors convert between.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
        #[strum(serialize_all = "lowercase")]
        pub enum NumericKind {
            $( $kind, )*
        }

        impl NumericKind {
            pub fn type_id(self) -> TypeId {
                match self {
                    $( Self::$kind => TypeId::of::<$ty>(), )*
                }
            }

            fn read(self, value: &dyn Any) -> Option<Number> {
                match self {
                    $( Self::$kind => value.downcast_ref::<$ty>().map(|v| Number::$repr((*v).into_repr())), )*
                }
            }

            fn write(self, number: Number) -> Box<dyn Any> {
                match self {
                    $(
                        Self::$kind => Box::new(match number {
                            Number::Int(v) => v as $ty,
                            Number::UInt(v) => v as $ty,
                            Number::Float(v) => v as $ty,
                        }),
                    )*
                }
            }
        }
    };
}

trait IntoRepr<R> {
    fn into_repr(self) -> R;
}

macro_rules! into_repr {
    ($repr:ty: $( $ty:ty ),*) => {
        $(
            impl IntoRepr<$repr> for $ty {
                fn into_repr(self) -> $repr {
                    self as $repr
                }
            }
        )*
    };
}

into_repr!(i128: i8, i16, i32, i64, i128, isize);
into_repr!(u128: u8, u16, u32, u64, u128, usize);
into_repr!(f64: f32, f64);

numeric_kinds! {
    I8 => i8 as Int,
    I16 => i16 as Int,
    I32 => i32 as Int,
    I64 => i64 as Int,
    I128 => i128 as Int,
    Isize => isize as Int,
    U8 => u8 as UInt,
    U16 => u16 as UInt,
    U32 => u32 as UInt,
    U64 => u64 as UInt,
    U128 => u128 as UInt,
    Usize => usize as UInt,
    F32 => f32 as Float,
    F64 => f64 as Float,
}

impl NumericKind {
    pub fn of(id: TypeId) -> Option<Self> {
        Self::iter().find(|kind| kind.type_id() == id)
    }

    /// Convert a value of this kind into a boxed value of kind `to`.
    /// `None` if `value` is not of this kind.
    pub fn cast(self, value: &dyn Any, to: NumericKind) -> Option<Box<dyn Any>> {
        self.read(value).map(|number| to.write(number))
    }
}

/// Conversion between a field's storage type and the type an accessor exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Conversion {
    Identity,
    Numeric { from: NumericKind, to: NumericKind },
}

impl Conversion {
    /// Resolve the conversion from `from` to `to`, if one exists.
    pub(crate) fn resolve(from: TypeId, to: TypeId) -> Option<Self> {
        if from == to {
            return Some(Self::Identity);
        }
        match (NumericKind::of(from), NumericKind::of(to)) {
            (Some(from), Some(to)) => Some(Self::Numeric { from, to }),
            _ => None,
        }
    }

    /// Apply a numeric conversion to a boxed value. Identity returns the box as is.
    pub(crate) fn apply_boxed(self, value: Box<dyn Any>) -> Option<Box<dyn Any>> {
        match self {
            Self::Identity => Some(value),
            Self::Numeric { from, to } => from.cast(&*value, to),
        }
    }

    /// Produce an owned `T` from a borrowed value of the source type.
    pub(crate) fn apply<T: Clone + 'static>(self, value: &dyn Any) -> Option<T> {
        match self {
            Self::Identity => value.downcast_ref::<T>().cloned(),
            Self::Numeric { from, to } => from
                .cast(value, to)
                .and_then(|boxed| boxed.downcast::<T>().ok())
                .map(|boxed| *boxed),
        }
    }
}
