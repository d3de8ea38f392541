use std::any::{Any, TypeId, type_name};
use std::fmt;

use strum::{Display, EnumString};

/// Declared visibility of a reflected field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "snake_case")]
pub enum Visibility {
    Public,
    NonPublic,
}

impl Visibility {
    /// Map a stringified visibility token (`pub`, `pub(crate)`, empty) to a visibility.
    ///
    /// Only a bare `pub` counts as public; restricted visibilities behave like
    /// private fields.
    pub fn from_token(token: &str) -> Self {
        if token.trim() == "pub" {
            Self::Public
        } else {
            Self::NonPublic
        }
    }
}

/// Storage type of a field, with the operations needed to move values in and
/// out of it without knowing the type statically.
#[derive(Clone, Copy)]
pub struct ValueType {
    id: TypeId,
    name: &'static str,
    snapshot: fn(&dyn Any) -> Option<Box<dyn Any>>,
    store: fn(&mut dyn Any, Box<dyn Any>) -> bool,
}

impl ValueType {
    pub fn of<T: Clone + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
            snapshot: snapshot::<T>,
            store: store::<T>,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Clone the value behind `slot` into a box. `None` if `slot` holds another type.
    pub fn snapshot(&self, slot: &dyn Any) -> Option<Box<dyn Any>> {
        (self.snapshot)(slot)
    }

    /// Move `value` into `slot`. Returns false when either side has the wrong type.
    pub fn store(&self, slot: &mut dyn Any, value: Box<dyn Any>) -> bool {
        (self.store)(slot, value)
    }
}

impl fmt::Debug for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

fn snapshot<T: Clone + 'static>(slot: &dyn Any) -> Option<Box<dyn Any>> {
    slot.downcast_ref::<T>()
        .map(|value| Box::new(value.clone()) as Box<dyn Any>)
}

fn store<T: 'static>(slot: &mut dyn Any, value: Box<dyn Any>) -> bool {
    match (slot.downcast_mut::<T>(), value.downcast::<T>()) {
        (Some(slot), Ok(value)) => {
            *slot = *value;
            true
        }
        _ => false,
    }
}

pub type ReadFn = fn(&dyn Any) -> Option<&dyn Any>;
pub type WriteFn = fn(&mut dyn Any) -> Option<&mut dyn Any>;

/// Metadata and raw access code for one field of a reflected type.
///
/// `read` and `write` project an instance of the declaring type onto the
/// field; they return `None` when handed an instance of another type.
/// A field without `write` is read-only.
#[derive(Clone, Copy)]
pub struct FieldInfo {
    name: &'static str,
    visibility: Visibility,
    value_type: ValueType,
    read: ReadFn,
    write: Option<WriteFn>,
}

impl FieldInfo {
    pub fn new(
        name: &'static str,
        visibility: Visibility,
        value_type: ValueType,
        read: ReadFn,
        write: Option<WriteFn>,
    ) -> Self {
        Self {
            name,
            visibility,
            value_type,
            read,
            write,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn value_type(&self) -> &ValueType {
        &self.value_type
    }

    pub fn is_read_only(&self) -> bool {
        self.write.is_none()
    }

    pub(crate) fn read<'a>(&self, source: &'a dyn Any) -> Option<&'a dyn Any> {
        (self.read)(source)
    }

    pub(crate) fn write<'a>(&self, source: &'a mut dyn Any) -> Option<&'a mut dyn Any> {
        self.write.and_then(|write| write(source))
    }
}

impl fmt::Debug for FieldInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldInfo")
            .field("name", &self.name)
            .field("visibility", &self.visibility)
            .field("value_type", &self.value_type)
            .field("read_only", &self.is_read_only())
            .finish()
    }
}

/// Outcome of looking a field up for writing.
#[derive(Debug, Clone, Copy)]
pub enum FieldLookup<'a> {
    Missing,
    ReadOnly(&'a FieldInfo),
    Writable(&'a FieldInfo),
}

/// Runtime descriptor of a reflected type: its name, identity and field table.
#[derive(Debug)]
pub struct TypeInfo {
    name: &'static str,
    id: TypeId,
    fields: Vec<FieldInfo>,
}

impl TypeInfo {
    pub fn new<S: 'static>(fields: Vec<FieldInfo>) -> Self {
        Self {
            name: type_name::<S>(),
            id: TypeId::of::<S>(),
            fields,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn fields(&self) -> &[FieldInfo] {
        &self.fields
    }

    /// Resolve a field by name: public fields first, then non-public, then any.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        let by_visibility = |visibility: Visibility| {
            self.fields
                .iter()
                .find(|f| f.name == name && f.visibility == visibility)
        };

        by_visibility(Visibility::Public)
            .or_else(|| by_visibility(Visibility::NonPublic))
            .or_else(|| self.fields.iter().find(|f| f.name == name))
    }

    /// Resolve a field and report whether a setter could be built for it.
    pub fn lookup(&self, name: &str) -> FieldLookup<'_> {
        match self.field(name) {
            None => FieldLookup::Missing,
            Some(field) if field.is_read_only() => FieldLookup::ReadOnly(field),
            Some(field) => FieldLookup::Writable(field),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_visibility_from_token() {
        assert_eq!(Visibility::from_token("pub"), Visibility::Public);
        assert_eq!(Visibility::from_token(""), Visibility::NonPublic);
        assert_eq!(Visibility::from_token("pub(crate)"), Visibility::NonPublic);
        assert_eq!(Visibility::from_token("pub (super)"), Visibility::NonPublic);
    }

    #[test]
    fn test_visibility_names() {
        assert_eq!(Visibility::NonPublic.to_string(), "non_public");
        assert_eq!("public".parse::<Visibility>().unwrap(), Visibility::Public);
    }

    #[test]
    fn test_value_type_store_and_snapshot() {
        let ty = ValueType::of::<u32>();
        let mut slot = 5u32;

        assert!(ty.store(&mut slot, Box::new(9u32)));
        assert_eq!(slot, 9);
        assert!(!ty.store(&mut slot, Box::new(9i64)));
        assert_eq!(slot, 9);

        let copy = ty.snapshot(&slot).unwrap();
        assert_eq!(*copy.downcast::<u32>().unwrap(), 9);
        assert!(ty.snapshot(&"text").is_none());
    }

    struct Pair {
        left: i32,
    }

    fn read_left(source: &dyn Any) -> Option<&dyn Any> {
        source.downcast_ref::<Pair>().map(|p| &p.left as &dyn Any)
    }

    #[test]
    fn test_field_resolution_prefers_public() {
        let info = TypeInfo::new::<Pair>(vec![
            FieldInfo::new(
                "left",
                Visibility::NonPublic,
                ValueType::of::<i32>(),
                read_left,
                None,
            ),
            FieldInfo::new(
                "left",
                Visibility::Public,
                ValueType::of::<i64>(),
                read_left,
                None,
            ),
        ]);

        let field = info.field("left").unwrap();
        assert_eq!(field.visibility(), Visibility::Public);
        assert!(info.field("right").is_none());
        assert!(matches!(info.lookup("left"), FieldLookup::ReadOnly(_)));
        assert!(matches!(info.lookup("right"), FieldLookup::Missing));

        let pair = Pair { left: 3 };
        let value = field.read(&pair).unwrap();
        assert_eq!(value.downcast_ref::<i32>(), Some(&3));
    }
}
