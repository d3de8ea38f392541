//! Integration tests for field accessors
//!
//! Exercises the generated field tables through the public API only.

use std::any::Any;

use xmn_core::accessor::{FieldLookup, Visibility};
use xmn_core::{
    Error, Reflect, field_get, field_get_dyn, field_get_erased, field_set, field_set_dyn,
    field_set_erased, reflect_fields,
};

#[derive(Debug, Clone, PartialEq)]
struct Cargo {
    pub kind: String,
    pub amount: f32,
    pub(crate) station: u16,
    weight: i64,
    pub id: u32,
    tags: Vec<String>,
}

reflect_fields!(Cargo {
    pub kind: String => rw,
    pub amount: f32 => rw,
    pub(crate) station: u16 => rw,
    weight: i64 => rw,
    pub id: u32 => ro,
    tags: Vec<String> => ro,
});

fn cargo() -> Cargo {
    Cargo {
        kind: "grain".to_string(),
        amount: 2.5,
        station: 14,
        weight: -3,
        id: 1001,
        tags: vec!["bulk".to_string()],
    }
}

mod getter_tests {
    use super::*;

    #[test]
    fn test_every_field_is_readable() {
        let cargo = cargo();
        let info = Cargo::type_info();

        for field in info.fields() {
            let getter = field_get_erased(info, field.name()).unwrap();
            let value = getter.get(&cargo).unwrap();
            let matches = match field.name() {
                "kind" => value.downcast_ref::<String>() == Some(&cargo.kind),
                "amount" => value.downcast_ref::<f32>() == Some(&cargo.amount),
                "station" => value.downcast_ref::<u16>() == Some(&cargo.station),
                "weight" => value.downcast_ref::<i64>() == Some(&cargo.weight),
                "id" => value.downcast_ref::<u32>() == Some(&cargo.id),
                "tags" => value.downcast_ref::<Vec<String>>() == Some(&cargo.tags),
                other => panic!("unexpected field {}", other),
            };
            assert!(matches, "field {} read back a different value", field.name());
        }
    }

    #[test]
    fn test_typed_getters() {
        let cargo = cargo();

        let kind = field_get::<Cargo, String>("kind").unwrap().unwrap();
        let weight = field_get::<Cargo, i64>("weight").unwrap().unwrap();
        let tags = field_get::<Cargo, Vec<String>>("tags").unwrap().unwrap();

        assert_eq!(kind.get(&cargo), "grain");
        assert_eq!(weight.get(&cargo), -3);
        assert_eq!(tags.get(&cargo), vec!["bulk".to_string()]);
    }

    #[test]
    fn test_getter_sees_later_mutation() {
        let getter = field_get::<Cargo, f32>("amount").unwrap().unwrap();
        let mut cargo = cargo();
        cargo.amount = 9.0;
        assert_eq!(getter.get(&cargo), 9.0);
    }

    #[test]
    fn test_numeric_widening_getter() {
        let station = field_get_dyn::<u64>(Cargo::type_info(), "station")
            .unwrap()
            .unwrap();
        assert_eq!(station.get(&cargo()).unwrap(), 14);
    }

    #[test]
    fn test_incompatible_shape_fails_eagerly() {
        let err = field_get::<Cargo, u8>("kind").unwrap_err();
        assert!(matches!(
            err,
            Error::AccessorShape {
                field: "kind",
                requested: "u8",
                ..
            }
        ));

        assert!(field_get_dyn::<String>(Cargo::type_info(), "amount").is_err());
        assert!(field_set::<Cargo, String>("weight").is_err());
        assert!(field_set_dyn::<bool>(Cargo::type_info(), "station").is_err());
    }

    #[test]
    fn test_wrong_source_type() {
        let getter = field_get_erased(Cargo::type_info(), "kind").unwrap();
        let not_cargo: Box<dyn Any> = Box::new(5u32);
        assert!(matches!(
            getter.get(not_cargo.as_ref()),
            Err(Error::SourceType { .. })
        ));
    }
}

mod setter_tests {
    use super::*;

    #[test]
    fn test_writable_fields() {
        let mut cargo = cargo();

        field_set::<Cargo, String>("kind")
            .unwrap()
            .unwrap()
            .set(&mut cargo, "ore".to_string());
        field_set::<Cargo, f64>("amount")
            .unwrap()
            .unwrap()
            .set(&mut cargo, 4.0);
        field_set_dyn::<i32>(Cargo::type_info(), "weight")
            .unwrap()
            .unwrap()
            .set(&mut cargo, 17)
            .unwrap();
        field_set_erased(Cargo::type_info(), "station")
            .unwrap()
            .set(&mut cargo, Box::new(3u16))
            .unwrap();

        assert_eq!(cargo.kind, "ore");
        assert_eq!(cargo.amount, 4.0);
        assert_eq!(cargo.weight, 17);
        assert_eq!(cargo.station, 3);
    }

    #[test]
    fn test_read_only_fields_have_no_setter() {
        for name in ["id", "tags"] {
            assert!(field_set::<Cargo, u32>(name).unwrap().is_none());
            assert!(field_set_erased(Cargo::type_info(), name).is_none());
        }
    }

    #[test]
    fn test_missing_fields_have_no_accessor() {
        for name in ["volume", "Kind", ""] {
            assert!(field_get::<Cargo, u32>(name).unwrap().is_none());
            assert!(field_set::<Cargo, u32>(name).unwrap().is_none());
            assert!(field_get_dyn::<u32>(Cargo::type_info(), name).unwrap().is_none());
            assert!(field_set_dyn::<u32>(Cargo::type_info(), name).unwrap().is_none());
        }
    }

    #[test]
    fn test_lookup_tells_missing_from_read_only() {
        let info = Cargo::type_info();

        assert!(matches!(info.lookup("volume"), FieldLookup::Missing));
        assert!(matches!(info.lookup("id"), FieldLookup::ReadOnly(f) if f.name() == "id"));
        assert!(matches!(info.lookup("kind"), FieldLookup::Writable(_)));
    }

    #[test]
    fn test_wrong_value_type() {
        let setter = field_set_erased(Cargo::type_info(), "kind").unwrap();
        let mut cargo = cargo();

        let err = setter.set(&mut cargo, Box::new(12)).unwrap_err();
        assert!(matches!(err, Error::ValueType { field: "kind", .. }));
        assert_eq!(cargo.kind, "grain");
    }
}

mod metadata_tests {
    use super::*;

    #[test]
    fn test_field_metadata() {
        let info = Cargo::type_info();
        assert!(info.name().ends_with("Cargo"));
        assert_eq!(info.fields().len(), 6);

        let visibility = |name: &str| info.field(name).unwrap().visibility();
        assert_eq!(visibility("kind"), Visibility::Public);
        assert_eq!(visibility("station"), Visibility::NonPublic);
        assert_eq!(visibility("weight"), Visibility::NonPublic);

        let id = info.field("id").unwrap();
        assert!(id.is_read_only());
        assert_eq!(id.value_type().name(), "u32");
    }

    #[test]
    fn test_type_info_is_cached() {
        assert!(std::ptr::eq(Cargo::type_info(), Cargo::type_info()));
    }
}
