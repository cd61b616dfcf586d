//! End-to-end decode/encode behaviour of the mapper against small fixture models.

use std::sync::Arc;

use json_model::{
    ConfigurationError, DecodeError, DeclaredType, DescriptorBuilder, EncodeError, FieldError,
    FieldErrorCode, FieldErrorKind, Fields, JsonModel, KeyMapper, Mapper, MapperOptions,
    ModelDescriptor, PlatformTag, RawKind, TargetType, TransformError, TransformerRef,
    TransformerRegistry,
};
use serde_json::{json, Value};

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

#[derive(Debug, PartialEq)]
struct Profile {
    user_name: String,
    age: i64,
    score: Option<f64>,
    active: Option<bool>,
}

impl JsonModel for Profile {
    fn describe() -> Result<ModelDescriptor, ConfigurationError> {
        let mut b = DescriptorBuilder::new("Profile");
        b.declare_property("userName", DeclaredType::string(), None)?
            .declare_property("age", DeclaredType::int(), Some(TransformerRef::STRING))?
            .declare_optional_property("score", DeclaredType::float(), None)?
            .declare_optional_property("active", DeclaredType::bool(), None)?;
        b.build()
    }

    fn from_fields(fields: &mut Fields) -> Result<Self, FieldError> {
        Ok(Self {
            user_name: fields.take("userName")?,
            age: fields.take("age")?,
            score: fields.take_opt("score")?,
            active: fields.take_opt("active")?,
        })
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields
            .insert("userName", self.user_name.clone())
            .insert("age", self.age)
            .insert_opt("score", self.score)
            .insert_opt("active", self.active);
        fields
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct TouchShade(u8);

#[derive(Debug, Clone, Copy, PartialEq)]
struct DesktopShade(u8);

#[derive(Debug, PartialEq)]
struct Swatch {
    shade: DesktopShade,
}

fn shade_type() -> DeclaredType {
    DeclaredType::platform([
        (PlatformTag::UIKIT, TargetType::of::<TouchShade>()),
        (PlatformTag::APPKIT, TargetType::of::<DesktopShade>()),
    ])
}

impl JsonModel for Swatch {
    const PLATFORM: PlatformTag = PlatformTag::APPKIT;

    fn describe() -> Result<ModelDescriptor, ConfigurationError> {
        let mut b = DescriptorBuilder::new("Swatch");
        b.declare_property("shade", shade_type(), Some(TransformerRef::NUMBER))?;
        b.build()
    }

    fn from_fields(fields: &mut Fields) -> Result<Self, FieldError> {
        Ok(Self {
            shade: fields.take("shade")?,
        })
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("shade", self.shade);
        fields
    }
}

fn shade_byte(raw: &Value) -> Result<u8, TransformError> {
    raw.as_u64()
        .and_then(|n| u8::try_from(n).ok())
        .ok_or_else(|| TransformError::invalid("shade", raw.to_string(), "not a byte"))
}

fn registry() -> TransformerRegistry {
    let mut r = TransformerRegistry::with_defaults();
    r.register(RawKind::Number, |raw| shade_byte(raw).map(TouchShade))
        .register(RawKind::Number, |raw| shade_byte(raw).map(DesktopShade))
        .register_export(|s: &TouchShade| json!(s.0))
        .register_export(|s: &DesktopShade| json!(s.0));
    r
}

fn mapper() -> Mapper {
    Mapper::new(registry())
}

/// The UIKit counterpart of [`Swatch`].
#[derive(Debug, PartialEq)]
struct TouchSwatch {
    shade: TouchShade,
}

impl JsonModel for TouchSwatch {
    const PLATFORM: PlatformTag = PlatformTag::UIKIT;

    fn describe() -> Result<ModelDescriptor, ConfigurationError> {
        let mut b = DescriptorBuilder::new("TouchSwatch");
        b.declare_property("shade", shade_type(), Some(TransformerRef::NUMBER))?;
        b.build()
    }

    fn from_fields(fields: &mut Fields) -> Result<Self, FieldError> {
        Ok(Self {
            shade: fields.take("shade")?,
        })
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("shade", self.shade);
        fields
    }
}

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

#[test]
fn describe_is_idempotent() {
    let a = Profile::describe().unwrap();
    let b = Profile::describe().unwrap();
    assert_eq!(a, b);
    let names_a: Vec<_> = a.properties().map(|p| p.name.clone()).collect();
    let names_b: Vec<_> = b.properties().map(|p| p.name.clone()).collect();
    assert_eq!(names_a, vec!["userName", "age", "score", "active"]);
    assert_eq!(names_a, names_b);
}

#[test]
fn prepare_is_cached_per_model() {
    let m = mapper();
    let first = m.prepare::<Profile>().unwrap();
    let second = m.prepare::<Profile>().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(first.descriptor().model(), "Profile");
    assert_eq!(first.bindings().len(), 4);
}

// ---------------------------------------------------------------------------
// Decode
// ---------------------------------------------------------------------------

#[test]
fn decode_native_values() {
    let p: Profile = mapper()
        .decode(&json!({"userName": "ada", "age": 36, "score": 9.5, "active": true}))
        .unwrap();
    assert_eq!(
        p,
        Profile {
            user_name: "ada".into(),
            age: 36,
            score: Some(9.5),
            active: Some(true),
        }
    );
}

#[test]
fn decode_routes_referenced_kind_through_transformer() {
    let p: Profile = mapper()
        .decode(&json!({"userName": "ada", "age": "36"}))
        .unwrap();
    assert_eq!(p.age, 36);
    assert_eq!(p.score, None);
    assert_eq!(p.active, None);
}

#[test]
fn decode_null_optional_is_none() {
    let p: Profile = mapper()
        .decode(&json!({"userName": "ada", "age": 1, "score": null}))
        .unwrap();
    assert_eq!(p.score, None);
}

#[test]
fn decode_missing_required_field() {
    let err = mapper().decode::<Profile>(&json!({"age": 1})).unwrap_err();
    let field = err.field("userName").unwrap();
    assert_eq!(field.kind, FieldErrorKind::Missing);
    assert_eq!(field.code(), FieldErrorCode::Missing);
}

#[test]
fn decode_null_required_field_is_missing() {
    let err = mapper()
        .decode::<Profile>(&json!({"userName": null, "age": 1}))
        .unwrap_err();
    assert_eq!(err.field("userName").unwrap().kind, FieldErrorKind::Missing);
}

#[test]
fn decode_collects_every_field_error() {
    let err = mapper()
        .decode::<Profile>(&json!({"userName": 5, "age": "old", "active": "yes"}))
        .unwrap_err();
    let errors = err.field_errors();
    assert_eq!(errors.len(), 3);
    assert_eq!(
        errors[0],
        FieldError::new(
            "userName",
            FieldErrorKind::TypeMismatch {
                expected: "string".into(),
                found: "number".into(),
            }
        )
    );
    assert_eq!(errors[1].field, "age");
    assert_eq!(errors[1].code(), FieldErrorCode::Transform);
    // `active` has no transformer, so a string is a type mismatch.
    assert_eq!(errors[2].field, "active");
    assert_eq!(errors[2].code(), FieldErrorCode::Type);
}

#[test]
fn decode_fractional_number_into_int_fails() {
    let err = mapper()
        .decode::<Profile>(&json!({"userName": "a", "age": 1.5}))
        .unwrap_err();
    assert_eq!(
        err.field("age").unwrap().kind,
        FieldErrorKind::TypeMismatch {
            expected: "integer".into(),
            found: "fractional number".into(),
        }
    );
}

#[test]
fn decode_rejects_non_object_payload() {
    let err = mapper().decode::<Profile>(&json!([1, 2])).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::UnexpectedPayload {
            expected: RawKind::Object,
            found: RawKind::Array,
            ..
        }
    ));
}

#[test]
fn decode_ignores_unknown_keys_by_default() {
    let p: Profile = mapper()
        .decode(&json!({"userName": "a", "age": 1, "extra": true}))
        .unwrap();
    assert_eq!(p.user_name, "a");
}

#[test]
fn decode_denies_unknown_keys_when_configured() {
    let m = Mapper::with_options(registry(), MapperOptions::default().deny_unknown_keys(true));
    let err = m
        .decode::<Profile>(&json!({"userName": "a", "age": 1, "extra": true}))
        .unwrap_err();
    assert_eq!(
        err.field_errors(),
        &[FieldError::new("extra", FieldErrorKind::UnknownKey)]
    );
}

#[test]
fn decode_with_snake_case_keys() {
    let m = Mapper::with_options(
        registry(),
        MapperOptions::default().with_key_mapper(KeyMapper::SnakeCase),
    );
    let p: Profile = m.decode(&json!({"user_name": "ada", "age": 2})).unwrap();
    assert_eq!(p.user_name, "ada");
    // Errors are attributed to the property, not the payload key.
    let err = m.decode::<Profile>(&json!({"age": 2})).unwrap_err();
    assert!(err.field("userName").is_some());
}

#[test]
fn decode_str_parses_text() {
    let p: Profile = mapper()
        .decode_str(r#"{"userName":"ada","age":"7"}"#)
        .unwrap();
    assert_eq!(p.age, 7);
    let err = mapper().decode_str::<Profile>("{not json").unwrap_err();
    assert!(matches!(err, DecodeError::Json(_)));
}

#[test]
fn decode_array_of_models() {
    let m = mapper();
    let items: Vec<Profile> = m
        .decode_array(&json!([
            {"userName": "a", "age": 1},
            {"userName": "b", "age": "2"},
            {"userName": "c", "age": 3}
        ]))
        .unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[1].age, 2);
    assert_eq!(items[2].user_name, "c");
    // Every element went through the one prepared model.
    assert!(format!("{m:?}").contains("prepared_count: 1"));
}

#[test]
fn decode_array_reports_element_index() {
    let err = mapper()
        .decode_array::<Profile>(&json!([{"userName": "a", "age": 1}, {"age": 2}]))
        .unwrap_err();
    match &err {
        DecodeError::Element { index, .. } => assert_eq!(*index, 1),
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.field("userName").is_some());
    let err = mapper().decode_array::<Profile>(&json!({})).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::UnexpectedPayload {
            expected: RawKind::Array,
            ..
        }
    ));
}

// ---------------------------------------------------------------------------
// Platform-conditional properties
// ---------------------------------------------------------------------------

#[test]
fn platform_conditional_decodes_resolved_type() {
    let s: Swatch = mapper().decode(&json!({"shade": 200})).unwrap();
    assert_eq!(s.shade, DesktopShade(200));
}

#[test]
fn platform_conditional_transform_failure_is_field_level() {
    let err = mapper()
        .decode::<Swatch>(&json!({"shade": 999}))
        .unwrap_err();
    let field = err.field("shade").unwrap();
    assert!(matches!(
        field.kind,
        FieldErrorKind::Transform(TransformError::Invalid { .. })
    ));
}

#[test]
fn platform_conditional_without_transformer_input_is_mismatch() {
    let err = mapper()
        .decode::<Swatch>(&json!({"shade": "200"}))
        .unwrap_err();
    assert_eq!(
        err.field("shade").unwrap().kind,
        FieldErrorKind::TypeMismatch {
            expected: "number".into(),
            found: "string".into(),
        }
    );
}

#[test]
fn each_model_resolves_against_its_own_platform() {
    let m = mapper();
    let desktop = m.prepare::<Swatch>().unwrap();
    assert_eq!(desktop.platform(), PlatformTag::APPKIT);
    assert!(desktop
        .binding("shade")
        .unwrap()
        .resolved
        .target()
        .is::<DesktopShade>());

    let touch = m.prepare::<TouchSwatch>().unwrap();
    assert_eq!(touch.platform(), PlatformTag::UIKIT);
    assert!(touch
        .binding("shade")
        .unwrap()
        .resolved
        .target()
        .is::<TouchShade>());

    // The same descriptor decodes into either family's type on one mapper.
    let t: TouchSwatch = m.decode(&json!({"shade": 1})).unwrap();
    assert_eq!(t.shade, TouchShade(1));
    assert_eq!(m.encode(&t).unwrap(), json!({"shade": 1}));
    let d: Swatch = m.decode(&json!({"shade": 1})).unwrap();
    assert_eq!(d.shade, DesktopShade(1));
}

#[derive(Debug)]
struct Unplaced;

impl JsonModel for Unplaced {
    const PLATFORM: PlatformTag = PlatformTag::new("gtk");

    fn describe() -> Result<ModelDescriptor, ConfigurationError> {
        Swatch::describe()
    }

    fn from_fields(_fields: &mut Fields) -> Result<Self, FieldError> {
        Ok(Self)
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
    }
}

#[test]
fn undeclared_platform_is_configuration_error() {
    let err = mapper().decode::<Unplaced>(&json!({"shade": 1})).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Configuration(ConfigurationError::UnresolvedPlatform { .. })
    ));
}

#[test]
fn explicit_keys_must_be_distinct() {
    let m = Mapper::with_options(
        registry(),
        MapperOptions::default()
            .with_key_mapper(KeyMapper::explicit([("userName", "n"), ("age", "n")])),
    );
    let err = m.prepare::<Profile>().unwrap_err();
    assert_eq!(
        err,
        ConfigurationError::DuplicateKey {
            model: "Profile".into(),
            key: "n".into(),
            first: "userName".into(),
            second: "age".into(),
        }
    );
    let err = m.encode(&Profile {
        user_name: "ada".into(),
        age: 1,
        score: None,
        active: None,
    });
    assert!(matches!(
        err,
        Err(EncodeError::Configuration(ConfigurationError::DuplicateKey { .. }))
    ));
}

#[derive(Debug)]
struct Spelled;

impl JsonModel for Spelled {
    fn describe() -> Result<ModelDescriptor, ConfigurationError> {
        let mut b = DescriptorBuilder::new("Spelled");
        b.declare_property("userName", DeclaredType::string(), None)?
            .declare_property("user_name", DeclaredType::string(), None)?;
        b.build()
    }

    fn from_fields(_fields: &mut Fields) -> Result<Self, FieldError> {
        Ok(Self)
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
    }
}

#[test]
fn snake_case_collisions_are_rejected() {
    assert!(mapper().prepare::<Spelled>().is_ok());
    let m = Mapper::with_options(
        registry(),
        MapperOptions::default().with_key_mapper(KeyMapper::SnakeCase),
    );
    let err = m.decode::<Spelled>(&json!({"user_name": "a"})).unwrap_err();
    assert!(matches!(
        err,
        DecodeError::Configuration(ConfigurationError::DuplicateKey { ref key, .. })
            if key == "user_name"
    ));
}

#[test]
fn unregistered_transformer_fails_at_prepare() {
    let m = Mapper::new(TransformerRegistry::with_defaults());
    let err = m.prepare::<Swatch>().unwrap_err();
    assert!(matches!(
        err,
        ConfigurationError::UnregisteredTransformer {
            raw: RawKind::Number,
            ..
        }
    ));
}

// ---------------------------------------------------------------------------
// Encode
// ---------------------------------------------------------------------------

#[test]
fn encode_keeps_declaration_order_and_omits_absent_optionals() {
    let p = Profile {
        user_name: "ada".into(),
        age: 36,
        score: None,
        active: Some(false),
    };
    let m = mapper();
    assert_eq!(
        m.encode(&p).unwrap(),
        json!({"userName": "ada", "age": 36, "active": false})
    );
    assert_eq!(
        m.encode_string(&p).unwrap(),
        r#"{"userName":"ada","age":36,"active":false}"#
    );
}

#[test]
fn encode_uses_key_mapper() {
    let m = Mapper::with_options(
        registry(),
        MapperOptions::default().with_key_mapper(KeyMapper::SnakeCase),
    );
    let p = Profile {
        user_name: "ada".into(),
        age: 1,
        score: Some(0.5),
        active: None,
    };
    assert_eq!(
        m.encode(&p).unwrap(),
        json!({"user_name": "ada", "age": 1, "score": 0.5})
    );
}

#[test]
fn encode_custom_type_through_export() {
    let s = Swatch {
        shade: DesktopShade(7),
    };
    assert_eq!(mapper().encode(&s).unwrap(), json!({"shade": 7}));
}

#[test]
fn encode_non_finite_float_fails() {
    let p = Profile {
        user_name: "a".into(),
        age: 1,
        score: Some(f64::NAN),
        active: None,
    };
    let err = mapper().encode(&p).unwrap_err();
    assert!(matches!(err, EncodeError::Transform { ref field, .. } if field == "score"));
}

/// Declares the AppKit type but hands over the UIKit one.
#[derive(Debug)]
struct Mislabeled;

impl JsonModel for Mislabeled {
    const PLATFORM: PlatformTag = PlatformTag::APPKIT;

    fn describe() -> Result<ModelDescriptor, ConfigurationError> {
        Swatch::describe()
    }

    fn from_fields(_fields: &mut Fields) -> Result<Self, FieldError> {
        Ok(Self)
    }

    fn to_fields(&self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("shade", TouchShade(3));
        fields
    }
}

#[test]
fn encode_rejects_value_of_another_platform_type() {
    let err = mapper().encode(&Mislabeled).unwrap_err();
    match err {
        EncodeError::Transform { field, source } => {
            assert_eq!(field, "shade");
            assert!(matches!(source, TransformError::Invalid { .. }));
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[derive(Debug)]
struct Forgetful;

impl JsonModel for Forgetful {
    fn describe() -> Result<ModelDescriptor, ConfigurationError> {
        let mut b = DescriptorBuilder::new("Forgetful");
        b.declare_property("name", DeclaredType::string(), None)?;
        b.build()
    }

    fn from_fields(_fields: &mut Fields) -> Result<Self, FieldError> {
        Ok(Self)
    }

    fn to_fields(&self) -> Fields {
        Fields::new()
    }
}

#[test]
fn encode_missing_required_field() {
    let err = mapper().encode(&Forgetful).unwrap_err();
    assert!(matches!(
        err,
        EncodeError::MissingField { ref field, .. } if field == "name"
    ));
}
