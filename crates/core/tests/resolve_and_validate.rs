mod common;

use serde_json::json;
use zcall_core::error::{CallError, ErrorKind};
use zcall_core::model::{Kind, TypeRef};
use zcall_core::pipeline::{resolve, validate, SupportedTypes};
use zcall_core::registry::RawEntry;

use common::{function_entry, registry_with};

#[test]
fn absent_names_resolve_to_not_found() {
    let registry = registry_with(vec![function_entry("Z10001", "Z6", &["Z6"])]);
    for name in ["Z999", "Z10002", "", "Z1|Z2"] {
        let err = resolve(&registry, name).unwrap_err();
        assert_eq!(err, CallError::NotFound { target: name.to_string() });
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }
}

#[test]
fn lowercase_name_is_normalized_before_lookup() {
    let registry = registry_with(vec![function_entry("Z10001", "Z6", &["Z6"])]);
    let function = resolve(&registry, "z10001").expect("resolves");
    assert_eq!(function.reference.zid, "Z10001");
    assert_eq!(function.label.as_deref(), Some("label of Z10001"));
    assert_eq!(function.signature.arguments.len(), 1);
}

#[test]
fn malformed_entry_is_invalid_definition() {
    let registry = registry_with(vec![RawEntry::new("Z500", json!({"Z1K1": "Z6", "Z6K1": "x"}))]);
    let err = resolve(&registry, "Z500").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidDefinition);
    assert_eq!(err.target(), "Z500");
}

#[test]
fn function_with_unreadable_signature_is_invalid_definition() {
    let registry = registry_with(vec![RawEntry::new(
        "Z501",
        json!({"Z1K1": "Z2", "Z2K2": {"Z1K1": "Z8", "Z8K2": "Z6"}}),
    )]);
    let err = resolve(&registry, "Z501").unwrap_err();
    match err {
        CallError::InvalidDefinition { reason, .. } => assert!(reason.contains("Z8K1"), "{reason}"),
        other => panic!("expected invalid definition, got {other:?}"),
    }
}

#[test]
fn well_formed_non_function_is_not_a_function() {
    let registry =
        registry_with(vec![RawEntry::new("Z11", json!({"Z1K1": "Z2", "Z2K2": {"Z1K1": "Z4"}}))]);
    let err = resolve(&registry, "Z11").unwrap_err();
    assert_eq!(err, CallError::NotAFunction { target: "Z11".into(), kind: Kind::Type });
}

#[test]
fn string_only_signature_validates() {
    let registry = registry_with(vec![function_entry("Z10001", "Z6", &["Z6", "Z6"])]);
    let function = resolve(&registry, "Z10001").unwrap();
    assert!(validate(&function, &SupportedTypes::default()).is_ok());
}

#[test]
fn unsupported_return_type_is_reported_before_arguments() {
    let registry = registry_with(vec![function_entry("Z10010", "Z40", &["Z40", "Z6"])]);
    let function = resolve(&registry, "Z10010").unwrap();
    let err = validate(&function, &SupportedTypes::default()).unwrap_err();
    assert_eq!(
        err,
        CallError::UnsupportedReturnType {
            target: "Z10010".into(),
            return_type: TypeRef::new("Z40"),
        }
    );
}

#[test]
fn only_first_unsupported_argument_is_reported() {
    let registry = registry_with(vec![function_entry("Z10011", "Z6", &["Z6", "Z40", "Z86"])]);
    let function = resolve(&registry, "Z10011").unwrap();
    let err = validate(&function, &SupportedTypes::default()).unwrap_err();
    assert_eq!(
        err,
        CallError::UnsupportedArgumentType {
            target: "Z10011".into(),
            argument: "Z10011K2".into(),
            argument_type: TypeRef::new("Z40"),
        }
    );
    assert_eq!(err.message_params(), vec!["Z10011", "Z10011K2", "Z40"]);
}

#[test]
fn allowlist_can_grow_without_touching_callers() {
    let registry = registry_with(vec![function_entry("Z10012", "Z40", &["Z40"])]);
    let function = resolve(&registry, "Z10012").unwrap();

    let mut supported = SupportedTypes::default();
    assert!(validate(&function, &supported).is_err());
    supported.allow("Z40");
    assert!(validate(&function, &supported).is_ok());
    assert_eq!(supported.iter().collect::<Vec<_>>(), vec!["Z40", "Z6"]);

    let none = SupportedTypes::none();
    assert_eq!(validate(&function, &none).unwrap_err().kind(), ErrorKind::UnsupportedReturnType);
}

#[test]
fn every_stage_echoes_the_name_as_written() {
    let registry = registry_with(vec![function_entry("Z10010", "Z40", &["Z6"])]);

    let function = resolve(&registry, " z10010 ").expect("resolves");
    assert_eq!(function.name, "z10010");
    assert_eq!(function.reference.zid, "Z10010");

    let err = validate(&function, &SupportedTypes::default()).unwrap_err();
    assert_eq!(err.target(), "z10010");
    assert_eq!(err.message_params(), vec!["z10010"]);

    let missing = resolve(&registry, " z404 ").unwrap_err();
    assert_eq!(missing.target(), "z404");
}
