//! Integration tests for loading meta-models from JSON definitions.
//!
//! These tests use tempfile to create isolated model files.

use std::io::Write;

use metaui_model::*;

const SHOP: &str = r#"{
    "objects": [
        {
            "alias": "shop.ORDER",
            "name": "Order",
            "uid_attribute": "UID",
            "label_attribute": "NUMBER",
            "attributes": [
                { "alias": "UID", "name": "Id", "data_type": { "type": "integer" }, "editable": false },
                { "alias": "NUMBER", "name": "Number", "default_display_order": 1 },
                { "alias": "CUSTOMER", "name": "Customer", "data_type": { "type": "integer" } }
            ],
            "relations": [
                { "alias": "CUSTOMER", "right_object": "shop.CUSTOMER", "kind": "forward",
                  "left_key": "CUSTOMER", "right_key": "UID" }
            ]
        },
        {
            "alias": "shop.CUSTOMER",
            "name": "Customer",
            "uid_attribute": "UID",
            "attributes": [
                { "alias": "UID", "name": "Id", "data_type": { "type": "integer" } },
                { "alias": "NAME", "name": "Name" }
            ],
            "relations": [
                { "alias": "ORDER", "right_object": "shop.ORDER", "kind": "reverse",
                  "left_key": "UID", "right_key": "CUSTOMER" }
            ]
        }
    ]
}"#;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(SHOP.as_bytes()).unwrap();

    let model = ModelRegistry::load_file(file.path()).unwrap();
    assert_eq!(model.len(), 2);

    let order = model.object("shop.ORDER").unwrap();
    assert_eq!(order.uid_attribute(), Some("UID"));
    assert_eq!(order.label_attribute(), Some("NUMBER"));
    assert_eq!(order.attribute("NUMBER").unwrap().data_type, DataType::String);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = ModelRegistry::load_file(dir.path().join("missing.json"));
    assert!(matches!(result, Err(ModelError::IoError { .. })));
}

#[test]
fn test_round_trip_through_relations() {
    let model = ModelRegistry::from_json(SHOP).unwrap();

    let to_customer = model
        .find_relation_path("shop.ORDER", "shop.CUSTOMER", 3)
        .unwrap()
        .unwrap();
    assert_eq!(to_customer.prefix("NAME"), "CUSTOMER__NAME");
    assert!(!to_customer.has_reverse());

    let to_orders = model
        .find_relation_path("shop.CUSTOMER", "shop.ORDER", 3)
        .unwrap()
        .unwrap();
    assert!(to_orders.has_reverse());

    let resolved = model.resolve_attribute("shop.ORDER", "CUSTOMER__NAME").unwrap();
    assert_eq!(resolved.object_alias(), "shop.CUSTOMER");
}

#[test]
fn test_invalid_definition() {
    assert!(matches!(
        ModelRegistry::from_json(r#"{"objects": [{"alias": "x"}]}"#),
        Err(ModelError::InvalidDefinition { .. })
    ));
}
