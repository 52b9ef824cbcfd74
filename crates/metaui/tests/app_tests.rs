use metaui::prelude::*;
use metaui_test_utils::{SheetBuilder, shared_shop_model};
use serde_json::json;
use std::io::Write;

fn app() -> MetaUi {
    MetaUiBuilder::new()
        .with_model(shared_shop_model())
        .build()
        .unwrap()
}

#[test]
fn test_build_needs_a_model() {
    let result = MetaUiBuilder::new().build();
    assert!(matches!(result, Err(WidgetError::Configuration { .. })));
}

#[test]
fn test_config_is_passed_to_pages() {
    let mut config = Config::default();
    config.default_page_size = 5;
    let app = MetaUi::builder()
        .with_model(shared_shop_model())
        .with_config(config)
        .build()
        .unwrap();
    let page = app
        .page_from_json(r#"{"widget_type": "DataTable", "object_alias": "shop.ORDER", "columns": [{"attribute_alias": "NUMBER"}]}"#)
        .unwrap();
    assert_eq!(page.config().default_page_size, 5);
    let root = page.root().unwrap();
    let sheet = page
        .prepare_data_sheet_to_read(root, DataSheet::new("shop.ORDER"))
        .unwrap();
    assert_eq!(sheet.limit(), Some(5));
}

#[test]
fn test_page_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{
            "widget_type": "Form",
            "object_alias": "shop.ORDER",
            "widgets": [{{"widget_type": "Input", "id": "number", "attribute_alias": "NUMBER"}}]
        }}"#
    )
    .unwrap();

    let app = app();
    let mut page = app.page_from_file(file.path()).unwrap();
    let root = page.root().unwrap();
    let sheet = SheetBuilder::new("shop.ORDER")
        .row([("NUMBER", json!("A-7"))])
        .build();
    assert_eq!(page.prefill(root, &sheet).unwrap(), 1);

    let number = page.find_by_id("number").unwrap();
    let value = page.get(number).unwrap().as_value().unwrap().value().cloned();
    assert_eq!(value, Some(json!("A-7")));
}

#[test]
fn test_missing_page_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = app().page_from_file(dir.path().join("missing.json"));
    assert!(matches!(
        result,
        Err(WidgetError::Model(ModelError::IoError { .. }))
    ));
}

#[test]
fn test_model_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(
        br#"{"objects": [{"alias": "crm.CONTACT", "name": "Contact", "attributes": [{"alias": "EMAIL", "name": "Email"}]}]}"#,
    )
    .unwrap();
    let app = MetaUiBuilder::new()
        .with_model_file(file.path())
        .unwrap()
        .build()
        .unwrap();
    assert!(app.model().has_object("crm.CONTACT"));
}
