//! Sheet preparation and prefill over whole widget trees.

use metaui_core::Config;
use metaui_model::datatype::as_f64;
use metaui_model::{DataSheet, UxonObject};
use metaui_test_utils::{SheetBuilder, shared_shop_model};
use metaui_ui::widgets::{Data, DataConfigurator, DiffText, Input};
use metaui_ui::{HasValue, NodeId, Page, ValueState, WidgetError, WidgetEvent};
use serde_json::json;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

fn page(json: &str) -> Page {
    Page::from_uxon(
        shared_shop_model(),
        Config::default(),
        UxonObject::from_json(json).unwrap(),
    )
    .unwrap()
}

fn value(page: &Page, id: &str) -> Option<serde_json::Value> {
    let node = page.find_by_id(id).unwrap();
    page.get(node)?.as_value()?.value().cloned()
}

const ORDER_FORM: &str = r#"{
    "widget_type": "Form",
    "object_alias": "shop.ORDER",
    "widgets": [
        {"widget_type": "Input", "id": "number", "attribute_alias": "NUMBER"},
        {"widget_type": "InputSelect", "id": "status", "attribute_alias": "STATUS", "value": 10},
        {"widget_type": "Display", "id": "customer", "attribute_alias": "CUSTOMER__NAME"},
        {
            "widget_type": "Panel",
            "object_alias": "shop.CUSTOMER",
            "widgets": [{"widget_type": "Display", "id": "city", "attribute_alias": "CITY"}]
        },
        {"widget_type": "Display", "id": "label", "value": "=CONCAT(NUMBER, ' / ', DATE)"}
    ]
}"#;

#[test]
fn test_read_collects_every_column_once() {
    let page = page(ORDER_FORM);
    let root = page.root().unwrap();
    let sheet = page
        .prepare_data_sheet_to_read(root, DataSheet::new("shop.ORDER"))
        .unwrap();
    assert_eq!(
        sheet.column_names(),
        vec!["NUMBER", "STATUS", "CUSTOMER__NAME", "CUSTOMER__CITY", "=CONCAT(NUMBER, ' / ', DATE)"]
    );
}

#[test]
fn test_read_is_idempotent() {
    let page = page(ORDER_FORM);
    let root = page.root().unwrap();
    let once = page
        .prepare_data_sheet_to_read(root, DataSheet::new("shop.ORDER"))
        .unwrap();
    let twice = page.prepare_data_sheet_to_read(root, once.clone()).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_container_columns_are_union_of_children() {
    let page = page(ORDER_FORM);
    let root = page.root().unwrap();
    let whole: BTreeSet<String> = page
        .prepare_data_sheet_to_read(root, DataSheet::new("shop.ORDER"))
        .unwrap()
        .column_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut union = BTreeSet::new();
    for child in page.children(root).unwrap() {
        let sheet = page
            .prepare_data_sheet_to_read(*child, DataSheet::new("shop.ORDER"))
            .unwrap();
        union.extend(sheet.column_names().into_iter().map(str::to_string));
    }
    assert_eq!(whole, union);
}

#[test]
fn test_prefill_skips_fixed_values() {
    let mut page = page(ORDER_FORM);
    let root = page.root().unwrap();
    let prepared = page
        .prepare_data_sheet_to_prefill(root, DataSheet::new("shop.ORDER"))
        .unwrap();
    assert!(!prepared.has_column("STATUS"));

    let sheet = SheetBuilder::new("shop.ORDER")
        .row([
            ("NUMBER", json!("A-1")),
            ("STATUS", json!(90)),
            ("CUSTOMER__NAME", json!("Ada")),
            ("CUSTOMER__CITY", json!("Oslo")),
        ])
        .build();
    page.prefill(root, &sheet).unwrap();
    assert_eq!(value(&page, "status"), Some(json!(10)));
    assert_eq!(value(&page, "number"), Some(json!("A-1")));
    assert_eq!(value(&page, "city"), Some(json!("Oslo")));
}

#[test]
fn test_prefill_takes_first_row() {
    let mut page = page(ORDER_FORM);
    let root = page.root().unwrap();
    let sheet = SheetBuilder::new("shop.ORDER")
        .row([("NUMBER", json!("A-1")), ("CUSTOMER__NAME", json!("Ada"))])
        .row([("NUMBER", json!("A-2")), ("CUSTOMER__NAME", json!("Bob"))])
        .build();
    page.prefill(root, &sheet).unwrap();
    assert_eq!(value(&page, "number"), Some(json!("A-1")));
    assert_eq!(value(&page, "customer"), Some(json!("Ada")));

    let number = page.find_by_id("number").unwrap();
    let input = page.widget::<Input>(number).unwrap();
    assert!(matches!(input.binding().state(), ValueState::Filled(cell) if cell.column == "NUMBER" && cell.row == Some(0)));
}

#[test]
fn test_prefill_aggregates_multiple_rows() {
    let mut page = page(
        r#"{
            "widget_type": "Panel",
            "object_alias": "shop.ORDER",
            "widgets": [
                {"widget_type": "Display", "id": "total", "object_alias": "shop.ORDER_POS", "attribute_alias": "AMOUNT", "aggregator": "SUM"},
                {"widget_type": "Display", "id": "qty", "object_alias": "shop.ORDER_POS", "attribute_alias": "QTY"}
            ]
        }"#,
    );
    let root = page.root().unwrap();
    let prepared = page
        .prepare_data_sheet_to_prefill(root, DataSheet::new("shop.ORDER"))
        .unwrap();
    assert_eq!(prepared.column_names(), vec!["POSITION__AMOUNT", "POSITION__QTY"]);

    let sheet = SheetBuilder::new("shop.ORDER")
        .row([("POSITION__AMOUNT", json!(10.5)), ("POSITION__QTY", json!(1))])
        .row([("POSITION__AMOUNT", json!(4.5)), ("POSITION__QTY", json!(3))])
        .build();
    page.prefill(root, &sheet).unwrap();
    assert_eq!(value(&page, "total").as_ref().and_then(as_f64), Some(15.0));
    assert_eq!(value(&page, "qty"), Some(json!(1)));
}

#[test]
fn test_unreachable_widget_object_is_configuration_error() {
    let mut config = Config::default();
    config.relation_path_depth = 1;
    let mut page = Page::from_uxon(
        shared_shop_model(),
        config,
        UxonObject::from_json(
            r#"{
                "widget_type": "Panel",
                "object_alias": "shop.CUSTOMER",
                "widgets": [
                    {"widget_type": "Display", "id": "name", "attribute_alias": "NAME"},
                    {"widget_type": "Display", "id": "product", "object_alias": "shop.PRODUCT", "attribute_alias": "NAME"}
                ]
            }"#,
        )
        .unwrap(),
    )
    .unwrap();
    let root = page.root().unwrap();
    assert!(matches!(
        page.prepare_data_sheet_to_read(root, DataSheet::new("shop.CUSTOMER")),
        Err(WidgetError::Configuration { widget, .. }) if widget == "product"
    ));
    assert!(matches!(
        page.prepare_data_sheet_to_prefill(root, DataSheet::new("shop.CUSTOMER")),
        Err(WidgetError::Configuration { widget, .. }) if widget == "product"
    ));

    page.drain_events();
    let data = SheetBuilder::new("shop.CUSTOMER").row([("NAME", json!("Ada"))]).build();
    assert!(matches!(
        page.prefill(root, &data),
        Err(WidgetError::Configuration { widget, .. }) if widget == "product"
    ));
    assert_eq!(value(&page, "name"), Some(json!("Ada")));
    assert_eq!(value(&page, "product"), None);
    assert_eq!(page.events().len(), 1);
}

#[test]
fn test_in_filter_lists_distinct_values() {
    let mut page = page(
        r#"{
            "widget_type": "Panel",
            "object_alias": "shop.ORDER",
            "widgets": [{"widget_type": "Filter", "id": "status", "attribute_alias": "STATUS", "comparator": "["}]
        }"#,
    );
    let root = page.root().unwrap();
    let sheet = SheetBuilder::new("shop.ORDER")
        .row([("STATUS", json!(10))])
        .row([("STATUS", json!(20))])
        .row([("STATUS", json!(10))])
        .build();
    assert_eq!(page.prefill(root, &sheet).unwrap(), 1);
    assert_eq!(value(&page, "status"), Some(json!("10,20")));

    let node = page.find_by_id("status").unwrap();
    let filter = page.get(node).unwrap().as_value().unwrap();
    match filter.binding().state() {
        ValueState::Filled(cell) => {
            assert_eq!(cell.column, "STATUS");
            assert!(cell.is_aggregate());
            assert_eq!(cell.row, None);
        }
        state => panic!("unexpected state {:?}", state),
    }
}

#[test]
fn test_diff_text_reads_and_fills_compare_text() {
    const DIFF: &str = r#"{
        "widget_type": "Panel",
        "object_alias": "shop.ORDER",
        "widgets": [{
            "widget_type": "DiffText",
            "id": "diff",
            "attribute_alias": "NUMBER",
            "compare_attribute_alias": "CUSTOMER__NAME"
        }]
    }"#;
    let mut single = page(DIFF);
    let root = single.root().unwrap();
    let read = single
        .prepare_data_sheet_to_read(root, DataSheet::new("shop.ORDER"))
        .unwrap();
    assert_eq!(read.column_names(), vec!["NUMBER", "CUSTOMER__NAME"]);

    let sheet = SheetBuilder::new("shop.ORDER")
        .row([("NUMBER", json!("A-1")), ("CUSTOMER__NAME", json!("Ada"))])
        .build();
    assert_eq!(single.prefill(root, &sheet).unwrap(), 2);
    let node = single.find_by_id("diff").unwrap();
    let diff = single.widget::<DiffText>(node).unwrap();
    assert_eq!(diff.value(), Some(&json!("A-1")));
    assert_eq!(diff.compare_binding().value(), Some(&json!("Ada")));
    let sources: Vec<String> = single
        .events()
        .iter()
        .filter_map(|event| match event {
            WidgetEvent::ValueChanged { source, .. } => Some(source.to_string()),
            _ => None,
        })
        .collect();
    assert_eq!(sources, vec!["NUMBER[0]", "CUSTOMER__NAME[0]"]);

    let mut listed = page(&DIFF.replace(r#""id": "diff","#, r#""id": "diff", "aggregator": "list","#));
    let root = listed.root().unwrap();
    let sheet = SheetBuilder::new("shop.ORDER")
        .row([("NUMBER", json!("A-1")), ("CUSTOMER__NAME", json!("Ada"))])
        .row([("NUMBER", json!("A-2")), ("CUSTOMER__NAME", json!("Bob"))])
        .build();
    listed.prefill(root, &sheet).unwrap();
    let node = listed.find_by_id("diff").unwrap();
    let diff = listed.widget::<DiffText>(node).unwrap();
    assert_eq!(diff.value(), Some(&json!("A-1,A-2")));
    assert_eq!(diff.compare_binding().value(), Some(&json!("Ada,Bob")));
    assert!(matches!(diff.compare_binding().state(), ValueState::Filled(cell) if cell.is_aggregate()));
}

#[test]
fn test_prefill_notifies_listeners() {
    let mut page = page(ORDER_FORM);
    let root = page.root().unwrap();
    let seen: Rc<RefCell<Vec<NodeId>>> = Rc::default();
    let sink = Rc::clone(&seen);
    page.on_event(move |event| sink.borrow_mut().push(event.node()));

    let sheet = SheetBuilder::new("shop.ORDER")
        .row([("NUMBER", json!("A-1"))])
        .build();
    let filled = page.prefill(root, &sheet).unwrap();
    assert_eq!(filled, 1);
    assert_eq!(*seen.borrow(), vec![page.find_by_id("number").unwrap()]);
    assert!(matches!(
        page.events(),
        [WidgetEvent::ValueChanged { old: None, .. }]
    ));
}

#[test]
fn test_data_reads_its_own_object_only() {
    let page = page(
        r#"{
            "widget_type": "Panel",
            "object_alias": "shop.ORDER",
            "widgets": [
                {"widget_type": "Display", "attribute_alias": "NUMBER"},
                {
                    "widget_type": "DataTable",
                    "id": "positions",
                    "object_alias": "shop.ORDER_POS",
                    "columns": [{"attribute_alias": "PRODUCT__NAME"}, {"attribute_alias": "AMOUNT"}],
                    "sorters": [{"attribute_alias": "QTY", "direction": "desc"}],
                    "page_size": 10
                }
            ]
        }"#,
    );
    let root = page.root().unwrap();
    let order = page
        .prepare_data_sheet_to_read(root, DataSheet::new("shop.ORDER"))
        .unwrap();
    assert_eq!(order.column_names(), vec!["NUMBER"]);
    assert_eq!(order.limit(), None);

    let table = page.find_by_id("positions").unwrap();
    assert!(page.widget::<Data>(table).is_some());
    let positions = page
        .prepare_data_sheet_to_read(table, DataSheet::new("shop.ORDER_POS"))
        .unwrap();
    assert_eq!(positions.column_names(), vec!["UID", "PRODUCT__NAME", "AMOUNT"]);
    assert_eq!(positions.limit(), Some(10));
    assert_eq!(positions.sorters().len(), 1);
}

#[test]
fn test_filters_are_prefilled_inside_data() {
    let mut page = page(
        r#"{
            "widget_type": "DataTable",
            "object_alias": "shop.ORDER",
            "columns": [{"attribute_alias": "NUMBER"}],
            "configurator": {
                "widget_type": "DataConfigurator",
                "filters": [{"widget_type": "Filter", "id": "customer", "attribute_alias": "CUSTOMER"}]
            }
        }"#,
    );
    let root = page.root().unwrap();
    let customer = SheetBuilder::new("shop.CUSTOMER")
        .row([("UID", json!(5)), ("NAME", json!("Ada"))])
        .build();
    page.prefill(root, &customer).unwrap();
    assert_eq!(value(&page, "customer"), Some(json!(5)));

    let configurator = page.find_in_subtree(root, "DataConfigurator").unwrap().unwrap();
    assert!(page.widget::<DataConfigurator>(configurator).is_some());
    let sheet = page
        .prepare_data_sheet_to_read(root, DataSheet::new("shop.ORDER"))
        .unwrap();
    assert_eq!(sheet.filters().conditions_for("CUSTOMER").len(), 1);
}
