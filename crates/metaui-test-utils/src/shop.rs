//! Shop fixture model.
//!
//! ```text
//! CUSTOMER 1 ── N ORDER 1 ── N ORDER_POS N ── 1 PRODUCT
//! ```

use std::sync::Arc;

use metaui_model::{
    Aggregator, DataType, MetaAttribute, MetaModel, MetaObject, MetaRelation, ModelRegistry,
    RelationKind,
};

fn attr(alias: &str, name: &str, data_type: DataType, order: Option<i32>) -> MetaAttribute {
    let mut a = MetaAttribute::new(alias, name, data_type);
    a.default_display_order = order;
    a
}

fn uid() -> MetaAttribute {
    let mut a = MetaAttribute::new("UID", "Id", DataType::Integer);
    a.editable = false;
    a.hidden = true;
    a
}

fn rel(alias: &str, to: &str, kind: RelationKind, left: &str, right: &str) -> MetaRelation {
    MetaRelation {
        alias: alias.to_string(),
        right_object: to.to_string(),
        kind,
        left_key: left.to_string(),
        right_key: right.to_string(),
    }
}

/// Build the shop model.
pub fn shop_model() -> ModelRegistry {
    let mut name = attr("NAME", "Name", DataType::String, Some(1));
    name.required = true;

    let customer = MetaObject::new("shop.CUSTOMER", "Customer")
        .with_uid("UID")
        .with_label("NAME")
        .with_attribute(uid())
        .with_attribute(name)
        .with_attribute(attr("CITY", "City", DataType::String, Some(2)))
        .with_attribute(attr("EMAIL", "E-mail", DataType::String, Some(3)))
        .with_attribute(attr("VIP", "VIP", DataType::Boolean, Some(4)))
        .with_relation(rel("ORDER", "shop.ORDER", RelationKind::Reverse, "UID", "CUSTOMER"));

    let mut number = attr("NUMBER", "Number", DataType::String, Some(1));
    number.required = true;
    let mut total = attr("TOTAL", "Total", DataType::Number { precision: Some(2) }, None);
    total.editable = false;
    let status = DataType::Enum {
        values: [("10", "Open"), ("20", "Shipped"), ("90", "Cancelled")]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    };

    let order = MetaObject::new("shop.ORDER", "Order")
        .with_uid("UID")
        .with_label("NUMBER")
        .with_attribute(uid())
        .with_attribute(number)
        .with_attribute(attr("DATE", "Date", DataType::Date, Some(2)))
        .with_attribute(attr("STATUS", "Status", status, Some(3)))
        .with_attribute(attr("CUSTOMER", "Customer", DataType::Integer, Some(4)))
        .with_attribute(total)
        .with_attribute(attr("COLOR", "Color", DataType::Color, None))
        .with_relation(rel("CUSTOMER", "shop.CUSTOMER", RelationKind::Forward, "CUSTOMER", "UID"))
        .with_relation(rel("POSITION", "shop.ORDER_POS", RelationKind::Reverse, "UID", "ORDER"));

    let mut amount = attr("AMOUNT", "Amount", DataType::Number { precision: Some(2) }, Some(3));
    amount.default_aggregator = Some(Aggregator::Sum);

    let position = MetaObject::new("shop.ORDER_POS", "Order position")
        .with_uid("UID")
        .with_attribute(uid())
        .with_attribute(attr("ORDER", "Order", DataType::Integer, None))
        .with_attribute(attr("PRODUCT", "Product", DataType::Integer, Some(1)))
        .with_attribute(attr("QTY", "Quantity", DataType::Integer, Some(2)))
        .with_attribute(amount)
        .with_relation(rel("ORDER", "shop.ORDER", RelationKind::Forward, "ORDER", "UID"))
        .with_relation(rel("PRODUCT", "shop.PRODUCT", RelationKind::Forward, "PRODUCT", "UID"));

    let product = MetaObject::new("shop.PRODUCT", "Product")
        .with_uid("UID")
        .with_label("NAME")
        .with_attribute(uid())
        .with_attribute(attr("NAME", "Name", DataType::String, Some(1)))
        .with_attribute(attr("PRICE", "Price", DataType::Number { precision: Some(2) }, Some(2)));

    ModelRegistry::new()
        .with_object(customer)
        .with_object(order)
        .with_object(position)
        .with_object(product)
}

/// The shop model behind the trait object pages take.
pub fn shared_shop_model() -> Arc<dyn MetaModel> {
    Arc::new(shop_model())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shop_model_is_consistent() {
        let model = shop_model();
        model.validate().unwrap();
        assert_eq!(model.len(), 4);
        let path = model
            .find_relation_path("shop.ORDER_POS", "shop.CUSTOMER", 3)
            .unwrap()
            .unwrap();
        assert_eq!(path.to_string(), "ORDER__CUSTOMER");
    }
}
