//! Rewriting widget expressions for sheets of other meta-objects.
//!
//! Every widget goes through [`bind_to_sheet`] when its object differs from
//! the sheet's:
//! - same object: the expression is used as is
//! - a relation path from the sheet's object to the widget's object exists:
//!   the expression is prefixed with it (`ORDER` sheet, `CUSTOMER` widget
//!   bound to `NAME` -> `CUSTOMER__NAME`)
//!
//! Attributes that do not exist on the widget's own object and objects that
//! cannot be reached within `relation_path_depth` hops are configuration
//! errors.

use crate::error::{WidgetError, WidgetResult};
use crate::widget_id::WidgetId;
use metaui_core::Config;
use metaui_model::{DataSheet, Expression, MetaModel};

/// Rewrite `expression`, given relative to `widget_object`, so it can be
/// read from `sheet`.
pub fn bind_to_sheet(
    model: &dyn MetaModel,
    config: &Config,
    widget_id: &WidgetId,
    widget_object: Option<&str>,
    expression: &Expression,
    sheet: &DataSheet,
) -> WidgetResult<Expression> {
    let sheet_object = sheet.object_alias();
    let object = widget_object.unwrap_or(sheet_object);
    let paths = expression.attribute_paths();
    if paths.is_empty() {
        return Ok(expression.clone());
    }

    for path in &paths {
        model
            .resolve_attribute(object, path)
            .map_err(|e| WidgetError::configuration(widget_id.as_str(), e.to_string()))?;
    }

    if object == sheet_object {
        return Ok(expression.clone());
    }

    let relation = model
        .find_relation_path(sheet_object, object, config.relation_path_depth)
        .map_err(|e| WidgetError::configuration(widget_id.as_str(), e.to_string()))?;
    match relation {
        Some(path) => {
            let rebased = expression.rebase(&path);
            tracing::debug!(
                "Widget '{}': {} rebased to {} for sheet of {}",
                widget_id,
                expression,
                rebased,
                sheet_object
            );
            Ok(rebased)
        }
        None => Err(WidgetError::configuration(
            widget_id.as_str(),
            format!(
                "{} is not reachable from {} within {} relations",
                object, sheet_object, config.relation_path_depth
            ),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaui_test_utils::shop_model;

    fn bind(object: Option<&str>, expression: &str, sheet_object: &str) -> WidgetResult<Expression> {
        let model = shop_model();
        bind_to_sheet(
            &model,
            &Config::default(),
            &WidgetId::from("w"),
            object,
            &Expression::parse(expression).unwrap(),
            &DataSheet::new(sheet_object),
        )
    }

    #[test]
    fn test_same_object_is_unchanged() {
        let bound = bind(Some("shop.ORDER"), "CUSTOMER__NAME", "shop.ORDER").unwrap();
        assert_eq!(bound, Expression::attribute("CUSTOMER__NAME"));
        let inherited = bind(None, "NUMBER", "shop.ORDER").unwrap();
        assert_eq!(inherited, Expression::attribute("NUMBER"));
    }

    #[test]
    fn test_related_object_is_prefixed() {
        let bound = bind(Some("shop.CUSTOMER"), "NAME", "shop.ORDER").unwrap();
        assert_eq!(bound, Expression::attribute("CUSTOMER__NAME"));

        let formula = bind(Some("shop.CUSTOMER"), "=CONCAT(NAME, ' ', CITY)", "shop.ORDER_POS").unwrap();
        assert_eq!(
            formula.key(),
            "=CONCAT(ORDER__CUSTOMER__NAME, ' ', ORDER__CUSTOMER__CITY)"
        );
    }

    #[test]
    fn test_unreachable_object_is_configuration_error() {
        let mut config = Config::default();
        config.relation_path_depth = 1;
        let model = shop_model();
        let bound = bind_to_sheet(
            &model,
            &config,
            &WidgetId::from("w"),
            Some("shop.PRODUCT"),
            &Expression::attribute("NAME"),
            &DataSheet::new("shop.CUSTOMER"),
        );
        assert!(matches!(bound, Err(WidgetError::Configuration { widget, .. }) if widget == "w"));

        config.relation_path_depth = 3;
        let reached = bind_to_sheet(
            &model,
            &config,
            &WidgetId::from("w"),
            Some("shop.PRODUCT"),
            &Expression::attribute("NAME"),
            &DataSheet::new("shop.CUSTOMER"),
        )
        .unwrap();
        assert_eq!(reached, Expression::attribute("ORDER__POSITION__PRODUCT__NAME"));
    }

    #[test]
    fn test_unknown_attribute_is_configuration_error() {
        assert!(matches!(
            bind(Some("shop.ORDER"), "MISSING", "shop.ORDER"),
            Err(WidgetError::Configuration { .. })
        ));
    }
}
