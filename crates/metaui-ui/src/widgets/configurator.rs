//! Filters and sorters of a data widget.

use super::data::{SorterConfig, parse_sorters};
use super::filter::Filter;
use super::{export_config, import_config};
use crate::error::{WidgetError, WidgetResult};
use crate::page::{ChildSlot, NodeId, Page};
use crate::widget::{CommonConfig, Phase, Traversal, Widget, WidgetCore};
use metaui_model::{DataSheet, Expression, SortDirection, UxonObject};
use serde::{Deserialize, Serialize};

pub const WIDGET_TYPE: &str = "DataConfigurator";

pub(crate) const SLOTS: &[ChildSlot] = &[ChildSlot::many("filters"), ChildSlot::WIDGETS];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfiguratorConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorters: Vec<SorterConfig>,
}

#[derive(Debug, Clone)]
pub struct DataConfigurator {
    core: WidgetCore,
    config: ConfiguratorConfig,
    sorters: Vec<(Expression, SortDirection)>,
}

impl DataConfigurator {
    pub fn sorters(&self) -> &[(Expression, SortDirection)] {
        &self.sorters
    }
}

impl Widget for DataConfigurator {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn export_config(&self) -> WidgetResult<UxonObject> {
        export_config(&self.config)
    }

    fn accepts_children(&self) -> bool {
        true
    }

    fn traversal(&self, phase: Phase) -> Traversal {
        match phase {
            Phase::Read => Traversal::Skip,
            Phase::Prefill => Traversal::Normal,
        }
    }
}

pub(crate) fn build(
    widget_type: &'static str,
    common: CommonConfig,
    uxon: UxonObject,
) -> WidgetResult<Box<dyn Widget>> {
    let config: ConfiguratorConfig = import_config(widget_type, &uxon)?;
    let sorters = parse_sorters(widget_type, &config.sorters)?;
    Ok(Box::new(DataConfigurator {
        core: WidgetCore::from_common(widget_type, common),
        config,
        sorters,
    }))
}

/// Add the sorters of the configurator at `node` and the conditions of every
/// filter below it that has a value.
pub(crate) fn apply_to_sheet(page: &Page, node: NodeId, sheet: &mut DataSheet) -> WidgetResult<()> {
    let configurator = page
        .widget::<DataConfigurator>(node)
        .ok_or(WidgetError::UnknownNode(node))?;
    let ctx = page.sheet_context(node)?;
    for (expression, direction) in &configurator.sorters {
        sheet.add_sorter(ctx.bind(expression, sheet)?, *direction);
    }

    for id in page.iter_subtree(node)? {
        let Some(condition) = page.widget::<Filter>(id).and_then(Filter::condition) else {
            continue;
        };
        let ctx = page.sheet_context(id)?;
        let expression = ctx.bind(&condition.expression, sheet)?;
        tracing::trace!("Filter '{}': {} {} {}", ctx.widget_id, expression, condition.comparator, condition.value);
        sheet.add_filter(expression, condition.comparator, condition.value);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::WidgetFactory;
    use metaui_core::Config;
    use metaui_model::Comparator;
    use metaui_test_utils::shared_shop_model;
    use serde_json::json;

    #[test]
    fn test_filters_and_sorters_reach_the_sheet() {
        let mut page = WidgetFactory::default()
            .build_page(
                shared_shop_model(),
                Config::default(),
                UxonObject::from_json(
                    r#"{
                        "widget_type": "DataTable",
                        "object_alias": "shop.ORDER",
                        "columns": [{"attribute_alias": "NUMBER"}],
                        "configurator": {
                            "widget_type": "DataConfigurator",
                            "sorters": [{"attribute_alias": "DATE", "direction": "desc"}],
                            "filters": [
                                {"widget_type": "Filter", "id": "status", "attribute_alias": "STATUS", "comparator": "=="},
                                {"widget_type": "Filter", "attribute_alias": "CUSTOMER__NAME"}
                            ]
                        }
                    }"#,
                )
                .unwrap(),
            )
            .unwrap();
        let root = page.root().unwrap();
        let status = page.find_by_id("status").unwrap();
        page.get_mut(status).unwrap().as_value_mut().unwrap().set_value(json!("10"));

        let sheet = page
            .prepare_data_sheet_to_read(root, DataSheet::new("shop.ORDER"))
            .unwrap();
        assert_eq!(sheet.column_names(), vec!["UID", "NUMBER"]);
        assert_eq!(sheet.sorters()[0].expression, Expression::attribute("DATE"));
        assert_eq!(sheet.sorters()[0].direction, SortDirection::Desc);
        let conditions = sheet.filters().conditions_for("STATUS");
        assert_eq!(conditions.len(), 1);
        assert_eq!(conditions[0].comparator, Comparator::Equals);
        assert!(sheet.filters().conditions_for("CUSTOMER__NAME").is_empty());
    }
}
