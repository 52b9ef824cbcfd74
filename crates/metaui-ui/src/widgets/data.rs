//! Data widgets: tables, lists, cards, trees, schedules, pivots and charts.
//!
//! A data widget shows many rows of its own meta-object. It reads its sheet
//! itself: the page does not visit its children while preparing a sheet to
//! read, instead the widget adds its columns and the configurator adds the
//! filters and sorters. Prefill visits the children normally so filters can
//! be prefilled.
//!
//! Every data widget gets a `DataConfigurator` child. Widgets placed next to
//! it in a dialog end up in that configurator.

use super::configurator;
use super::{definition, export_config, import_config};
use crate::error::{WidgetError, WidgetResult};
use crate::factory::WidgetFactory;
use crate::page::{ChildSlot, NodeId, Page};
use crate::traversal::{SheetContext, add_expression_column};
use crate::widget::{
    CommonConfig, FillsContainer, HasDataColumns, Phase, Traversal, Widget, WidgetCore, is_false,
};
use metaui_core::Config;
use metaui_model::{
    Aggregator, Align, DataSheet, Expression, SortDirection, UxonObject,
};
use serde::{Deserialize, Serialize};

pub const WIDGET_TYPES: [&str; 9] = [
    "Data",
    "DataTable",
    "DataList",
    "DataCards",
    "Tree",
    "Scheduler",
    "Gantt",
    "PivotTable",
    "Chart",
];

pub(crate) const SLOTS: &[ChildSlot] = &[
    ChildSlot::one("configurator"),
    ChildSlot::many("buttons"),
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataColumnConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_alias: Option<String>,
    /// Formula computed by the data source, e.g. `=CONCAT(NAME, CITY)`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calculation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub caption: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub hidden: bool,
    /// Footer aggregate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub footer: Option<Aggregator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
}

/// A column of a data widget.
#[derive(Debug, Clone, PartialEq)]
pub struct DataColumn {
    expression: Expression,
    config: DataColumnConfig,
}

impl DataColumn {
    pub fn new(widget_type: &str, config: DataColumnConfig) -> WidgetResult<Self> {
        let source = match (&config.calculation, &config.attribute_alias) {
            (Some(calculation), _) => calculation.clone(),
            (None, Some(alias)) => alias.clone(),
            (None, None) => {
                return Err(WidgetError::invalid_property(
                    widget_type,
                    "columns",
                    "a column needs an attribute_alias or a calculation",
                ));
            }
        };
        let expression = Expression::parse(&source)
            .map_err(|e| WidgetError::invalid_property(widget_type, "columns", e.to_string()))?;
        Ok(Self { expression, config })
    }

    pub fn attribute(alias: &str) -> WidgetResult<Self> {
        Self::new(
            "Data",
            DataColumnConfig {
                attribute_alias: Some(alias.to_string()),
                ..Default::default()
            },
        )
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }

    pub fn caption(&self) -> Option<&str> {
        self.config.caption.as_deref()
    }

    pub fn is_hidden(&self) -> bool {
        self.config.hidden
    }

    pub fn footer(&self) -> Option<Aggregator> {
        self.config.footer
    }

    pub fn config(&self) -> &DataColumnConfig {
        &self.config
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl From<SortOrder> for SortDirection {
    fn from(order: SortOrder) -> Self {
        match order {
            SortOrder::Asc => SortDirection::Asc,
            SortOrder::Desc => SortDirection::Desc,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SorterConfig {
    pub attribute_alias: String,
    #[serde(default)]
    pub direction: SortOrder,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RowGrouperConfig {
    pub group_by_attribute_alias: String,
    #[serde(default, skip_serializing_if = "is_false")]
    pub show_counter: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PivotValueConfig {
    pub attribute_alias: String,
    pub aggregator: Aggregator,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ChartSeriesConfig {
    #[serde(rename = "type")]
    pub series_type: String,
    pub x_attribute_alias: String,
    pub y_attribute_alias: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub columns: Vec<DataColumnConfig>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorters: Vec<SorterConfig>,
    /// Paginated unless set to `false`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paginate: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<usize>,
    #[serde(skip_serializing_if = "is_false")]
    pub multi_select: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_grouper: Option<RowGrouperConfig>,

    // Tree
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_parent_attribute_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tree_folder_flag_attribute_alias: Option<String>,

    // Scheduler and Gantt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_attribute_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_attribute_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_attribute_alias: Option<String>,

    // PivotTable
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pivot_rows: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pivot_columns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub pivot_values: Vec<PivotValueConfig>,

    // Chart
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<ChartSeriesConfig>,
}

/// Arrangement of the rows, validated against the widget type.
#[derive(Debug, Clone, PartialEq)]
pub enum DataLayout {
    Table,
    List,
    Cards,
    Tree {
        parent: Expression,
        folder_flag: Option<Expression>,
    },
    Schedule {
        start: Expression,
        end: Option<Expression>,
        title: Option<Expression>,
    },
    Pivot {
        rows: Vec<Expression>,
        columns: Vec<Expression>,
        values: Vec<(Expression, Aggregator)>,
    },
    Chart {
        series: Vec<ChartSeries>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartSeries {
    pub series_type: String,
    pub x: Expression,
    pub y: Expression,
}

impl DataLayout {
    fn from_config(widget_type: &str, config: &DataConfig) -> WidgetResult<Self> {
        let attribute = |property: &str, alias: &str| {
            Expression::parse(alias)
                .ok()
                .filter(Expression::is_attribute)
                .ok_or_else(|| {
                    WidgetError::invalid_property(
                        widget_type,
                        property,
                        format!("'{}' is not an attribute path", alias),
                    )
                })
        };
        let required = |property: &str, alias: &Option<String>| match alias {
            Some(alias) => attribute(property, alias),
            None => Err(WidgetError::invalid_property(
                widget_type,
                property,
                "required property is missing",
            )),
        };
        let optional = |property: &str, alias: &Option<String>| {
            alias.as_deref().map(|a| attribute(property, a)).transpose()
        };

        let layout = match widget_type {
            "Tree" => DataLayout::Tree {
                parent: required("tree_parent_attribute_alias", &config.tree_parent_attribute_alias)?,
                folder_flag: optional(
                    "tree_folder_flag_attribute_alias",
                    &config.tree_folder_flag_attribute_alias,
                )?,
            },
            "Scheduler" | "Gantt" => DataLayout::Schedule {
                start: required("start_attribute_alias", &config.start_attribute_alias)?,
                end: match widget_type {
                    "Gantt" => Some(required("end_attribute_alias", &config.end_attribute_alias)?),
                    _ => optional("end_attribute_alias", &config.end_attribute_alias)?,
                },
                title: optional("title_attribute_alias", &config.title_attribute_alias)?,
            },
            "PivotTable" => {
                if config.pivot_values.is_empty() {
                    return Err(WidgetError::invalid_property(
                        widget_type,
                        "pivot_values",
                        "a pivot table needs at least one value",
                    ));
                }
                DataLayout::Pivot {
                    rows: config
                        .pivot_rows
                        .iter()
                        .map(|a| attribute("pivot_rows", a))
                        .collect::<WidgetResult<_>>()?,
                    columns: config
                        .pivot_columns
                        .iter()
                        .map(|a| attribute("pivot_columns", a))
                        .collect::<WidgetResult<_>>()?,
                    values: config
                        .pivot_values
                        .iter()
                        .map(|v| Ok((attribute("pivot_values", &v.attribute_alias)?, v.aggregator)))
                        .collect::<WidgetResult<_>>()?,
                }
            }
            "Chart" => {
                if config.series.is_empty() {
                    return Err(WidgetError::invalid_property(
                        widget_type,
                        "series",
                        "a chart needs at least one series",
                    ));
                }
                DataLayout::Chart {
                    series: config
                        .series
                        .iter()
                        .map(|s| {
                            Ok(ChartSeries {
                                series_type: s.series_type.clone(),
                                x: attribute("series", &s.x_attribute_alias)?,
                                y: attribute("series", &s.y_attribute_alias)?,
                            })
                        })
                        .collect::<WidgetResult<_>>()?,
                }
            }
            "DataList" => DataLayout::List,
            "DataCards" => DataLayout::Cards,
            _ => DataLayout::Table,
        };

        let foreign = [
            ("tree_parent_attribute_alias", config.tree_parent_attribute_alias.is_some(), matches!(layout, DataLayout::Tree { .. })),
            ("tree_folder_flag_attribute_alias", config.tree_folder_flag_attribute_alias.is_some(), matches!(layout, DataLayout::Tree { .. })),
            ("start_attribute_alias", config.start_attribute_alias.is_some(), matches!(layout, DataLayout::Schedule { .. })),
            ("end_attribute_alias", config.end_attribute_alias.is_some(), matches!(layout, DataLayout::Schedule { .. })),
            ("title_attribute_alias", config.title_attribute_alias.is_some(), matches!(layout, DataLayout::Schedule { .. })),
            ("pivot_rows", !config.pivot_rows.is_empty(), matches!(layout, DataLayout::Pivot { .. })),
            ("pivot_columns", !config.pivot_columns.is_empty(), matches!(layout, DataLayout::Pivot { .. })),
            ("pivot_values", !config.pivot_values.is_empty(), matches!(layout, DataLayout::Pivot { .. })),
            ("series", !config.series.is_empty(), matches!(layout, DataLayout::Chart { .. })),
        ];
        if let Some((property, _, _)) = foreign.iter().find(|(_, set, allowed)| *set && !*allowed) {
            return Err(WidgetError::invalid_property(
                widget_type,
                *property,
                format!("not supported by {}", widget_type),
            ));
        }
        Ok(layout)
    }

    /// Columns the layout needs besides the visible ones.
    fn expressions(&self) -> Vec<Expression> {
        match self {
            DataLayout::Table | DataLayout::List | DataLayout::Cards => Vec::new(),
            DataLayout::Tree {
                parent,
                folder_flag,
            } => std::iter::once(parent).chain(folder_flag).cloned().collect(),
            DataLayout::Schedule { start, end, title } => std::iter::once(start)
                .chain(end)
                .chain(title)
                .cloned()
                .collect(),
            DataLayout::Pivot {
                rows,
                columns,
                values,
            } => rows
                .iter()
                .chain(columns)
                .chain(values.iter().map(|(e, _)| e))
                .cloned()
                .collect(),
            DataLayout::Chart { series } => series
                .iter()
                .flat_map(|s| [s.x.clone(), s.y.clone()])
                .collect(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Data {
    core: WidgetCore,
    config: DataConfig,
    columns: Vec<DataColumn>,
    sorters: Vec<(Expression, SortDirection)>,
    layout: DataLayout,
}

impl Data {
    pub fn new(core: WidgetCore, config: DataConfig) -> WidgetResult<Self> {
        let widget_type = core.widget_type();
        let columns = config
            .columns
            .iter()
            .cloned()
            .map(|c| DataColumn::new(widget_type, c))
            .collect::<WidgetResult<Vec<_>>>()?;
        let sorters = parse_sorters(widget_type, &config.sorters)?;
        if let Some(grouper) = &config.row_grouper {
            Expression::parse(&grouper.group_by_attribute_alias).map_err(|e| {
                WidgetError::invalid_property(widget_type, "row_grouper", e.to_string())
            })?;
        }
        let layout = DataLayout::from_config(widget_type, &config)?;
        Ok(Self {
            core,
            config,
            columns,
            sorters,
            layout,
        })
    }

    pub fn layout(&self) -> &DataLayout {
        &self.layout
    }

    pub fn sorters(&self) -> &[(Expression, SortDirection)] {
        &self.sorters
    }

    pub fn is_multi_select(&self) -> bool {
        self.config.multi_select
    }

    pub fn row_grouper(&self) -> Option<&RowGrouperConfig> {
        self.config.row_grouper.as_ref()
    }

    pub fn add_column(&mut self, column: DataColumn) {
        self.config.columns.push(column.config.clone());
        self.columns.push(column);
    }
}

pub(crate) fn parse_sorters(
    widget_type: &str,
    sorters: &[SorterConfig],
) -> WidgetResult<Vec<(Expression, SortDirection)>> {
    sorters
        .iter()
        .map(|s| {
            Expression::parse(&s.attribute_alias)
                .map(|e| (e, s.direction.into()))
                .map_err(|e| WidgetError::invalid_property(widget_type, "sorters", e.to_string()))
        })
        .collect()
}

impl Widget for Data {
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

    fn prepare_data_sheet_to_read(
        &self,
        ctx: &SheetContext<'_>,
        sheet: &mut DataSheet,
    ) -> WidgetResult<()> {
        if !ctx.is_own_object(sheet) {
            tracing::debug!(
                "{} '{}' does not read sheets of {}",
                self.widget_type(),
                ctx.widget_id,
                sheet.object_alias()
            );
            return Ok(());
        }

        let object = ctx.model.object(sheet.object_alias())?;
        if let Some(uid) = object.uid_attribute() {
            sheet.add_hidden_column(Expression::attribute(uid));
        }
        for column in &self.columns {
            let expression = ctx.bind(column.expression(), sheet)?;
            if column.is_hidden() {
                sheet.add_hidden_column(expression);
            } else {
                add_expression_column(sheet, expression);
            }
        }
        for expression in self.required_expressions() {
            sheet.add_hidden_column(ctx.bind(&expression, sheet)?);
        }
        for (expression, direction) in &self.sorters {
            sheet.add_sorter(ctx.bind(expression, sheet)?, *direction);
        }
        let offset = sheet.offset();
        sheet.set_pagination(offset, self.page_size(ctx.config));
        Ok(())
    }

    fn as_fills_container(&self) -> Option<&dyn FillsContainer> {
        Some(self)
    }

    fn as_data(&self) -> Option<&dyn HasDataColumns> {
        Some(self)
    }
}

impl HasDataColumns for Data {
    fn columns(&self) -> &[DataColumn] {
        &self.columns
    }

    fn required_expressions(&self) -> Vec<Expression> {
        let mut expressions = self.layout.expressions();
        if let Some(grouper) = &self.config.row_grouper
            && let Ok(expression) = Expression::parse(&grouper.group_by_attribute_alias)
        {
            expressions.push(expression);
        }
        expressions
    }

    fn page_size(&self, config: &Config) -> Option<usize> {
        match self.config.paginate {
            Some(false) => None,
            _ => Some(self.config.page_size.unwrap_or(config.default_page_size)),
        }
    }
}

impl FillsContainer for Data {
    fn orphan_container_type(&self) -> &'static str {
        configurator::WIDGET_TYPE
    }
}

pub(crate) fn build(
    widget_type: &'static str,
    common: CommonConfig,
    uxon: UxonObject,
) -> WidgetResult<Box<dyn Widget>> {
    let config: DataConfig = import_config(widget_type, &uxon)?;
    let core = WidgetCore::from_common(widget_type, common);
    Ok(Box::new(Data::new(core, config)?))
}

/// Give the widget a configurator unless one was defined.
pub(crate) fn finish(factory: &WidgetFactory, page: &mut Page, node: NodeId) -> WidgetResult<()> {
    let has_configurator = page
        .children(node)?
        .iter()
        .any(|c| page.get(*c).is_some_and(|w| w.widget_type() == configurator::WIDGET_TYPE));
    if !has_configurator {
        factory.build(page, Some(node), SLOTS[0], definition(configurator::WIDGET_TYPE))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use metaui_model::Value;
    use serde_json::json;

    fn data(widget_type: &'static str, json: Value) -> WidgetResult<Data> {
        let config: DataConfig = UxonObject::from_value(json).unwrap().deserialize_into().unwrap();
        Data::new(WidgetCore::new(widget_type), config)
    }

    #[test]
    fn test_layout_requirements() {
        assert!(matches!(
            data("Tree", json!({})),
            Err(WidgetError::InvalidProperty { property, .. }) if property == "tree_parent_attribute_alias"
        ));
        assert!(matches!(
            data("Gantt", json!({"start_attribute_alias": "START"})),
            Err(WidgetError::InvalidProperty { property, .. }) if property == "end_attribute_alias"
        ));
        assert!(matches!(
            data("DataTable", json!({"series": [{"type": "line", "x_attribute_alias": "DATE", "y_attribute_alias": "TOTAL"}]})),
            Err(WidgetError::InvalidProperty { property, .. }) if property == "series"
        ));

        let tree = data("Tree", json!({"tree_parent_attribute_alias": "PARENT"})).unwrap();
        assert_eq!(tree.required_expressions(), vec![Expression::attribute("PARENT")]);
    }

    #[test]
    fn test_columns_need_a_source() {
        assert!(matches!(
            data("DataTable", json!({"columns": [{"caption": "Nothing"}]})),
            Err(WidgetError::InvalidProperty { property, .. }) if property == "columns"
        ));
        let table = data(
            "DataTable",
            json!({"columns": [{"attribute_alias": "NUMBER"}, {"calculation": "=UPPER(NUMBER)"}]}),
        )
        .unwrap();
        assert_eq!(table.columns().len(), 2);
        assert!(table.columns()[1].expression().is_formula());
    }

    #[test]
    fn test_page_size() {
        let config = Config::default();
        let table = data("DataTable", json!({"page_size": 5})).unwrap();
        assert_eq!(table.page_size(&config), Some(5));
        let all = data("DataTable", json!({"paginate": false})).unwrap();
        assert_eq!(all.page_size(&config), None);
        let default = data("DataList", json!({})).unwrap();
        assert_eq!(default.page_size(&config), Some(config.default_page_size));
        assert_eq!(default.layout(), &DataLayout::List);
    }
}
