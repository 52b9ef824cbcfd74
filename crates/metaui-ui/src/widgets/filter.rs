//! Filters wrap an input widget and turn its value into a condition.

use super::input::{self, Input};
use super::{export_config, import_config};
use crate::error::{WidgetError, WidgetResult};
use crate::traversal::{SheetContext, add_expression_column};
use crate::widget::{CommonConfig, HasValue, ValueBinding, Widget, WidgetCore, is_false};
use metaui_model::{
    Aggregator, Comparator, Condition, DataSheet, Expression, UxonObject, Value,
};
use serde::{Deserialize, Serialize};

pub const WIDGET_TYPE: &str = "Filter";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FilterConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// One of `=`, `==`, `!==`, `<`, `<=`, `>`, `>=`, `[`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comparator: Option<String>,
    /// Definition of the wrapped input, `Input` by default.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_widget: Option<UxonObject>,
    #[serde(skip_serializing_if = "is_false")]
    pub apply_on_change: bool,
}

#[derive(Debug, Clone)]
pub struct Filter {
    core: WidgetCore,
    config: FilterConfig,
    comparator: Comparator,
    input: Input,
}

impl Filter {
    pub fn new(core: WidgetCore, config: FilterConfig) -> WidgetResult<Self> {
        let comparator = match &config.comparator {
            Some(text) => Comparator::parse(text).ok_or_else(|| {
                WidgetError::invalid_property(WIDGET_TYPE, "comparator", format!("unknown comparator '{}'", text))
            })?,
            None => Comparator::Is,
        };

        let mut definition = config.input_widget.clone().unwrap_or_default();
        let input_type = match definition.remove("widget_type") {
            None => "Input",
            Some(Value::String(name)) => input::WIDGET_TYPES
                .into_iter()
                .find(|t| t.eq_ignore_ascii_case(&name))
                .ok_or_else(|| {
                    WidgetError::invalid_property(
                        WIDGET_TYPE,
                        "input_widget",
                        format!("'{}' is not an input widget", name),
                    )
                })?,
            Some(_) => {
                return Err(WidgetError::invalid_property(
                    WIDGET_TYPE,
                    "input_widget",
                    "widget_type must be a string",
                ));
            }
        };
        if let Some(alias) = &config.attribute_alias
            && !definition.contains("attribute_alias")
        {
            definition.insert("attribute_alias", alias.as_str());
        }
        if let Some(value) = &config.value
            && !definition.contains("value")
        {
            definition.insert("value", value.clone());
        }
        let common = definition
            .split_off(CommonConfig::PROPERTIES)
            .deserialize_into::<CommonConfig>()
            .map_err(|e| WidgetError::from_uxon(input_type, e))?;
        let input = input::build_input(input_type, common, &definition)?;

        Ok(Self {
            core,
            config,
            comparator,
            input,
        })
    }

    pub fn comparator(&self) -> Comparator {
        self.comparator
    }

    pub fn input(&self) -> &Input {
        &self.input
    }

    pub fn applies_on_change(&self) -> bool {
        self.config.apply_on_change
    }

    /// Condition for the current value, relative to the filter's object.
    /// `None` while the value is empty.
    pub fn condition(&self) -> Option<Condition> {
        let value = self.value()?;
        if value.is_null() || value.as_str().is_some_and(str::is_empty) {
            return None;
        }
        Some(Condition {
            expression: self.binding().expression()?.clone(),
            comparator: self.comparator,
            value: value.clone(),
        })
    }

    /// Key of the sheet's rows when the filter is over a forward relation
    /// to the sheet's object.
    fn sheet_key(&self, ctx: &SheetContext<'_>, sheet: &DataSheet) -> WidgetResult<Option<String>> {
        let (Some(alias), Some(object)) = (self.binding().attribute_alias(), ctx.object_alias) else {
            return Ok(None);
        };
        if object == sheet.object_alias() {
            return Ok(None);
        }
        let meta = ctx.model.object(object)?;
        Ok(meta
            .relation(alias)
            .filter(|r| !r.is_reverse() && r.right_object == sheet.object_alias())
            .map(|r| r.right_key.clone()))
    }

    /// Text column of a wrapped combo table. Over the related object itself
    /// the text is one of its own attributes.
    fn text_expression(&self, ctx: &SheetContext<'_>, sheet: &DataSheet) -> WidgetResult<Option<Expression>> {
        if self.sheet_key(ctx, sheet)?.is_some() {
            return Ok(self.input.text_attribute(ctx, sheet)?.map(Expression::attribute));
        }
        self.input.text_expression(ctx, sheet)
    }
}

impl Widget for Filter {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn export_config(&self) -> WidgetResult<UxonObject> {
        let mut config = self.config.clone();
        config.value = self.input.binding().uxon_value();
        export_config(&config)
    }

    fn prepare_data_sheet_to_read(
        &self,
        ctx: &SheetContext<'_>,
        sheet: &mut DataSheet,
    ) -> WidgetResult<()> {
        if let Some(text) = self.text_expression(ctx, sheet)? {
            add_expression_column(sheet, text);
        }
        Ok(())
    }

    fn prepare_data_sheet_to_prefill(
        &self,
        ctx: &SheetContext<'_>,
        sheet: &mut DataSheet,
    ) -> WidgetResult<()> {
        if self.binding().is_fixed() {
            return Ok(());
        }
        self.prepare_data_sheet_to_read(ctx, sheet)
    }

    fn prefill(&mut self, ctx: &SheetContext<'_>, sheet: &DataSheet) -> WidgetResult<()> {
        if self.binding().is_fixed() {
            return Ok(());
        }
        let text = self.text_expression(ctx, sheet)?;
        self.input.fill_text(text.as_ref(), sheet);
        Ok(())
    }

    fn as_value(&self) -> Option<&dyn HasValue> {
        Some(self)
    }

    fn as_value_mut(&mut self) -> Option<&mut dyn HasValue> {
        Some(self)
    }
}

impl HasValue for Filter {
    fn binding(&self) -> &ValueBinding {
        self.input.binding()
    }

    fn binding_mut(&mut self) -> &mut ValueBinding {
        self.input.binding_mut()
    }

    fn aggregator(&self) -> Option<Aggregator> {
        self.input.aggregator().or(match self.comparator {
            Comparator::In => Some(Aggregator::ListDistinct),
            _ => None,
        })
    }

    /// A filter over a relation to the sheet's object takes the key of the
    /// sheet rows themselves instead of following the relation.
    fn sheet_expression(
        &self,
        ctx: &SheetContext<'_>,
        sheet: &DataSheet,
    ) -> WidgetResult<Option<Expression>> {
        if let Some(key) = self.sheet_key(ctx, sheet)? {
            tracing::trace!("Filter '{}' reads key {} of {}", ctx.widget_id, key, sheet.object_alias());
            return Ok(Some(Expression::attribute(key)));
        }
        self.input.sheet_expression(ctx, sheet)
    }
}

pub(crate) fn build(
    widget_type: &'static str,
    common: CommonConfig,
    uxon: UxonObject,
) -> WidgetResult<Box<dyn Widget>> {
    let config: FilterConfig = import_config(widget_type, &uxon)?;
    let core = WidgetCore::from_common(widget_type, common);
    Ok(Box::new(Filter::new(core, config)?))
}
