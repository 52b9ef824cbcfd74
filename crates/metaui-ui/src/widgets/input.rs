//! Editable value widgets.
//!
//! All input types share one struct; the type name decides the editor shown.
//! `InputComboTable` additionally reads the label of the related object so
//! it can show text instead of the raw key.

use super::{export_config, import_binding, import_config};
use crate::error::{WidgetError, WidgetResult};
use crate::flags::WidgetFlags;
use crate::traversal::{SheetContext, add_expression_column};
use crate::widget::{CommonConfig, HasValue, ValueBinding, Widget, WidgetCore, is_false};
use indexmap::IndexMap;
use metaui_model::datatype::value_to_string;
use metaui_model::{
    Aggregator, DataSheet, DataType, Expression, RELATION_SEPARATOR, UxonObject, Value,
};
use serde::{Deserialize, Serialize};

pub const WIDGET_TYPES: [&str; 8] = [
    "Input",
    "InputText",
    "InputNumber",
    "InputHidden",
    "InputCheckBox",
    "InputDate",
    "InputSelect",
    "InputComboTable",
];

const COMBO_TABLE: &str = "InputComboTable";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregator: Option<Aggregator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub multi_select: bool,
    /// Key -> label. Falls back to the values of an enum attribute.
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub selectable_options: IndexMap<String, String>,
    /// Object listed in the dropdown of a combo table.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_object_alias: Option<String>,
    /// Attribute of the related object shown as text. Defaults to its label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_attribute_alias: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Input {
    core: WidgetCore,
    config: InputConfig,
    binding: ValueBinding,
    text: Option<Value>,
}

impl Input {
    pub fn new(core: WidgetCore, config: InputConfig) -> WidgetResult<Self> {
        let binding = import_binding(
            core.widget_type(),
            config.attribute_alias.as_deref(),
            config.value.as_ref(),
            config.aggregator,
        )?;
        Ok(Self {
            core,
            config,
            binding,
            text: None,
        })
    }

    /// An input of the given type bound to an attribute path.
    pub fn bound(widget_type: &'static str, attribute_alias: &str) -> Self {
        Self {
            core: WidgetCore::new(widget_type),
            config: InputConfig {
                attribute_alias: Some(attribute_alias.to_string()),
                ..Default::default()
            },
            binding: ValueBinding::bound(Expression::attribute(attribute_alias)),
            text: None,
        }
    }

    pub fn config(&self) -> &InputConfig {
        &self.config
    }

    pub fn is_multi_select(&self) -> bool {
        self.config.multi_select
    }

    /// Options of a select: configured ones, else the values of an enum.
    pub fn selectable_options(&self, data_type: Option<&DataType>) -> IndexMap<String, String> {
        if !self.config.selectable_options.is_empty() {
            return self.config.selectable_options.clone();
        }
        match data_type {
            Some(DataType::Enum { values }) => values.clone(),
            _ => IndexMap::new(),
        }
    }

    /// Check the current value: present when required, accepted by the data
    /// type and, for selects with options, one of the options.
    pub fn validate(&self, data_type: &DataType, delimiter: &str) -> WidgetResult<()> {
        let invalid = |message: String| WidgetError::invalid_value(self.core.id().as_str(), message);
        let value = self.binding.value().filter(|v| !is_blank(v));
        let Some(value) = value else {
            if self.core.flags.contains(WidgetFlags::REQUIRED) {
                return Err(invalid("a value is required".to_string()));
            }
            return Ok(());
        };

        let options = self.selectable_options(Some(data_type));
        let keys: Vec<String> = match (self.config.multi_select, value_to_string(value)) {
            (true, Some(text)) => text.split(delimiter).map(|k| k.trim().to_string()).collect(),
            (false, Some(text)) => vec![text],
            (_, None) => return Err(invalid("not a scalar value".to_string())),
        };
        for key in keys {
            if !options.is_empty() && !options.contains_key(&key) {
                return Err(invalid(format!("'{}' is not a selectable option", key)));
            }
            if options.is_empty() && !data_type.accepts(&Value::String(key.clone())) && !data_type.accepts(value) {
                return Err(invalid(format!("'{}' is not a valid value", key)));
            }
        }
        Ok(())
    }

    /// Text shown for the value of a combo table.
    pub fn text(&self) -> Option<&Value> {
        self.text.as_ref()
    }

    /// Attribute of the related object shown as text: `NAME` for a combo
    /// bound to `ORDER__CUSTOMER`. `None` unless this is a combo table bound
    /// to a relation.
    pub(crate) fn text_attribute(
        &self,
        ctx: &SheetContext<'_>,
        sheet: &DataSheet,
    ) -> WidgetResult<Option<String>> {
        if self.core.widget_type() != COMBO_TABLE {
            return Ok(None);
        }
        let Some(alias) = self.binding.attribute_alias() else {
            return Ok(None);
        };
        let object = ctx.object_alias.unwrap_or(sheet.object_alias());
        let resolved = ctx.model.resolve_attribute(object, alias)?;
        let owner = ctx.model.object(resolved.object_alias())?;
        let relation_alias = alias.rsplit(RELATION_SEPARATOR).next().unwrap_or(alias);
        let Some(relation) = owner.relation(relation_alias) else {
            return Ok(None);
        };
        match &self.config.text_attribute_alias {
            Some(text) => Ok(Some(text.clone())),
            None => {
                let related = ctx.model.object(&relation.right_object)?;
                Ok(related.label_attribute().map(str::to_string))
            }
        }
    }

    /// Expression of the related object's text, rewritten for `sheet`.
    pub(crate) fn text_expression(
        &self,
        ctx: &SheetContext<'_>,
        sheet: &DataSheet,
    ) -> WidgetResult<Option<Expression>> {
        let (Some(alias), Some(label)) = (self.binding.attribute_alias(), self.text_attribute(ctx, sheet)?) else {
            return Ok(None);
        };
        let text = Expression::attribute(format!("{}{}{}", alias, RELATION_SEPARATOR, label));
        ctx.bind(&text, sheet).map(Some)
    }

    /// Take the text from row 0 of the `text` column.
    pub(crate) fn fill_text(&mut self, text: Option<&Expression>, sheet: &DataSheet) {
        if let Some(text) = text
            && let Some(value) = sheet.cell(&text.key(), 0)
        {
            self.text = Some(value.clone());
        }
    }
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

impl Widget for Input {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn export_config(&self) -> WidgetResult<UxonObject> {
        let mut config = self.config.clone();
        config.value = self.binding.uxon_value();
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
        if self.binding.is_fixed() {
            return Ok(());
        }
        self.prepare_data_sheet_to_read(ctx, sheet)
    }

    fn prefill(&mut self, ctx: &SheetContext<'_>, sheet: &DataSheet) -> WidgetResult<()> {
        if self.binding.is_fixed() {
            return Ok(());
        }
        let text = self.text_expression(ctx, sheet)?;
        self.fill_text(text.as_ref(), sheet);
        Ok(())
    }

    fn as_value(&self) -> Option<&dyn HasValue> {
        Some(self)
    }

    fn as_value_mut(&mut self) -> Option<&mut dyn HasValue> {
        Some(self)
    }
}

impl HasValue for Input {
    fn binding(&self) -> &ValueBinding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut ValueBinding {
        &mut self.binding
    }
}

pub(crate) fn build(
    widget_type: &'static str,
    common: CommonConfig,
    uxon: UxonObject,
) -> WidgetResult<Box<dyn Widget>> {
    Ok(Box::new(build_input(widget_type, common, &uxon)?))
}

pub(crate) fn build_input(
    widget_type: &'static str,
    common: CommonConfig,
    uxon: &UxonObject,
) -> WidgetResult<Input> {
    let config: InputConfig = import_config(widget_type, uxon)?;
    Input::new(WidgetCore::from_common(widget_type, common), config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::Page;
    use crate::widgets::Container;
    use metaui_core::Config;
    use metaui_test_utils::{SheetBuilder, shared_shop_model};
    use serde_json::json;

    #[test]
    fn test_validate_select_and_required() {
        let status = DataType::Enum {
            values: [("10".to_string(), "Open".to_string()), ("90".to_string(), "Done".to_string())]
                .into_iter()
                .collect(),
        };
        let mut select = Input::bound("InputSelect", "STATUS");
        select.core_mut().flags.insert(WidgetFlags::REQUIRED);
        assert!(matches!(
            select.validate(&status, ","),
            Err(WidgetError::InvalidValue { message, .. }) if message == "a value is required"
        ));

        select.set_value(json!(10));
        assert!(select.validate(&status, ",").is_ok());
        select.set_value(json!(20));
        assert!(matches!(select.validate(&status, ","), Err(WidgetError::InvalidValue { .. })));
    }

    #[test]
    fn test_multi_select_checks_every_key() {
        let config = InputConfig {
            attribute_alias: Some("STATUS".into()),
            multi_select: true,
            selectable_options: [("a".to_string(), "A".to_string()), ("b".to_string(), "B".to_string())]
                .into_iter()
                .collect(),
            ..Default::default()
        };
        let mut input = Input::new(WidgetCore::new("InputSelect"), config).unwrap();
        input.set_value(json!("a, b"));
        assert!(input.validate(&DataType::String, ",").is_ok());
        input.set_value(json!("a,c"));
        assert!(matches!(
            input.validate(&DataType::String, ","),
            Err(WidgetError::InvalidValue { message, .. }) if message == "'c' is not a selectable option"
        ));
    }

    #[test]
    fn test_combo_table_reads_related_label() {
        let mut page = Page::new(shared_shop_model(), Config::default());
        let mut form = Container::new("Form");
        form.core_mut().object_alias = Some("shop.ORDER".into());
        let root = page.add_widget(None, Box::new(form)).unwrap();
        let combo = page
            .add_widget(Some(root), Box::new(Input::bound("InputComboTable", "CUSTOMER")))
            .unwrap();

        let sheet = page
            .prepare_data_sheet_to_read(root, DataSheet::new("shop.ORDER"))
            .unwrap();
        assert_eq!(sheet.column_names(), vec!["CUSTOMER", "CUSTOMER__NAME"]);

        let data = SheetBuilder::new("shop.ORDER")
            .row([("CUSTOMER", json!(7)), ("CUSTOMER__NAME", json!("Ada"))])
            .build();
        page.prefill(root, &data).unwrap();
        let input = page.widget::<Input>(combo).unwrap();
        assert_eq!(input.value(), Some(&json!(7)));
        assert_eq!(input.text(), Some(&json!("Ada")));
    }

    #[test]
    fn test_combo_table_follows_relation_chain() {
        let mut page = Page::new(shared_shop_model(), Config::default());
        let mut form = Container::new("Form");
        form.core_mut().object_alias = Some("shop.ORDER_POS".into());
        let root = page.add_widget(None, Box::new(form)).unwrap();
        let combo = page
            .add_widget(Some(root), Box::new(Input::bound("InputComboTable", "ORDER__CUSTOMER")))
            .unwrap();

        let sheet = page
            .prepare_data_sheet_to_read(root, DataSheet::new("shop.ORDER_POS"))
            .unwrap();
        assert_eq!(sheet.column_names(), vec!["ORDER__CUSTOMER", "ORDER__CUSTOMER__NAME"]);

        let data = SheetBuilder::new("shop.ORDER_POS")
            .row([("ORDER__CUSTOMER", json!(7)), ("ORDER__CUSTOMER__NAME", json!("Ada"))])
            .build();
        page.prefill(root, &data).unwrap();
        assert_eq!(page.widget::<Input>(combo).unwrap().text(), Some(&json!("Ada")));
    }
}
