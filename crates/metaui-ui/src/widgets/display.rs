//! Read-only value widgets: plain values, formatted text, media, color
//! indicators and progress bars.

use super::{export_config, import_binding, import_config};
use crate::error::WidgetResult;
use crate::widget::{
    CommonConfig, HasColor, HasValue, ValueBinding, Widget, WidgetCore,
};
use indexmap::IndexMap;
use metaui_model::datatype::as_f64;
use metaui_model::{Aggregator, Align, DataType, Expression, UxonObject, Value};
use serde::{Deserialize, Serialize};

pub const WIDGET_TYPES: [&str; 9] = [
    "Value",
    "Display",
    "Text",
    "Html",
    "Markdown",
    "Image",
    "Video",
    "ColorIndicator",
    "ProgressBar",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregator: Option<Aggregator>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align: Option<Align>,
    /// Shown instead of an empty value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub empty_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub color_scale: IndexMap<String, String>,
    /// Lower end of a progress bar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper end of a progress bar.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Display {
    core: WidgetCore,
    config: DisplayConfig,
    binding: ValueBinding,
}

impl Display {
    pub fn new(core: WidgetCore, config: DisplayConfig) -> WidgetResult<Self> {
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
        })
    }

    /// A `Display` bound to an attribute path.
    pub fn bound(attribute_alias: &str) -> Self {
        Self {
            core: WidgetCore::new("Display"),
            config: DisplayConfig {
                attribute_alias: Some(attribute_alias.to_string()),
                ..Default::default()
            },
            binding: ValueBinding::bound(Expression::attribute(attribute_alias)),
        }
    }

    pub fn config(&self) -> &DisplayConfig {
        &self.config
    }

    pub fn align(&self, data_type: Option<&DataType>) -> Align {
        match (self.config.align, data_type) {
            (Some(align), _) if align != Align::Default => align,
            (_, Some(data_type)) => data_type.default_align(),
            _ => Align::Left,
        }
    }

    /// The value as text, or the empty text.
    pub fn formatted_value(&self, data_type: &DataType) -> String {
        let formatted = self
            .binding
            .value()
            .map(|v| data_type.format_value(v))
            .unwrap_or_default();
        match &self.config.empty_text {
            Some(empty) if formatted.is_empty() => empty.clone(),
            _ => formatted,
        }
    }

    /// Position of the value between `min` (default 0) and `max` (default
    /// 100), clamped to `0.0..=1.0`.
    pub fn progress(&self) -> Option<f64> {
        let value = as_f64(self.binding.value()?)?;
        let min = self.config.min.unwrap_or(0.0);
        let max = self.config.max.unwrap_or(100.0);
        if max <= min {
            return None;
        }
        Some(((value - min) / (max - min)).clamp(0.0, 1.0))
    }
}

impl Widget for Display {
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

    fn as_value(&self) -> Option<&dyn HasValue> {
        Some(self)
    }

    fn as_value_mut(&mut self) -> Option<&mut dyn HasValue> {
        Some(self)
    }

    fn as_color(&self) -> Option<&dyn HasColor> {
        Some(self)
    }
}

impl HasValue for Display {
    fn binding(&self) -> &ValueBinding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut ValueBinding {
        &mut self.binding
    }
}

impl HasColor for Display {
    fn color(&self) -> Option<&str> {
        self.config.color.as_deref()
    }

    fn color_scale(&self) -> &IndexMap<String, String> {
        &self.config.color_scale
    }
}

pub(crate) fn build(
    widget_type: &'static str,
    common: CommonConfig,
    uxon: UxonObject,
) -> WidgetResult<Box<dyn Widget>> {
    let config: DisplayConfig = import_config(widget_type, &uxon)?;
    let core = WidgetCore::from_common(widget_type, common);
    Ok(Box::new(Display::new(core, config)?))
}
