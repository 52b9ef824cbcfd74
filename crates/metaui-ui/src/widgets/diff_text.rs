//! Text compared line by line against a second value.

use super::{export_config, import_binding, import_config};
use crate::error::WidgetResult;
use crate::widget::{CommonConfig, HasValue, ValueBinding, Widget, WidgetCore};
use metaui_model::datatype::value_to_string;
use metaui_model::{Aggregator, UxonObject, Value};
use serde::{Deserialize, Serialize};

pub const WIDGET_TYPE: &str = "DiffText";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffTextConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attribute_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Attribute holding the text to compare against.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_attribute_alias: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_value: Option<Value>,
    /// Applies to both texts when prefilled from several rows.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregator: Option<Aggregator>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DiffLine {
    Same(String),
    Added(String),
    Removed(String),
}

#[derive(Debug, Clone)]
pub struct DiffText {
    core: WidgetCore,
    config: DiffTextConfig,
    binding: ValueBinding,
    compare: ValueBinding,
}

impl DiffText {
    pub fn new(core: WidgetCore, config: DiffTextConfig) -> WidgetResult<Self> {
        let binding = import_binding(
            WIDGET_TYPE,
            config.attribute_alias.as_deref(),
            config.value.as_ref(),
            config.aggregator,
        )?;
        let compare = import_binding(
            WIDGET_TYPE,
            config.compare_attribute_alias.as_deref(),
            config.compare_value.as_ref(),
            config.aggregator,
        )?;
        Ok(Self {
            core,
            config,
            binding,
            compare,
        })
    }

    pub fn compare_binding(&self) -> &ValueBinding {
        &self.compare
    }

    /// Lines of the compared text turned into the value's lines.
    pub fn diff(&self) -> Vec<DiffLine> {
        let text = |v: Option<&Value>| v.and_then(value_to_string).unwrap_or_default();
        diff_lines(&text(self.compare.value()), &text(self.binding.value()))
    }
}

impl Widget for DiffText {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn export_config(&self) -> WidgetResult<UxonObject> {
        let mut config = self.config.clone();
        config.value = self.binding.uxon_value();
        config.compare_value = self.compare.uxon_value();
        export_config(&config)
    }

    fn as_value(&self) -> Option<&dyn HasValue> {
        Some(self)
    }

    fn as_value_mut(&mut self) -> Option<&mut dyn HasValue> {
        Some(self)
    }
}

impl HasValue for DiffText {
    fn binding(&self) -> &ValueBinding {
        &self.binding
    }

    fn binding_mut(&mut self) -> &mut ValueBinding {
        &mut self.binding
    }

    fn companion_bindings(&self) -> Vec<&ValueBinding> {
        vec![&self.compare]
    }

    fn companion_bindings_mut(&mut self) -> Vec<&mut ValueBinding> {
        vec![&mut self.compare]
    }
}

/// Line diff based on the longest common subsequence.
pub fn diff_lines(old: &str, new: &str) -> Vec<DiffLine> {
    let old: Vec<&str> = old.lines().collect();
    let new: Vec<&str> = new.lines().collect();

    // lcs[i][j]: length of the common subsequence of old[i..] and new[j..]
    let mut lcs = vec![vec![0usize; new.len() + 1]; old.len() + 1];
    for i in (0..old.len()).rev() {
        for j in (0..new.len()).rev() {
            lcs[i][j] = if old[i] == new[j] {
                lcs[i + 1][j + 1] + 1
            } else {
                lcs[i + 1][j].max(lcs[i][j + 1])
            };
        }
    }

    let mut lines = Vec::with_capacity(old.len().max(new.len()));
    let (mut i, mut j) = (0, 0);
    while i < old.len() && j < new.len() {
        if old[i] == new[j] {
            lines.push(DiffLine::Same(old[i].to_string()));
            i += 1;
            j += 1;
        } else if lcs[i + 1][j] >= lcs[i][j + 1] {
            lines.push(DiffLine::Removed(old[i].to_string()));
            i += 1;
        } else {
            lines.push(DiffLine::Added(new[j].to_string()));
            j += 1;
        }
    }
    lines.extend(old[i..].iter().map(|l| DiffLine::Removed(l.to_string())));
    lines.extend(new[j..].iter().map(|l| DiffLine::Added(l.to_string())));
    lines
}

pub(crate) fn build(
    widget_type: &'static str,
    common: CommonConfig,
    uxon: UxonObject,
) -> WidgetResult<Box<dyn Widget>> {
    let config: DiffTextConfig = import_config(widget_type, &uxon)?;
    let core = WidgetCore::from_common(widget_type, common);
    Ok(Box::new(DiffText::new(core, config)?))
}
