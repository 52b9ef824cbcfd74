//! Plain containers: panels, forms, groups, splits and grids.

use super::{export_config, import_config};
use crate::error::WidgetResult;
use crate::widget::{CommonConfig, Widget, WidgetCore};
use metaui_model::UxonObject;
use serde::{Deserialize, Serialize};

pub const WIDGET_TYPES: [&str; 9] = [
    "Container",
    "Panel",
    "Form",
    "WidgetGroup",
    "SplitHorizontal",
    "SplitVertical",
    "SplitPanel",
    "WidgetGrid",
    "Tab",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ContainerConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns_in_grid: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Width or height of a split panel, e.g. `30%`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Container {
    core: WidgetCore,
    config: ContainerConfig,
}

impl Container {
    pub fn new(widget_type: &'static str) -> Self {
        Self {
            core: WidgetCore::new(widget_type),
            config: ContainerConfig::default(),
        }
    }

    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn is_split(&self) -> bool {
        self.core.widget_type().starts_with("Split") && self.core.widget_type() != "SplitPanel"
    }
}

impl Widget for Container {
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
}

pub(crate) fn build(
    widget_type: &'static str,
    common: CommonConfig,
    uxon: UxonObject,
) -> WidgetResult<Box<dyn Widget>> {
    Ok(Box::new(Container {
        core: WidgetCore::from_common(widget_type, common),
        config: import_config(widget_type, &uxon)?,
    }))
}
