//! Dialogs and popups.
//!
//! A dialog defined without widgets gets a default editor for its object:
//! one input per editable attribute with a display order. A dialog holding a
//! data widget moves its other widgets into that widget's configurator.

use super::{definition, export_config, import_config};
use crate::error::WidgetResult;
use crate::factory::WidgetFactory;
use crate::page::{ChildSlot, NodeId, Page};
use crate::widget::{CommonConfig, Widget, WidgetCore};
use metaui_model::UxonObject;
use serde::{Deserialize, Serialize};

pub const WIDGET_TYPES: [&str; 2] = ["Dialog", "Popup"];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DialogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximized: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closable: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Dialog {
    core: WidgetCore,
    config: DialogConfig,
}

impl Dialog {
    pub fn new(widget_type: &'static str) -> Self {
        Self {
            core: WidgetCore::new(widget_type),
            config: DialogConfig::default(),
        }
    }

    pub fn config(&self) -> &DialogConfig {
        &self.config
    }

    pub fn is_closable(&self) -> bool {
        self.config.closable.unwrap_or(true)
    }

    /// Dialogs showing a data widget open maximized unless configured.
    pub fn is_maximized(&self, page: &Page, node: NodeId) -> bool {
        self.config.maximized.unwrap_or_else(|| {
            page.children(node).is_ok_and(|children| {
                children
                    .iter()
                    .any(|c| page.get(*c).is_some_and(|w| w.as_fills_container().is_some()))
            })
        })
    }
}

impl Widget for Dialog {
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

    fn adopts_orphans(&self) -> bool {
        true
    }
}

pub(crate) fn build(
    widget_type: &'static str,
    common: CommonConfig,
    uxon: UxonObject,
) -> WidgetResult<Box<dyn Widget>> {
    Ok(Box::new(Dialog {
        core: WidgetCore::from_common(widget_type, common),
        config: import_config(widget_type, &uxon)?,
    }))
}

pub(crate) fn finish(factory: &WidgetFactory, page: &mut Page, node: NodeId) -> WidgetResult<()> {
    let has_widgets = page
        .children(node)?
        .iter()
        .any(|c| page.slot(*c) == Some(ChildSlot::WIDGETS));
    if has_widgets {
        return Ok(());
    }
    let Some(object) = page.meta_object(node)? else {
        return Ok(());
    };

    let mut count = 0;
    for attribute in object.default_editor_attributes() {
        let editor = match object.relation(&attribute.alias) {
            Some(relation) if !relation.is_reverse() => "InputComboTable",
            _ => attribute.data_type.default_editor_widget(),
        };
        let mut input = definition(editor);
        input.insert("attribute_alias", attribute.alias.as_str());
        if attribute.required {
            input.insert("required", true);
        }
        factory.build(page, Some(node), ChildSlot::WIDGETS, input)?;
        count += 1;
    }
    tracing::debug!("Generated default editor with {} inputs for {}", count, object.alias());
    Ok(())
}
