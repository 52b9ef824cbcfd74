//! Bar with one button per context: favorites, notifications and the like.

use super::{definition, export_config};
use crate::context::ContextProvider;
use crate::error::WidgetResult;
use crate::factory::WidgetFactory;
use crate::page::{ChildSlot, NodeId, Page};
use crate::widget::{CommonConfig, Widget, WidgetCore};
use metaui_model::UxonObject;
use serde::{Deserialize, Serialize};

pub const WIDGET_TYPE: &str = "ContextBar";

const BUTTONS: ChildSlot = ChildSlot::many("buttons");

pub(crate) const SLOTS: &[ChildSlot] = &[BUTTONS];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct ContextBarConfig {}

#[derive(Debug, Clone)]
pub struct ContextBar {
    core: WidgetCore,
}

impl Widget for ContextBar {
    fn core(&self) -> &WidgetCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut WidgetCore {
        &mut self.core
    }

    fn export_config(&self) -> WidgetResult<UxonObject> {
        export_config(&ContextBarConfig {})
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
    super::import_config::<ContextBarConfig>(widget_type, &uxon)?;
    Ok(Box::new(ContextBar {
        core: WidgetCore::from_common(widget_type, common),
    }))
}

/// Add a button for every context that can describe itself. A failing
/// context is logged and left out.
pub(crate) fn finish(factory: &WidgetFactory, page: &mut Page, node: NodeId) -> WidgetResult<()> {
    for provider in factory.context_providers() {
        match context_button(factory, page, node, provider.as_ref()) {
            Ok(button) => tracing::trace!("Context '{}' shown as {}", provider.alias(), button),
            Err(e) => tracing::warn!("Context '{}' left out of the context bar: {}", provider.alias(), e),
        }
    }
    Ok(())
}

fn context_button(
    factory: &WidgetFactory,
    page: &mut Page,
    bar: NodeId,
    provider: &dyn ContextProvider,
) -> WidgetResult<NodeId> {
    let description = provider.describe()?;
    let mut button = definition("Button");
    button.insert("caption", description.caption);
    if let Some(hint) = description.hint {
        button.insert("hint", hint);
    }
    if let Some(icon) = description.icon {
        button.insert("icon", icon);
    }
    if let Some(indicator) = description.indicator {
        button.insert("indicator", indicator);
    }
    if let Some(action) = description.action_alias {
        button.insert("action_alias", action);
    }
    factory.build(page, Some(bar), BUTTONS, button)
}
