//! Tabs hold `Tab` containers; other children are wrapped into a tab each.

use super::{definition, export_config, import_config};
use crate::error::{WidgetError, WidgetResult};
use crate::factory::WidgetFactory;
use crate::page::{ChildSlot, NodeId, Page};
use crate::widget::{CommonConfig, Widget, WidgetCore};
use metaui_model::UxonObject;
use serde::{Deserialize, Serialize};

pub const WIDGET_TYPE: &str = "Tabs";

pub const TAB_WIDGET_TYPE: &str = "Tab";

const TABS: ChildSlot = ChildSlot::many("tabs");

pub(crate) const SLOTS: &[ChildSlot] = &[TABS, ChildSlot::WIDGETS];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TabPosition {
    #[default]
    Top,
    Bottom,
    Left,
    Right,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TabsConfig {
    #[serde(skip_serializing_if = "is_zero")]
    pub active_tab: usize,
    #[serde(skip_serializing_if = "is_top")]
    pub tab_position: TabPosition,
}

fn is_zero(value: &usize) -> bool {
    *value == 0
}

fn is_top(position: &TabPosition) -> bool {
    *position == TabPosition::Top
}

#[derive(Debug, Clone)]
pub struct Tabs {
    core: WidgetCore,
    config: TabsConfig,
}

impl Tabs {
    pub fn active_tab(&self) -> usize {
        self.config.active_tab
    }

    pub fn tab_position(&self) -> TabPosition {
        self.config.tab_position
    }
}

impl Widget for Tabs {
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
    Ok(Box::new(Tabs {
        core: WidgetCore::from_common(widget_type, common),
        config: import_config(widget_type, &uxon)?,
    }))
}

/// Wrap every child that is not a tab into a new tab at its position, then
/// check that the active tab exists.
pub(crate) fn finish(factory: &WidgetFactory, page: &mut Page, node: NodeId) -> WidgetResult<()> {
    let children = page.children(node)?.to_vec();
    for (index, child) in children.into_iter().enumerate() {
        let Some(widget) = page.get(child) else {
            continue;
        };
        if widget.widget_type() == TAB_WIDGET_TYPE {
            continue;
        }

        let mut tab = definition(TAB_WIDGET_TYPE);
        if let Some(caption) = page.caption(child) {
            tab.insert("caption", caption);
        }
        let tab_node = factory.build(page, Some(node), TABS, tab)?;
        page.reorder_child(tab_node, index)?;
        page.move_widget_in(child, tab_node, None, ChildSlot::WIDGETS)?;
        tracing::debug!("Wrapped {} into tab {} of {}", child, tab_node, node);
    }

    let active = tabs_widget(page, node)?.active_tab();
    check_tab(page, node, active)
}

/// Make the tab at `index` the active one.
pub fn select_tab(page: &mut Page, node: NodeId, index: usize) -> WidgetResult<()> {
    check_tab(page, node, index)?;
    page.widget_mut::<Tabs>(node)
        .ok_or(WidgetError::UnknownNode(node))?
        .config
        .active_tab = index;
    Ok(())
}

/// Tab nodes of a tabs widget in order.
pub fn tabs(page: &Page, node: NodeId) -> WidgetResult<Vec<NodeId>> {
    Ok(page
        .children(node)?
        .iter()
        .copied()
        .filter(|c| page.get(*c).is_some_and(|w| w.widget_type() == TAB_WIDGET_TYPE))
        .collect())
}

fn check_tab(page: &Page, node: NodeId, index: usize) -> WidgetResult<()> {
    let count = tabs(page, node)?.len();
    if index >= count && !(index == 0 && count == 0) {
        return Err(WidgetError::invalid_property(
            WIDGET_TYPE,
            "active_tab",
            format!("there are {} tabs", count),
        ));
    }
    Ok(())
}

fn tabs_widget(page: &Page, node: NodeId) -> WidgetResult<&Tabs> {
    page.widget::<Tabs>(node).ok_or(WidgetError::UnknownNode(node))
}
