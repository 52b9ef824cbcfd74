//! Wizards: a sequence of steps with only the active one shown.

use super::button::{Button, StepNavigation};
use super::container::ContainerConfig;
use super::{export_config, import_config};
use crate::error::{WidgetError, WidgetResult};
use crate::factory::WidgetFactory;
use crate::page::{ChildSlot, NodeId, Page};
use crate::widget::{CommonConfig, Widget, WidgetCore};
use metaui_model::UxonObject;
use serde::{Deserialize, Serialize};

pub const WIDGET_TYPE: &str = "Wizard";

pub const STEP_WIDGET_TYPE: &str = "WizardStep";

pub(crate) const SLOTS: &[ChildSlot] = &[ChildSlot::many("steps"), ChildSlot::many("buttons")];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WizardConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_step: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Wizard {
    core: WidgetCore,
    config: WizardConfig,
}

impl Wizard {
    pub fn active_step(&self) -> usize {
        self.config.active_step.unwrap_or(0)
    }
}

impl Widget for Wizard {
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

/// A step of a wizard. Holds widgets like a panel.
#[derive(Debug, Clone)]
pub struct WizardStep {
    core: WidgetCore,
    config: ContainerConfig,
}

impl Widget for WizardStep {
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
    Ok(Box::new(Wizard {
        core: WidgetCore::from_common(widget_type, common),
        config: import_config(widget_type, &uxon)?,
    }))
}

pub(crate) fn build_step(
    widget_type: &'static str,
    common: CommonConfig,
    uxon: UxonObject,
) -> WidgetResult<Box<dyn Widget>> {
    Ok(Box::new(WizardStep {
        core: WidgetCore::from_common(widget_type, common),
        config: import_config(widget_type, &uxon)?,
    }))
}

/// A wizard needs steps; all but the active one start hidden.
pub(crate) fn finish(_factory: &WidgetFactory, page: &mut Page, node: NodeId) -> WidgetResult<()> {
    let wizard = wizard_widget(page, node)?;
    let active = wizard.active_step();
    let count = steps(page, node)?.len();
    if count == 0 {
        return Err(WidgetError::MissingChild {
            widget: wizard.id().to_string(),
            child: STEP_WIDGET_TYPE.to_string(),
        });
    }
    if active >= count {
        return Err(WidgetError::invalid_property(
            WIDGET_TYPE,
            "active_step",
            format!("the wizard has {} steps", count),
        ));
    }
    show_step(page, node, active)
}

/// Step nodes of a wizard in order.
pub fn steps(page: &Page, wizard: NodeId) -> WidgetResult<Vec<NodeId>> {
    Ok(page
        .children(wizard)?
        .iter()
        .copied()
        .filter(|c| page.widget::<WizardStep>(*c).is_some())
        .collect())
}

/// Switch the active step. Returns the index of the step now shown.
pub fn navigate(page: &mut Page, wizard: NodeId, navigation: StepNavigation) -> WidgetResult<usize> {
    let current = wizard_widget(page, wizard)?.active_step();
    let count = steps(page, wizard)?.len();
    let target = match navigation {
        StepNavigation::Next => current + 1,
        StepNavigation::Previous => current.checked_sub(1).ok_or_else(|| {
            WidgetError::configuration(wizard_id(page, wizard), "already at the first step")
        })?,
        StepNavigation::Step(index) => index,
    };
    if target >= count {
        return Err(WidgetError::configuration(
            wizard_id(page, wizard),
            format!("no step {} in a wizard of {} steps", target, count),
        ));
    }
    show_step(page, wizard, target)?;
    tracing::debug!("Wizard {} moved from step {} to {}", wizard, current, target);
    Ok(target)
}

/// Run the navigation of a wizard button inside a wizard.
pub fn press_wizard_button(page: &mut Page, button: NodeId) -> WidgetResult<usize> {
    let navigation = page
        .widget::<Button>(button)
        .and_then(Button::wizard_navigation)
        .ok_or_else(|| {
            WidgetError::configuration(wizard_id(page, button), "not a wizard button")
        })?;
    let mut current = page.parent(button);
    while let Some(node) = current {
        if page.widget::<Wizard>(node).is_some() {
            return navigate(page, node, navigation);
        }
        current = page.parent(node);
    }
    Err(WidgetError::configuration(
        wizard_id(page, button),
        "the button is not part of a wizard",
    ))
}

fn wizard_widget(page: &Page, node: NodeId) -> WidgetResult<&Wizard> {
    page.widget::<Wizard>(node).ok_or(WidgetError::UnknownNode(node))
}

fn wizard_id(page: &Page, node: NodeId) -> String {
    page.widget_id(node).map(ToString::to_string).unwrap_or_default()
}

fn show_step(page: &mut Page, wizard: NodeId, active: usize) -> WidgetResult<()> {
    for (index, step) in steps(page, wizard)?.into_iter().enumerate() {
        if let Some(widget) = page.get_mut(step) {
            widget.core_mut().set_hidden(index != active);
        }
    }
    if let Some(w) = page.widget_mut::<Wizard>(wizard) {
        w.config.active_step = Some(active);
    }
    Ok(())
}
