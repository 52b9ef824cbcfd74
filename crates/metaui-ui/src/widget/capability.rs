//! Capability traits widgets opt into through the `as_*` queries of
//! [`Widget`](super::Widget).

use super::value::ValueBinding;
use crate::error::WidgetResult;
use crate::traversal::SheetContext;
use crate::widgets::data::DataColumn;
use indexmap::IndexMap;
use metaui_core::Config;
use metaui_model::datatype::{as_f64, value_to_string};
use metaui_model::{Aggregator, DataSheet, Expression, Value};

/// Capability: widget bound to an attribute, expression or literal.
pub trait HasValue {
    fn binding(&self) -> &ValueBinding;

    fn binding_mut(&mut self) -> &mut ValueBinding;

    fn value(&self) -> Option<&Value> {
        self.binding().value()
    }

    /// Set a value explicitly. Prefill will not override it.
    fn set_value(&mut self, value: Value) {
        self.binding_mut().set_literal(value);
    }

    /// Aggregator used when a sheet has more than one row.
    fn aggregator(&self) -> Option<Aggregator> {
        self.binding().aggregator()
    }

    /// Expression to request from and read out of `sheet`, rewritten for the
    /// sheet's object. `None` if the widget has nothing to read from it.
    fn sheet_expression(
        &self,
        ctx: &SheetContext<'_>,
        sheet: &DataSheet,
    ) -> WidgetResult<Option<Expression>> {
        match self.binding().expression() {
            Some(expression) => ctx.bind(expression, sheet).map(Some),
            None => Ok(None),
        }
    }

    /// Further bindings read and prefilled along with the value, each with
    /// its own column and aggregator.
    fn companion_bindings(&self) -> Vec<&ValueBinding> {
        Vec::new()
    }

    /// Same bindings as [`HasValue::companion_bindings`], in the same order.
    fn companion_bindings_mut(&mut self) -> Vec<&mut ValueBinding> {
        Vec::new()
    }
}

/// Capability: widget with a color.
pub trait HasColor {
    /// Fixed color, if any.
    fn color(&self) -> Option<&str>;

    /// Value -> color mapping. Numeric keys are lower bounds.
    fn color_scale(&self) -> &IndexMap<String, String>;

    /// Color to show for `value`: from the scale if one matches, else the fixed color.
    fn resolve_color(&self, value: Option<&Value>) -> Option<String> {
        value
            .and_then(|v| color_from_scale(self.color_scale(), v))
            .or_else(|| self.color().map(str::to_string))
    }
}

fn color_from_scale(scale: &IndexMap<String, String>, value: &Value) -> Option<String> {
    if let Some(number) = as_f64(value) {
        let mut best: Option<(f64, &String)> = None;
        for (bound, color) in scale {
            let Ok(bound) = bound.trim().parse::<f64>() else {
                continue;
            };
            if bound <= number && best.is_none_or(|(b, _)| bound > b) {
                best = Some((bound, color));
            }
        }
        if let Some((_, color)) = best {
            return Some(color.clone());
        }
    }
    let text = value_to_string(value)?;
    scale.get(&text).cloned()
}

/// Capability: widget that takes up its whole container.
///
/// When such a widget shares a container that adopts orphans, its siblings are
/// moved into its child of [`FillsContainer::orphan_container_type`].
pub trait FillsContainer {
    fn orphan_container_type(&self) -> &'static str;
}

/// Capability: widget that runs an action.
pub trait TriggersAction {
    fn action_alias(&self) -> Option<&str>;

    /// Whether the surrounding dialog closes after the action.
    fn closes_dialog(&self) -> bool;

    /// Id of the widget whose data the action receives.
    fn input_widget_id(&self) -> Option<&str>;
}

/// Capability: widget showing rows of its own meta-object.
pub trait HasDataColumns {
    fn columns(&self) -> &[DataColumn];

    /// Columns needed by the layout (tree parent, schedule bounds, ...).
    fn required_expressions(&self) -> Vec<Expression>;

    /// Rows per page, `None` when not paginated.
    fn page_size(&self, config: &Config) -> Option<usize>;
}
