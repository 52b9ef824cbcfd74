//! Data-sheet preparation and prefill over a widget tree.
//!
//! All three passes walk the tree depth-first in child order, starting at the
//! given node. A widget whose [`Widget::traversal`] returns
//! [`Traversal::Skip`] for the pass still contributes itself but its
//! children are not visited.
//!
//! For every widget with a value the page handles the binding and its
//! companion bindings itself:
//! - read: one column per bound attribute or expression
//! - prefill preparation: the same, except for bindings fixed by a literal
//! - prefill: row 0 of the column, or the aggregate over all rows when there
//!   is more than one row and the binding has an aggregator
//!
//! Then the widget's own hook runs for anything beyond its value.

use crate::binding::bind_to_sheet;
use crate::error::{WidgetError, WidgetResult};
use crate::event::WidgetEvent;
use crate::page::{NodeId, Page, WidgetNode};
use crate::widget::{Phase, Traversal, Widget};
use crate::widget_id::WidgetId;
use crate::widgets::configurator;
use indexmap::IndexMap;
use metaui_core::Config;
use metaui_core::profiling::{profile_function, profile_scope};
use metaui_model::{Aggregator, CellPointer, DataSheet, Expression, MetaModel, Value};

/// What a widget hook gets to know about where it sits.
pub struct SheetContext<'a> {
    pub model: &'a dyn MetaModel,
    pub config: &'a Config,
    pub node: NodeId,
    pub widget_id: WidgetId,
    /// The widget's effective meta-object.
    pub object_alias: Option<&'a str>,
}

impl SheetContext<'_> {
    /// Rewrite an expression of this widget for `sheet`.
    pub fn bind(&self, expression: &Expression, sheet: &DataSheet) -> WidgetResult<Expression> {
        bind_to_sheet(
            self.model,
            self.config,
            &self.widget_id,
            self.object_alias,
            expression,
            sheet,
        )
    }

    /// Whether the sheet is of the widget's own object.
    pub fn is_own_object(&self, sheet: &DataSheet) -> bool {
        self.object_alias
            .is_none_or(|alias| alias == sheet.object_alias())
    }

    pub fn configuration_error(&self, message: impl Into<String>) -> WidgetError {
        WidgetError::configuration(self.widget_id.as_str(), message)
    }
}

/// Add the column for an expression, unless it is a literal.
pub fn add_expression_column(sheet: &mut DataSheet, expression: Expression) -> bool {
    if expression.is_literal() {
        return false;
    }
    sheet.add_column(expression)
}

struct ValueChange {
    old: Option<Value>,
    new: Value,
    source: CellPointer,
}

impl Page {
    /// Add every column the subtree at `node` needs to show its data.
    ///
    /// Applying it to its own output adds nothing.
    pub fn prepare_data_sheet_to_read(
        &self,
        node: NodeId,
        mut sheet: DataSheet,
    ) -> WidgetResult<DataSheet> {
        profile_function!();
        for id in self.traversal_order(node, Phase::Read)? {
            let ctx = self.sheet_context(id)?;
            let widget = &*self.node(id)?.widget;

            if let Some(value) = widget.as_value() {
                if let Some(expression) = value.sheet_expression(&ctx, &sheet)? {
                    add_expression_column(&mut sheet, expression);
                }
                for binding in value.companion_bindings() {
                    if let Some(expression) = binding.expression() {
                        let bound = ctx.bind(expression, &sheet)?;
                        add_expression_column(&mut sheet, bound);
                    }
                }
            }
            widget.prepare_data_sheet_to_read(&ctx, &mut sheet)?;

            if widget.as_data().is_some() && ctx.is_own_object(&sheet) {
                for child in self.children(id)? {
                    if self.node(*child)?.widget.widget_type() == configurator::WIDGET_TYPE {
                        configurator::apply_to_sheet(self, *child, &mut sheet)?;
                    }
                }
            }
        }
        Ok(sheet)
    }

    /// Add the columns needed to prefill the subtree at `node`, skipping
    /// widgets whose value is fixed by a literal.
    pub fn prepare_data_sheet_to_prefill(
        &self,
        node: NodeId,
        mut sheet: DataSheet,
    ) -> WidgetResult<DataSheet> {
        profile_function!();
        for id in self.traversal_order(node, Phase::Prefill)? {
            let ctx = self.sheet_context(id)?;
            let widget = &*self.node(id)?.widget;

            if let Some(value) = widget.as_value() {
                if !value.binding().is_fixed()
                    && let Some(expression) = value.sheet_expression(&ctx, &sheet)?
                {
                    add_expression_column(&mut sheet, expression);
                }
                for binding in value.companion_bindings() {
                    if !binding.is_fixed()
                        && let Some(expression) = binding.expression()
                    {
                        let bound = ctx.bind(expression, &sheet)?;
                        add_expression_column(&mut sheet, bound);
                    }
                }
            }
            widget.prepare_data_sheet_to_prefill(&ctx, &mut sheet)?;
        }
        Ok(sheet)
    }

    /// Fill the values of the subtree at `node` from `sheet`.
    ///
    /// Dispatches a [`WidgetEvent::ValueChanged`] per filled binding, also for
    /// the bindings filled before an error stopped the pass. Returns the
    /// number of filled bindings.
    pub fn prefill(&mut self, node: NodeId, sheet: &DataSheet) -> WidgetResult<usize> {
        profile_function!();
        let plan: Vec<(NodeId, Option<String>)> = self
            .traversal_order(node, Phase::Prefill)?
            .into_iter()
            .map(|id| (id, self.meta_object_alias(id).map(str::to_string)))
            .collect();

        let mut events = Vec::new();
        let result = {
            let (nodes, model, config) = self.split_mut();
            prefill_nodes(nodes, model, config, &plan, sheet, &mut events)
        };

        let filled = events.len();
        for event in events {
            self.dispatch(event);
        }
        result.map(|_| filled)
    }

    /// Nodes visited by a pass, in visiting order.
    fn traversal_order(&self, node: NodeId, phase: Phase) -> WidgetResult<Vec<NodeId>> {
        let mut order = Vec::new();
        let mut stack = vec![node];
        while let Some(id) = stack.pop() {
            let current = self.node(id)?;
            order.push(id);
            if current.widget.traversal(phase) == Traversal::Skip {
                tracing::trace!("{} '{}' handles its children itself", current.widget.widget_type(), current.widget.id());
                continue;
            }
            stack.extend(current.children.iter().rev().copied());
        }
        Ok(order)
    }

    pub(crate) fn sheet_context(&self, node: NodeId) -> WidgetResult<SheetContext<'_>> {
        Ok(SheetContext {
            model: self.model(),
            config: self.config(),
            node,
            widget_id: self.node(node)?.widget.id().clone(),
            object_alias: self.meta_object_alias(node),
        })
    }
}

fn prefill_nodes(
    nodes: &mut IndexMap<NodeId, WidgetNode>,
    model: &dyn MetaModel,
    config: &Config,
    plan: &[(NodeId, Option<String>)],
    sheet: &DataSheet,
    events: &mut Vec<WidgetEvent>,
) -> WidgetResult<()> {
    for (id, object_alias) in plan {
        profile_scope!("prefill_widget");
        let Some(node) = nodes.get_mut(id) else {
            continue;
        };
        let ctx = SheetContext {
            model,
            config,
            node: *id,
            widget_id: node.widget.id().clone(),
            object_alias: object_alias.as_deref(),
        };

        for change in prefill_values(&mut *node.widget, &ctx, sheet)? {
            events.push(WidgetEvent::ValueChanged {
                node: *id,
                widget_id: ctx.widget_id.clone(),
                old: change.old,
                new: change.new,
                source: change.source,
            });
        }
        node.widget.prefill(&ctx, sheet)?;
    }
    Ok(())
}

/// Fill the value and the companion bindings of `widget`, skipping literals
/// and bindings without data in `sheet`.
fn prefill_values(
    widget: &mut dyn Widget,
    ctx: &SheetContext<'_>,
    sheet: &DataSheet,
) -> WidgetResult<Vec<ValueChange>> {
    let Some(value) = widget.as_value() else {
        return Ok(Vec::new());
    };

    let main = if value.binding().is_fixed() {
        tracing::trace!("Widget '{}' has a fixed value, not prefilling", ctx.widget_id);
        None
    } else {
        match value.sheet_expression(ctx, sheet)? {
            Some(expression) => read_cell(ctx, sheet, &expression, value.aggregator()),
            None => None,
        }
    };
    let mut companions = Vec::new();
    for binding in value.companion_bindings() {
        let read = match binding.expression() {
            Some(expression) if !binding.is_fixed() => {
                read_cell(ctx, sheet, &ctx.bind(expression, sheet)?, binding.aggregator())
            }
            _ => None,
        };
        companions.push(read);
    }

    let Some(target) = widget.as_value_mut() else {
        return Ok(Vec::new());
    };
    let mut changes = Vec::new();
    if let Some((new, source)) = main {
        let old = target.binding_mut().fill(new.clone(), source.clone());
        changes.push(ValueChange { old, new, source });
    }
    for (binding, read) in target.companion_bindings_mut().into_iter().zip(companions) {
        if let Some((new, source)) = read {
            let old = binding.fill(new.clone(), source.clone());
            changes.push(ValueChange { old, new, source });
        }
    }
    Ok(changes)
}

/// Row 0 of the expression's column, or its aggregate when the sheet has
/// more than one row and an aggregator is given.
fn read_cell(
    ctx: &SheetContext<'_>,
    sheet: &DataSheet,
    expression: &Expression,
    aggregator: Option<Aggregator>,
) -> Option<(Value, CellPointer)> {
    let column = expression.key();
    if sheet.is_empty() || !sheet.has_column(&column) {
        tracing::debug!(
            "Widget '{}': no data for {} in sheet of {}",
            ctx.widget_id,
            column,
            sheet.object_alias()
        );
        return None;
    }
    match aggregator {
        Some(aggregator) if sheet.rows_count() > 1 => {
            let value = sheet.aggregate(&column, aggregator, &ctx.config.list_delimiter);
            Some((value, CellPointer::aggregate(column)))
        }
        _ => {
            let value = sheet.cell(&column, 0).cloned().unwrap_or(Value::Null);
            Some((value, CellPointer::cell(column, 0)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widgets::{Container, Display};
    use metaui_test_utils::{SheetBuilder, shared_shop_model};
    use serde_json::json;

    fn order_panel() -> (Page, NodeId) {
        let mut page = Page::new(shared_shop_model(), Config::default());
        let mut panel = Container::new("Panel");
        panel.core_mut().object_alias = Some("shop.ORDER".into());
        let root = page.add_widget(None, Box::new(panel)).unwrap();
        page.add_widget(Some(root), Box::new(Display::bound("NUMBER"))).unwrap();
        page.add_widget(Some(root), Box::new(Display::bound("CUSTOMER__NAME"))).unwrap();
        (page, root)
    }

    #[test]
    fn test_read_collects_columns_in_tree_order() {
        let (page, root) = order_panel();
        let sheet = page
            .prepare_data_sheet_to_read(root, DataSheet::new("shop.ORDER"))
            .unwrap();
        assert_eq!(sheet.column_names(), vec!["NUMBER", "CUSTOMER__NAME"]);
    }

    #[test]
    fn test_prefill_records_source_cell() {
        let (mut page, root) = order_panel();
        let sheet = SheetBuilder::new("shop.ORDER")
            .row([("NUMBER", json!("A-1")), ("CUSTOMER__NAME", json!("Ada"))])
            .build();
        assert_eq!(page.prefill(root, &sheet).unwrap(), 2);

        let events = page.drain_events();
        assert!(matches!(
            &events[0],
            WidgetEvent::ValueChanged { new, source, .. }
                if new == &json!("A-1") && source.column == "NUMBER" && source.row == Some(0)
        ));
    }

    #[test]
    fn test_context_rejects_unknown_attribute() {
        let (mut page, root) = order_panel();
        page.add_widget(Some(root), Box::new(Display::bound("NOPE"))).unwrap();
        let result = page.prepare_data_sheet_to_read(root, DataSheet::new("shop.ORDER"));
        assert!(matches!(result, Err(WidgetError::Configuration { .. })));
    }
}
