//! Value binding shared by all widgets with a value.

use metaui_model::{Aggregator, CellPointer, Expression, ModelError, ModelResult, Value};
use metaui_model::expression::is_attribute_path;

/// Where a widget's value currently comes from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ValueState {
    /// Not prefilled yet.
    #[default]
    Unfilled,
    /// Taken from a data sheet cell, or aggregated over a column when the
    /// pointer has no row.
    Filled(CellPointer),
}

/// The attribute, expression or literal a widget shows, plus its current value.
///
/// A literal given in the `value` property fixes the value: prefill never
/// overwrites it. Once filled, a binding does not return to
/// [`ValueState::Unfilled`].
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ValueBinding {
    attribute: Option<Expression>,
    value: Option<Expression>,
    current: Option<Value>,
    state: ValueState,
    aggregator: Option<Aggregator>,
}

impl ValueBinding {
    /// Build from the `attribute_alias` and `value` properties.
    pub fn new(
        attribute_alias: Option<&str>,
        value: Option<&Value>,
        aggregator: Option<Aggregator>,
    ) -> ModelResult<Self> {
        let attribute = match attribute_alias {
            Some(alias) if is_attribute_path(alias) => Some(Expression::attribute(alias)),
            Some(alias) => {
                return Err(ModelError::InvalidExpression {
                    expression: alias.to_string(),
                    message: "not a valid attribute path".to_string(),
                });
            }
            None => None,
        };
        let value = match value {
            None | Some(Value::Null) => None,
            Some(v) => Some(Expression::from_value(v)?),
        };
        Ok(Self {
            attribute,
            value,
            current: None,
            state: ValueState::Unfilled,
            aggregator,
        })
    }

    pub fn attribute(alias: &str) -> ModelResult<Self> {
        Self::new(Some(alias), None, None)
    }

    /// Bind to an already parsed expression.
    pub fn bound(expression: Expression) -> Self {
        match expression {
            Expression::Attribute(_) => Self {
                attribute: Some(expression),
                ..Default::default()
            },
            other => Self {
                value: Some(other),
                ..Default::default()
            },
        }
    }

    pub fn with_aggregator(mut self, aggregator: Option<Aggregator>) -> Self {
        self.aggregator = aggregator;
        self
    }

    pub fn attribute_alias(&self) -> Option<&str> {
        self.attribute.as_ref().and_then(Expression::as_attribute)
    }

    /// The expression to read from a sheet: a non-literal `value`, else the attribute.
    pub fn expression(&self) -> Option<&Expression> {
        self.value
            .as_ref()
            .filter(|e| !e.is_literal())
            .or(self.attribute.as_ref())
    }

    pub fn literal(&self) -> Option<&Value> {
        match &self.value {
            Some(Expression::Literal(v)) => Some(v),
            _ => None,
        }
    }

    /// Whether the value is fixed by a literal.
    pub fn is_fixed(&self) -> bool {
        self.literal().is_some()
    }

    /// Current value: prefilled, else the literal.
    pub fn value(&self) -> Option<&Value> {
        self.current.as_ref().or_else(|| self.literal())
    }

    pub fn state(&self) -> &ValueState {
        &self.state
    }

    pub fn is_filled(&self) -> bool {
        matches!(self.state, ValueState::Filled(_))
    }

    pub fn aggregator(&self) -> Option<Aggregator> {
        self.aggregator
    }

    /// Fix the value to a literal.
    pub fn set_literal(&mut self, value: Value) {
        self.value = Some(Expression::Literal(value));
        self.current = None;
    }

    /// Store a prefilled value and return the previous one.
    pub fn fill(&mut self, value: Value, source: CellPointer) -> Option<Value> {
        let old = self.value().cloned();
        self.current = Some(value);
        self.state = ValueState::Filled(source);
        old
    }

    /// The `value` property as written in UXON.
    pub fn uxon_value(&self) -> Option<Value> {
        self.value.as_ref().map(Expression::to_uxon_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_expression_prefers_value_formula() {
        let binding = ValueBinding::new(Some("NAME"), Some(&json!("=UPPER(NAME)")), None).unwrap();
        assert!(binding.expression().unwrap().is_formula());
        assert!(!binding.is_fixed());

        let plain = ValueBinding::attribute("CUSTOMER__NAME").unwrap();
        assert_eq!(plain.expression(), Some(&Expression::attribute("CUSTOMER__NAME")));
        assert_eq!(plain.attribute_alias(), Some("CUSTOMER__NAME"));
    }

    #[test]
    fn test_literal_fixes_value() {
        let binding = ValueBinding::new(Some("STATUS"), Some(&json!(10)), None).unwrap();
        assert!(binding.is_fixed());
        assert_eq!(binding.value(), Some(&json!(10)));
        assert_eq!(binding.expression(), Some(&Expression::attribute("STATUS")));
    }

    #[test]
    fn test_fill_moves_state_forward() {
        let mut binding = ValueBinding::attribute("NUMBER").unwrap();
        assert_eq!(binding.state(), &ValueState::Unfilled);
        let source = CellPointer::cell("NUMBER", 0);
        assert_eq!(binding.fill(json!("A-1"), source.clone()), None);
        assert_eq!(binding.state(), &ValueState::Filled(source));
        assert_eq!(binding.value(), Some(&json!("A-1")));
    }

    #[test]
    fn test_invalid_attribute_alias() {
        assert!(ValueBinding::attribute("not an alias").is_err());
    }
}
