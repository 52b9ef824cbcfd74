//! Data sheets: tabular data keyed by expressions.

use crate::aggregator::Aggregator;
use crate::datatype::value_to_string;
use crate::expression::Expression;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt;

/// A column of a data sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetColumn {
    name: String,
    expression: Expression,
    pub hidden: bool,
}

impl SheetColumn {
    pub fn new(expression: Expression) -> Self {
        Self {
            name: expression.key(),
            expression,
            hidden: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn expression(&self) -> &Expression {
        &self.expression
    }
}

/// Location of a cell, used to trace where a prefilled value came from.
///
/// `row` is `None` when the value was aggregated over the whole column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CellPointer {
    pub column: String,
    pub row: Option<usize>,
}

impl CellPointer {
    pub fn cell(column: impl Into<String>, row: usize) -> Self {
        Self {
            column: column.into(),
            row: Some(row),
        }
    }

    pub fn aggregate(column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            row: None,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        self.row.is_none()
    }
}

impl fmt::Display for CellPointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.row {
            Some(row) => write!(f, "{}[{}]", self.column, row),
            None => write!(f, "{}[*]", self.column),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparator {
    /// `==` exact match.
    Equals,
    /// `=` "contains" for strings, equality otherwise.
    Is,
    /// `!==`
    NotEquals,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
    /// `[` value is one of a delimited list.
    In,
}

impl Comparator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Comparator::Equals => "==",
            Comparator::Is => "=",
            Comparator::NotEquals => "!==",
            Comparator::Less => "<",
            Comparator::LessOrEqual => "<=",
            Comparator::Greater => ">",
            Comparator::GreaterOrEqual => ">=",
            Comparator::In => "[",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s.trim() {
            "==" => Comparator::Equals,
            "=" => Comparator::Is,
            "!==" => Comparator::NotEquals,
            "<" => Comparator::Less,
            "<=" => Comparator::LessOrEqual,
            ">" => Comparator::Greater,
            ">=" => Comparator::GreaterOrEqual,
            "[" => Comparator::In,
            _ => return None,
        })
    }
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition {
    pub expression: Expression,
    pub comparator: Comparator,
    pub value: Value,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupOperator {
    #[default]
    And,
    Or,
}

/// Nested group of filter conditions.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConditionGroup {
    pub operator: GroupOperator,
    pub conditions: Vec<Condition>,
    pub groups: Vec<ConditionGroup>,
}

impl ConditionGroup {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty() && self.groups.iter().all(ConditionGroup::is_empty)
    }

    /// Add a condition unless an identical one is already present.
    pub fn add_condition(&mut self, condition: Condition) -> bool {
        if self.conditions.contains(&condition) {
            return false;
        }
        self.conditions.push(condition);
        true
    }

    /// Conditions on the given expression key, nested groups included.
    pub fn conditions_for(&self, key: &str) -> Vec<&Condition> {
        let mut found: Vec<&Condition> = self
            .conditions
            .iter()
            .filter(|c| c.expression.key() == key)
            .collect();
        for group in &self.groups {
            found.extend(group.conditions_for(key));
        }
        found
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Sorter {
    pub expression: Expression,
    pub direction: SortDirection,
}

/// Rows and columns of one meta-object, plus the filters and sorters used to read them.
#[derive(Debug, Clone, PartialEq)]
pub struct DataSheet {
    object_alias: String,
    columns: IndexMap<String, SheetColumn>,
    rows: Vec<IndexMap<String, Value>>,
    filters: ConditionGroup,
    sorters: Vec<Sorter>,
    offset: usize,
    limit: Option<usize>,
}

impl DataSheet {
    pub fn new(object_alias: impl Into<String>) -> Self {
        Self {
            object_alias: object_alias.into(),
            columns: IndexMap::new(),
            rows: Vec::new(),
            filters: ConditionGroup::default(),
            sorters: Vec::new(),
            offset: 0,
            limit: None,
        }
    }

    pub fn object_alias(&self) -> &str {
        &self.object_alias
    }

    /// Add a column for an expression. Returns `false` if a column with the
    /// same key already exists.
    pub fn add_column(&mut self, expression: Expression) -> bool {
        let column = SheetColumn::new(expression);
        if self.columns.contains_key(column.name()) {
            return false;
        }
        tracing::trace!("Adding column {} to sheet of {}", column.name(), self.object_alias);
        self.columns.insert(column.name().to_string(), column);
        true
    }

    /// Add a hidden helper column (e.g. a UID needed for row identity).
    pub fn add_hidden_column(&mut self, expression: Expression) -> bool {
        let key = expression.key();
        let added = self.add_column(expression);
        if added && let Some(col) = self.columns.get_mut(&key) {
            col.hidden = true;
        }
        added
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    pub fn column(&self, name: &str) -> Option<&SheetColumn> {
        self.columns.get(name)
    }

    pub fn columns(&self) -> impl Iterator<Item = &SheetColumn> {
        self.columns.values()
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.keys().map(String::as_str).collect()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Append a row. Cells for unknown columns add the column.
    pub fn add_row<I, K>(&mut self, cells: I)
    where
        I: IntoIterator<Item = (K, Value)>,
        K: Into<String>,
    {
        let row: IndexMap<String, Value> = cells.into_iter().map(|(k, v)| (k.into(), v)).collect();
        for name in row.keys() {
            if !self.columns.contains_key(name) {
                match Expression::parse(name) {
                    Ok(expr) => {
                        self.add_column(expr);
                    }
                    Err(_) => {
                        self.columns.insert(
                            name.clone(),
                            SheetColumn {
                                name: name.clone(),
                                expression: Expression::Literal(Value::Null),
                                hidden: true,
                            },
                        );
                    }
                }
            }
        }
        self.rows.push(row);
    }

    pub fn rows_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn cell(&self, column: &str, row: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(column))
    }

    /// Values of a column in row order; missing cells are `null`.
    pub fn column_values(&self, column: &str) -> Vec<&Value> {
        const NULL: &Value = &Value::Null;
        self.rows
            .iter()
            .map(|r| r.get(column).unwrap_or(NULL))
            .collect()
    }

    /// Aggregate a column across all rows.
    pub fn aggregate(&self, column: &str, aggregator: Aggregator, delimiter: &str) -> Value {
        aggregator.aggregate(self.column_values(column), delimiter)
    }

    /// Column values joined by `delimiter`, skipping empties.
    pub fn column_values_joined(&self, column: &str, delimiter: &str) -> String {
        self.column_values(column)
            .into_iter()
            .filter_map(value_to_string)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(delimiter)
    }

    pub fn filters(&self) -> &ConditionGroup {
        &self.filters
    }

    pub fn filters_mut(&mut self) -> &mut ConditionGroup {
        &mut self.filters
    }

    pub fn add_filter(&mut self, expression: Expression, comparator: Comparator, value: Value) -> bool {
        self.filters.add_condition(Condition {
            expression,
            comparator,
            value,
        })
    }

    pub fn sorters(&self) -> &[Sorter] {
        &self.sorters
    }

    /// Add a sorter unless the expression is already sorted.
    pub fn add_sorter(&mut self, expression: Expression, direction: SortDirection) -> bool {
        if self.sorters.iter().any(|s| s.expression == expression) {
            return false;
        }
        self.sorters.push(Sorter {
            expression,
            direction,
        });
        true
    }

    pub fn set_pagination(&mut self, offset: usize, limit: Option<usize>) {
        self.offset = offset;
        self.limit = limit;
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Copy of the sheet without rows.
    pub fn copy_structure(&self) -> Self {
        Self {
            object_alias: self.object_alias.clone(),
            columns: self.columns.clone(),
            rows: Vec::new(),
            filters: self.filters.clone(),
            sorters: self.sorters.clone(),
            offset: self.offset,
            limit: self.limit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_add_column_idempotent() {
        let mut sheet = DataSheet::new("shop.ORDER");
        assert!(sheet.add_column(Expression::attribute("NUMBER")));
        assert!(!sheet.add_column(Expression::attribute("NUMBER")));
        assert!(sheet.add_column(Expression::attribute("CUSTOMER__NAME")));
        assert_eq!(sheet.column_names(), vec!["NUMBER", "CUSTOMER__NAME"]);
    }

    #[test]
    fn test_rows_and_cells() {
        let mut sheet = DataSheet::new("shop.ORDER");
        sheet.add_row([("NUMBER", json!("A-1")), ("AMOUNT", json!(10))]);
        sheet.add_row([("NUMBER", json!("A-2"))]);

        assert_eq!(sheet.rows_count(), 2);
        assert!(sheet.has_column("AMOUNT"));
        assert_eq!(sheet.cell("NUMBER", 1), Some(&json!("A-2")));
        assert_eq!(sheet.cell("AMOUNT", 1), None);
        assert_eq!(sheet.column_values("AMOUNT"), vec![&json!(10), &Value::Null]);
        assert_eq!(sheet.aggregate("AMOUNT", Aggregator::Sum, ","), json!(10));
        assert_eq!(sheet.column_values_joined("NUMBER", ";"), "A-1;A-2");
    }

    #[test]
    fn test_filters_and_sorters_dedup() {
        let mut sheet = DataSheet::new("shop.ORDER");
        assert!(sheet.add_filter(Expression::attribute("STATUS"), Comparator::Equals, json!(10)));
        assert!(!sheet.add_filter(Expression::attribute("STATUS"), Comparator::Equals, json!(10)));
        assert_eq!(sheet.filters().conditions_for("STATUS").len(), 1);

        assert!(sheet.add_sorter(Expression::attribute("DATE"), SortDirection::Desc));
        assert!(!sheet.add_sorter(Expression::attribute("DATE"), SortDirection::Asc));
    }

    #[test]
    fn test_copy_structure_drops_rows() {
        let mut sheet = DataSheet::new("shop.ORDER");
        sheet.add_row([("NUMBER", json!("A-1"))]);
        sheet.set_pagination(20, Some(10));
        let copy = sheet.copy_structure();
        assert!(copy.is_empty());
        assert!(copy.has_column("NUMBER"));
        assert_eq!(copy.limit(), Some(10));
    }

    #[test]
    fn test_comparator_parse() {
        assert_eq!(Comparator::parse("[").unwrap(), Comparator::In);
        assert_eq!(Comparator::parse(" >= ").unwrap(), Comparator::GreaterOrEqual);
        assert!(Comparator::parse("~").is_none());
    }
}
