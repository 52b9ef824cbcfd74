use metaui_model::{Comparator, DataSheet, Expression, Value};

/// Fluent builder for [`DataSheet`]s in tests.
pub struct SheetBuilder {
    sheet: DataSheet,
}

impl SheetBuilder {
    pub fn new(object_alias: &str) -> Self {
        Self {
            sheet: DataSheet::new(object_alias),
        }
    }

    /// Add an empty column.
    pub fn column(mut self, expression: &str) -> Self {
        let expr = Expression::parse(expression).unwrap_or_else(|e| panic!("bad column in test: {}", e));
        self.sheet.add_column(expr);
        self
    }

    /// Append a row.
    pub fn row<const N: usize>(mut self, cells: [(&str, Value); N]) -> Self {
        self.sheet.add_row(cells);
        self
    }

    /// Add an `==` filter.
    pub fn filter(mut self, expression: &str, value: Value) -> Self {
        let expr = Expression::parse(expression).unwrap_or_else(|e| panic!("bad filter in test: {}", e));
        self.sheet.add_filter(expr, Comparator::Equals, value);
        self
    }

    pub fn build(self) -> DataSheet {
        self.sheet
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_builder() {
        let sheet = SheetBuilder::new("shop.ORDER")
            .column("NUMBER")
            .row([("NUMBER", json!("A-1"))])
            .row([("NUMBER", json!("A-2"))])
            .filter("STATUS", json!(10))
            .build();
        assert_eq!(sheet.rows_count(), 2);
        assert_eq!(sheet.column_count(), 1);
        assert!(!sheet.filters().is_empty());
    }
}
