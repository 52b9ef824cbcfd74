//! Expressions widgets bind to: attribute paths, literals and formulas.
//!
//! String syntax:
//! - `CUSTOMER__NAME` - attribute path, relations separated by `__`
//! - `='Open'`, `=42`, `=true` - literals
//! - `=CONCAT(NAME, ' ', CITY)` - formula; attribute arguments become sheet columns

use crate::error::{ModelError, ModelResult};
use crate::model::{RELATION_SEPARATOR, RelationPath};
use serde_json::Value;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    /// Attribute path relative to some meta-object.
    Attribute(String),
    /// Fixed value.
    Literal(Value),
    /// Calculated value computed by the data source.
    Formula { name: String, args: Vec<Expression> },
}

impl Expression {
    pub fn attribute(path: impl Into<String>) -> Self {
        Expression::Attribute(path.into())
    }

    pub fn literal(value: impl Into<Value>) -> Self {
        Expression::Literal(value.into())
    }

    /// Parse an expression in attribute context: anything not starting with
    /// `=` must be a valid attribute path.
    pub fn parse(input: &str) -> ModelResult<Self> {
        let trimmed = input.trim();
        match trimmed.strip_prefix('=') {
            Some(rest) => Parser::new(input, rest).parse_all(),
            None if is_attribute_path(trimmed) => Ok(Expression::Attribute(trimmed.to_string())),
            None => Err(ModelError::InvalidExpression {
                expression: input.to_string(),
                message: "not a valid attribute path".to_string(),
            }),
        }
    }

    /// Parse a value given in a `value` property: strings starting with `=`
    /// are expressions, everything else is a literal.
    pub fn from_value(value: &Value) -> ModelResult<Self> {
        match value {
            Value::String(s) if s.trim_start().starts_with('=') => Self::parse(s),
            other => Ok(Expression::Literal(other.clone())),
        }
    }

    /// Value suitable for a UXON `value` property; inverse of [`Expression::from_value`].
    pub fn to_uxon_value(&self) -> Value {
        match self {
            Expression::Literal(Value::String(s)) if s.trim_start().starts_with('=') => {
                Value::String(self.key())
            }
            Expression::Literal(v) => v.clone(),
            Expression::Attribute(path) => Value::String(format!("={}", path)),
            other => Value::String(other.key()),
        }
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self, Expression::Attribute(_))
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Expression::Literal(_))
    }

    pub fn is_formula(&self) -> bool {
        matches!(self, Expression::Formula { .. })
    }

    pub fn as_attribute(&self) -> Option<&str> {
        match self {
            Expression::Attribute(path) => Some(path),
            _ => None,
        }
    }

    /// All attribute paths referenced, formulas included, in order of appearance.
    pub fn attribute_paths(&self) -> Vec<&str> {
        let mut paths = Vec::new();
        self.collect_paths(&mut paths);
        paths
    }

    fn collect_paths<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Expression::Attribute(path) => out.push(path),
            Expression::Literal(_) => {}
            Expression::Formula { args, .. } => {
                for arg in args {
                    arg.collect_paths(out);
                }
            }
        }
    }

    /// Rewrite the expression so it is relative to the start of `path`.
    pub fn rebase(&self, path: &RelationPath) -> Expression {
        if path.is_empty() {
            return self.clone();
        }
        match self {
            Expression::Attribute(p) => Expression::Attribute(path.prefix(p)),
            Expression::Literal(v) => Expression::Literal(v.clone()),
            Expression::Formula { name, args } => Expression::Formula {
                name: name.clone(),
                args: args.iter().map(|a| a.rebase(path)).collect(),
            },
        }
    }

    /// Canonical string used as data sheet column key.
    pub fn key(&self) -> String {
        match self {
            Expression::Attribute(path) => path.clone(),
            Expression::Literal(_) => format!("={}", self.arg_string()),
            Expression::Formula { .. } => format!("={}", self.arg_string()),
        }
    }

    fn arg_string(&self) -> String {
        match self {
            Expression::Attribute(path) => path.clone(),
            Expression::Literal(Value::String(s)) => {
                format!("'{}'", s.replace('\\', "\\\\").replace('\'', "\\'"))
            }
            Expression::Literal(v) => v.to_string(),
            Expression::Formula { name, args } => {
                let args: Vec<String> = args.iter().map(|a| a.arg_string()).collect();
                format!("{}({})", name, args.join(", "))
            }
        }
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.key())
    }
}

/// Attribute paths: non-empty identifiers joined by the relation separator.
pub fn is_attribute_path(s: &str) -> bool {
    !s.is_empty()
        && s.split(RELATION_SEPARATOR).all(|part| {
            let mut chars = part.chars();
            matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_')
                && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        })
}

struct Parser<'a> {
    original: &'a str,
    chars: Vec<char>,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(original: &'a str, body: &str) -> Self {
        Self {
            original,
            chars: body.chars().collect(),
            pos: 0,
        }
    }

    fn error(&self, message: impl Into<String>) -> ModelError {
        ModelError::InvalidExpression {
            expression: self.original.to_string(),
            message: message.into(),
        }
    }

    fn parse_all(mut self) -> ModelResult<Expression> {
        let expr = self.parse_expr()?;
        self.skip_ws();
        if self.pos < self.chars.len() {
            return Err(self.error(format!("unexpected input at position {}", self.pos)));
        }
        Ok(expr)
    }

    fn skip_ws(&mut self) {
        while self.chars.get(self.pos).is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn parse_expr(&mut self) -> ModelResult<Expression> {
        self.skip_ws();
        match self.chars.get(self.pos).copied() {
            None => Err(self.error("empty expression")),
            Some(q @ ('\'' | '"')) => self.parse_string(q),
            Some(c) if c.is_ascii_digit() || c == '-' => self.parse_number(),
            Some(c) if c.is_ascii_alphabetic() || c == '_' => self.parse_identifier(),
            Some(c) => Err(self.error(format!("unexpected character '{}'", c))),
        }
    }

    fn parse_string(&mut self, quote: char) -> ModelResult<Expression> {
        self.pos += 1;
        let mut out = String::new();
        while let Some(&c) = self.chars.get(self.pos) {
            self.pos += 1;
            match c {
                '\\' => {
                    if let Some(&next) = self.chars.get(self.pos) {
                        out.push(next);
                        self.pos += 1;
                    }
                }
                c if c == quote => return Ok(Expression::Literal(Value::String(out))),
                c => out.push(c),
            }
        }
        Err(self.error("unterminated string"))
    }

    fn parse_number(&mut self) -> ModelResult<Expression> {
        let start = self.pos;
        self.pos += 1;
        while self
            .chars
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_digit() || *c == '.')
        {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        serde_json::from_str::<Value>(&text)
            .ok()
            .filter(Value::is_number)
            .map(Expression::Literal)
            .ok_or_else(|| self.error(format!("invalid number '{}'", text)))
    }

    fn parse_identifier(&mut self) -> ModelResult<Expression> {
        let start = self.pos;
        while self
            .chars
            .get(self.pos)
            .is_some_and(|c| c.is_ascii_alphanumeric() || *c == '_')
        {
            self.pos += 1;
        }
        let ident: String = self.chars[start..self.pos].iter().collect();
        self.skip_ws();
        if self.chars.get(self.pos) != Some(&'(') {
            return Ok(match ident.as_str() {
                "true" => Expression::Literal(Value::Bool(true)),
                "false" => Expression::Literal(Value::Bool(false)),
                "null" => Expression::Literal(Value::Null),
                _ => Expression::Attribute(ident),
            });
        }
        self.pos += 1;
        let mut args = Vec::new();
        self.skip_ws();
        if self.chars.get(self.pos) == Some(&')') {
            self.pos += 1;
        } else {
            loop {
                args.push(self.parse_expr()?);
                self.skip_ws();
                match self.chars.get(self.pos) {
                    Some(',') => self.pos += 1,
                    Some(')') => {
                        self.pos += 1;
                        break;
                    }
                    Some(c) => {
                        return Err(self.error(format!(
                            "expected ',' or ')' after argument {} of {}, found '{}'",
                            args.len(),
                            ident,
                            c
                        )));
                    }
                    None => return Err(self.error(format!("unclosed call to {}", ident))),
                }
            }
        }
        Ok(Expression::Formula {
            name: ident.to_ascii_uppercase(),
            args,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_attribute_paths() {
        assert_eq!(
            Expression::parse("CUSTOMER__NAME").unwrap(),
            Expression::attribute("CUSTOMER__NAME")
        );
        assert!(Expression::parse("CUSTOMER NAME").is_err());
        assert!(Expression::parse("").is_err());
        assert!(Expression::parse("CUSTOMER____NAME").is_err());
    }

    #[test]
    fn test_parse_literals() {
        assert_eq!(Expression::parse("='Open'").unwrap(), Expression::literal("Open"));
        assert_eq!(Expression::parse("=42").unwrap(), Expression::literal(42));
        assert_eq!(Expression::parse("=-1.5").unwrap(), Expression::literal(-1.5));
        assert_eq!(Expression::parse("=true").unwrap(), Expression::literal(true));
        assert!(Expression::parse("='open").is_err());
    }

    #[test]
    fn test_parse_formula() {
        let expr = Expression::parse("=concat(FIRST_NAME, ' ', CUSTOMER__CITY)").unwrap();
        assert!(expr.is_formula());
        assert_eq!(expr.attribute_paths(), vec!["FIRST_NAME", "CUSTOMER__CITY"]);
        assert_eq!(expr.key(), "=CONCAT(FIRST_NAME, ' ', CUSTOMER__CITY)");

        let nested = Expression::parse("=ROUND(SUM(AMOUNT), 2)").unwrap();
        assert_eq!(nested.attribute_paths(), vec!["AMOUNT"]);
        assert!(Expression::parse("=NOW()").unwrap().attribute_paths().is_empty());
        assert!(Expression::parse("=CONCAT(NAME").is_err());
    }

    #[test]
    fn test_formula_arguments_need_single_commas() {
        assert!(Expression::parse("=CONCAT(A B)").is_err());
        assert!(Expression::parse("=F(A,,B)").is_err());
        assert!(Expression::parse("=F(A,)").is_err());
        assert!(Expression::parse("=F(,A)").is_err());
        let spaced = Expression::parse("=F( A , B )").unwrap();
        assert_eq!(spaced.attribute_paths(), vec!["A", "B"]);
    }

    #[test]
    fn test_from_value() {
        assert_eq!(Expression::from_value(&json!("plain")).unwrap(), Expression::literal("plain"));
        assert_eq!(Expression::from_value(&json!(7)).unwrap(), Expression::literal(7));
        assert_eq!(
            Expression::from_value(&json!("=NAME")).unwrap(),
            Expression::attribute("NAME")
        );
    }

    #[test]
    fn test_to_uxon_value_preserves_meaning() {
        for expr in [
            Expression::literal("=not a formula"),
            Expression::literal("=it's"),
            Expression::literal("='quoted' \\ back"),
            Expression::literal(3),
            Expression::parse("=UPPER(NAME)").unwrap(),
        ] {
            let back = Expression::from_value(&expr.to_uxon_value()).unwrap();
            assert_eq!(back, expr);
        }
    }
}
