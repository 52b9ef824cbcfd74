//! Aggregation of multiple column values into one.

use crate::datatype::{as_f64, value_to_string};
use serde::{Deserialize, Deserializer, Serialize, de};
use serde_json::{Number, Value};
use std::fmt;
use std::str::FromStr;

/// Aggregate function applied across the rows of a column.
///
/// Serialized in upper case; any case is accepted when reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Aggregator {
    Sum,
    Avg,
    Min,
    Max,
    Count,
    CountDistinct,
    List,
    ListDistinct,
}

impl Aggregator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Aggregator::Sum => "SUM",
            Aggregator::Avg => "AVG",
            Aggregator::Min => "MIN",
            Aggregator::Max => "MAX",
            Aggregator::Count => "COUNT",
            Aggregator::CountDistinct => "COUNT_DISTINCT",
            Aggregator::List => "LIST",
            Aggregator::ListDistinct => "LIST_DISTINCT",
        }
    }

    /// Aggregate values. `null`s are ignored by every function except `COUNT`
    /// of an empty input, which yields 0.
    pub fn aggregate<'a>(&self, values: impl IntoIterator<Item = &'a Value>, delimiter: &str) -> Value {
        let values: Vec<&Value> = values.into_iter().filter(|v| !v.is_null()).collect();
        match self {
            Aggregator::Count => Value::from(values.len()),
            Aggregator::CountDistinct => Value::from(distinct(&values).len()),
            Aggregator::Sum => number(values.iter().filter_map(|v| as_f64(v)).sum()),
            Aggregator::Avg => {
                let nums: Vec<f64> = values.iter().filter_map(|v| as_f64(v)).collect();
                if nums.is_empty() {
                    Value::Null
                } else {
                    number(nums.iter().sum::<f64>() / nums.len() as f64)
                }
            }
            Aggregator::Min => extreme(&values, std::cmp::Ordering::Less),
            Aggregator::Max => extreme(&values, std::cmp::Ordering::Greater),
            Aggregator::List => Value::String(join(values.iter().copied(), delimiter)),
            Aggregator::ListDistinct => Value::String(join(distinct(&values), delimiter)),
        }
    }
}

impl fmt::Display for Aggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Aggregator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SUM" => Ok(Aggregator::Sum),
            "AVG" => Ok(Aggregator::Avg),
            "MIN" => Ok(Aggregator::Min),
            "MAX" => Ok(Aggregator::Max),
            "COUNT" => Ok(Aggregator::Count),
            "COUNT_DISTINCT" => Ok(Aggregator::CountDistinct),
            "LIST" => Ok(Aggregator::List),
            "LIST_DISTINCT" => Ok(Aggregator::ListDistinct),
            other => Err(format!("unknown aggregator '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for Aggregator {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(de::Error::custom)
    }
}

fn number(n: f64) -> Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        Value::from(n as i64)
    } else {
        Number::from_f64(n).map(Value::Number).unwrap_or(Value::Null)
    }
}

fn distinct<'a>(values: &[&'a Value]) -> Vec<&'a Value> {
    let mut seen: Vec<&Value> = Vec::new();
    for &v in values {
        if !seen.contains(&v) {
            seen.push(v);
        }
    }
    seen
}

fn join<'a>(values: impl IntoIterator<Item = &'a Value>, delimiter: &str) -> String {
    values
        .into_iter()
        .filter_map(value_to_string)
        .collect::<Vec<_>>()
        .join(delimiter)
}

fn extreme(values: &[&Value], wanted: std::cmp::Ordering) -> Value {
    let mut best: Option<&Value> = None;
    for &v in values {
        best = match best {
            None => Some(v),
            Some(current) if compare(v, current) == wanted => Some(v),
            keep => keep,
        };
    }
    best.cloned().unwrap_or(Value::Null)
}

/// Numeric comparison when both sides are numbers, string comparison otherwise.
fn compare(a: &Value, b: &Value) -> std::cmp::Ordering {
    match (as_f64(a), as_f64(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        _ => value_to_string(a).cmp(&value_to_string(b)),
    }
}
