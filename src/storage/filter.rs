use serde_json::Value;

use super::Record;

/// A conjunctive set of field equalities.
///
/// A record matches when every `(field, value)` pair equals the record's
/// [`field`](Record::field) value. Fields the record does not have never
/// match. Numbers compare by value, so `7` matches a stored `7.0`. The empty
/// filter matches every record.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    /// Creates an empty filter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the condition `field == value`.
    #[must_use]
    pub fn eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    /// Returns `true` if `record` satisfies every condition.
    pub fn matches<T: Record>(&self, record: &T) -> bool {
        self.conditions
            .iter()
            .all(|(field, expected)| record.field(field).is_some_and(|v| same(&v, expected)))
    }

    /// Number of conditions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    /// Returns `true` if the filter has no conditions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }
}

fn same(actual: &Value, expected: &Value) -> bool {
    match (actual, expected) {
        (Value::Number(a), Value::Number(b)) if a.is_f64() || b.is_f64() => {
            a.as_f64() == b.as_f64()
        }
        _ => actual == expected,
    }
}
