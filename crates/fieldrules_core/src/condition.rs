//! Conditions used by conditional rules.
//!
//! A [`ConditionGroup`] is an ordered list of [`Condition`]s folded left to
//! right into a single boolean. The fold starts from `true` and every member,
//! the first one included, is combined using its own [`Boolean`]:
//!
//! ```text
//! acc = true
//! for member in group:
//!     acc = if member.boolean == and { acc && member } else { acc || member }
//! ```
//!
//! The fold short-circuits like `&&` / `||`, so a member is not evaluated
//! once its result can no longer change the accumulator. A group whose first
//! member is an `or` condition is therefore always `true`.
//!
//! # Example
//!
//! ```rust
//! use fieldrules_core::{ConditionGroup, Operator, Values, Value};
//!
//! let group = ConditionGroup::new()
//!     .and("account_type", Operator::Equal, "business")
//!     .and("employees", Operator::GreaterThan, 10);
//!
//! let mut values = Values::new();
//! values.insert("account_type".into(), Value::from("business"));
//! values.insert("employees".into(), Value::Int(25));
//!
//! assert!(group.passes(&values).unwrap());
//! ```

use crate::{Result, ValidationError, Value, Values};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Comparison operator of a basic condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Strict equality
    #[serde(rename = "=")]
    Equal,
    /// Strict inequality
    #[serde(rename = "!=")]
    NotEqual,
    #[serde(rename = ">")]
    GreaterThan,
    #[serde(rename = ">=")]
    GreaterThanOrEqual,
    #[serde(rename = "<")]
    LessThan,
    #[serde(rename = "<=")]
    LessThanOrEqual,
    /// Substring test
    #[serde(rename = "contains")]
    Contains,
    /// Negated substring test
    #[serde(rename = "not_contains")]
    NotContains,
}

impl Operator {
    /// Every supported operator, in declaration order.
    pub const ALL: [Operator; 8] = [
        Operator::Equal,
        Operator::NotEqual,
        Operator::GreaterThan,
        Operator::GreaterThanOrEqual,
        Operator::LessThan,
        Operator::LessThanOrEqual,
        Operator::Contains,
        Operator::NotContains,
    ];

    /// Returns the textual symbol of the operator.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operator::Equal => "=",
            Operator::NotEqual => "!=",
            Operator::GreaterThan => ">",
            Operator::GreaterThanOrEqual => ">=",
            Operator::LessThan => "<",
            Operator::LessThanOrEqual => "<=",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
        }
    }
}

impl FromStr for Operator {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        Operator::ALL
            .into_iter()
            .find(|op| op.as_str() == s)
            .ok_or_else(|| ValidationError::InvalidOperator(s.to_string()))
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a condition combines with the accumulated result of its group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boolean {
    #[default]
    And,
    Or,
}

impl Boolean {
    pub fn as_str(&self) -> &'static str {
        match self {
            Boolean::And => "and",
            Boolean::Or => "or",
        }
    }
}

impl FromStr for Boolean {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "and" => Ok(Boolean::And),
            "or" => Ok(Boolean::Or),
            other => Err(ValidationError::InvalidBoolean(other.to_string())),
        }
    }
}

/// A single comparison against one field of the value bag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BasicCondition {
    /// Name of the field under test
    pub field: String,

    /// Operand the field value is compared with
    pub value: Value,

    /// Comparison operator
    pub operator: Operator,

    /// Combinator used when folding into a group
    #[serde(default)]
    pub boolean: Boolean,
}

impl BasicCondition {
    /// Creates a new basic condition from typed parts.
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<Value>,
        boolean: Boolean,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            operator,
            boolean,
        }
    }

    /// Creates a new basic condition from textual operator and boolean.
    ///
    /// # Errors
    ///
    /// Returns `InvalidOperator` or `InvalidBoolean` when either string is
    /// outside the supported set.
    pub fn parse(
        field: impl Into<String>,
        operator: &str,
        value: impl Into<Value>,
        boolean: &str,
    ) -> Result<Self> {
        Ok(Self::new(field, operator.parse()?, value, boolean.parse()?))
    }

    /// Tests the condition against the value bag.
    ///
    /// # Errors
    ///
    /// Returns `MissingConditionField` when the field is absent from `values`,
    /// and `IncomparableValues` when the operator cannot relate the operands.
    pub fn passes(&self, values: &Values) -> Result<bool> {
        let test_value = values
            .get(&self.field)
            .ok_or_else(|| ValidationError::MissingConditionField(self.field.clone()))?;

        match self.operator {
            Operator::Equal => Ok(*test_value == self.value),
            Operator::NotEqual => Ok(*test_value != self.value),
            Operator::GreaterThan => Ok(self.ordering(test_value)? == Ordering::Greater),
            Operator::GreaterThanOrEqual => Ok(self.ordering(test_value)? != Ordering::Less),
            Operator::LessThan => Ok(self.ordering(test_value)? == Ordering::Less),
            Operator::LessThanOrEqual => Ok(self.ordering(test_value)? != Ordering::Greater),
            Operator::Contains => self.contains(test_value),
            Operator::NotContains => self.contains(test_value).map(|found| !found),
        }
    }

    fn ordering(&self, test_value: &Value) -> Result<Ordering> {
        test_value.compare(&self.value).ok_or_else(|| {
            ValidationError::incomparable(
                self.operator.as_str(),
                test_value.type_name(),
                self.value.type_name(),
            )
        })
    }

    fn contains(&self, test_value: &Value) -> Result<bool> {
        match (test_value, &self.value) {
            (Value::String(haystack), Value::String(needle)) => Ok(haystack.contains(needle.as_str())),
            _ => Err(ValidationError::incomparable(
                self.operator.as_str(),
                test_value.type_name(),
                self.value.type_name(),
            )),
        }
    }
}

/// A parenthesised group of conditions inside another group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NestedCondition {
    /// Members of the nested group
    pub conditions: Vec<Condition>,

    /// Combinator used when folding into the outer group
    #[serde(default)]
    pub boolean: Boolean,
}

impl NestedCondition {
    pub fn new(conditions: Vec<Condition>, boolean: Boolean) -> Self {
        Self {
            conditions,
            boolean,
        }
    }

    pub fn passes(&self, values: &Values) -> Result<bool> {
        fold(&self.conditions, values)
    }
}

/// A member of a condition group.
///
/// Serializes as `{"type": "basic", ...}` or `{"type": "nested", ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Condition {
    Basic(BasicCondition),
    Nested(NestedCondition),
}

impl Condition {
    /// Returns the combinator of this member.
    pub fn boolean(&self) -> Boolean {
        match self {
            Condition::Basic(c) => c.boolean,
            Condition::Nested(c) => c.boolean,
        }
    }

    pub fn passes(&self, values: &Values) -> Result<bool> {
        match self {
            Condition::Basic(c) => c.passes(values),
            Condition::Nested(c) => c.passes(values),
        }
    }

    pub fn fails(&self, values: &Values) -> Result<bool> {
        self.passes(values).map(|passes| !passes)
    }
}

impl From<BasicCondition> for Condition {
    fn from(condition: BasicCondition) -> Self {
        Condition::Basic(condition)
    }
}

impl From<NestedCondition> for Condition {
    fn from(condition: NestedCondition) -> Self {
        Condition::Nested(condition)
    }
}

/// Ordered, foldable collection of conditions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConditionGroup {
    conditions: Vec<Condition>,
}

impl ConditionGroup {
    /// Creates an empty group. An empty group passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an `and` basic condition.
    pub fn and(self, field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        self.with(BasicCondition::new(field, operator, value, Boolean::And))
    }

    /// Adds an `or` basic condition.
    pub fn or(self, field: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        self.with(BasicCondition::new(field, operator, value, Boolean::Or))
    }

    /// Adds a nested group combined with `and`.
    pub fn and_group(self, group: ConditionGroup) -> Self {
        self.with(NestedCondition::new(group.conditions, Boolean::And))
    }

    /// Adds a nested group combined with `or`.
    pub fn or_group(self, group: ConditionGroup) -> Self {
        self.with(NestedCondition::new(group.conditions, Boolean::Or))
    }

    /// Appends a member and returns the group.
    pub fn with(mut self, condition: impl Into<Condition>) -> Self {
        self.push(condition);
        self
    }

    /// Appends a member.
    pub fn push(&mut self, condition: impl Into<Condition>) {
        self.conditions.push(condition.into());
    }

    /// Removes and returns the member at `index`, keeping the rest in order.
    pub fn remove(&mut self, index: usize) -> Option<Condition> {
        (index < self.conditions.len()).then(|| self.conditions.remove(index))
    }

    pub fn get(&self, index: usize) -> Option<&Condition> {
        self.conditions.get(index)
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn len(&self) -> usize {
        self.conditions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Condition> {
        self.conditions.iter()
    }

    /// Folds the group against the value bag.
    pub fn passes(&self, values: &Values) -> Result<bool> {
        fold(&self.conditions, values)
    }

    pub fn fails(&self, values: &Values) -> Result<bool> {
        self.passes(values).map(|passes| !passes)
    }

    /// Returns the JSON shape consumed by front-end validators.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or(serde_json::Value::Null)
    }
}

impl FromIterator<Condition> for ConditionGroup {
    fn from_iter<T: IntoIterator<Item = Condition>>(iter: T) -> Self {
        Self {
            conditions: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a ConditionGroup {
    type Item = &'a Condition;
    type IntoIter = std::slice::Iter<'a, Condition>;

    fn into_iter(self) -> Self::IntoIter {
        self.conditions.iter()
    }
}

fn fold(conditions: &[Condition], values: &Values) -> Result<bool> {
    let mut passes = true;

    for condition in conditions {
        passes = match condition.boolean() {
            Boolean::And => passes && condition.passes(values)?,
            Boolean::Or => passes || condition.passes(values)?,
        };
    }

    Ok(passes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn bag(entries: &[(&str, Value)]) -> Values {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_operator_parsing() {
        for op in Operator::ALL {
            assert_eq!(op.as_str().parse::<Operator>().unwrap(), op);
        }
        assert!(matches!(
            "==".parse::<Operator>(),
            Err(ValidationError::InvalidOperator(_))
        ));
        assert!(matches!(
            "xor".parse::<Boolean>(),
            Err(ValidationError::InvalidBoolean(_))
        ));
    }

    #[test]
    fn test_parse_rejects_unknown_operator_at_construction() {
        let result = BasicCondition::parse("foo", "like", "bar", "and");
        assert!(matches!(result, Err(ValidationError::InvalidOperator(op)) if op == "like"));
    }

    #[test]
    fn test_equality_is_strict() {
        let values = bag(&[("age", Value::from("18"))]);
        let condition = BasicCondition::new("age", Operator::Equal, 18, Boolean::And);
        assert!(!condition.passes(&values).unwrap());

        let condition = BasicCondition::new("age", Operator::NotEqual, 18, Boolean::And);
        assert!(condition.passes(&values).unwrap());
    }

    #[test]
    fn test_ordering_operators() {
        let values = bag(&[("amount", Value::Int(10))]);
        let check = |op, operand: f64| {
            BasicCondition::new("amount", op, operand, Boolean::And)
                .passes(&values)
                .unwrap()
        };

        assert!(check(Operator::GreaterThan, 9.5));
        assert!(!check(Operator::GreaterThan, 10.0));
        assert!(check(Operator::GreaterThanOrEqual, 10.0));
        assert!(check(Operator::LessThan, 10.5));
        assert!(check(Operator::LessThanOrEqual, 10.0));
        assert!(!check(Operator::LessThanOrEqual, 9.0));
    }

    #[test]
    fn test_incomparable_values_fault() {
        let values = bag(&[("flag", Value::Bool(true))]);
        let condition = BasicCondition::new("flag", Operator::GreaterThan, 1, Boolean::And);
        assert!(matches!(
            condition.passes(&values),
            Err(ValidationError::IncomparableValues { .. })
        ));
    }

    #[test]
    fn test_contains() {
        let values = bag(&[("title", Value::from("Senior Engineer"))]);
        let contains = BasicCondition::new("title", Operator::Contains, "Engineer", Boolean::And);
        let not_contains =
            BasicCondition::new("title", Operator::NotContains, "Manager", Boolean::And);
        assert!(contains.passes(&values).unwrap());
        assert!(not_contains.passes(&values).unwrap());

        let values = bag(&[("title", Value::Int(5))]);
        assert!(contains.passes(&values).is_err());
    }

    #[test]
    fn test_missing_field_is_a_fault() {
        let condition = BasicCondition::new("missing", Operator::Equal, 1, Boolean::And);
        assert!(matches!(
            condition.passes(&Values::new()),
            Err(ValidationError::MissingConditionField(field)) if field == "missing"
        ));

        // Present but null is compared normally
        let values = bag(&[("missing", Value::Null)]);
        assert!(!condition.passes(&values).unwrap());
    }

    #[test]
    fn test_single_and_condition_matches_condition() {
        for value in [Value::from("yes"), Value::from("no")] {
            let values = bag(&[("answer", value)]);
            let condition = BasicCondition::new("answer", Operator::Equal, "yes", Boolean::And);
            let group = ConditionGroup::new().with(condition.clone());
            assert_eq!(
                group.passes(&values).unwrap(),
                condition.passes(&values).unwrap()
            );
        }
    }

    #[test]
    fn test_single_or_condition_always_passes() {
        for value in [Value::from("yes"), Value::from("no")] {
            let values = bag(&[("answer", value)]);
            let group = ConditionGroup::new().or("answer", Operator::Equal, "yes");
            assert!(group.passes(&values).unwrap());
        }
    }

    #[test]
    fn test_leading_or_short_circuits_missing_field() {
        let group = ConditionGroup::new().or("missing", Operator::Equal, 1);
        assert!(group.passes(&Values::new()).unwrap());
    }

    #[test]
    fn test_false_and_short_circuits_remaining_members() {
        let values = bag(&[("a", Value::Int(1))]);
        let group = ConditionGroup::new()
            .and("a", Operator::Equal, 2)
            .and("missing", Operator::Equal, 1);
        assert!(!group.passes(&values).unwrap());
    }

    #[test]
    fn test_and_then_or() {
        let values = bag(&[("a", Value::Int(1)), ("b", Value::Int(2))]);
        let group = ConditionGroup::new()
            .and("a", Operator::Equal, 5)
            .or("b", Operator::Equal, 2);
        assert!(group.passes(&values).unwrap());

        let group = ConditionGroup::new()
            .and("a", Operator::Equal, 5)
            .or("b", Operator::Equal, 3);
        assert!(group.fails(&values).unwrap());
    }

    #[test]
    fn test_nested_groups() {
        let values = bag(&[
            ("country", Value::from("US")),
            ("state", Value::from("CA")),
            ("amount", Value::Int(50)),
        ]);

        let region = ConditionGroup::new()
            .and("state", Operator::Equal, "NY")
            .or("state", Operator::Equal, "CA");
        let group = ConditionGroup::new()
            .and("country", Operator::Equal, "US")
            .and_group(region)
            .and("amount", Operator::LessThan, 100);

        assert!(group.passes(&values).unwrap());
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut group = ConditionGroup::new()
            .and("a", Operator::Equal, 1)
            .and("b", Operator::Equal, 2)
            .and("c", Operator::Equal, 3);

        assert!(group.remove(1).is_some());
        assert!(group.remove(5).is_none());

        let fields: Vec<_> = group
            .iter()
            .filter_map(|c| match c {
                Condition::Basic(b) => Some(b.field.as_str()),
                Condition::Nested(_) => None,
            })
            .collect();
        assert_eq!(fields, vec!["a", "c"]);
    }

    #[test]
    fn test_json_shape() {
        let group = ConditionGroup::new()
            .and("plan", Operator::Equal, "pro")
            .or_group(ConditionGroup::new().and("seats", Operator::GreaterThan, 5));

        assert_eq!(
            group.to_json(),
            json!([
                {"type": "basic", "field": "plan", "value": "pro", "operator": "=", "boolean": "and"},
                {
                    "type": "nested",
                    "conditions": [
                        {"type": "basic", "field": "seats", "value": 5, "operator": ">", "boolean": "and"}
                    ],
                    "boolean": "or"
                }
            ])
        );
    }

    #[test]
    fn test_deserialize_from_json() {
        let group: ConditionGroup = serde_json::from_value(json!([
            {"type": "basic", "field": "plan", "value": "pro", "operator": "!="},
            {"type": "nested", "conditions": [], "boolean": "or"}
        ]))
        .unwrap();

        assert_eq!(group.len(), 2);
        assert_eq!(group.conditions()[0].boolean(), Boolean::And);
        assert_eq!(group.conditions()[1].boolean(), Boolean::Or);

        let bad: std::result::Result<ConditionGroup, _> = serde_json::from_value(json!([
            {"type": "basic", "field": "plan", "value": "pro", "operator": "=="}
        ]));
        assert!(bad.is_err());
    }
}
