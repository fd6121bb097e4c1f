//! List membership rules.

use super::rule_id;
use fieldrules_core::{
    Command, FromCompactForm, Result, RuleId, ValidatesOnFrontEnd, ValidationError,
    ValidationRule, Value, Values,
};
use fieldrules_parser::parse_list_option;

fn accepted_values<I, V>(rule_id: &str, values: I) -> Result<Vec<Value>>
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    let values: Vec<Value> = values.into_iter().map(Into::into).collect();
    if values.is_empty() {
        return Err(ValidationError::invalid_argument(format!(
            "The {} rule requires at least one value to be specified.",
            rule_id
        )));
    }
    Ok(values)
}

fn failure_message(accepted: &[Value]) -> String {
    let listed: Vec<String> = accepted.iter().map(Value::to_string).collect();
    format!("{{field}} must be one of {}", listed.join(", "))
}

/// Fails unless the value loosely equals one of the accepted values.
///
/// Numbers match numeric strings (`1` is in `in:1,2`); strings compare
/// exactly.
#[derive(Debug, Clone, PartialEq)]
pub struct In {
    accepted: Vec<Value>,
}

rule_id!(In, "in");

impl In {
    /// Creates the rule.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when no values are given.
    pub fn new<I, V>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Ok(Self {
            accepted: accepted_values(Self::ID, values)?,
        })
    }

    pub fn accepted(&self) -> &[Value] {
        &self.accepted
    }
}

impl ValidationRule for In {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn invoke(
        &self,
        value: &Value,
        fail: &mut dyn FnMut(&str),
        _key: &str,
        _values: &Values,
    ) -> Result<Option<Command>> {
        if !self.accepted.iter().any(|accepted| accepted.loose_eq(value)) {
            fail(&failure_message(&self.accepted));
        }
        Ok(None)
    }

    fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        Some(self)
    }
}

impl FromCompactForm for In {
    fn from_compact_form(options: Option<&str>) -> Result<Self> {
        Self::new(parse_list_option(Self::ID, options)?)
    }
}

impl ValidatesOnFrontEnd for In {
    fn serialize_option(&self) -> serde_json::Value {
        serde_json::to_value(&self.accepted).unwrap_or_default()
    }
}

/// Fails unless the value strictly equals one of the accepted values.
#[derive(Debug, Clone, PartialEq)]
pub struct InStrict {
    accepted: Vec<Value>,
}

rule_id!(InStrict, "inStrict");

impl InStrict {
    /// Creates the rule.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when no values are given.
    pub fn new<I, V>(values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Ok(Self {
            accepted: accepted_values(Self::ID, values)?,
        })
    }

    pub fn accepted(&self) -> &[Value] {
        &self.accepted
    }
}

impl ValidationRule for InStrict {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn invoke(
        &self,
        value: &Value,
        fail: &mut dyn FnMut(&str),
        _key: &str,
        _values: &Values,
    ) -> Result<Option<Command>> {
        if !self.accepted.contains(value) {
            fail(&failure_message(&self.accepted));
        }
        Ok(None)
    }

    fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        Some(self)
    }
}

impl FromCompactForm for InStrict {
    fn from_compact_form(options: Option<&str>) -> Result<Self> {
        Self::new(parse_list_option(Self::ID, options)?)
    }
}

impl ValidatesOnFrontEnd for InStrict {
    fn serialize_option(&self) -> serde_json::Value {
        serde_json::to_value(&self.accepted).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::invoke;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_in_is_loose() {
        let rule = In::from_compact_form(Some("1,2,draft")).unwrap();
        assert!(!invoke(&rule, 1).unwrap().failed());
        assert!(!invoke(&rule, "2").unwrap().failed());
        assert!(!invoke(&rule, "draft").unwrap().failed());
        assert_eq!(
            invoke(&rule, "Draft").unwrap().failures,
            vec!["{field} must be one of 1, 2, draft"]
        );
    }

    #[test]
    fn test_in_strict() {
        let rule = InStrict::from_compact_form(Some("1,2")).unwrap();
        assert!(!invoke(&rule, "1").unwrap().failed());
        assert!(invoke(&rule, 1).unwrap().failed());

        let typed = InStrict::new([Value::Int(1), Value::Int(2)]).unwrap();
        assert!(!invoke(&typed, 2).unwrap().failed());
        assert!(invoke(&typed, "2").unwrap().failed());
    }

    #[test]
    fn test_requires_values() {
        let err = In::from_compact_form(Some(" ")).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid argument: The in rule requires at least one value to be specified."
        );
        assert!(InStrict::new(Vec::<Value>::new()).is_err());
    }

    #[test]
    fn test_front_end_option() {
        let rule = In::new(["a", "b"]).unwrap();
        assert_eq!(rule.serialize_option(), serde_json::json!(["a", "b"]));
        assert_eq!(rule.accepted().len(), 2);
    }
}
