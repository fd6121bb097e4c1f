//! Conditional rules.
//!
//! Each rule owns a [`ConditionGroup`] evaluated against the whole value bag
//! and returns a command depending on the outcome. The compact form is a
//! `;`-separated list of `field,value` equality conditions joined with `and`
//! (`excludeIf:account_type,personal;country,US`); richer trees come from
//! [`FromConditions`] or from rule documents.
//!
//! Conditions are only consulted once the value itself qualifies, so a
//! condition on a field missing from the bag faults only when it matters.

use super::rule_id;
use fieldrules_core::{
    Command, ConditionGroup, FromCompactForm, FromConditions, Result, RuleId, ValidatesOnFrontEnd,
    ValidationRule, Value, Values,
};
use fieldrules_parser::parse_condition_list;

macro_rules! conditional_rule {
    (
        $(#[$meta:meta])*
        $name:ident, $id:literal,
        |$value:ident, $conditions:ident, $values:ident| $body:expr
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $name {
            conditions: ConditionGroup,
        }

        rule_id!($name, $id);

        impl $name {
            pub fn new(conditions: ConditionGroup) -> Self {
                Self { conditions }
            }

            pub fn conditions(&self) -> &ConditionGroup {
                &self.conditions
            }
        }

        impl ValidationRule for $name {
            fn id(&self) -> &'static str {
                Self::ID
            }

            fn invoke(
                &self,
                $value: &Value,
                _fail: &mut dyn FnMut(&str),
                _key: &str,
                $values: &Values,
            ) -> Result<Option<Command>> {
                let $conditions = &self.conditions;
                $body
            }

            fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
                Some(self)
            }
        }

        impl FromCompactForm for $name {
            fn from_compact_form(options: Option<&str>) -> Result<Self> {
                Ok(Self::new(parse_condition_list(Self::ID, options)?))
            }
        }

        impl FromConditions for $name {
            fn from_conditions(conditions: ConditionGroup) -> Self {
                Self::new(conditions)
            }
        }

        impl ValidatesOnFrontEnd for $name {
            fn serialize_option(&self) -> serde_json::Value {
                self.conditions.to_json()
            }
        }
    };
}

conditional_rule! {
    /// Excludes the field when the conditions pass.
    ExcludeIf, "excludeIf",
    |_value, conditions, values| {
        Ok(conditions.passes(values)?.then_some(Command::ExcludeValue))
    }
}

conditional_rule! {
    /// Excludes the field when the conditions fail.
    ExcludeUnless, "excludeUnless",
    |_value, conditions, values| {
        Ok(conditions.fails(values)?.then_some(Command::ExcludeValue))
    }
}

conditional_rule! {
    /// Skips the remaining rules when the value is null and the conditions
    /// pass.
    NullableIf, "nullableIf",
    |value, conditions, values| {
        let skip = value.is_null() && conditions.passes(values)?;
        Ok(skip.then_some(Command::SkipValidationRules))
    }
}

conditional_rule! {
    /// Skips the remaining rules when the value is null and the conditions
    /// fail.
    NullableUnless, "nullableUnless",
    |value, conditions, values| {
        let skip = value.is_null() && conditions.fails(values)?;
        Ok(skip.then_some(Command::SkipValidationRules))
    }
}

conditional_rule! {
    /// Skips the remaining rules when the value is null or `""` and the
    /// conditions pass.
    OptionalIf, "optionalIf",
    |value, conditions, values| {
        let skip = value.is_blank() && conditions.passes(values)?;
        Ok(skip.then_some(Command::SkipValidationRules))
    }
}

conditional_rule! {
    /// Skips the remaining rules when the value is null or `""` and the
    /// conditions fail.
    OptionalUnless, "optionalUnless",
    |value, conditions, values| {
        let skip = value.is_blank() && conditions.fails(values)?;
        Ok(skip.then_some(Command::SkipValidationRules))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::invoke_with;
    use fieldrules_core::{Operator, ValidationError};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn bag(plan: &str, value: Value) -> Values {
        let mut values = Values::new();
        values.insert("plan".to_string(), Value::from(plan));
        values.insert("field".to_string(), value);
        values
    }

    #[test]
    fn test_exclude_if_and_unless() {
        let rule = ExcludeIf::from_compact_form(Some("plan,free")).unwrap();
        let outcome = invoke_with(&rule, Value::from("x"), &bag("free", "x".into())).unwrap();
        assert_eq!(outcome.command, Some(Command::ExcludeValue));
        let outcome = invoke_with(&rule, Value::from("x"), &bag("pro", "x".into())).unwrap();
        assert_eq!(outcome.command, None);

        let rule = ExcludeUnless::from_compact_form(Some("plan,free")).unwrap();
        let outcome = invoke_with(&rule, Value::from("x"), &bag("pro", "x".into())).unwrap();
        assert_eq!(outcome.command, Some(Command::ExcludeValue));
    }

    #[test]
    fn test_nullable_if_requires_null() {
        let rule = NullableIf::from_compact_form(Some("plan,free")).unwrap();
        let outcome = invoke_with(&rule, Value::Null, &bag("free", Value::Null)).unwrap();
        assert_eq!(outcome.command, Some(Command::SkipValidationRules));

        let outcome = invoke_with(&rule, Value::from(""), &bag("free", "".into())).unwrap();
        assert_eq!(outcome.command, None);

        let rule = NullableUnless::from_compact_form(Some("plan,free")).unwrap();
        let outcome = invoke_with(&rule, Value::Null, &bag("pro", Value::Null)).unwrap();
        assert_eq!(outcome.command, Some(Command::SkipValidationRules));
    }

    #[test]
    fn test_optional_if_and_unless() {
        let rule = OptionalIf::from_compact_form(Some("plan,free")).unwrap();
        let outcome = invoke_with(&rule, Value::from(""), &bag("free", "".into())).unwrap();
        assert_eq!(outcome.command, Some(Command::SkipValidationRules));
        let outcome = invoke_with(&rule, Value::from(""), &bag("pro", "".into())).unwrap();
        assert_eq!(outcome.command, None);

        let rule = OptionalUnless::from_compact_form(Some("plan,free")).unwrap();
        let outcome = invoke_with(&rule, Value::Null, &bag("pro", Value::Null)).unwrap();
        assert_eq!(outcome.command, Some(Command::SkipValidationRules));
    }

    #[test]
    fn test_conditions_only_consulted_for_blank_values() {
        let rule = OptionalIf::new(ConditionGroup::new().and("missing", Operator::Equal, 1));
        let values = bag("free", "x".into());

        let outcome = invoke_with(&rule, Value::from("x"), &values).unwrap();
        assert_eq!(outcome.command, None);

        let err = invoke_with(&rule, Value::from(""), &values).unwrap_err();
        assert!(matches!(err, ValidationError::MissingConditionField(field) if field == "missing"));
    }

    #[test]
    fn test_compact_form_errors() {
        assert!(ExcludeIf::from_compact_form(None).is_err());
        assert!(OptionalUnless::from_compact_form(Some("plan")).is_err());
    }

    #[test]
    fn test_front_end_option_is_condition_json() {
        let rule = ExcludeIf::from_conditions(
            ConditionGroup::new()
                .and("plan", Operator::Equal, "free")
                .or("seats", Operator::LessThan, 2),
        );
        assert_eq!(
            rule.serialize_option(),
            json!([
                {"type": "basic", "field": "plan", "value": "free", "operator": "=", "boolean": "and"},
                {"type": "basic", "field": "seats", "value": 2, "operator": "<", "boolean": "or"}
            ])
        );
        assert_eq!(rule.conditions().len(), 2);
    }
}
