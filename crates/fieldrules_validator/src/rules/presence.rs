//! Presence rules: whether a field must carry a value, and when the rest of
//! its rules can be skipped.

use super::rule_id;
use fieldrules_core::{
    Command, FromCompactForm, Result, RuleId, ValidatesOnFrontEnd, ValidationRule, Value, Values,
};

/// Fails when the field is absent from the value bag, null, or `""`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Required;

rule_id!(Required, "required");

impl ValidationRule for Required {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn invoke(
        &self,
        value: &Value,
        fail: &mut dyn FnMut(&str),
        key: &str,
        values: &Values,
    ) -> Result<Option<Command>> {
        if !values.contains_key(key) || value.is_blank() {
            fail("{field} is required");
        }
        Ok(None)
    }

    fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        Some(self)
    }
}

impl FromCompactForm for Required {
    fn from_compact_form(_options: Option<&str>) -> Result<Self> {
        Ok(Self)
    }
}

impl ValidatesOnFrontEnd for Required {
    fn serialize_option(&self) -> serde_json::Value {
        serde_json::Value::Bool(true)
    }
}

/// Skips the remaining rules when the value is null.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Nullable;

rule_id!(Nullable, "nullable");

impl ValidationRule for Nullable {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn invoke(
        &self,
        value: &Value,
        _fail: &mut dyn FnMut(&str),
        _key: &str,
        _values: &Values,
    ) -> Result<Option<Command>> {
        Ok(value.is_null().then_some(Command::SkipValidationRules))
    }

    fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        Some(self)
    }
}

impl FromCompactForm for Nullable {
    fn from_compact_form(_options: Option<&str>) -> Result<Self> {
        Ok(Self)
    }
}

impl ValidatesOnFrontEnd for Nullable {
    fn serialize_option(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

/// Skips the remaining rules when the value is null or `""`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Optional;

rule_id!(Optional, "optional");

impl ValidationRule for Optional {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn invoke(
        &self,
        value: &Value,
        _fail: &mut dyn FnMut(&str),
        _key: &str,
        _values: &Values,
    ) -> Result<Option<Command>> {
        Ok(value.is_blank().then_some(Command::SkipValidationRules))
    }

    fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        Some(self)
    }
}

impl FromCompactForm for Optional {
    fn from_compact_form(_options: Option<&str>) -> Result<Self> {
        Ok(Self)
    }
}

impl ValidatesOnFrontEnd for Optional {
    fn serialize_option(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}
