use super::rule_id;
use fieldrules_core::{Command, FromCompactForm, Result, RuleId, ValidationRule, Value, Values};

/// Always drops the field from the validated values.
///
/// Not visible to front-end validators.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Exclude;

rule_id!(Exclude, "exclude");

impl ValidationRule for Exclude {
    fn id(&self) -> &'static str {
        Self::ID
    }

    fn invoke(
        &self,
        _value: &Value,
        _fail: &mut dyn FnMut(&str),
        _key: &str,
        _values: &Values,
    ) -> Result<Option<Command>> {
        Ok(Some(Command::ExcludeValue))
    }
}

impl FromCompactForm for Exclude {
    fn from_compact_form(_options: Option<&str>) -> Result<Self> {
        Ok(Self)
    }
}
