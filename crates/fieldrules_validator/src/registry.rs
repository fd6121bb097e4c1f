//! Rule registry.
//!
//! Maps rule ids to constructors so rules can be named in compact form
//! (`"min:3"`) or in rule documents. Registries are plain values; share one
//! behind an `Arc` between rule sets.

use crate::rules::*;
use fieldrules_core::{
    ConditionGroup, FromCompactForm, FromConditions, Result, RuleId, ValidationError,
    ValidationRule,
};
use fieldrules_parser::{split_rule_spec, RuleSpec};
use std::collections::HashMap;
use std::fmt;

type CompactConstructor = fn(Option<&str>) -> Result<Box<dyn ValidationRule>>;
type ConditionalConstructor = fn(ConditionGroup) -> Box<dyn ValidationRule>;

fn build_compact<R>(options: Option<&str>) -> Result<Box<dyn ValidationRule>>
where
    R: ValidationRule + FromCompactForm + 'static,
{
    Ok(Box::new(R::from_compact_form(options)?))
}

fn build_conditional<R>(conditions: ConditionGroup) -> Box<dyn ValidationRule>
where
    R: ValidationRule + FromConditions + 'static,
{
    Box::new(R::from_conditions(conditions))
}

/// Registry of constructible rule types, keyed by rule id.
///
/// # Example
///
/// ```rust
/// use fieldrules_validator::RuleRegistry;
///
/// let registry = RuleRegistry::default();
/// let rule = registry.resolve("min:3").unwrap();
/// assert_eq!(rule.id(), "min");
/// assert!(registry.resolve("unknown").is_err());
/// ```
#[derive(Clone)]
pub struct RuleRegistry {
    compact: HashMap<&'static str, CompactConstructor>,
    conditional: HashMap<&'static str, ConditionalConstructor>,
}

impl RuleRegistry {
    /// Creates an empty registry.
    pub fn empty() -> Self {
        Self {
            compact: HashMap::new(),
            conditional: HashMap::new(),
        }
    }

    /// Registers a rule type constructible from its compact form.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRule` when the id is already registered.
    pub fn register<R>(&mut self) -> Result<&mut Self>
    where
        R: ValidationRule + RuleId + FromCompactForm + 'static,
    {
        if self.compact.contains_key(R::ID) {
            return Err(ValidationError::DuplicateRule(R::ID.to_string()));
        }

        self.compact.insert(R::ID, build_compact::<R>);
        Ok(self)
    }

    /// Registers a conditional rule type, which can also be built from a
    /// full condition tree.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateRule` when the id is already registered.
    pub fn register_conditional<R>(&mut self) -> Result<&mut Self>
    where
        R: ValidationRule + RuleId + FromCompactForm + FromConditions + 'static,
    {
        self.register::<R>()?;
        self.conditional.insert(R::ID, build_conditional::<R>);
        Ok(self)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.compact.contains_key(id)
    }

    /// Returns the registered ids, sorted.
    pub fn ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.compact.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Builds a rule from its compact form, e.g. `"in:a,b"`.
    ///
    /// # Errors
    ///
    /// Returns `UnregisteredRule` for unknown ids, or the rule's own
    /// construction fault for malformed options.
    pub fn resolve(&self, spec: &str) -> Result<Box<dyn ValidationRule>> {
        let (id, options) = split_rule_spec(spec);
        let constructor = self
            .compact
            .get(id)
            .ok_or_else(|| ValidationError::UnregisteredRule(id.to_string()))?;

        constructor(options)
    }

    /// Builds a conditional rule from a condition tree.
    ///
    /// # Errors
    ///
    /// Returns `UnregisteredRule` when no conditional rule has that id.
    pub fn resolve_conditional(
        &self,
        id: &str,
        conditions: ConditionGroup,
    ) -> Result<Box<dyn ValidationRule>> {
        let constructor = self
            .conditional
            .get(id)
            .ok_or_else(|| ValidationError::UnregisteredRule(id.to_string()))?;

        Ok(constructor(conditions))
    }

    /// Builds a rule from a rule document entry.
    pub fn resolve_spec(&self, spec: &RuleSpec) -> Result<Box<dyn ValidationRule>> {
        match spec {
            RuleSpec::Compact(spec) => self.resolve(spec),
            RuleSpec::Conditional { rule, conditions } => {
                self.resolve_conditional(rule, conditions.clone())
            }
        }
    }

    fn register_builtins(&mut self) -> Result<()> {
        self.register::<Required>()?
            .register::<Nullable>()?
            .register::<Optional>()?
            .register::<Min>()?
            .register::<Max>()?
            .register::<Size>()?
            .register::<Numeric>()?
            .register::<Integer>()?
            .register::<Boolean>()?
            .register::<Email>()?
            .register::<Currency>()?
            .register::<DateTimeRule>()?
            .register::<In>()?
            .register::<InStrict>()?
            .register::<Exclude>()?
            .register_conditional::<ExcludeIf>()?
            .register_conditional::<ExcludeUnless>()?
            .register_conditional::<NullableIf>()?
            .register_conditional::<NullableUnless>()?
            .register_conditional::<OptionalIf>()?
            .register_conditional::<OptionalUnless>()?;
        Ok(())
    }
}

impl Default for RuleRegistry {
    /// A registry holding every built-in rule.
    fn default() -> Self {
        let mut registry = Self::empty();
        // Built-in ids are distinct, so registration cannot collide.
        let _ = registry.register_builtins();
        registry
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("ids", &self.ids())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldrules_core::{Command, Operator, Value, Values};
    use pretty_assertions::assert_eq;

    #[derive(Debug)]
    struct Uppercase;

    impl RuleId for Uppercase {
        const ID: &'static str = "uppercase";
    }

    impl ValidationRule for Uppercase {
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
            if value.as_str().is_some_and(|s| s != s.to_uppercase()) {
                fail("{field} must be uppercase");
            }
            Ok(None)
        }
    }

    impl FromCompactForm for Uppercase {
        fn from_compact_form(_options: Option<&str>) -> Result<Self> {
            Ok(Self)
        }
    }

    #[test]
    fn test_default_registers_catalog() {
        let registry = RuleRegistry::default();
        assert_eq!(registry.ids().len(), 21);
        for id in ["required", "min", "dateTime", "inStrict", "optionalUnless"] {
            assert!(registry.contains(id), "{}", id);
        }
    }

    #[test]
    fn test_resolve() {
        let registry = RuleRegistry::default();
        assert_eq!(registry.resolve("max:5").unwrap().id(), "max");
        assert_eq!(registry.resolve("dateTime:%H:%M").unwrap().id(), "dateTime");

        let err = registry.resolve("min:abc").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidArgument(_)));
    }

    #[test]
    fn test_unregistered() {
        let err = RuleRegistry::default().resolve("bogus:1").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Validation rule with id bogus has not been registered."
        );

        let err = RuleRegistry::default()
            .resolve_conditional("required", ConditionGroup::new())
            .unwrap_err();
        assert!(matches!(err, ValidationError::UnregisteredRule(_)));
    }

    #[test]
    fn test_register_custom_rule() {
        let mut registry = RuleRegistry::default();
        registry.register::<Uppercase>().unwrap();
        assert_eq!(registry.resolve("uppercase").unwrap().id(), "uppercase");

        let err = registry.register::<Uppercase>().unwrap_err();
        assert!(matches!(err, ValidationError::DuplicateRule(id) if id == "uppercase"));
        assert!(registry.register::<Required>().is_err());
    }

    #[test]
    fn test_resolve_spec() {
        let registry = RuleRegistry::default();
        let spec = RuleSpec::Conditional {
            rule: "excludeIf".to_string(),
            conditions: ConditionGroup::new().and("plan", Operator::Equal, "free"),
        };
        let rule = registry.resolve_spec(&spec).unwrap();
        assert_eq!(rule.id(), "excludeIf");
        assert_eq!(
            registry.resolve_spec(&RuleSpec::from("email")).unwrap().id(),
            "email"
        );
    }
}
