//! Ordered rule lists bound to a single field.

use crate::RuleRegistry;
use crate::rules::*;
use fieldrules_core::{ClosureRule, Result, RuleEntry, ValidationRule};
use fieldrules_parser::RuleSpec;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::{Arc, LazyLock};

static DEFAULT_REGISTRY: LazyLock<Arc<RuleRegistry>> =
    LazyLock::new(|| Arc::new(RuleRegistry::default()));

/// Conversion of anything that can name or be a rule into a [`RuleEntry`].
///
/// Strings and [`RuleSpec`]s are resolved through the rule set's registry;
/// rule instances and closures are taken as they are.
pub trait IntoRuleEntry {
    /// # Errors
    ///
    /// Returns the registry's fault for unknown ids or malformed options.
    fn into_rule_entry(self, registry: &RuleRegistry) -> Result<RuleEntry>;
}

impl IntoRuleEntry for RuleEntry {
    fn into_rule_entry(self, _registry: &RuleRegistry) -> Result<RuleEntry> {
        Ok(self)
    }
}

impl IntoRuleEntry for &str {
    fn into_rule_entry(self, registry: &RuleRegistry) -> Result<RuleEntry> {
        registry.resolve(self).map(RuleEntry::Rule)
    }
}

impl IntoRuleEntry for String {
    fn into_rule_entry(self, registry: &RuleRegistry) -> Result<RuleEntry> {
        self.as_str().into_rule_entry(registry)
    }
}

impl IntoRuleEntry for &RuleSpec {
    fn into_rule_entry(self, registry: &RuleRegistry) -> Result<RuleEntry> {
        registry.resolve_spec(self).map(RuleEntry::Rule)
    }
}

impl IntoRuleEntry for RuleSpec {
    fn into_rule_entry(self, registry: &RuleRegistry) -> Result<RuleEntry> {
        (&self).into_rule_entry(registry)
    }
}

impl IntoRuleEntry for Box<dyn ValidationRule> {
    fn into_rule_entry(self, _registry: &RuleRegistry) -> Result<RuleEntry> {
        Ok(RuleEntry::Rule(self))
    }
}

impl IntoRuleEntry for ClosureRule {
    fn into_rule_entry(self, _registry: &RuleRegistry) -> Result<RuleEntry> {
        Ok(RuleEntry::Closure(self))
    }
}

macro_rules! impl_into_rule_entry {
    ($($rule:ty),* $(,)?) => {
        $(
            impl IntoRuleEntry for $rule {
                fn into_rule_entry(self, _registry: &RuleRegistry) -> Result<RuleEntry> {
                    Ok(RuleEntry::Rule(Box::new(self)))
                }
            }
        )*
    };
}

impl_into_rule_entry!(
    Required,
    Nullable,
    Optional,
    Min,
    Max,
    Size,
    Numeric,
    Integer,
    Boolean,
    Email,
    Currency,
    DateTimeRule,
    In,
    InStrict,
    Exclude,
    ExcludeIf,
    ExcludeUnless,
    NullableIf,
    NullableUnless,
    OptionalIf,
    OptionalUnless,
);

/// An ordered list of rules for one field.
///
/// Rules run in list order. Replacement and removal address rules by id;
/// closure rules have no id and are never matched.
///
/// # Example
///
/// ```rust
/// use fieldrules_validator::{Max, RuleSet};
///
/// let mut rules = RuleSet::new();
/// rules.rules(["required", "min:3", "max:10"]).unwrap();
///
/// assert!(rules.replace_rule("max", Max::new(20).unwrap()).unwrap());
/// assert_eq!(rules.len(), 3);
/// assert_eq!(
///     rules.to_front_end_json(),
///     serde_json::json!({"required": true, "min": 3, "max": 20})
/// );
/// ```
pub struct RuleSet {
    registry: Arc<RuleRegistry>,
    rules: Vec<RuleEntry>,
}

impl RuleSet {
    /// Creates an empty rule set backed by the built-in registry.
    pub fn new() -> Self {
        Self::with_registry(Arc::clone(&DEFAULT_REGISTRY))
    }

    /// Creates an empty rule set backed by `registry`.
    pub fn with_registry(registry: Arc<RuleRegistry>) -> Self {
        Self {
            registry,
            rules: Vec::new(),
        }
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// Appends a rule.
    pub fn rule(&mut self, rule: impl IntoRuleEntry) -> Result<&mut Self> {
        let entry = rule.into_rule_entry(&self.registry)?;
        self.rules.push(entry);
        Ok(self)
    }

    /// Appends several rules in order. Nothing is appended if any of them
    /// fails to resolve.
    pub fn rules<I>(&mut self, rules: I) -> Result<&mut Self>
    where
        I: IntoIterator,
        I::Item: IntoRuleEntry,
    {
        let entries = rules
            .into_iter()
            .map(|rule| rule.into_rule_entry(&self.registry))
            .collect::<Result<Vec<_>>>()?;
        self.rules.extend(entries);
        Ok(self)
    }

    /// Inserts a rule before all others.
    pub fn prepend_rule(&mut self, rule: impl IntoRuleEntry) -> Result<&mut Self> {
        let entry = rule.into_rule_entry(&self.registry)?;
        self.rules.insert(0, entry);
        Ok(self)
    }

    /// Replaces the first rule with the given id in place.
    ///
    /// Returns `Ok(false)` when no rule has that id. The replacement is
    /// resolved first, so a bad replacement faults even then.
    pub fn replace_rule(&mut self, id: &str, rule: impl IntoRuleEntry) -> Result<bool> {
        let entry = rule.into_rule_entry(&self.registry)?;
        Ok(self.replace_entry(id, entry).is_ok())
    }

    /// Replaces the first rule with the given id, or appends the rule.
    pub fn replace_or_append_rule(
        &mut self,
        id: &str,
        rule: impl IntoRuleEntry,
    ) -> Result<&mut Self> {
        let entry = rule.into_rule_entry(&self.registry)?;
        if let Err(entry) = self.replace_entry(id, entry) {
            self.rules.push(entry);
        }
        Ok(self)
    }

    /// Replaces the first rule with the given id, or prepends the rule.
    pub fn replace_or_prepend_rule(
        &mut self,
        id: &str,
        rule: impl IntoRuleEntry,
    ) -> Result<&mut Self> {
        let entry = rule.into_rule_entry(&self.registry)?;
        if let Err(entry) = self.replace_entry(id, entry) {
            self.rules.insert(0, entry);
        }
        Ok(self)
    }

    /// Hands the entry back when no rule has the id.
    fn replace_entry(&mut self, id: &str, entry: RuleEntry) -> std::result::Result<(), RuleEntry> {
        match self.position(id) {
            Some(index) => {
                self.rules[index] = entry;
                Ok(())
            }
            None => Err(entry),
        }
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.rules.iter().position(|entry| entry.id() == Some(id))
    }

    /// Returns the first rule with the given id.
    pub fn get_rule(&self, id: &str) -> Option<&RuleEntry> {
        self.position(id).map(|index| &self.rules[index])
    }

    pub fn has_rule(&self, id: &str) -> bool {
        self.position(id).is_some()
    }

    pub fn has_rules(&self) -> bool {
        !self.rules.is_empty()
    }

    /// Removes every rule with the given id. Closure rules are kept.
    pub fn remove_rule_with_id(&mut self, id: &str) -> &mut Self {
        self.rules.retain(|entry| entry.id() != Some(id));
        self
    }

    pub fn iter(&self) -> std::slice::Iter<'_, RuleEntry> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Returns the options of every front-end rule, keyed by rule id.
    pub fn to_front_end_json(&self) -> serde_json::Value {
        let options: serde_json::Map<String, serde_json::Value> = self
            .rules
            .iter()
            .filter_map(|entry| {
                let id = entry.id()?;
                let front_end = entry.as_front_end()?;
                Some((id.to_string(), front_end.serialize_option()))
            })
            .collect();

        serde_json::Value::Object(options)
    }
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RuleSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.iter()).finish()
    }
}

impl Serialize for RuleSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_front_end_json().serialize(serializer)
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a RuleEntry;
    type IntoIter = std::slice::Iter<'a, RuleEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}
