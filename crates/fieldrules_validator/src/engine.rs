//! Main validation engine.
//!
//! This module provides the [`Validator`] that runs every field's rule set
//! against the value bag, applies commands and sanitizers, and collects
//! failure messages.

use crate::{IntoRuleEntry, RuleRegistry, RuleSet};
use fieldrules_core::{Command, Result, ValidationConfig, Value, Values};
use fieldrules_parser::RuleDocument;
use std::cell::OnceCell;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, trace, warn};

/// Results of one validation run.
#[derive(Debug, Clone, Default, PartialEq)]
struct Outcome {
    errors: HashMap<String, String>,
    validated: Values,
}

/// Validates a value bag against per-field rule sets.
///
/// The run happens at most once, on the first call to [`passes`],
/// [`fails`], [`errors`] or [`validated`]; later calls return the stored
/// results. A run that faults is not stored, so the next call runs again
/// and reports the same fault.
///
/// Only the last failure of a field is kept. Fields without a rule set are
/// left out of [`validated`], as are fields excluded by a rule.
///
/// [`passes`]: Validator::passes
/// [`fails`]: Validator::fails
/// [`errors`]: Validator::errors
/// [`validated`]: Validator::validated
///
/// # Example
///
/// ```rust
/// use fieldrules_core::{Value, Values};
/// use fieldrules_validator::{RuleSet, Validator};
///
/// let mut age = RuleSet::new();
/// age.rules(["required", "integer", "min:18"]).unwrap();
///
/// let mut values = Values::new();
/// values.insert("age".to_string(), Value::from("72"));
/// values.insert("ignored".to_string(), Value::from("x"));
///
/// let validator = Validator::new([("age", age)], values);
///
/// assert!(validator.passes().unwrap());
/// assert_eq!(validator.validated().unwrap().get("age"), Some(&Value::Int(72)));
/// assert!(!validator.validated().unwrap().contains_key("ignored"));
/// ```
#[derive(Debug)]
pub struct Validator {
    rules: Vec<(String, RuleSet)>,
    values: Values,
    labels: HashMap<String, String>,
    config: ValidationConfig,
    outcome: OnceCell<Outcome>,
}

impl Validator {
    /// Creates a validator from `(field, rule set)` pairs.
    ///
    /// Fields run in the given order. A field given twice keeps its first
    /// position and its last rule set.
    pub fn new<I, K>(rules: I, values: Values) -> Self
    where
        I: IntoIterator<Item = (K, RuleSet)>,
        K: Into<String>,
    {
        let mut fields: Vec<(String, RuleSet)> = Vec::new();
        for (field, rule_set) in rules {
            let field = field.into();
            match fields.iter_mut().find(|(existing, _)| *existing == field) {
                Some((_, existing)) => *existing = rule_set,
                None => fields.push((field, rule_set)),
            }
        }

        Self {
            rules: fields,
            values,
            labels: HashMap::new(),
            config: ValidationConfig::default(),
            outcome: OnceCell::new(),
        }
    }

    /// Creates a validator from `(field, rules)` pairs where the rules are
    /// anything a [`RuleSet`] accepts: compact strings, [`RuleSpec`]s, rule
    /// instances or closures.
    ///
    /// [`RuleSpec`]: fieldrules_parser::RuleSpec
    ///
    /// # Errors
    ///
    /// Returns the first construction fault.
    pub fn from_specs<I, K, R>(specs: I, values: Values, registry: &Arc<RuleRegistry>) -> Result<Self>
    where
        I: IntoIterator<Item = (K, R)>,
        K: Into<String>,
        R: IntoIterator,
        R::Item: IntoRuleEntry,
    {
        let mut rule_sets = Vec::new();
        for (field, rules) in specs {
            let mut rule_set = RuleSet::with_registry(Arc::clone(registry));
            rule_set.rules(rules)?;
            rule_sets.push((field.into(), rule_set));
        }

        Ok(Self::new(rule_sets, values))
    }

    /// Creates a validator from a parsed rule document, taking its labels.
    ///
    /// # Errors
    ///
    /// Returns the first construction fault.
    pub fn from_document(
        document: &RuleDocument,
        values: Values,
        registry: &Arc<RuleRegistry>,
    ) -> Result<Self> {
        let validator = Self::from_specs(
            document
                .fields
                .iter()
                .map(|(field, specs)| (field.as_str(), specs.iter())),
            values,
            registry,
        )?;

        Ok(validator.with_labels(document.labels.clone()))
    }

    /// Sets display labels substituted into failure messages.
    ///
    /// Fields without a label use their key.
    pub fn with_labels<I, K, V>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.labels = labels
            .into_iter()
            .map(|(field, label)| (field.into(), label.into()))
            .collect();
        self.outcome = OnceCell::new();
        self
    }

    /// Sets the run configuration.
    pub fn with_config(mut self, config: ValidationConfig) -> Self {
        self.config = config;
        self.outcome = OnceCell::new();
        self
    }

    /// Returns the fields that have a rule set, in run order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|(field, _)| field.as_str())
    }

    /// Returns the rule set of a field.
    pub fn rule_set(&self, field: &str) -> Option<&RuleSet> {
        self.rules
            .iter()
            .find(|(existing, _)| existing == field)
            .map(|(_, rule_set)| rule_set)
    }

    pub fn values(&self) -> &Values {
        &self.values
    }

    /// Returns true when no rule failed.
    ///
    /// # Errors
    ///
    /// Returns the fault raised by a rule or condition during the run.
    pub fn passes(&self) -> Result<bool> {
        Ok(self.outcome()?.errors.is_empty())
    }

    /// Returns true when at least one rule failed.
    pub fn fails(&self) -> Result<bool> {
        self.passes().map(|passes| !passes)
    }

    /// Returns the failure message of every failed field.
    pub fn errors(&self) -> Result<&HashMap<String, String>> {
        Ok(&self.outcome()?.errors)
    }

    /// Returns the sanitized values of every field that was not excluded.
    pub fn validated(&self) -> Result<&Values> {
        Ok(&self.outcome()?.validated)
    }

    fn outcome(&self) -> Result<&Outcome> {
        if let Some(outcome) = self.outcome.get() {
            return Ok(outcome);
        }

        let outcome = self.run()?;
        Ok(self.outcome.get_or_init(|| outcome))
    }

    fn run(&self) -> Result<Outcome> {
        debug!(fields = self.rules.len(), "Starting validation run");

        let mut outcome = Outcome::default();

        for (field, rule_set) in &self.rules {
            let label = self.labels.get(field).map_or(field.as_str(), String::as_str);
            let mut value = self.values.get(field).cloned().unwrap_or(Value::Null);
            let mut excluded = false;

            for entry in rule_set {
                let mut fail = |message: &str| {
                    let message = self.config.format_message(message, label);
                    outcome.errors.insert(field.clone(), message);
                };

                let command = entry
                    .invoke(&value, &mut fail, field, &self.values)
                    .inspect_err(|err| {
                        warn!(field = %field, rule = entry.id().unwrap_or("closure"), error = %err, "Validation run aborted");
                    })?;

                match command {
                    Some(Command::SkipValidationRules) => {
                        trace!(field = %field, command = Command::SkipValidationRules.name(), "Skipping remaining rules");
                        break;
                    }
                    Some(Command::ExcludeValue) => {
                        trace!(field = %field, command = Command::ExcludeValue.name(), "Excluding value");
                        excluded = true;
                        break;
                    }
                    None => {
                        if let Some(sanitizer) = entry.as_sanitizer() {
                            value = sanitizer.sanitize(value);
                        }
                    }
                }
            }

            if !excluded {
                outcome.validated.insert(field.clone(), value);
            }
        }

        debug!(
            errors = outcome.errors.len(),
            validated = outcome.validated.len(),
            "Validation run finished"
        );

        Ok(outcome)
    }
}
