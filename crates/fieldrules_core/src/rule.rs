//! Rule capability traits.
//!
//! Every rule implements [`ValidationRule`]. The optional capabilities
//! ([`Sanitizer`], [`ValidatesOnFrontEnd`]) are opted into by overriding the
//! matching `as_*` accessor, which lets the validator query a boxed rule for
//! a capability without knowing its concrete type.
//!
//! # Example
//!
//! ```rust
//! use fieldrules_core::{Command, Result, ValidationRule, Value, Values};
//!
//! #[derive(Debug)]
//! struct NotBanned;
//!
//! impl ValidationRule for NotBanned {
//!     fn id(&self) -> &'static str {
//!         "notBanned"
//!     }
//!
//!     fn invoke(
//!         &self,
//!         value: &Value,
//!         fail: &mut dyn FnMut(&str),
//!         _key: &str,
//!         _values: &Values,
//!     ) -> Result<Option<Command>> {
//!         if value.as_str() == Some("banned") {
//!             fail("{field} is not allowed");
//!         }
//!         Ok(None)
//!     }
//! }
//! ```

use crate::{Command, ConditionGroup, Result, Value, Values};
use std::fmt;

/// A unit of per-field validation logic.
pub trait ValidationRule: fmt::Debug + Send + Sync {
    /// Stable identifier shared by every instance of the rule type.
    fn id(&self) -> &'static str;

    /// Runs the rule against the current value of `key`.
    ///
    /// Calling `fail` records a failure and does not stop the rule.
    /// Returning a [`Command`] redirects the validator; `Ok(None)` continues
    /// normally.
    ///
    /// # Errors
    ///
    /// Returns a fault when the value cannot be evaluated by this rule at all.
    fn invoke(
        &self,
        value: &Value,
        fail: &mut dyn FnMut(&str),
        key: &str,
        values: &Values,
    ) -> Result<Option<Command>>;

    /// Returns the sanitizer capability, if the rule has one.
    fn as_sanitizer(&self) -> Option<&dyn Sanitizer> {
        None
    }

    /// Returns the front-end capability, if the rule has one.
    fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        None
    }
}

/// Type-level id, used for registration before any instance exists.
pub trait RuleId {
    const ID: &'static str;
}

/// Construction from the compact textual form (`min:3`, `in:a,b`).
pub trait FromCompactForm: Sized {
    /// Builds a configured rule from the part after the first `:`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when the options are malformed.
    fn from_compact_form(options: Option<&str>) -> Result<Self>;
}

/// Construction of conditional rules from a full condition tree.
pub trait FromConditions: Sized {
    fn from_conditions(conditions: ConditionGroup) -> Self;
}

/// Transforms a value after its rule ran without returning a command.
pub trait Sanitizer {
    fn sanitize(&self, value: Value) -> Value;
}

/// Exposes the configuration a remote validator needs.
pub trait ValidatesOnFrontEnd {
    /// Returns the rule option payload, `null` when the id says it all.
    fn serialize_option(&self) -> serde_json::Value;
}

type RuleFn = dyn Fn(&Value, &mut dyn FnMut(&str), &str, &Values) -> Option<Command> + Send + Sync;

/// An anonymous rule built from a closure.
///
/// The three constructors cover the accepted call shapes: value and fail
/// callback, plus the field key, plus the whole value bag.
pub struct ClosureRule {
    func: Box<RuleFn>,
}

impl ClosureRule {
    /// Creates a rule receiving the value, fail callback, key and value bag.
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(&Value, &mut dyn FnMut(&str), &str, &Values) -> Option<Command>
            + Send
            + Sync
            + 'static,
    {
        Self {
            func: Box::new(func),
        }
    }

    /// Creates a rule receiving the value, fail callback and key.
    pub fn with_key<F>(func: F) -> Self
    where
        F: Fn(&Value, &mut dyn FnMut(&str), &str) -> Option<Command> + Send + Sync + 'static,
    {
        Self::new(move |value, fail, key, _values| func(value, fail, key))
    }

    /// Creates a rule receiving the value and fail callback.
    pub fn with_value<F>(func: F) -> Self
    where
        F: Fn(&Value, &mut dyn FnMut(&str)) -> Option<Command> + Send + Sync + 'static,
    {
        Self::new(move |value, fail, _key, _values| func(value, fail))
    }

    pub fn call(
        &self,
        value: &Value,
        fail: &mut dyn FnMut(&str),
        key: &str,
        values: &Values,
    ) -> Option<Command> {
        (self.func)(value, fail, key, values)
    }
}

impl fmt::Debug for ClosureRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ClosureRule")
    }
}

/// One entry of a rule set: a rule instance or a closure.
#[derive(Debug)]
pub enum RuleEntry {
    Rule(Box<dyn ValidationRule>),
    Closure(ClosureRule),
}

impl RuleEntry {
    /// Returns the rule id. Closures have none.
    pub fn id(&self) -> Option<&'static str> {
        match self {
            RuleEntry::Rule(rule) => Some(rule.id()),
            RuleEntry::Closure(_) => None,
        }
    }

    pub fn invoke(
        &self,
        value: &Value,
        fail: &mut dyn FnMut(&str),
        key: &str,
        values: &Values,
    ) -> Result<Option<Command>> {
        match self {
            RuleEntry::Rule(rule) => rule.invoke(value, fail, key, values),
            RuleEntry::Closure(closure) => Ok(closure.call(value, fail, key, values)),
        }
    }

    pub fn as_rule(&self) -> Option<&dyn ValidationRule> {
        match self {
            RuleEntry::Rule(rule) => Some(rule.as_ref()),
            RuleEntry::Closure(_) => None,
        }
    }

    pub fn as_sanitizer(&self) -> Option<&dyn Sanitizer> {
        self.as_rule().and_then(|rule| rule.as_sanitizer())
    }

    pub fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        self.as_rule().and_then(|rule| rule.as_front_end())
    }
}

impl From<Box<dyn ValidationRule>> for RuleEntry {
    fn from(rule: Box<dyn ValidationRule>) -> Self {
        RuleEntry::Rule(rule)
    }
}

impl From<ClosureRule> for RuleEntry {
    fn from(closure: ClosureRule) -> Self {
        RuleEntry::Closure(closure)
    }
}
