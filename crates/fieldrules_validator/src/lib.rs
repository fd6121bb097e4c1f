//! # fieldrules validator
//!
//! Validation engine for fieldrules. This crate provides:
//!
//! - The built-in rule catalog (presence, size, format, membership,
//!   exclusion and conditional rules)
//! - The [`RuleRegistry`] mapping rule ids to constructors
//! - [`RuleSet`], the ordered rule list of one field
//! - [`Validator`], which runs rule sets against a value bag
//!
//! ## Example
//!
//! ```rust
//! use fieldrules_core::{ClosureRule, Command, Value, Values};
//! use fieldrules_validator::{RuleSet, Validator};
//!
//! let mut name = RuleSet::new();
//! name.rule("required").unwrap();
//!
//! let mut foo = RuleSet::new();
//! foo.rule(ClosureRule::with_value(|value, _fail| {
//!     value.is_blank().then_some(Command::SkipValidationRules)
//! }))
//! .unwrap()
//! .rule("required")
//! .unwrap();
//!
//! let mut values = Values::new();
//! values.insert("name".to_string(), Value::from(""));
//! values.insert("foo".to_string(), Value::from(""));
//!
//! let validator = Validator::new([("name", name), ("foo", foo)], values);
//!
//! assert!(validator.fails().unwrap());
//! assert_eq!(validator.errors().unwrap()["name"], "name is required");
//! assert!(!validator.errors().unwrap().contains_key("foo"));
//! ```

mod engine;
mod registry;
mod rule_set;
pub mod rules;

pub use engine::*;
pub use registry::*;
pub use rule_set::*;
pub use rules::*;
