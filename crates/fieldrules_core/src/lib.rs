//! # fieldrules core
//!
//! Core data structures and contracts for the fieldrules validation engine.
//!
//! This crate provides the building blocks shared by every other crate in the
//! workspace:
//!
//! - **Value**: the dynamically typed value under validation and the value bag
//! - **Command**: control-flow signals rules hand back to the validator
//! - **Conditions**: basic comparisons folded into (possibly nested) groups
//! - **Rules**: the capability traits rules implement, plus closure rules
//! - **Config**: per-validator settings for failure messages
//!
//! ## Example
//!
//! ```rust
//! use fieldrules_core::{BasicCondition, ConditionGroup, Values, Value};
//!
//! let condition = BasicCondition::parse("plan", "=", "pro", "and").unwrap();
//! let group = ConditionGroup::new().with(condition);
//!
//! let mut values = Values::new();
//! values.insert("plan".to_string(), Value::from("pro"));
//! assert!(group.passes(&values).unwrap());
//! ```

pub mod command;
pub mod condition;
pub mod config;
pub mod error;
pub mod rule;
pub mod value;

pub use command::*;
pub use condition::*;
pub use config::*;
pub use error::*;
pub use rule::*;
pub use value::*;
