//! Size rules.
//!
//! Numbers are compared by value and strings by character count. Any other
//! value is a domain fault rather than a failure, since a size cannot be
//! read from it at all.

use super::rule_id;
use fieldrules_core::{
    Command, FromCompactForm, Result, RuleId, ValidatesOnFrontEnd, ValidationError,
    ValidationRule, Value, Values,
};
use fieldrules_parser::parse_size_option;
use std::cmp::Ordering;

/// What a size rule measured.
enum Measure {
    Number(Ordering),
    Length(Ordering),
}

fn measure(value: &Value, bound: i64) -> Result<Measure> {
    match value {
        Value::Int(i) => Ok(Measure::Number(i.cmp(&bound))),
        Value::Float(f) => f
            .partial_cmp(&(bound as f64))
            .map(Measure::Number)
            .ok_or_else(|| ValidationError::domain("Field value must be a number or string")),
        Value::String(s) => Ok(Measure::Length((s.chars().count() as i64).cmp(&bound))),
        _ => Err(ValidationError::domain(
            "Field value must be a number or string",
        )),
    }
}

fn positive(rule_id: &str, size: i64) -> Result<i64> {
    if size <= 0 {
        return Err(ValidationError::invalid_argument(format!(
            "{} validation rule requires a positive value",
            rule_id
        )));
    }
    Ok(size)
}

/// Lower bound on a number or string length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Min {
    size: i64,
}

rule_id!(Min, "min");

impl Min {
    /// Creates the rule.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `size` is not positive.
    pub fn new(size: i64) -> Result<Self> {
        Ok(Self {
            size: positive(Self::ID, size)?,
        })
    }

    pub fn size(&self) -> i64 {
        self.size
    }
}

impl ValidationRule for Min {
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
        match measure(value, self.size)? {
            Measure::Number(Ordering::Less) => fail(&format!(
                "{{field}} must be greater than or equal to {}",
                self.size
            )),
            Measure::Length(Ordering::Less) => fail(&format!(
                "{{field}} must be more than or equal to {} characters",
                self.size
            )),
            _ => {}
        }
        Ok(None)
    }

    fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        Some(self)
    }
}

impl FromCompactForm for Min {
    fn from_compact_form(options: Option<&str>) -> Result<Self> {
        Self::new(parse_size_option(Self::ID, options)?)
    }
}

impl ValidatesOnFrontEnd for Min {
    fn serialize_option(&self) -> serde_json::Value {
        self.size.into()
    }
}

/// Upper bound on a number or string length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Max {
    size: i64,
}

rule_id!(Max, "max");

impl Max {
    /// Creates the rule.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `size` is not positive.
    pub fn new(size: i64) -> Result<Self> {
        Ok(Self {
            size: positive(Self::ID, size)?,
        })
    }

    pub fn size(&self) -> i64 {
        self.size
    }
}

impl ValidationRule for Max {
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
        match measure(value, self.size)? {
            Measure::Number(Ordering::Greater) => fail(&format!(
                "{{field}} must be less than or equal to {}",
                self.size
            )),
            Measure::Length(Ordering::Greater) => fail(&format!(
                "{{field}} must be less than or equal to {} characters",
                self.size
            )),
            _ => {}
        }
        Ok(None)
    }

    fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        Some(self)
    }
}

impl FromCompactForm for Max {
    fn from_compact_form(options: Option<&str>) -> Result<Self> {
        Self::new(parse_size_option(Self::ID, options)?)
    }
}

impl ValidatesOnFrontEnd for Max {
    fn serialize_option(&self) -> serde_json::Value {
        self.size.into()
    }
}

/// Exact number or string length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    size: i64,
}

rule_id!(Size, "size");

impl Size {
    /// Creates the rule.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` when `size` is not positive.
    pub fn new(size: i64) -> Result<Self> {
        Ok(Self {
            size: positive(Self::ID, size)?,
        })
    }

    pub fn size(&self) -> i64 {
        self.size
    }
}

impl ValidationRule for Size {
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
        match measure(value, self.size)? {
            Measure::Number(ordering) if ordering != Ordering::Equal => {
                fail(&format!("{{field}} must be exactly {}", self.size))
            }
            Measure::Length(ordering) if ordering != Ordering::Equal => fail(&format!(
                "{{field}} must be exactly {} characters",
                self.size
            )),
            _ => {}
        }
        Ok(None)
    }

    fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        Some(self)
    }
}

impl FromCompactForm for Size {
    fn from_compact_form(options: Option<&str>) -> Result<Self> {
        Self::new(parse_size_option(Self::ID, options)?)
    }
}

impl ValidatesOnFrontEnd for Size {
    fn serialize_option(&self) -> serde_json::Value {
        self.size.into()
    }
}
