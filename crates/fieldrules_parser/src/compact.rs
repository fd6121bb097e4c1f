//! Compact rule syntax.
//!
//! Rules can be written as a bare id (`required`), an id with one option
//! (`min:3`), an id with a comma list (`in:draft,published`) or, for
//! conditional rules, an id with `;`-separated `field,value` pairs
//! (`optionalIf:account_type,personal;country,US`).
//!
//! All string handling of the compact form lives here so that rules and the
//! condition evaluator only ever see typed values.

use fieldrules_core::{ConditionGroup, Operator, Result, ValidationError, Value};

/// Splits a compact rule spec at its first `:` into id and options.
///
/// # Example
///
/// ```rust
/// use fieldrules_parser::split_rule_spec;
///
/// assert_eq!(split_rule_spec("min:3"), ("min", Some("3")));
/// assert_eq!(split_rule_spec("dateTime:%H:%M"), ("dateTime", Some("%H:%M")));
/// assert_eq!(split_rule_spec("required"), ("required", None));
/// ```
pub fn split_rule_spec(spec: &str) -> (&str, Option<&str>) {
    match spec.split_once(':') {
        Some((id, options)) => (id, Some(options)),
        None => (spec, None),
    }
}

/// Parses `field,value;field,value` into a group of `=` conditions joined
/// with `and`. Values are kept as strings.
///
/// # Errors
///
/// Returns `InvalidArgument` when the options are missing or empty, or when
/// a segment does not split into exactly one field name and one value.
pub fn parse_condition_list(rule_id: &str, options: Option<&str>) -> Result<ConditionGroup> {
    let options = match options {
        Some(options) if !options.is_empty() => options,
        _ => {
            return Err(ValidationError::invalid_argument(format!(
                "{} rule requires at least one condition",
                rule_id
            )));
        }
    };

    let mut group = ConditionGroup::new();
    for segment in options.split(';') {
        let parts: Vec<&str> = segment.split(',').collect();
        let [field, value] = parts.as_slice() else {
            return Err(ValidationError::invalid_argument(format!(
                "{} rule requires one field name and one value",
                rule_id
            )));
        };

        group = group.and(*field, Operator::Equal, Value::from(*value));
    }

    Ok(group)
}

/// Parses a positive integer bound (`min:3`).
///
/// # Errors
///
/// Returns `InvalidArgument` when the option is missing, not numeric, or not
/// strictly positive.
pub fn parse_size_option(rule_id: &str, options: Option<&str>) -> Result<i64> {
    let parsed = options
        .map(str::trim)
        .filter(|o| Value::from(*o).is_numeric())
        .and_then(|o| o.parse::<f64>().ok())
        .ok_or_else(|| {
            ValidationError::invalid_argument(format!(
                "{} validation rule requires a numeric value",
                rule_id
            ))
        })?;

    let size = parsed.trunc() as i64;
    if size <= 0 {
        return Err(ValidationError::invalid_argument(format!(
            "{} validation rule requires a positive value",
            rule_id
        )));
    }

    Ok(size)
}

/// Parses a comma list (`in:a,b,c`).
///
/// # Errors
///
/// Returns `InvalidArgument` when the option is missing or blank.
pub fn parse_list_option(rule_id: &str, options: Option<&str>) -> Result<Vec<String>> {
    match options {
        Some(options) if !options.trim().is_empty() => {
            Ok(options.split(',').map(str::to_string).collect())
        }
        _ => Err(ValidationError::invalid_argument(format!(
            "The {} rule requires at least one value to be specified.",
            rule_id
        ))),
    }
}
