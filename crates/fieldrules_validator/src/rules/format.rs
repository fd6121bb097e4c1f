//! Format rules: checks on the shape of a single value, most of which also
//! sanitize the value into its typed form.

use super::rule_id;
use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime};
use fieldrules_core::{
    Command, FromCompactForm, Result, RuleId, Sanitizer, ValidatesOnFrontEnd, ValidationRule,
    Value, Values,
};
use regex::Regex;
use std::sync::LazyLock;
use validator::ValidateEmail;

static INTEGER_STRING: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[+-]?(0|[1-9]\d*)$").expect("valid integer pattern"));

static LEADING_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[+-]?\d+").expect("valid leading integer pattern"));

/// Active ISO 4217 currency codes.
const CURRENCY_CODES: &[&str] = &[
    "AED", "AFN", "ALL", "AMD", "ANG", "AOA", "ARS", "AUD", "AWG", "AZN", "BAM", "BBD", "BDT",
    "BGN", "BHD", "BIF", "BMD", "BND", "BOB", "BOV", "BRL", "BSD", "BTN", "BWP", "BYN", "BZD",
    "CAD", "CDF", "CHE", "CHF", "CHW", "CLF", "CLP", "CNY", "COP", "COU", "CRC", "CUC", "CUP",
    "CVE", "CZK", "DJF", "DKK", "DOP", "DZD", "EGP", "ERN", "ETB", "EUR", "FJD", "FKP", "GBP",
    "GEL", "GHS", "GIP", "GMD", "GNF", "GTQ", "GYD", "HKD", "HNL", "HTG", "HUF", "IDR", "ILS",
    "INR", "IQD", "IRR", "ISK", "JMD", "JOD", "JPY", "KES", "KGS", "KHR", "KMF", "KPW", "KRW",
    "KWD", "KYD", "KZT", "LAK", "LBP", "LKR", "LRD", "LSL", "LYD", "MAD", "MDL", "MGA", "MKD",
    "MMK", "MNT", "MOP", "MRU", "MUR", "MVR", "MWK", "MXN", "MXV", "MYR", "MZN", "NAD", "NGN",
    "NIO", "NOK", "NPR", "NZD", "OMR", "PAB", "PEN", "PGK", "PHP", "PKR", "PLN", "PYG", "QAR",
    "RON", "RSD", "RUB", "RWF", "SAR", "SBD", "SCR", "SDG", "SEK", "SGD", "SHP", "SLE", "SLL",
    "SOS", "SRD", "SSP", "STN", "SVC", "SYP", "SZL", "THB", "TJS", "TMT", "TND", "TOP", "TRY",
    "TTD", "TWD", "TZS", "UAH", "UGX", "USD", "USN", "UYI", "UYU", "UYW", "UZS", "VED", "VES",
    "VND", "VUV", "WST", "XAF", "XAG", "XAU", "XBA", "XBB", "XBC", "XBD", "XCD", "XDR", "XOF",
    "XPD", "XPF", "XPT", "XSU", "XTS", "XUA", "XXX", "YER", "ZAR", "ZMW", "ZWL",
];

/// Formats tried, in order, when a `dateTime` rule has no explicit format.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d.%m.%Y"];

/// Fails unless the value is a number or a numeric string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Numeric;

rule_id!(Numeric, "numeric");

impl ValidationRule for Numeric {
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
        if !value.is_numeric() {
            fail("{field} must be numeric");
        }
        Ok(None)
    }

    fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        Some(self)
    }
}

impl FromCompactForm for Numeric {
    fn from_compact_form(_options: Option<&str>) -> Result<Self> {
        Ok(Self)
    }
}

impl ValidatesOnFrontEnd for Numeric {
    fn serialize_option(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

/// Fails unless the value reads as an integer; sanitizes it into one.
///
/// Accepted: integers, floats without a fractional part, and canonical
/// integer strings (`"42"`, `"-7"`, not `"042"` or `"4.0"`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Integer;

rule_id!(Integer, "integer");

impl Integer {
    fn accepts(value: &Value) -> bool {
        match value {
            Value::Int(_) => true,
            Value::Float(f) => f.is_finite() && f.fract() == 0.0,
            Value::String(s) => INTEGER_STRING.is_match(s.trim()) && s.trim().parse::<i64>().is_ok(),
            _ => false,
        }
    }
}

impl ValidationRule for Integer {
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
        if !Self::accepts(value) {
            fail("{field} must be an integer");
        }
        Ok(None)
    }

    fn as_sanitizer(&self) -> Option<&dyn Sanitizer> {
        Some(self)
    }

    fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        Some(self)
    }
}

impl FromCompactForm for Integer {
    fn from_compact_form(_options: Option<&str>) -> Result<Self> {
        Ok(Self)
    }
}

impl ValidatesOnFrontEnd for Integer {
    fn serialize_option(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

impl Sanitizer for Integer {
    /// Casts to an integer. Strings yield their leading integer (or 0),
    /// collections yield 0 when empty and 1 otherwise.
    fn sanitize(&self, value: Value) -> Value {
        let int = match &value {
            Value::Int(i) => *i,
            Value::Float(f) => f.trunc() as i64,
            Value::Bool(b) => i64::from(*b),
            Value::Null => 0,
            Value::String(s) => match value.numeric_value() {
                Some(n) => n.trunc() as i64,
                None => LEADING_INTEGER
                    .find(s)
                    .and_then(|m| m.as_str().trim().parse().ok())
                    .unwrap_or(0),
            },
            Value::List(items) => i64::from(!items.is_empty()),
            Value::Map(map) => i64::from(!map.is_empty()),
            Value::DateTime(_) => return value,
        };
        Value::Int(int)
    }
}

/// Fails unless the value is truthy; sanitizes it into a boolean.
///
/// Truthy: `true`, `1`, and the strings `"1"`, `"true"`, `"on"`, `"yes"`
/// (case-insensitive, surrounding whitespace ignored).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Boolean;

rule_id!(Boolean, "boolean");

impl Boolean {
    fn truthy(value: &Value) -> bool {
        match value {
            Value::Bool(b) => *b,
            Value::Int(i) => *i == 1,
            Value::Float(f) => *f == 1.0,
            Value::String(s) => matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "on" | "yes"
            ),
            _ => false,
        }
    }
}

impl ValidationRule for Boolean {
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
        if !Self::truthy(value) {
            fail("{field} must be a boolean");
        }
        Ok(None)
    }

    fn as_sanitizer(&self) -> Option<&dyn Sanitizer> {
        Some(self)
    }

    fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        Some(self)
    }
}

impl FromCompactForm for Boolean {
    fn from_compact_form(_options: Option<&str>) -> Result<Self> {
        Ok(Self)
    }
}

impl ValidatesOnFrontEnd for Boolean {
    fn serialize_option(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

impl Sanitizer for Boolean {
    fn sanitize(&self, value: Value) -> Value {
        Value::Bool(Self::truthy(&value))
    }
}

/// Fails unless the value is a string holding a valid email address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Email;

rule_id!(Email, "email");

impl Email {
    fn accepts(value: &Value) -> bool {
        let Some(address) = value.as_str() else {
            return false;
        };

        // The validator crate accepts single-label domains like `user@localhost`.
        let dotted_domain = address
            .rsplit_once('@')
            .is_some_and(|(_, domain)| domain.contains('.'));

        dotted_domain && address.to_string().validate_email()
    }
}

impl ValidationRule for Email {
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
        if !Self::accepts(value) {
            fail("{field} is not a valid email address");
        }
        Ok(None)
    }

    fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        Some(self)
    }
}

impl FromCompactForm for Email {
    fn from_compact_form(_options: Option<&str>) -> Result<Self> {
        Ok(Self)
    }
}

impl ValidatesOnFrontEnd for Email {
    fn serialize_option(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

/// Fails unless the value is a three-letter ISO 4217 currency code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Currency;

rule_id!(Currency, "currency");

impl ValidationRule for Currency {
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
        let known = value
            .as_str()
            .filter(|code| code.len() == 3)
            .is_some_and(|code| {
                let code = code.to_ascii_uppercase();
                CURRENCY_CODES.contains(&code.as_str())
            });

        if !known {
            fail("{field} must be a valid currency code");
        }
        Ok(None)
    }

    fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        Some(self)
    }
}

impl FromCompactForm for Currency {
    fn from_compact_form(_options: Option<&str>) -> Result<Self> {
        Ok(Self)
    }
}

impl ValidatesOnFrontEnd for Currency {
    fn serialize_option(&self) -> serde_json::Value {
        serde_json::Value::Null
    }
}

/// Fails unless the value is a date/time; sanitizes it into
/// [`Value::DateTime`].
///
/// With a format (chrono `strftime` syntax) the string must match it
/// exactly. Without one, RFC 3339, RFC 2822 and common ISO-like layouts are
/// accepted. Date-times without an offset are read as UTC, integers as unix
/// timestamps. Relative expressions such as `now` are not understood.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DateTimeRule {
    format: Option<String>,
}

rule_id!(DateTimeRule, "dateTime");

impl DateTimeRule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
        }
    }

    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }

    fn parse(&self, value: &Value) -> Option<DateTime<FixedOffset>> {
        match value {
            Value::DateTime(dt) => Some(*dt),
            Value::Int(secs) => {
                DateTime::from_timestamp(*secs, 0).map(|dt| dt.fixed_offset())
            }
            Value::String(s) => match &self.format {
                Some(format) => parse_with_format(s, format),
                None => parse_any(s.trim()),
            },
            _ => None,
        }
    }
}

fn parse_with_format(input: &str, format: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_str(input, format) {
        return (dt.format(format).to_string() == input).then_some(dt);
    }

    let naive = NaiveDateTime::parse_from_str(input, format).ok().or_else(|| {
        NaiveDate::parse_from_str(input, format)
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    })?;

    (naive.format(format).to_string() == input).then(|| naive.and_utc().fixed_offset())
}

fn parse_any(input: &str) -> Option<DateTime<FixedOffset>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt);
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt);
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(input, format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| NaiveDate::parse_from_str(input, format).ok())
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc().fixed_offset())
}

impl ValidationRule for DateTimeRule {
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
        if self.parse(value).is_none() {
            fail("{field} must be a valid date");
        }
        Ok(None)
    }

    fn as_sanitizer(&self) -> Option<&dyn Sanitizer> {
        Some(self)
    }

    fn as_front_end(&self) -> Option<&dyn ValidatesOnFrontEnd> {
        Some(self)
    }
}

impl FromCompactForm for DateTimeRule {
    fn from_compact_form(options: Option<&str>) -> Result<Self> {
        Ok(match options {
            Some(format) if !format.is_empty() => Self::with_format(format),
            _ => Self::new(),
        })
    }
}

impl ValidatesOnFrontEnd for DateTimeRule {
    fn serialize_option(&self) -> serde_json::Value {
        self.format.clone().into()
    }
}

impl Sanitizer for DateTimeRule {
    /// Values that cannot be read as a date/time are returned unchanged.
    fn sanitize(&self, value: Value) -> Value {
        match self.parse(&value) {
            Some(dt) => Value::DateTime(dt),
            None => value,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::invoke;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_numeric() {
        for ok in [Value::Int(1), Value::Float(1.5), Value::from("-3.2"), Value::from("1e3")] {
            assert!(!invoke(&Numeric, ok).unwrap().failed());
        }
        for bad in [Value::from("abc"), Value::Null, Value::Bool(true), Value::from("")] {
            assert_eq!(
                invoke(&Numeric, bad).unwrap().failures,
                vec!["{field} must be numeric"]
            );
        }
    }

    #[test]
    fn test_integer_accepts() {
        for ok in [Value::Int(-4), Value::Float(3.0), Value::from("72"), Value::from("-12")] {
            assert!(!invoke(&Integer, ok.clone()).unwrap().failed(), "{:?}", ok);
        }
        for bad in [
            Value::Bool(true),
            Value::Float(3.5),
            Value::from("04"),
            Value::from("4.0"),
            Value::from("abc"),
            Value::Null,
        ] {
            assert!(invoke(&Integer, bad.clone()).unwrap().failed(), "{:?}", bad);
        }
    }

    #[test]
    fn test_integer_sanitize() {
        assert_eq!(Integer.sanitize(Value::from("72")), Value::Int(72));
        assert_eq!(Integer.sanitize(Value::from("12abc")), Value::Int(12));
        assert_eq!(Integer.sanitize(Value::from("abc")), Value::Int(0));
        assert_eq!(Integer.sanitize(Value::Float(-3.9)), Value::Int(-3));
        assert_eq!(Integer.sanitize(Value::Bool(true)), Value::Int(1));
        assert_eq!(Integer.sanitize(Value::Null), Value::Int(0));
    }

    #[test]
    fn test_boolean() {
        for ok in [Value::Bool(true), Value::Int(1), Value::from("Yes"), Value::from(" on ")] {
            assert!(!invoke(&Boolean, ok.clone()).unwrap().failed(), "{:?}", ok);
        }
        for bad in [Value::Bool(false), Value::Int(0), Value::from("no"), Value::Null] {
            assert_eq!(
                invoke(&Boolean, bad).unwrap().failures,
                vec!["{field} must be a boolean"]
            );
        }
        assert_eq!(Boolean.sanitize(Value::from("TRUE")), Value::Bool(true));
        assert_eq!(Boolean.sanitize(Value::from("off")), Value::Bool(false));
    }

    #[test]
    fn test_email() {
        assert!(!invoke(&Email, "jane@example.com").unwrap().failed());
        for bad in [
            Value::from("jane"),
            Value::from("jane@localhost"),
            Value::from("@example.com"),
            Value::Int(1),
        ] {
            assert_eq!(
                invoke(&Email, bad).unwrap().failures,
                vec!["{field} is not a valid email address"]
            );
        }
    }

    #[test]
    fn test_currency() {
        assert!(!invoke(&Currency, "USD").unwrap().failed());
        assert!(!invoke(&Currency, "eur").unwrap().failed());
        assert!(invoke(&Currency, "ABC").unwrap().failed());
        assert!(invoke(&Currency, "US").unwrap().failed());
        assert!(invoke(&Currency, 840).unwrap().failed());
    }

    #[test]
    fn test_date_time_without_format() {
        let rule = DateTimeRule::new();
        for ok in ["2024-02-29", "2024-02-29 13:45:00", "2024-02-29T13:45:00+02:00"] {
            assert!(!invoke(&rule, ok).unwrap().failed(), "{}", ok);
        }
        for bad in ["2023-02-29", "now", "tomorrow", ""] {
            assert_eq!(
                invoke(&rule, bad).unwrap().failures,
                vec!["{field} must be a valid date"],
                "{}",
                bad
            );
        }
        assert!(invoke(&rule, true).unwrap().failed());
    }

    #[test]
    fn test_date_time_with_format() {
        let rule = DateTimeRule::from_compact_form(Some("%d/%m/%Y")).unwrap();
        assert_eq!(rule.format(), Some("%d/%m/%Y"));
        assert!(!invoke(&rule, "31/12/2024").unwrap().failed());
        assert!(invoke(&rule, "2024-12-31").unwrap().failed());
        assert!(invoke(&rule, "1/12/2024").unwrap().failed());
        assert_eq!(rule.serialize_option(), serde_json::json!("%d/%m/%Y"));
    }

    #[test]
    fn test_date_time_sanitize() {
        let rule = DateTimeRule::new();
        let Value::DateTime(dt) = rule.sanitize(Value::from("2024-01-02T03:04:05Z")) else {
            panic!("expected a date-time");
        };
        assert_eq!(dt.to_rfc3339(), "2024-01-02T03:04:05+00:00");

        assert_eq!(rule.sanitize(Value::from("nope")), Value::from("nope"));
        assert!(matches!(rule.sanitize(Value::Int(0)), Value::DateTime(_)));
        assert_eq!(rule.serialize_option(), serde_json::Value::Null);
    }
}
